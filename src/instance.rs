//! [`RawParams`]: the raw `{name: [atoms...]}` input to a registry, and
//! [`Instance`]: a validated, queryable parameter set produced by
//! [`crate::registry::Registry::process`].

use std::collections::BTreeMap;

use crate::error::Error;
use crate::registry::Registry;
use crate::value::Value;

/// Raw, ungrouped query atoms keyed by parameter name, in the shape a URI
/// query string decodes to. `None` models a bare `name` with no `=`; `Some`
/// (including `Some(String::new())`) models `name=` or `name=value`. Both are
/// treated identically by [`crate::template::Template::process`].
#[derive(Debug, Default, Clone)]
pub struct RawParams(BTreeMap<String, Vec<Option<String>>>);

impl RawParams {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Option<String>>) {
        self.0.insert(name.into(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[Option<String>]> {
        self.0.get(name).map(|v| v.as_slice())
    }

    /// Build a [`RawParams`] from decoded `(name, value)` query pairs,
    /// grouping repeated names in encounter order.
    pub fn from_pairs<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut map: BTreeMap<String, Vec<Option<String>>> = BTreeMap::new();
        for (name, value) in pairs {
            map.entry(name).or_default().push(Some(value));
        }
        Self(map)
    }

    pub(crate) fn unrecognized(
        &self,
        registry: &Registry,
    ) -> BTreeMap<String, Vec<Option<String>>> {
        self.0
            .iter()
            .filter(|(name, _)| {
                name.as_str() != registry.complement_name() && registry.template(name).is_none()
            })
            .map(|(name, values)| (name.clone(), values.clone()))
            .collect()
    }
}

/// A registry's templates applied to one set of raw input: the validated,
/// queryable result. Borrows its [`Registry`] rather than reference-counting
/// it, so the registry cannot be mutated (via [`Registry::refresh`]) while
/// any instance derived from it is alive.
pub struct Instance<'r> {
    registry: &'r Registry,
    content: BTreeMap<String, Value>,
    other: BTreeMap<String, Vec<Option<String>>>,
}

impl<'r> Instance<'r> {
    pub(crate) fn new(
        registry: &'r Registry,
        content: BTreeMap<String, Value>,
        other: BTreeMap<String, Vec<Option<String>>>,
    ) -> Self {
        Self {
            registry,
            content,
            other,
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.content.get(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.content.contains_key(name)
    }

    /// Raw atoms for names not recognized by the registry, carried through
    /// unexamined (e.g. UTM tags, partner codes).
    pub fn other(&self) -> &BTreeMap<String, Vec<Option<String>>> {
        &self.other
    }

    /// Re-run the evaluation pipeline with `raw` merged atop this instance's
    /// existing content. On error, `self` is left unchanged — `set` never
    /// applies a partial update.
    #[tracing::instrument(level = "debug", skip(self, raw), err(Debug, level = "warn"))]
    pub fn set(&mut self, raw: RawParams, with_defaults: bool) -> Result<(), Error> {
        let seed = self.content.clone();
        let content = self.registry.evaluate(&raw, seed, with_defaults)?;
        self.content = content;
        for (name, values) in raw.unrecognized(self.registry) {
            self.other.insert(name, values);
        }
        Ok(())
    }

    /// Like [`Instance::set`], but returns a new instance rather than
    /// mutating this one.
    pub fn clone_with(&self, raw: RawParams, with_defaults: bool) -> Result<Instance<'r>, Error> {
        let mut clone = Instance {
            registry: self.registry,
            content: self.content.clone(),
            other: self.other.clone(),
        };
        clone.set(raw, with_defaults)?;
        Ok(clone)
    }

    /// The present members of a named group, keyed by parameter name. Missing
    /// members are simply absent from the result.
    pub fn group(&self, name: &str) -> Result<BTreeMap<String, &Value>, Error> {
        let members = self
            .registry
            .group_members(name)
            .ok_or_else(|| Error::UnknownGroup {
                name: name.to_string(),
            })?;
        Ok(members
            .iter()
            .filter_map(|m| self.content.get(m).map(|v| (m.clone(), v)))
            .collect())
    }

    /// Serialize present parameters back into a `name=value&...` query
    /// string, in registry declaration order. No percent-encoding is applied
    /// — callers that need it should run the result (or individual atoms)
    /// through the `percent` module, gated by the `percent-encode` feature.
    #[tracing::instrument(level = "debug", skip(self), err)]
    pub fn as_string(&self) -> Result<String, Error> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut complemented_names: Vec<String> = Vec::new();

        for name in self.registry.sequence() {
            let Some(value) = self.content.get(name) else {
                continue;
            };
            let template = self.registry.template(name).unwrap();

            let (mut literal_atoms, _) = template
                .unprocess(Some(value))
                .map(|r| r.unwrap())?;
            if template.reverse {
                literal_atoms.reverse();
            }
            let literal_cost = pairs_cost(name, &literal_atoms);

            let mut chosen = literal_atoms;
            let mut is_complemented = false;

            if matches!(value, Value::Composite(..)) {
                if let Some(complement_cost_atoms) = self.complement_candidate(name, value)? {
                    let extra = self.registry.complement_name().len() + 1 + name.len();
                    let candidate_cost = pairs_cost(name, &complement_cost_atoms) + extra;
                    if candidate_cost < literal_cost {
                        chosen = complement_cost_atoms;
                        is_complemented = true;
                    }
                }
            }

            if is_complemented {
                complemented_names.push(name.clone());
            }
            for atom in chosen {
                pairs.push((name.clone(), atom));
            }
        }

        // The reserved `complement` key is emitted last, one pair per
        // complemented parameter name, after all other parameters.
        for name in &complemented_names {
            pairs.push((self.registry.complement_name().to_string(), name.clone()));
        }

        Ok(pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&"))
    }

    fn complement_candidate(
        &self,
        name: &str,
        value: &Value,
    ) -> Result<Option<Vec<String>>, Error> {
        let template = self.registry.template(name).unwrap();
        if template.complement.is_none() {
            return Ok(None);
        }
        let complemented = template.complement_value(value)?;
        let (mut atoms, _) = match template.unprocess(Some(&complemented))? {
            Some(pair) => pair,
            None => return Ok(None),
        };
        if template.reverse {
            atoms.reverse();
        }
        Ok(Some(atoms))
    }

    /// Replace the query portion of `base` with this instance's serialized
    /// parameters, percent-encoding names and values (per
    /// [`crate::uri::with_query`]).
    pub fn make_uri(&self, base: &url::Url) -> Result<url::Url, Error> {
        let serialized = self.as_string()?;
        crate::uri::with_query(base, &serialized)
    }
}

fn pairs_cost(name: &str, atoms: &[String]) -> usize {
    atoms.iter().map(|a| name.len() + 1 + a.len()).sum()
}
