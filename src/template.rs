//! [`Template`]: the schema for a single parameter, and the `process` /
//! `unprocess` pipelines that turn raw query atoms into a validated
//! [`Value`] and back.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::callback::{ComplementFn, ConsumerFn, DefaultFn, Format, UnwindFn, UniverseFn};
use crate::error::Error;
use crate::value::Value;
use crate::vtype::{CompositeType, StringType, ValueType};

/// The immutable schema for one parameter. Built by
/// [`crate::registry::RegistryBuilder`]; never mutated after the owning
/// registry is constructed, except for `_unicache` via [`Template::refresh`].
pub struct Template {
    pub name: String,
    pub vtype: Arc<dyn ValueType>,
    pub composite: Option<Arc<dyn CompositeType>>,
    pub format: Format,
    pub min: usize,
    pub max: Option<usize>,
    pub shift: bool,
    pub empty: bool,
    pub default: Option<DefaultFn>,
    /// Parameters that must be present whenever this one is. Does *not*
    /// include `consumes` — those are tracked separately since consumed
    /// parameters are expected to disappear once this one derives from them
    /// (see DESIGN.md for why the two sets are kept apart).
    pub depends: BTreeSet<String>,
    /// Parameters that must not coexist with this one in a final value set.
    /// Includes both explicitly declared conflicts and the conflicts implied
    /// by `consumes`.
    pub conflicts: BTreeSet<String>,
    pub consumes: Vec<String>,
    pub consumer: Option<ConsumerFn>,
    pub universe: Option<UniverseFn>,
    pub complement: Option<ComplementFn>,
    pub unwind: Option<UnwindFn>,
    pub reverse: bool,
    unicache: Option<Vec<String>>,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("type", &self.vtype.name())
            .field("min", &self.min)
            .field("max", &self.max)
            .field("shift", &self.shift)
            .field("empty", &self.empty)
            .field("depends", &self.depends)
            .field("conflicts", &self.conflicts)
            .field("consumes", &self.consumes)
            .finish()
    }
}

impl Default for Template {
    fn default() -> Self {
        Self {
            name: String::new(),
            vtype: Arc::new(StringType),
            composite: None,
            format: Format::default(),
            min: 0,
            max: None,
            shift: false,
            empty: false,
            default: None,
            depends: BTreeSet::new(),
            conflicts: BTreeSet::new(),
            consumes: Vec::new(),
            consumer: None,
            universe: None,
            complement: None,
            unwind: None,
            reverse: false,
            unicache: None,
        }
    }
}

impl Template {
    /// Cap `raw` to `max` entries, keeping the rightmost when `shift` and the
    /// leftmost otherwise. A no-op when `max` is unbounded or already satisfied.
    fn cap<'a>(&self, raw: &'a [Option<String>]) -> &'a [Option<String>] {
        match self.max {
            Some(max) if raw.len() > max => {
                if self.shift {
                    &raw[raw.len() - max..]
                } else {
                    &raw[..max]
                }
            }
            _ => raw,
        }
    }

    /// The `process` pipeline: cardinality cap, per-atom normalization,
    /// optional composite construction, then scalar-or-sequence selection.
    /// Returns `Ok(None)` when the parameter should be treated as absent (all
    /// atoms were empty and `empty` is false).
    pub fn process(&self, raw: &[Option<String>]) -> Result<Option<Value>, Error> {
        let capped = self.cap(raw);

        let mut atoms: Vec<Option<String>> = Vec::with_capacity(capped.len());
        for (index, atom) in capped.iter().enumerate() {
            let is_empty = atom.as_deref().map_or(true, |s| s.is_empty());
            if is_empty {
                if self.empty {
                    atoms.push(None);
                }
                // empty=false: drop the atom entirely.
                continue;
            }
            let raw_str = atom.as_deref().unwrap();
            let coerced = self.vtype.coerce(raw_str).unwrap_or_else(|| raw_str.to_string());
            if !self.vtype.check(&coerced) {
                return Err(Error::BadAtom {
                    name: self.name.clone(),
                    index,
                    type_name: self.vtype.name().to_string(),
                });
            }
            atoms.push(Some(coerced));
        }

        if atoms.is_empty() {
            return Ok(None);
        }

        if let Some(composite) = &self.composite {
            return match composite.coerce(&atoms) {
                Some(cv) => Ok(Some(Value::Composite(cv, atoms.len()))),
                None => Err(Error::UnknownComposite {
                    name: self.name.clone(),
                }),
            };
        }

        if self.max == Some(1) {
            Ok(Some(Value::Atom(atoms.into_iter().next().unwrap())))
        } else {
            Ok(Some(Value::Seq(atoms)))
        }
    }

    /// The `unprocess` pipeline: recover an atom sequence (and whether it is
    /// already in complemented form) from a value, then format each atom.
    /// `value` of `None` models an absent parameter, per the empty/presence
    /// rules below; [`crate::instance::Instance::as_string`] only ever calls
    /// this with present values, but the rule is part of the pipeline's
    /// contract so other callers (e.g. a `group` view) can reuse it.
    pub fn unprocess(
        &self,
        value: Option<&Value>,
    ) -> Result<Option<(Vec<String>, bool)>, Error> {
        let value = match value {
            Some(v) => v,
            None => {
                return Ok(if self.empty && self.max == Some(1) {
                    Some((vec![String::new()], false))
                } else if self.empty {
                    Some((Vec::new(), false))
                } else {
                    None
                });
            }
        };

        let (atoms, complement_flag) = match value {
            Value::Composite(..) => match &self.unwind {
                Some(unwind) => unwind(value)?,
                None => {
                    return Err(Error::UnknownComposite {
                        name: self.name.clone(),
                    })
                }
            },
            Value::Atom(a) => (vec![a.clone()], false),
            Value::Seq(s) => (s.clone(), false),
        };

        let strings = atoms
            .iter()
            .map(|a| self.format.apply(a.as_deref()))
            .collect();

        Ok(Some((strings, complement_flag)))
    }

    /// Recompute `_unicache` from `universe`, if one is defined. `&mut self`
    /// enforces the "externally serialized with any ongoing process/unprocess"
    /// rule at the borrow-checker level: a registry can't be refreshed while
    /// any `Instance` still borrows it.
    pub fn refresh(&mut self) {
        if let Some(universe) = &self.universe {
            self.unicache = Some(universe());
        }
    }

    pub fn universe(&self) -> Option<&[String]> {
        self.unicache.as_deref()
    }

    /// Apply this template's `complement` function to `value`, using the
    /// cached universe. Returns `value` unchanged if no `complement` function
    /// is defined.
    pub fn complement_value(&self, value: &Value) -> Result<Value, Error> {
        match &self.complement {
            Some(f) => f(value, self.unicache.as_deref().unwrap_or(&[])),
            None => Ok(value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vtype::IntType;

    fn int_template(name: &str, max: Option<usize>) -> Template {
        Template {
            name: name.to_string(),
            vtype: Arc::new(IntType),
            max,
            ..Default::default()
        }
    }

    #[test]
    fn scalar_process_and_serialize() {
        let t = int_template("foo", Some(1));
        let v = t.process(&[Some("3".to_string())]).unwrap().unwrap();
        assert_eq!(v, Value::Atom(Some("3".to_string())));
        let (strings, cflag) = t.unprocess(Some(&v)).unwrap().unwrap();
        assert_eq!(strings, vec!["3".to_string()]);
        assert!(!cflag);
    }

    #[test]
    fn cardinality_truncation_respects_shift() {
        let mut t = Template {
            name: "k".to_string(),
            max: Some(2),
            ..Default::default()
        };
        let raw = vec![
            Some("x".to_string()),
            Some("y".to_string()),
            Some("z".to_string()),
        ];
        let truncated = t.process(&raw).unwrap().unwrap();
        assert_eq!(
            truncated,
            Value::Seq(vec![Some("x".to_string()), Some("y".to_string())])
        );

        t.shift = true;
        let shifted = t.process(&raw).unwrap().unwrap();
        assert_eq!(
            shifted,
            Value::Seq(vec![Some("y".to_string()), Some("z".to_string())])
        );
    }

    #[test]
    fn empty_false_drops_to_absence() {
        let t = Template {
            name: "foo".to_string(),
            max: Some(1),
            ..Default::default()
        };
        assert_eq!(t.process(&[Some(String::new())]).unwrap(), None);
    }

    #[test]
    fn empty_true_preserves_null_and_serializes_kequals() {
        let t = Template {
            name: "foo".to_string(),
            max: Some(1),
            empty: true,
            ..Default::default()
        };
        let v = t.process(&[Some(String::new())]).unwrap().unwrap();
        assert_eq!(v, Value::Atom(None));
        let (strings, _) = t.unprocess(Some(&v)).unwrap().unwrap();
        assert_eq!(strings, vec!["".to_string()]);
    }

    #[test]
    fn bad_atom_reports_index_and_type() {
        let t = int_template("foo", None);
        let err = t
            .process(&[Some("3".to_string()), Some("nope".to_string())])
            .unwrap_err();
        assert_eq!(
            err,
            Error::BadAtom {
                name: "foo".to_string(),
                index: 1,
                type_name: "integer".to_string(),
            }
        );
    }
}
