//! [`Registry`]: an ordered collection of [`Template`]s plus the sequence,
//! group, and rank metadata needed to evaluate raw input into an
//! [`crate::instance::Instance`], and [`RegistryBuilder`], which resolves
//! `use` reuse pointers, installs symmetric conflict edges, and computes the
//! dependency ranking.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::callback::Format;
use crate::descriptor::{RegistryDescriptor, TemplateCallbacks, TemplateDescriptor};
use crate::error::Error;
use crate::instance::{Instance, RawParams};
use crate::template::Template;
use crate::value::Value;

/// The whole-schema object: a mapping from parameter name to [`Template`]
/// plus canonical ordering, named groups, and a precomputed evaluation
/// ranking. Immutable after construction except for [`Registry::refresh`].
pub struct Registry {
    templates: BTreeMap<String, Template>,
    sequence: Vec<String>,
    groups: BTreeMap<String, Vec<String>>,
    complement_name: String,
    ranks: Vec<Vec<String>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub(crate) fn templates(&self) -> &BTreeMap<String, Template> {
        &self.templates
    }

    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    pub fn ranks(&self) -> &[Vec<String>] {
        &self.ranks
    }

    pub fn group_members(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(|v| v.as_slice())
    }

    pub fn complement_name(&self) -> &str {
        &self.complement_name
    }

    /// Re-invoke every template's `universe` thunk and repopulate its cache.
    /// Requires exclusive access, which the borrow checker uses to enforce
    /// that no `Instance` (which borrows the registry immutably) is alive
    /// while a refresh runs.
    pub fn refresh(&mut self) {
        for template in self.templates.values_mut() {
            template.refresh();
        }
    }

    /// Process a raw `{name: [values...]}` mapping into a new, validated
    /// [`Instance`].
    #[tracing::instrument(level = "debug", skip_all, err(Debug, level = "warn"))]
    pub fn process(&self, raw: RawParams) -> Result<Instance<'_>, Error> {
        let content = self.evaluate(&raw, BTreeMap::new(), true)?;
        let other = raw.unrecognized(self);
        Ok(Instance::new(self, content, other))
    }

    /// The rank-ordered evaluation pipeline shared by [`Registry::process`]
    /// and [`crate::instance::Instance::set`]. `seed` is the existing content
    /// (empty for `process`); `with_defaults` gates default application only
    /// — consumers and conflict/dependency checks always run.
    ///
    /// A reserved `complement` instruction is only applied to parameters this
    /// call actually assigns (from raw input or a firing consumer/default),
    /// never to a value merely carried over unchanged from `seed`. Without
    /// this guard, replaying the same `{complement: [p]}` instruction against
    /// an instance that already absorbed it once would complement an already
    /// complemented value right back to its original form — since `complement`
    /// is involutive, that breaks the §8 idempotence property
    /// (`inst.set(p).set(p) == inst.set(p)`). Gating on "freshly assigned this
    /// call" keeps repeated identical instructions a no-op instead.
    pub(crate) fn evaluate(
        &self,
        raw: &RawParams,
        seed: BTreeMap<String, Value>,
        with_defaults: bool,
    ) -> Result<BTreeMap<String, Value>, Error> {
        let mut out = seed;
        let mut to_delete: BTreeSet<String> = BTreeSet::new();
        let mut touched: BTreeSet<String> = BTreeSet::new();

        let complement_names: BTreeSet<String> = raw
            .get(&self.complement_name)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.clone())
                    .filter(|name| self.templates.contains_key(name))
                    .collect()
            })
            .unwrap_or_default();

        for rank in &self.ranks {
            for name in rank {
                let t = &self.templates[name];

                if let Some(raw_values) = raw.get(name) {
                    match t.process(raw_values)? {
                        Some(v) => {
                            out.insert(name.clone(), v);
                        }
                        None => {
                            out.remove(name);
                        }
                    }
                    touched.insert(name.clone());
                    for c in &t.consumes {
                        to_delete.insert(c.clone());
                    }
                } else if !t.consumes.is_empty() {
                    if t.consumes.iter().all(|c| out.contains_key(c)) {
                        let inputs: Vec<Value> =
                            t.consumes.iter().map(|c| out[c].clone()).collect();
                        let produced = match &t.consumer {
                            Some(consumer) => consumer(&inputs)?,
                            None => Value::Seq(inputs.iter().flat_map(|v| v.atoms()).collect()),
                        };
                        out.insert(name.clone(), produced);
                        touched.insert(name.clone());
                        for c in &t.consumes {
                            to_delete.insert(c.clone());
                        }
                    }
                } else if with_defaults {
                    if !out.contains_key(name) {
                        if let Some(default) = &t.default {
                            let blocked = t
                                .conflicts
                                .iter()
                                .any(|c| out.contains_key(c) && !to_delete.contains(c));
                            if !blocked {
                                out.insert(name.clone(), default());
                                touched.insert(name.clone());
                            }
                        }
                    }
                }

                if out.contains_key(name) {
                    for c in &t.conflicts {
                        if out.contains_key(c) && !to_delete.contains(c) {
                            return Err(Error::Conflict {
                                a: name.clone(),
                                b: c.clone(),
                            });
                        }
                    }
                }

                if complement_names.contains(name) && touched.contains(name) {
                    if let Some(v) = out.get(name) {
                        match &t.complement {
                            Some(complement) => {
                                let universe = t.universe().unwrap_or(&[]);
                                let replaced = complement(v, universe)?;
                                out.insert(name.clone(), replaced);
                            }
                            None => {
                                return Err(Error::BadComplement { name: name.clone() })
                            }
                        }
                    }
                }
            }
        }

        for name in &to_delete {
            out.remove(name);
        }

        for name in &self.sequence {
            let t = &self.templates[name];

            if let Some(value) = out.get(name) {
                if t.min > 0 && value.count() < t.min {
                    return Err(Error::TooFew {
                        name: name.clone(),
                        have: value.count(),
                        min: t.min,
                    });
                }
                for dep in &t.depends {
                    if !out.contains_key(dep) {
                        return Err(Error::MissingDependency {
                            name: name.clone(),
                            missing: dep.clone(),
                        });
                    }
                }
            } else if t.min > 0 {
                return Err(Error::TooFew {
                    name: name.clone(),
                    have: 0,
                    min: t.min,
                });
            }
        }

        Ok(out)
    }
}

/// Builds a [`Registry`] from a sequence of template descriptors and their
/// Rust-native callbacks.
#[derive(Default)]
pub struct RegistryBuilder {
    complement_name: String,
    groups: BTreeMap<String, Vec<String>>,
    descriptors: Vec<TemplateDescriptor>,
    callbacks: BTreeMap<String, TemplateCallbacks>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            complement_name: "complement".to_string(),
            groups: BTreeMap::new(),
            descriptors: Vec::new(),
            callbacks: BTreeMap::new(),
        }
    }

    pub fn from_descriptor(descriptor: RegistryDescriptor) -> Self {
        let mut groups = descriptor.groups;
        for d in &descriptor.params {
            for g in &d.groups {
                groups.entry(g.clone()).or_default().push(d.name.clone());
            }
        }
        Self {
            complement_name: descriptor.complement,
            groups,
            descriptors: descriptor.params,
            callbacks: BTreeMap::new(),
        }
    }

    pub fn complement_name(mut self, name: impl Into<String>) -> Self {
        self.complement_name = name.into();
        self
    }

    pub fn group(mut self, name: impl Into<String>, members: Vec<String>) -> Self {
        self.groups.entry(name.into()).or_default().extend(members);
        self
    }

    /// Register a parameter with its descriptor and Rust-native callbacks.
    pub fn param(mut self, descriptor: TemplateDescriptor, callbacks: TemplateCallbacks) -> Self {
        for g in &descriptor.groups {
            self.groups
                .entry(g.clone())
                .or_default()
                .push(descriptor.name.clone());
        }
        self.callbacks.insert(descriptor.name.clone(), callbacks);
        self.descriptors.push(descriptor);
        self
    }

    /// Attach (or replace) the callbacks for a descriptor already added via
    /// [`RegistryBuilder::from_descriptor`] or a prior `param` call.
    pub fn callbacks(mut self, name: impl Into<String>, callbacks: TemplateCallbacks) -> Self {
        self.callbacks.insert(name.into(), callbacks);
        self
    }

    #[tracing::instrument(level = "debug", skip_all, err(Debug, level = "warn"))]
    pub fn build(self) -> Result<Registry, Error> {
        let RegistryBuilder {
            complement_name,
            groups,
            descriptors,
            callbacks,
        } = self;

        let mut by_name: BTreeMap<String, TemplateDescriptor> = BTreeMap::new();
        let mut sequence: Vec<String> = Vec::with_capacity(descriptors.len());
        for d in descriptors {
            if by_name.contains_key(&d.name) {
                return Err(Error::DuplicateTemplate { name: d.name });
            }
            sequence.push(d.name.clone());
            by_name.insert(d.name.clone(), d);
        }

        let mut resolved: BTreeMap<String, (TemplateDescriptor, TemplateCallbacks)> =
            BTreeMap::new();
        for name in &sequence {
            if resolved.contains_key(name) {
                continue;
            }
            resolve_descriptor(name, &by_name, &callbacks, &mut resolved, &mut Vec::new())?;
        }

        let mut templates: BTreeMap<String, Template> = BTreeMap::new();
        // Declared (pre-symmetric-edge) conflicts, used to install symmetric
        // edges without re-processing edges that consumes already installed.
        let mut declared_conflicts: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for name in &sequence {
            let (descriptor, hooks) = &resolved[name];

            let format = match &hooks.format_fn {
                Some(f) => Format::Func(f.clone()),
                None => Format::Pattern(descriptor.format.clone().unwrap_or_else(|| "%s".to_string())),
            };

            let template = Template {
                name: name.clone(),
                vtype: hooks
                    .vtype
                    .clone()
                    .unwrap_or_else(|| Arc::new(crate::vtype::StringType)),
                composite: hooks.composite.clone(),
                format,
                min: descriptor.min.unwrap_or(0) as usize,
                max: descriptor.max.map(|m| m as usize),
                shift: descriptor.shift,
                empty: descriptor.empty,
                default: hooks.default.clone(),
                depends: descriptor.depends.iter().cloned().collect(),
                conflicts: BTreeSet::new(),
                consumes: descriptor.consumes.clone(),
                consumer: hooks.consumer.clone(),
                universe: hooks.universe.clone(),
                complement: hooks.complement.clone(),
                unwind: hooks.unwind.clone(),
                reverse: descriptor.reverse,
                ..Template::default()
            };

            declared_conflicts.insert(name.clone(), descriptor.conflicts.clone());
            templates.insert(name.clone(), template);
        }

        for name in &sequence {
            let consumes = templates[name].consumes.clone();
            for c in &consumes {
                add_conflict(&mut templates, name, c)?;
            }
        }
        for name in &sequence {
            let conflicts = declared_conflicts[name].clone();
            for c in &conflicts {
                add_conflict(&mut templates, name, c)?;
            }
        }

        // Validate depends reference known names.
        for name in &sequence {
            for dep in templates[name].depends.clone() {
                if !templates.contains_key(&dep) {
                    return Err(Error::UnknownParameter {
                        referrer: name.clone(),
                        name: dep,
                    });
                }
            }
        }

        let ranks = compute_ranks(&sequence, &templates)?;

        for (group, members) in &groups {
            for m in members {
                if !templates.contains_key(m) {
                    return Err(Error::UnknownParameter {
                        referrer: format!("group:{group}"),
                        name: m.clone(),
                    });
                }
            }
        }
        let mut groups_dedup = BTreeMap::new();
        for (group, members) in groups {
            let mut seen = BTreeSet::new();
            let deduped: Vec<String> = members.into_iter().filter(|m| seen.insert(m.clone())).collect();
            groups_dedup.insert(group, deduped);
        }

        Ok(Registry {
            templates,
            sequence,
            groups: groups_dedup,
            complement_name,
            ranks,
        })
    }
}

fn add_conflict(
    templates: &mut BTreeMap<String, Template>,
    a: &str,
    b: &str,
) -> Result<(), Error> {
    if !templates.contains_key(b) {
        return Err(Error::UnknownParameter {
            referrer: a.to_string(),
            name: b.to_string(),
        });
    }
    templates.get_mut(a).unwrap().conflicts.insert(b.to_string());
    templates.get_mut(b).unwrap().conflicts.insert(a.to_string());
    Ok(())
}

/// Resolve `name`'s `use` chain, merging missing fields from its base
/// descriptor (and base callbacks), depth-first with cycle detection.
fn resolve_descriptor(
    name: &str,
    by_name: &BTreeMap<String, TemplateDescriptor>,
    callbacks: &BTreeMap<String, TemplateCallbacks>,
    resolved: &mut BTreeMap<String, (TemplateDescriptor, TemplateCallbacks)>,
    visiting: &mut Vec<String>,
) -> Result<(), Error> {
    if resolved.contains_key(name) {
        return Ok(());
    }
    if visiting.contains(&name.to_string()) {
        let mut cycle = visiting.clone();
        cycle.push(name.to_string());
        return Err(Error::Cycle { cycle });
    }
    let descriptor = by_name.get(name).ok_or_else(|| Error::UnknownTemplate {
        name: name.to_string(),
        base: name.to_string(),
    })?;

    let own_hooks = callbacks.get(name).cloned().unwrap_or_default();

    let merged = match &descriptor.uses {
        None => (descriptor.clone(), own_hooks),
        Some(base_name) => {
            visiting.push(name.to_string());
            if !by_name.contains_key(base_name) {
                return Err(Error::UnknownTemplate {
                    name: name.to_string(),
                    base: base_name.clone(),
                });
            }
            resolve_descriptor(base_name, by_name, callbacks, resolved, visiting)?;
            visiting.pop();
            let (base_descriptor, base_hooks) = resolved[base_name].clone();

            let mut merged_descriptor = descriptor.clone();
            merged_descriptor.uses = None;
            if merged_descriptor.min.is_none() {
                merged_descriptor.min = base_descriptor.min;
            }
            if merged_descriptor.max.is_none() {
                merged_descriptor.max = base_descriptor.max;
            }
            if !merged_descriptor.shift {
                merged_descriptor.shift = base_descriptor.shift;
            }
            if !merged_descriptor.empty {
                merged_descriptor.empty = base_descriptor.empty;
            }
            if !merged_descriptor.reverse {
                merged_descriptor.reverse = base_descriptor.reverse;
            }
            if merged_descriptor.format.is_none() {
                merged_descriptor.format = base_descriptor.format;
            }
            if merged_descriptor.depends.is_empty() {
                merged_descriptor.depends = base_descriptor.depends;
            }
            if merged_descriptor.conflicts.is_empty() {
                merged_descriptor.conflicts = base_descriptor.conflicts;
            }
            if merged_descriptor.consumes.is_empty() {
                merged_descriptor.consumes = base_descriptor.consumes;
            }

            let mut merged_hooks = own_hooks;
            if merged_hooks.vtype.is_none() {
                merged_hooks.vtype = base_hooks.vtype;
            }
            if merged_hooks.composite.is_none() {
                merged_hooks.composite = base_hooks.composite;
            }
            if merged_hooks.default.is_none() {
                merged_hooks.default = base_hooks.default;
            }
            if merged_hooks.consumer.is_none() {
                merged_hooks.consumer = base_hooks.consumer;
            }
            if merged_hooks.universe.is_none() {
                merged_hooks.universe = base_hooks.universe;
            }
            if merged_hooks.complement.is_none() {
                merged_hooks.complement = base_hooks.complement;
            }
            if merged_hooks.unwind.is_none() {
                merged_hooks.unwind = base_hooks.unwind;
            }
            if merged_hooks.format_fn.is_none() {
                merged_hooks.format_fn = base_hooks.format_fn;
            }

            (merged_descriptor, merged_hooks)
        }
    };

    resolved.insert(name.to_string(), merged);
    Ok(())
}

/// Kahn-style stratification of `depends ∪ consumes` into ranks, preserving
/// `sequence` order within a rank.
fn compute_ranks(
    sequence: &[String],
    templates: &BTreeMap<String, Template>,
) -> Result<Vec<Vec<String>>, Error> {
    let mut remaining: BTreeSet<String> = sequence.iter().cloned().collect();
    let mut ranked: BTreeSet<String> = BTreeSet::new();
    let mut ranks: Vec<Vec<String>> = Vec::new();

    let rank_prereqs = |name: &str| -> BTreeSet<String> {
        let t = &templates[name];
        t.depends
            .iter()
            .cloned()
            .chain(t.consumes.iter().cloned())
            .collect()
    };

    while !remaining.is_empty() {
        let this_rank: Vec<String> = sequence
            .iter()
            .filter(|n| remaining.contains(*n))
            .filter(|n| rank_prereqs(n).iter().all(|p| ranked.contains(p)))
            .cloned()
            .collect();

        if this_rank.is_empty() {
            return Err(Error::Cycle {
                cycle: remaining.into_iter().collect(),
            });
        }

        for n in &this_rank {
            remaining.remove(n);
            ranked.insert(n.clone());
        }
        ranks.push(this_rank);
    }

    Ok(ranks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TemplateDescriptor;
    use crate::vtype::IntType;
    use std::sync::Arc;

    fn int_descriptor(name: &str, max: u32) -> (TemplateDescriptor, TemplateCallbacks) {
        let mut d = TemplateDescriptor::new(name);
        d.max = Some(max);
        let callbacks = TemplateCallbacks {
            vtype: Some(Arc::new(IntType)),
            ..Default::default()
        };
        (d, callbacks)
    }

    #[test]
    fn simple_scalar_round_trips() {
        let (d, c) = int_descriptor("foo", 1);
        let registry = Registry::builder().param(d, c).build().unwrap();
        let mut raw = RawParams::new();
        raw.insert("foo", vec![Some("3".to_string())]);
        let instance = registry.process(raw).unwrap();
        assert_eq!(instance.get("foo"), Some(&Value::Atom(Some("3".to_string()))));
        assert_eq!(instance.as_string().unwrap(), "foo=3");
    }

    #[test]
    fn cascading_consumer_replaces_its_inputs() {
        let (year_d, year_c) = int_descriptor("year", 1);
        let (month_d, month_c) = int_descriptor("month", 1);
        let (day_d, day_c) = int_descriptor("day", 1);

        let mut date_d = TemplateDescriptor::new("date");
        date_d.max = Some(1);
        date_d.consumes = vec!["year".to_string(), "month".to_string(), "day".to_string()];
        let date_c = TemplateCallbacks {
            consumer: Some(Arc::new(|inputs: &[Value]| {
                let parts: Vec<String> = inputs
                    .iter()
                    .flat_map(|v| v.atoms())
                    .map(|a| a.unwrap_or_default())
                    .collect();
                Ok(Value::Atom(Some(parts.join("-"))))
            })),
            ..Default::default()
        };

        let registry = Registry::builder()
            .param(year_d, year_c)
            .param(month_d, month_c)
            .param(day_d, day_c)
            .param(date_d, date_c)
            .build()
            .unwrap();

        let mut raw = RawParams::new();
        raw.insert("year", vec![Some("2024".to_string())]);
        raw.insert("month", vec![Some("1".to_string())]);
        raw.insert("day", vec![Some("2".to_string())]);

        let instance = registry.process(raw).unwrap();
        assert!(!instance.exists("year"));
        assert!(!instance.exists("month"));
        assert!(!instance.exists("day"));
        assert_eq!(
            instance.get("date"),
            Some(&Value::Atom(Some("2024-1-2".to_string())))
        );
        assert_eq!(instance.as_string().unwrap(), "date=2024-1-2");
    }

    #[test]
    fn conflicting_parameters_fail_atomically() {
        let mut a = TemplateDescriptor::new("a");
        a.max = Some(1);
        a.conflicts = vec!["b".to_string()];
        let mut b = TemplateDescriptor::new("b");
        b.max = Some(1);

        let registry = Registry::builder()
            .param(a, TemplateCallbacks::default())
            .param(b, TemplateCallbacks::default())
            .build()
            .unwrap();

        let mut raw = RawParams::new();
        raw.insert("a", vec![Some("1".to_string())]);
        raw.insert("b", vec![Some("2".to_string())]);
        assert_eq!(
            registry.process(raw).unwrap_err(),
            Error::Conflict {
                a: "a".to_string(),
                b: "b".to_string(),
            }
        );

        let mut raw = RawParams::new();
        raw.insert("a", vec![Some("1".to_string())]);
        let mut instance = registry.process(raw).unwrap();

        let mut overrides = RawParams::new();
        overrides.insert("b", vec![Some("2".to_string())]);
        let err = instance.set(overrides, false).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
        // Atomic: content unchanged on failure.
        assert!(instance.exists("a"));
        assert!(!instance.exists("b"));
    }

    #[test]
    fn min_without_default_fails() {
        let mut foo = TemplateDescriptor::new("foo");
        foo.max = Some(1);
        foo.min = Some(1);
        let registry = Registry::builder()
            .param(foo, TemplateCallbacks::default())
            .build()
            .unwrap();
        let err = registry.process(RawParams::new()).unwrap_err();
        assert_eq!(
            err,
            Error::TooFew {
                name: "foo".to_string(),
                have: 0,
                min: 1,
            }
        );
    }

    #[test]
    fn cycle_is_rejected_at_build_time() {
        let mut a = TemplateDescriptor::new("a");
        a.depends = vec!["b".to_string()];
        let mut b = TemplateDescriptor::new("b");
        b.depends = vec!["a".to_string()];

        let err = Registry::builder()
            .param(a, TemplateCallbacks::default())
            .param(b, TemplateCallbacks::default())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Cycle { .. }));
    }

    #[test]
    fn complement_optimization_picks_shorter_form() {
        use crate::value::{SetValue, Value};
        use crate::vtype::{set_complement, SetType};
        use std::collections::BTreeSet;

        let universe: Vec<String> = ('a'..='z').map(|c| c.to_string()).collect();

        let mut foo = TemplateDescriptor::new("foo");
        foo.max = None;
        let foo_callbacks = TemplateCallbacks {
            composite: Some(Arc::new(SetType)),
            universe: Some(Arc::new({
                let universe = universe.clone();
                move || universe.clone()
            })),
            complement: Some(Arc::new(set_complement)),
            unwind: Some(Arc::new(|v: &Value| match v {
                Value::Composite(c, _) => {
                    let set = c.as_any().downcast_ref::<SetValue>().unwrap();
                    let atoms = set.0.iter().cloned().map(Some).collect();
                    Ok((atoms, false))
                }
                _ => unreachable!(),
            })),
            ..Default::default()
        };

        let mut registry = Registry::builder().param(foo, foo_callbacks).build().unwrap();
        registry.refresh();

        let mut raw = RawParams::new();
        raw.insert(
            "foo",
            vec![Some("a".to_string()), Some("b".to_string()), Some("c".to_string())],
        );
        let instance = registry.process(raw).unwrap();

        // |S|=3 is far smaller than |U\S|=23, so the literal form wins and no
        // complement instruction is emitted.
        let out = instance.as_string().unwrap();
        assert_eq!(out, "foo=a&foo=b&foo=c");

        // Now complement the set directly: a 23-member set should prefer the
        // 3-member complemented form plus the `complement=foo` marker.
        let big: BTreeSet<String> = universe.iter().filter(|u| *u != "a" && *u != "b" && *u != "c").cloned().collect();
        let mut raw2 = RawParams::new();
        raw2.insert(
            "foo",
            big.iter().cloned().map(Some).collect(),
        );
        let instance2 = registry.process(raw2).unwrap();
        let out2 = instance2.as_string().unwrap();
        assert_eq!(out2, "foo=a&foo=b&foo=c&complement=foo");
    }

    #[test]
    fn shift_truncation_end_to_end() {
        let mut k = TemplateDescriptor::new("k");
        k.max = Some(2);
        k.shift = true;
        let registry = Registry::builder()
            .param(k, TemplateCallbacks::default())
            .build()
            .unwrap();
        let mut raw = RawParams::new();
        raw.insert(
            "k",
            vec![
                Some("x".to_string()),
                Some("y".to_string()),
                Some("z".to_string()),
            ],
        );
        let instance = registry.process(raw).unwrap();
        assert_eq!(
            instance.get("k"),
            Some(&Value::Seq(vec![Some("y".to_string()), Some("z".to_string())]))
        );
        assert_eq!(instance.as_string().unwrap(), "k=y&k=z");
    }
}
