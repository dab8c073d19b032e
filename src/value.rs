//! The runtime value shapes a [`crate::template::Template`] can produce.
//!
//! A processed parameter is always one of: a single atom (possibly null, when
//! `empty` is set), an ordered sequence of atoms, or a composite value built by
//! a caller-supplied [`crate::vtype::CompositeType`]. Composite values are
//! type-erased behind [`CompositeValue`] so that a [`crate::registry::Registry`]
//! can hold templates of differing composite shapes (sets, ranges, ...) in one
//! homogeneous collection.

use std::fmt;
use std::sync::Arc;

/// A type-erased composite value (a set, a range, or any caller-defined shape
/// built from a sequence of atoms). Implementors must be comparable to one
/// another for the round-trip invariant to be testable.
pub trait CompositeValue: fmt::Debug + Send + Sync {
    /// Structural equality against another composite value, used by
    /// `Value`'s `PartialEq`. Implementations typically downcast `other` via
    /// `std::any::Any` and compare otherwise return `false`.
    fn eq_dyn(&self, other: &dyn CompositeValue) -> bool;

    /// Expose `self` for downcasting by consumer/unwind/complement callbacks
    /// that know the concrete composite type they are dealing with.
    fn as_any(&self) -> &dyn std::any::Any;
}

impl PartialEq for dyn CompositeValue {
    fn eq(&self, other: &dyn CompositeValue) -> bool {
        self.eq_dyn(other)
    }
}

/// The value behind a processed parameter.
#[derive(Debug, Clone)]
pub enum Value {
    /// A scalar atom (`max == 1`), possibly null when `empty` retains it.
    Atom(Option<String>),
    /// An ordered sequence of atoms (`max != 1`).
    Seq(Vec<Option<String>>),
    /// A composite built from the atom sequence by a `composite` adapter.
    /// Held behind an `Arc` so `clone()` is a reference copy, matching the
    /// "composite values are copied by reference" contract of `Instance::clone`.
    /// The `usize` is the number of atoms that fed the composite's
    /// construction (post empty-filter, pre-dedup), carried alongside so
    /// cardinality checks (I4) see the real count instead of a constant —
    /// see [`Value::count`].
    Composite(Arc<dyn CompositeValue>, usize),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Composite(a, _), Value::Composite(b, _)) => a.eq_dyn(b.as_ref()),
            _ => false,
        }
    }
}

impl Value {
    /// Flatten this value back down to its atom sequence, for the default
    /// consumer (which joins consumed values as an ordered sequence) and for
    /// cardinality counting. Composite values cannot be flattened generically
    /// without an `unwind` hook; callers that consume a composite-typed
    /// parameter must supply an explicit `consumer`.
    pub fn atoms(&self) -> Vec<Option<String>> {
        match self {
            Value::Atom(a) => vec![a.clone()],
            Value::Seq(s) => s.clone(),
            Value::Composite(..) => Vec::new(),
        }
    }

    /// The atom count used by cardinality checks (I4). A preserved-null atom
    /// (`empty=true`) still occupies a slot, so `Atom(None)` counts the same
    /// as a null living inside a `Seq` — both are "meaningful" per the data
    /// model, not absences. Composite values report the count of atoms that
    /// fed their construction (carried alongside the value itself), not a
    /// constant, so a `min`/`max` declared on a composite-typed template is
    /// enforced against the real input size.
    pub fn count(&self) -> usize {
        match self {
            Value::Atom(_) => 1,
            Value::Seq(s) => s.len(),
            Value::Composite(_, n) => *n,
        }
    }
}

/// A simple ordered-set composite: values are retained as the caller provided
/// them (after empty-filtering and coercion/check), but compared and
/// complemented as a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetValue(pub std::collections::BTreeSet<String>);

impl CompositeValue for SetValue {
    fn eq_dyn(&self, other: &dyn CompositeValue) -> bool {
        other
            .as_any()
            .downcast_ref::<SetValue>()
            .map_or(false, |o| o == self)
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_and_seq_equality() {
        assert_eq!(Value::Atom(Some("a".into())), Value::Atom(Some("a".into())));
        assert_ne!(Value::Atom(Some("a".into())), Value::Atom(None));
        assert_eq!(
            Value::Seq(vec![Some("a".into()), None]),
            Value::Seq(vec![Some("a".into()), None])
        );
    }

    #[test]
    fn composite_equality_is_structural() {
        let a: Arc<dyn CompositeValue> = Arc::new(SetValue(
            ["x".to_string(), "y".to_string()].into_iter().collect(),
        ));
        let b: Arc<dyn CompositeValue> = Arc::new(SetValue(
            ["y".to_string(), "x".to_string()].into_iter().collect(),
        ));
        assert_eq!(Value::Composite(a, 2), Value::Composite(b, 2));
    }

    #[test]
    fn count_reflects_cardinality() {
        assert_eq!(Value::Atom(None).count(), 1);
        assert_eq!(Value::Atom(Some("x".into())).count(), 1);
        assert_eq!(Value::Seq(vec![Some("a".into()), Some("b".into())]).count(), 2);
    }

    #[test]
    fn composite_count_reflects_feeding_atoms_not_a_constant() {
        let five: Arc<dyn CompositeValue> = Arc::new(SetValue(
            ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect(),
        ));
        assert_eq!(Value::Composite(five, 5).count(), 5);
    }
}
