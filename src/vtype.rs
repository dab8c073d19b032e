//! The Value Type Adapter: a thin façade over whatever external type
//! constraint library a caller wants to use to describe atomic parameter
//! values, plus the analogous adapter for composite (list-of-atoms) values.
//!
//! The engine never inspects a type beyond this interface — `check`,
//! `coerce`, `name` — so swapping in a project's own validation library is a
//! matter of implementing [`ValueType`] (or [`CompositeType`]) for it.

use std::fmt;

use regex::Regex;

use crate::value::{CompositeValue, SetValue, Value};

/// Adapter over an atomic value's type constraint.
pub trait ValueType: fmt::Debug + Send + Sync {
    /// Does `atom` satisfy this type, after coercion has already run?
    fn check(&self, atom: &str) -> bool;

    /// Attempt to coerce a raw atom into this type's canonical string form.
    /// Returning `None` means no coercion is defined (or none applies); the
    /// raw atom is checked as-is.
    fn coerce(&self, _atom: &str) -> Option<String> {
        None
    }

    /// Human-readable name used in error messages.
    fn name(&self) -> &str;
}

/// The default atomic type: any non-null string, no coercion.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringType;

impl ValueType for StringType {
    fn check(&self, _atom: &str) -> bool {
        true
    }
    fn name(&self) -> &str {
        "string"
    }
}

/// A signed integer, written in canonical decimal form after coercion.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntType;

impl ValueType for IntType {
    fn check(&self, atom: &str) -> bool {
        atom.parse::<i64>().is_ok()
    }
    fn coerce(&self, atom: &str) -> Option<String> {
        atom.trim().parse::<i64>().ok().map(|n| n.to_string())
    }
    fn name(&self) -> &str {
        "integer"
    }
}

/// A boolean, accepting the usual truthy/falsy spellings and canonicalizing
/// to `"true"`/`"false"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolType;

impl ValueType for BoolType {
    fn check(&self, atom: &str) -> bool {
        matches!(atom, "true" | "false")
    }
    fn coerce(&self, atom: &str) -> Option<String> {
        match atom.to_ascii_lowercase().as_str() {
            "1" | "t" | "true" | "yes" | "y" | "on" => Some("true".to_string()),
            "0" | "f" | "false" | "no" | "n" | "off" => Some("false".to_string()),
            _ => None,
        }
    }
    fn name(&self) -> &str {
        "boolean"
    }
}

/// A value constrained to match a regular expression, with no coercion.
#[derive(Debug, Clone)]
pub struct RegexType {
    pattern: Regex,
    name: String,
}

impl RegexType {
    pub fn new(name: impl Into<String>, pattern: Regex) -> Self {
        Self {
            pattern,
            name: name.into(),
        }
    }
}

impl ValueType for RegexType {
    fn check(&self, atom: &str) -> bool {
        self.pattern
            .find(atom)
            .map_or(false, |m| m.start() == 0 && m.end() == atom.len())
    }
    fn name(&self) -> &str {
        &self.name
    }
}

/// Adapter that builds a composite value from an ordered sequence of atoms,
/// or declines to (returning `None`, which the engine surfaces as
/// [`crate::error::Error::UnknownComposite`]). [`Template::process`]
/// (`crate::template`) wraps the result in a [`Value::Composite`] alongside
/// the atom count that fed it, so the adapter itself only needs to hand back
/// the composite shape.
pub trait CompositeType: fmt::Debug + Send + Sync {
    fn coerce(&self, atoms: &[Option<String>]) -> Option<std::sync::Arc<dyn CompositeValue>>;
    fn name(&self) -> &str;
}

/// The built-in set composite: order is discarded, duplicates collapse, nulls
/// are dropped (a set has no notion of a null member).
#[derive(Debug, Default, Clone, Copy)]
pub struct SetType;

impl CompositeType for SetType {
    fn coerce(&self, atoms: &[Option<String>]) -> Option<std::sync::Arc<dyn CompositeValue>> {
        let set: std::collections::BTreeSet<String> =
            atoms.iter().filter_map(|a| a.clone()).collect();
        Some(std::sync::Arc::new(SetValue(set)))
    }
    fn name(&self) -> &str {
        "set"
    }
}

/// The complement of a [`SetValue`] within `universe`: the universe members
/// not present in the set. The produced value's count is the size of the
/// complemented set itself — the atoms that now "feed" the complemented
/// value are the universe members it retains.
pub fn set_complement(
    value: &Value,
    universe: &[String],
) -> Result<Value, crate::error::Error> {
    match value {
        Value::Composite(c, _) => {
            let set = c
                .as_any()
                .downcast_ref::<SetValue>()
                .expect("set_complement called on a non-set composite");
            let complement: std::collections::BTreeSet<String> = universe
                .iter()
                .filter(|u| !set.0.contains(*u))
                .cloned()
                .collect();
            let count = complement.len();
            Ok(Value::Composite(std::sync::Arc::new(SetValue(complement)), count))
        }
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_type_coerces_and_checks() {
        let t = IntType;
        assert_eq!(t.coerce(" 42 "), Some("42".to_string()));
        assert!(t.check("42"));
        assert!(!t.check("not-a-number"));
    }

    #[test]
    fn bool_type_canonicalizes_spellings() {
        let t = BoolType;
        assert_eq!(t.coerce("yes"), Some("true".to_string()));
        assert_eq!(t.coerce("0"), Some("false".to_string()));
        assert_eq!(t.coerce("sideways"), None);
    }

    #[test]
    fn set_complement_is_involutive() {
        let universe: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let atoms = [Some("a".to_string()), Some("b".to_string())];
        let cv = SetType.coerce(&atoms).unwrap();
        let set = Value::Composite(cv, atoms.len());
        let complement = set_complement(&set, &universe).unwrap();
        let back = set_complement(&complement, &universe).unwrap();
        assert_eq!(set, back);
    }

    #[test]
    fn set_complement_count_reflects_complemented_size() {
        let universe: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let atoms = [Some("a".to_string()), Some("b".to_string())];
        let cv = SetType.coerce(&atoms).unwrap();
        let set = Value::Composite(cv, atoms.len());
        let complement = set_complement(&set, &universe).unwrap();
        assert_eq!(complement.count(), 2);
    }
}
