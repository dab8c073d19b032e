//! Tagged-variant encodings of the caller-provided hooks a
//! [`crate::template::Template`] may carry: `consumer`, `default`,
//! `universe`, `complement`, `unwind`, and `format`.
//!
//! Each is a boxed `Fn` trait object rather than a bare function pointer so
//! callers can close over configuration (a database handle, a clock, ...).
//! They are invoked synchronously from within the evaluation pipeline and
//! must not mutate the registry they belong to.

use std::sync::Arc;

use crate::error::Error;
use crate::value::Value;

/// `(v1, …, vn) -> value`, deriving one parameter from its consumed inputs.
pub type ConsumerFn = Arc<dyn Fn(&[Value]) -> Result<Value, Error> + Send + Sync>;

/// `() -> value`, producing a parameter's value when it is absent, eligible,
/// and defaults were requested.
pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// `() -> universe`, the ambient set or range used to compute a complement.
pub type UniverseFn = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

/// `(value, universe) -> value'`, the set-theoretic complement of `value`.
pub type ComplementFn = Arc<dyn Fn(&Value, &[String]) -> Result<Value, Error> + Send + Sync>;

/// `(value) -> (atoms, complement_flag)`, the inverse of composite
/// construction: recovers the atom sequence `unprocess` should format, and
/// whether that sequence already represents `value`'s complement form.
pub type UnwindFn = Arc<dyn Fn(&Value) -> Result<(Vec<Option<String>>, bool), Error> + Send + Sync>;

/// `(atom) -> string`, a custom per-atom formatter.
pub type FormatFn = Arc<dyn Fn(Option<&str>) -> String + Send + Sync>;

/// How a template renders one atom back into its serialized string form.
#[derive(Clone)]
pub enum Format {
    /// A single `"%s"`-style placeholder, the default.
    Pattern(String),
    /// A caller-supplied formatter.
    Func(FormatFn),
}

impl std::fmt::Debug for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            Format::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::Pattern("%s".to_string())
    }
}

impl Format {
    pub fn apply(&self, atom: Option<&str>) -> String {
        match self {
            Format::Pattern(pattern) => pattern.replacen("%s", atom.unwrap_or(""), 1),
            Format::Func(f) => f(atom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_format_substitutes_once() {
        let fmt = Format::Pattern("id:%s".to_string());
        assert_eq!(fmt.apply(Some("7")), "id:7");
        assert_eq!(fmt.apply(None), "id:");
    }

    #[test]
    fn func_format_runs_closure() {
        let fmt = Format::Func(Arc::new(|a: Option<&str>| format!("[{}]", a.unwrap_or("-"))));
        assert_eq!(fmt.apply(Some("x")), "[x]");
        assert_eq!(fmt.apply(None), "[-]");
    }
}
