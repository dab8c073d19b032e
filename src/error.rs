//! Structured failures surfaced by the [`crate::template`], [`crate::registry`], and
//! [`crate::instance`] modules.
//!
//! Kinds mirror the taxonomy carried in the schema's design: coercion failures,
//! cardinality violations, conflicts, unmet dependencies, construction-time
//! cycles, and misconfigured composite/complement hooks.

/// Failures produced while building a [`crate::registry::Registry`] or while
/// running a [`crate::registry::Registry`]'s evaluation pipeline against raw
/// input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An atom failed its value type's `check` after coercion.
    #[error("parameter {name:?}: atom at index {index} failed the {type_name} check")]
    BadAtom {
        name: String,
        index: usize,
        type_name: String,
    },

    /// A parameter's atom count fell below its configured minimum.
    #[error("parameter {name:?}: have {have} value(s), need at least {min}")]
    TooFew {
        name: String,
        have: usize,
        min: usize,
    },

    /// A parameter's atom count exceeded its configured maximum without
    /// truncation (only possible when a registry opts out of shift/truncate
    /// semantics; the default pipeline always truncates and never raises this).
    #[error("parameter {name:?}: have {have} value(s), maximum is {max}")]
    TooMany {
        name: String,
        have: usize,
        max: usize,
    },

    /// Two parameters that conflict both ended up present.
    #[error("parameter {a:?} conflicts with {b:?}")]
    Conflict { a: String, b: String },

    /// A parameter is present but one of its declared dependencies is not.
    #[error("parameter {name:?} depends on {missing:?}, which is not present")]
    MissingDependency { name: String, missing: String },

    /// Registry construction found a dependency cycle among the given names.
    #[error("dependency cycle among parameters: {cycle:?}")]
    Cycle { cycle: Vec<String> },

    /// A template declares a composite type that could not build a value from
    /// the supplied sequence of atoms (or, during serialization, that has no
    /// `unwind` to invert an existing composite value).
    #[error("parameter {name:?} declares a composite with no coercion from its sequence")]
    UnknownComposite { name: String },

    /// A complement was requested for a parameter with no `complement` hook.
    #[error("parameter {name:?} requested a complement but defines none")]
    BadComplement { name: String },

    /// A descriptor referenced a parameter name that isn't in the registry.
    #[error("{referrer:?} references unknown parameter {name:?}")]
    UnknownParameter { referrer: String, name: String },

    /// A `use: other` reuse pointer named a template that doesn't exist (or
    /// whose own `use` chain doesn't resolve).
    #[error("parameter {name:?} reuses unknown template {base:?} via `use`")]
    UnknownTemplate { name: String, base: String },

    /// Two descriptors in the same registry declared the same parameter name.
    #[error("parameter {name:?} is already defined in the registry")]
    DuplicateTemplate { name: String },

    /// An instance operation referenced a group name the registry doesn't define.
    #[error("unknown group {name:?}")]
    UnknownGroup { name: String },

    /// A caller-supplied callback (consumer, default, universe, complement,
    /// unwind) failed. The message is opaque to the engine; it is tagged with
    /// the template name for context, per the callback propagation contract.
    #[error("callback for parameter {name:?} failed: {message}")]
    Callback { name: String, message: String },
}
