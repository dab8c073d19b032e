//! The language-neutral, `serde`-deserializable schema for registry
//! construction input (spec. §6). Data-only fields (cardinality, flags,
//! name sets) round-trip through `serde`; the behavioral hooks (`type`,
//! `composite`, `default`, `consumer`, `universe`, `complement`, `unwind`,
//! custom `format`) are Rust closures and are supplied separately via
//! [`TemplateCallbacks`], since trait objects cannot be deserialized.

use std::collections::BTreeMap;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::callback::{ComplementFn, ConsumerFn, DefaultFn, FormatFn, UnwindFn, UniverseFn};
use crate::vtype::{CompositeType, ValueType};

fn default_complement_name() -> String {
    "complement".to_string()
}

/// The data-only portion of one parameter's schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TemplateDescriptor {
    /// Unique parameter name.
    pub name: String,
    /// Inherit missing fields from another template already defined in the
    /// same registry (construction-time descriptor merge, not a runtime
    /// prototype chain).
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    /// `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub empty: bool,
    #[serde(default)]
    pub reverse: bool,
    /// A `"%s"`-style format string. Ignored if a [`TemplateCallbacks::format`]
    /// function is supplied instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub depends: Vec<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    #[serde(default)]
    pub consumes: Vec<String>,
    /// Named groups this parameter belongs to.
    #[serde(default)]
    pub groups: Vec<String>,
}

impl TemplateDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// The Rust-native hooks for one parameter, kept apart from
/// [`TemplateDescriptor`] because trait objects and closures aren't
/// `serde`-deserializable.
#[derive(Default, Clone)]
pub struct TemplateCallbacks {
    pub vtype: Option<Arc<dyn ValueType>>,
    pub composite: Option<Arc<dyn CompositeType>>,
    pub default: Option<DefaultFn>,
    pub consumer: Option<ConsumerFn>,
    pub universe: Option<UniverseFn>,
    pub complement: Option<ComplementFn>,
    pub unwind: Option<UnwindFn>,
    pub format_fn: Option<FormatFn>,
}

/// The data-only portion of a registry's schema: parameter descriptors, named
/// groups, and the reserved complement parameter name.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RegistryDescriptor {
    #[serde(default = "default_complement_name")]
    pub complement: String,
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
    pub params: Vec<TemplateDescriptor>,
}

impl Default for RegistryDescriptor {
    fn default() -> Self {
        Self {
            complement: default_complement_name(),
            groups: BTreeMap::new(),
            params: Vec::new(),
        }
    }
}
