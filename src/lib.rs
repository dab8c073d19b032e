//! A declarative registry and evaluation engine for named parameter sets
//! drawn from URI query strings.
//!
//! A [`registry::Registry`] is built from [`descriptor::TemplateDescriptor`]s
//! (data, `serde`-deserializable) and [`descriptor::TemplateCallbacks`]
//! (Rust-native hooks) via [`registry::RegistryBuilder`]. Raw query atoms
//! ([`instance::RawParams`]) are evaluated against a registry into an
//! [`instance::Instance`], which can be queried, incrementally updated, and
//! serialized back out.

pub mod callback;
pub mod descriptor;
pub mod error;
pub mod instance;
#[cfg(feature = "percent-encode")]
pub mod percent;
pub mod registry;
pub mod template;
pub mod uri;
pub mod value;
pub mod vtype;

pub use callback::{ComplementFn, ConsumerFn, DefaultFn, Format, FormatFn, UniverseFn, UnwindFn};
pub use descriptor::{RegistryDescriptor, TemplateCallbacks, TemplateDescriptor};
pub use error::Error;
pub use instance::{Instance, RawParams};
pub use registry::{Registry, RegistryBuilder};
pub use template::Template;
pub use value::{CompositeValue, SetValue, Value};
pub use vtype::{
    set_complement, BoolType, CompositeType, IntType, RegexType, SetType, StringType, ValueType,
};
