//! Rule configurations.
//!
//! A [`Configuration`] is an immutable, validated collection of rules with
//! identifying metadata. With the `serde` feature, [`ConfigurationDef`] can
//! be deserialized and converted into a validated configuration.

#[cfg(feature = "serde")]
mod definition;
mod types;

#[cfg(feature = "serde")]
pub use definition::{ConfigurationDef, RuleDef, RuleKindDef};
pub use types::{Configuration, ConfigurationBuilder};
