//! Scoring rules.
//!
//! A [`Rule`] stores its result under a variable name and carries its
//! kind-specific evaluation data in a [`RuleKind`]:
//!
//! - **Expression**: one expression, e.g. `ch * 12.5`.
//! - **Conditional**: a condition choosing between two expressions.
//!
//! Numeric results are clamped into the rule's optional bounds using
//! clamp-on-exceed semantics: a bound is applied only when the raw result
//! strictly crosses it.

mod conditional;
mod expression;
mod types;

pub use conditional::ConditionalRule;
pub use expression::ExpressionRule;
pub use types::{Context, Rule, RuleKind};
