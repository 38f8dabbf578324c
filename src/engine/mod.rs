//! Dependency-ordered evaluation of a configuration.
//!
//! [`ExecutionPlan`] orders a configuration's rules so every rule runs after
//! the rules producing its dependencies, and rejects cyclic configurations.
//! [`Evaluator`] runs the plan against one item or a batch of items.

mod config;
mod evaluator;
mod plan;

pub use config::EvaluatorConfig;
pub use evaluator::{evaluate, Evaluation, Evaluator, RuleTrace};
pub use plan::ExecutionPlan;
