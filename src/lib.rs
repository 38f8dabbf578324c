//! Rule-based scoring engine.
//!
//! A [`Configuration`] holds named [`Rule`]s. Each rule computes one
//! variable from an expression over other variables and item attributes,
//! optionally clamped into `[min, max]`. Rules may consume the outputs of
//! other rules; the engine orders them by dependency and rejects cycles.
//!
//! - **Values**: [`Value`] is a real, boolean or text datum.
//! - **Items**: anything implementing [`Evaluable`] (a single [`Score`], a
//!   [`Record`] of attributes, a `HashMap`).
//! - **Parsing**: a [`ParserService`] reports an expression's dependencies
//!   and compiles it. [`EvalexprParser`] is the bundled implementation.
//! - **Engine**: [`Evaluator`] scores one item or a batch of items.
//!
//! # Example
//!
//! ```
//! use u_scorecard::{Configuration, EvalexprParser, Evaluator, Rule, Score, Value};
//!
//! let mut config = Configuration::builder()
//!     .with_id("cfg-2016")
//!     .with_description("teaching points")
//!     .created_now()
//!     .with_rule(
//!         Rule::expression("nota", "points per teaching hour", "ch * 12.5")
//!             .unwrap()
//!             .with_bounds(0.0, 100.0),
//!     )
//!     .build()
//!     .unwrap();
//! config.prepare(&EvalexprParser::new()).unwrap();
//!
//! let evaluator = Evaluator::new(&config).unwrap();
//! let item = Score::new("ch", Value::Real(10.0)).unwrap();
//! let result = evaluator.evaluate(&item, None).unwrap();
//! assert_eq!(result["nota"], Value::Real(100.0));
//! ```
//!
//! # Features
//!
//! - `evalexpr` (default): [`EvalexprParser`].
//! - `serde`: serializable values and configuration definitions.
//! - `parallel`: rayon-backed [`Evaluator::evaluate_batch`].

pub mod configuration;
pub mod engine;
pub mod error;
pub mod evaluable;
pub mod identity;
pub mod parser;
pub mod rule;
pub mod value;

#[cfg(feature = "serde")]
pub use configuration::{ConfigurationDef, RuleDef, RuleKindDef};
pub use configuration::{Configuration, ConfigurationBuilder};
pub use engine::{evaluate, Evaluation, Evaluator, EvaluatorConfig, ExecutionPlan, RuleTrace};
pub use error::{ExpressionError, ScoringError};
pub use evaluable::{Evaluable, Record, Score};
pub use identity::IdRegistry;
#[cfg(feature = "evalexpr")]
pub use parser::EvalexprParser;
pub use parser::{CompiledExpression, FunctionRegistry, ParserService, ScoreFunction};
pub use rule::{ConditionalRule, Context, ExpressionRule, Rule, RuleKind};
pub use value::{Value, ValueKind};
