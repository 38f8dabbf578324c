//! Expression parsing layer.
//!
//! Rules consume expressions only through [`ParserService`] and
//! [`CompiledExpression`]. The default implementation, [`EvalexprParser`],
//! is available with the `evalexpr` feature (enabled by default).

#[cfg(feature = "evalexpr")]
mod evalexpr_parser;
mod functions;
mod types;

#[cfg(feature = "evalexpr")]
pub use evalexpr_parser::EvalexprParser;
pub use functions::{FunctionRegistry, ScoreFunction};
pub use types::{CompiledExpression, ParserService};
