//! Core traits of the expression layer.

use crate::error::ExpressionError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Converts expression text into free-variable lists and executable
/// compiled expressions.
///
/// The scoring core only depends on this trait; any expression language can
/// be plugged in.
///
/// # Examples
///
/// ```ignore
/// struct Constant;
///
/// impl ParserService for Constant {
///     fn dependencies(&self, _text: &str) -> Result<Vec<String>, ExpressionError> {
///         Ok(Vec::new())
///     }
///
///     fn compile(&self, text: &str) -> Result<Arc<dyn CompiledExpression>, ExpressionError> {
///         let value: f64 = text.parse().map_err(|_| ExpressionError::Parse(text.into()))?;
///         Ok(Arc::new(Fixed(value)))
///     }
/// }
/// ```
pub trait ParserService {
    /// Returns the free-variable identifiers `expression` reads, in order of
    /// first appearance.
    fn dependencies(&self, expression: &str) -> Result<Vec<String>, ExpressionError>;

    /// Compiles `expression` into an executable form.
    fn compile(&self, expression: &str) -> Result<Arc<dyn CompiledExpression>, ExpressionError>;
}

/// An executable expression.
///
/// Implementations must be immutable once compiled so one handle can be
/// shared across threads evaluating different items.
pub trait CompiledExpression: Send + Sync + fmt::Debug {
    /// Evaluates the expression with the given variable bindings.
    fn evaluate(&self, context: &HashMap<String, f64>) -> Result<f64, ExpressionError>;
}

impl<P: ParserService + ?Sized> ParserService for &P {
    fn dependencies(&self, expression: &str) -> Result<Vec<String>, ExpressionError> {
        (**self).dependencies(expression)
    }

    fn compile(&self, expression: &str) -> Result<Arc<dyn CompiledExpression>, ExpressionError> {
        (**self).compile(expression)
    }
}
