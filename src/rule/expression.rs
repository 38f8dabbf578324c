//! Rules computed by a single compiled expression.

use crate::error::ScoringError;
use crate::parser::{CompiledExpression, ParserService};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Evaluation data of a rule defined by one expression, e.g. `ch * 12.5`.
///
/// Two expression rules are equal iff their expression texts are equal; the
/// compiled handle does not take part in equality.
#[derive(Debug, Clone)]
pub struct ExpressionRule {
    expression: String,
    compiled: Option<Arc<dyn CompiledExpression>>,
}

impl ExpressionRule {
    /// Creates an unprepared expression rule. Fails if `expression` is empty.
    pub fn new(expression: impl Into<String>) -> Result<Self, ScoringError> {
        let expression = expression.into();
        if expression.trim().is_empty() {
            return Err(ScoringError::MissingRequiredField("expression"));
        }
        Ok(Self {
            expression,
            compiled: None,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_prepared(&self) -> bool {
        self.compiled.is_some()
    }

    /// Extracts dependencies and compiles the expression. The previous
    /// compiled handle is kept if either step fails.
    pub(crate) fn prepare<P: ParserService + ?Sized>(
        &mut self,
        variable: &str,
        parser: &P,
    ) -> Result<Vec<String>, ScoringError> {
        let failed = |source| ScoringError::CompilationFailed {
            variable: variable.to_string(),
            source,
        };

        let dependencies = parser.dependencies(&self.expression).map_err(failed)?;
        let compiled = parser.compile(&self.expression).map_err(failed)?;
        self.compiled = Some(compiled);
        Ok(dependencies)
    }

    pub(crate) fn compute(
        &self,
        variable: &str,
        context: &HashMap<String, f64>,
    ) -> Result<f64, ScoringError> {
        let compiled = self
            .compiled
            .as_ref()
            .ok_or_else(|| ScoringError::UnpreparedRule {
                variable: variable.to_string(),
            })?;

        compiled
            .evaluate(context)
            .map_err(|source| ScoringError::EvaluationFailed {
                variable: variable.to_string(),
                source,
            })
    }
}

impl PartialEq for ExpressionRule {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl Eq for ExpressionRule {}

impl Hash for ExpressionRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.expression.hash(state);
    }
}
