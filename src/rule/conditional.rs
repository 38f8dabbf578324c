//! Rules choosing between two expressions.

use super::expression::ExpressionRule;
use crate::error::ScoringError;
use crate::parser::ParserService;
use std::collections::HashMap;

/// Evaluation data of a rule of the form
/// `if condition { when_true } else { when_false }`.
///
/// A non-zero condition result selects `when_true`. Only the selected branch
/// is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConditionalRule {
    condition: ExpressionRule,
    when_true: ExpressionRule,
    when_false: ExpressionRule,
}

impl ConditionalRule {
    pub fn new(
        condition: impl Into<String>,
        when_true: impl Into<String>,
        when_false: impl Into<String>,
    ) -> Result<Self, ScoringError> {
        let field = |name: &'static str, text: String| {
            ExpressionRule::new(text).map_err(|_| ScoringError::MissingRequiredField(name))
        };

        Ok(Self {
            condition: field("condition", condition.into())?,
            when_true: field("when_true", when_true.into())?,
            when_false: field("when_false", when_false.into())?,
        })
    }

    pub fn condition(&self) -> &str {
        self.condition.expression()
    }

    pub fn when_true(&self) -> &str {
        self.when_true.expression()
    }

    pub fn when_false(&self) -> &str {
        self.when_false.expression()
    }

    pub fn is_prepared(&self) -> bool {
        self.condition.is_prepared() && self.when_true.is_prepared() && self.when_false.is_prepared()
    }

    /// Prepares all three expressions; dependencies are their ordered union.
    pub(crate) fn prepare<P: ParserService + ?Sized>(
        &mut self,
        variable: &str,
        parser: &P,
    ) -> Result<Vec<String>, ScoringError> {
        // Prepare copies so a failure leaves the rule as it was.
        let mut prepared = self.clone();
        let mut dependencies = prepared.condition.prepare(variable, parser)?;
        dependencies.extend(prepared.when_true.prepare(variable, parser)?);
        dependencies.extend(prepared.when_false.prepare(variable, parser)?);
        *self = prepared;
        Ok(dependencies)
    }

    pub(crate) fn compute(
        &self,
        variable: &str,
        context: &HashMap<String, f64>,
    ) -> Result<f64, ScoringError> {
        if self.condition.compute(variable, context)? != 0.0 {
            self.when_true.compute(variable, context)
        } else {
            self.when_false.compute(variable, context)
        }
    }
}
