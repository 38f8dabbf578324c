//! Error types for rule preparation and evaluation.

use crate::value::ValueKind;
use thiserror::Error;

/// Errors raised by a parser service or a compiled expression.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ExpressionError {
    /// The expression text could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The expression references a function no registry provides.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// The compiled expression failed while evaluating.
    #[error("evaluation error: {0}")]
    Evaluation(String),
}

/// Errors raised while building, preparing or evaluating rules.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ScoringError {
    /// A required constructor or preparation argument was absent or empty.
    #[error("required field not provided: {0}")]
    MissingRequiredField(&'static str),

    /// A value was read as the wrong variant.
    #[error(
        "type mismatch for {}: expected {expected}, found {found}",
        .name.as_deref().unwrap_or("value")
    )]
    TypeMismatch {
        /// Context entry or attribute being read, when known.
        name: Option<String>,
        expected: ValueKind,
        found: ValueKind,
    },

    /// `evaluate` was called on a rule that was never prepared.
    #[error("rule '{variable}' evaluated before preparation")]
    UnpreparedRule { variable: String },

    /// The rule graph contains a cycle.
    #[error("cyclic dependency between rules: {}", .variables.join(", "))]
    CyclicDependency {
        /// Variables of every rule that could not be ordered.
        variables: Vec<String>,
    },

    /// The parser service rejected a rule's expression.
    #[error("rule '{variable}' failed to compile: {source}")]
    CompilationFailed {
        variable: String,
        #[source]
        source: ExpressionError,
    },

    /// A compiled expression failed during evaluation.
    #[error("rule '{variable}' failed to evaluate: {source}")]
    EvaluationFailed {
        variable: String,
        #[source]
        source: ExpressionError,
    },

    /// Two rules of one configuration store into the same variable.
    #[error("variable '{variable}' is defined by more than one rule")]
    DuplicateVariable { variable: String },

    /// An identifier was claimed twice in the same registry.
    #[error("identifier already in use: {id}")]
    DuplicateIdentifier { id: String },
}

impl ScoringError {
    pub(crate) fn type_mismatch(expected: ValueKind, found: ValueKind) -> Self {
        ScoringError::TypeMismatch {
            name: None,
            expected,
            found,
        }
    }

    /// Variable of the rule this error is about, if any.
    pub fn variable(&self) -> Option<&str> {
        match self {
            ScoringError::UnpreparedRule { variable }
            | ScoringError::CompilationFailed { variable, .. }
            | ScoringError::EvaluationFailed { variable, .. }
            | ScoringError::DuplicateVariable { variable } => Some(variable),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message() {
        let unnamed = ScoringError::type_mismatch(ValueKind::Real, ValueKind::Text);
        assert_eq!(
            unnamed.to_string(),
            "type mismatch for value: expected real, found text"
        );

        let named = ScoringError::TypeMismatch {
            name: Some("ch".into()),
            expected: ValueKind::Real,
            found: ValueKind::Boolean,
        };
        assert_eq!(
            named.to_string(),
            "type mismatch for ch: expected real, found boolean"
        );
    }

    #[test]
    fn test_cycle_message_lists_variables() {
        let err = ScoringError::CyclicDependency {
            variables: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "cyclic dependency between rules: a, b");
    }

    #[test]
    fn test_evaluation_failed_exposes_source() {
        use std::error::Error;

        let err = ScoringError::EvaluationFailed {
            variable: "nota".into(),
            source: ExpressionError::Evaluation("division by zero".into()),
        };
        assert_eq!(err.variable(), Some("nota"));
        assert!(err.source().is_some());
    }
}
