//! The rule entity and its kinds.

use super::conditional::ConditionalRule;
use super::expression::ExpressionRule;
use crate::error::{ExpressionError, ScoringError};
use crate::evaluable::Evaluable;
use crate::parser::ParserService;
use crate::value::{Value, ValueKind};
use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};

/// Mapping from variable name to value threaded through an evaluation.
pub type Context = HashMap<String, Value>;

/// Kind-specific evaluation data of a [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Single expression.
    Expression(ExpressionRule),
    /// Condition selecting one of two expressions.
    Conditional(ConditionalRule),
}

impl RuleKind {
    fn is_prepared(&self) -> bool {
        match self {
            RuleKind::Expression(rule) => rule.is_prepared(),
            RuleKind::Conditional(rule) => rule.is_prepared(),
        }
    }
}

/// A named computation producing one variable, with optional clamp bounds.
///
/// Rules are created unprepared. [`Rule::prepare`] asks a parser service for
/// the expression's dependencies and compiled form; only then can the rule be
/// evaluated. Evaluation takes `&self` and keeps all per-call state on the
/// stack, so one prepared rule may be shared between threads.
///
/// Equality looks only at the computation (the [`RuleKind`]); variable,
/// description and bounds are ignored.
///
/// # Examples
///
/// ```
/// use u_scorecard::{Context, EvalexprParser, Record, Rule, Value};
///
/// let mut rule = Rule::expression("nota", "points per hour", "ch * 12.5")
///     .unwrap()
///     .with_bounds(0.0, 100.0);
/// rule.prepare(&EvalexprParser::new()).unwrap();
///
/// let context = Context::from([("ch".to_string(), Value::Real(10.0))]);
/// let value = rule.evaluate::<Record>(&[], &context).unwrap();
/// assert_eq!(value, Value::Real(100.0));
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    variable: String,
    description: String,
    max_value: Option<f64>,
    min_value: Option<f64>,
    depends_on: Vec<String>,
    functions: BTreeSet<String>,
    kind: RuleKind,
}

impl Rule {
    /// Creates an unprepared rule of the given kind.
    ///
    /// Fails with [`ScoringError::MissingRequiredField`] if `variable` or
    /// `description` is empty.
    pub fn new(
        variable: impl Into<String>,
        description: impl Into<String>,
        kind: RuleKind,
    ) -> Result<Self, ScoringError> {
        let variable = variable.into();
        if variable.trim().is_empty() {
            return Err(ScoringError::MissingRequiredField("variable"));
        }
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ScoringError::MissingRequiredField("description"));
        }

        Ok(Self {
            variable,
            description,
            max_value: None,
            min_value: None,
            depends_on: Vec::new(),
            functions: BTreeSet::new(),
            kind,
        })
    }

    /// Creates an unprepared expression rule.
    pub fn expression(
        variable: impl Into<String>,
        description: impl Into<String>,
        expression: impl Into<String>,
    ) -> Result<Self, ScoringError> {
        let variable = variable.into();
        let description = description.into();
        let kind = RuleKind::Expression(ExpressionRule::new(expression)?);
        Self::new(variable, description, kind)
    }

    /// Creates an unprepared conditional rule.
    pub fn conditional(
        variable: impl Into<String>,
        description: impl Into<String>,
        condition: impl Into<String>,
        when_true: impl Into<String>,
        when_false: impl Into<String>,
    ) -> Result<Self, ScoringError> {
        let variable = variable.into();
        let description = description.into();
        let kind = RuleKind::Conditional(ConditionalRule::new(condition, when_true, when_false)?);
        Self::new(variable, description, kind)
    }

    /// Sets the upper bound, applied only when a result exceeds it.
    pub fn with_max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Sets the lower bound, applied only when a result falls below it.
    pub fn with_min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    pub fn with_bounds(self, min: f64, max: f64) -> Self {
        self.with_min_value(min).with_max_value(max)
    }

    /// Declares a function identifier the rule references.
    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        self.functions.insert(name.into());
        self
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    pub fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    /// Variables read by the rule, as reported by the parser service.
    /// Empty until the rule is prepared.
    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    pub fn functions(&self) -> &BTreeSet<String> {
        &self.functions
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn is_prepared(&self) -> bool {
        self.kind.is_prepared()
    }

    /// Extracts dependencies and compiles the rule's expressions.
    ///
    /// May be called again; a successful call replaces the dependencies and
    /// compiled state. A failed call leaves the rule unchanged.
    pub fn prepare<P: ParserService + ?Sized>(&mut self, parser: &P) -> Result<(), ScoringError> {
        let reported = match &mut self.kind {
            RuleKind::Expression(rule) => rule.prepare(&self.variable, parser)?,
            RuleKind::Conditional(rule) => rule.prepare(&self.variable, parser)?,
        };

        let mut depends_on: Vec<String> = Vec::with_capacity(reported.len());
        for name in reported {
            if !depends_on.contains(&name) {
                depends_on.push(name);
            }
        }
        self.depends_on = depends_on;
        Ok(())
    }

    /// Evaluates the rule and clamps numeric results into its bounds.
    ///
    /// Each dependency is read from `context`; a missing entry counts as
    /// `0.0` and a non-real entry is a [`ScoringError::TypeMismatch`].
    pub fn evaluate<E: Evaluable>(&self, items: &[E], context: &Context) -> Result<Value, ScoringError> {
        let raw = self.evaluate_raw(items, context)?;
        Ok(self.clamp_value(raw))
    }

    /// Evaluates the rule without applying its bounds.
    ///
    /// A NaN result is an [`ScoringError::EvaluationFailed`]; infinities are
    /// returned as is and left to clamping.
    pub fn evaluate_raw<E: Evaluable>(
        &self,
        _items: &[E],
        context: &Context,
    ) -> Result<Value, ScoringError> {
        if !self.is_prepared() {
            return Err(ScoringError::UnpreparedRule {
                variable: self.variable.clone(),
            });
        }

        let numbers = self.numeric_context(context)?;
        let raw = match &self.kind {
            RuleKind::Expression(rule) => rule.compute(&self.variable, &numbers)?,
            RuleKind::Conditional(rule) => rule.compute(&self.variable, &numbers)?,
        };
        if raw.is_nan() {
            return Err(ScoringError::EvaluationFailed {
                variable: self.variable.clone(),
                source: ExpressionError::Evaluation("non-numeric result (NaN)".into()),
            });
        }
        Ok(Value::Real(raw))
    }

    /// Applies the bounds to a real value; other variants pass through.
    pub fn clamp_value(&self, value: Value) -> Value {
        match value {
            Value::Real(r) => Value::Real(self.clamp(r)),
            other => other,
        }
    }

    /// Clamp-on-exceed: a bound replaces the result only when the result
    /// strictly crosses it.
    ///
    /// NaN maps to the lower bound, or to the upper bound if only that is
    /// set; without bounds it is returned unchanged.
    pub fn clamp(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            return self.min_value.or(self.max_value).unwrap_or(raw);
        }
        if let Some(max) = self.max_value {
            if raw > max {
                return max;
            }
        }
        if let Some(min) = self.min_value {
            if raw < min {
                return min;
            }
        }
        raw
    }

    fn numeric_context(&self, context: &Context) -> Result<HashMap<String, f64>, ScoringError> {
        self.depends_on
            .iter()
            .map(|name| {
                let number = match context.get(name) {
                    Some(Value::Real(r)) => *r,
                    Some(other) => {
                        return Err(ScoringError::TypeMismatch {
                            name: Some(name.clone()),
                            expected: ValueKind::Real,
                            found: other.kind(),
                        })
                    }
                    None => 0.0,
                };
                Ok((name.clone(), number))
            })
            .collect()
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Rule {}

impl Hash for Rule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}
