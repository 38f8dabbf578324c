//! Per-item rule execution.

use super::config::EvaluatorConfig;
use super::plan::ExecutionPlan;
use crate::configuration::Configuration;
use crate::error::ScoringError;
use crate::evaluable::Evaluable;
use crate::rule::Context;
use crate::value::Value;
use std::slice;
use tracing::{debug, trace};

/// Outcome of one rule within an evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleTrace {
    /// Variable the rule stored into.
    pub variable: String,
    /// Result before clamping.
    pub raw: Value,
    /// Result stored in the context.
    pub value: Value,
}

impl RuleTrace {
    /// Whether a bound replaced the raw result.
    pub fn clamped(&self) -> bool {
        self.raw != self.value
    }
}

/// Final context of an evaluation plus the per-rule trace, in execution
/// order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    pub context: Context,
    pub trace: Vec<RuleTrace>,
}

/// Scores items against a prepared configuration.
///
/// The [`ExecutionPlan`] is computed once in [`Evaluator::new`] and reused
/// for every item. Each evaluation is a pure function of the configuration,
/// the item and the seed context.
///
/// # Examples
///
/// ```
/// use u_scorecard::{Configuration, EvalexprParser, Evaluator, Record, Rule, Value};
///
/// let mut config = Configuration::builder()
///     .with_id("example")
///     .with_description("two chained rules")
///     .created_now()
///     .with_rule(Rule::expression("b", "double a", "a * 2").unwrap())
///     .with_rule(Rule::expression("a", "x plus one", "x + 1").unwrap())
///     .build()
///     .unwrap();
/// config.prepare(&EvalexprParser::new()).unwrap();
///
/// let evaluator = Evaluator::new(&config).unwrap();
/// let result = evaluator
///     .evaluate(&Record::new().with_attribute("x", 3.0), None)
///     .unwrap();
///
/// assert_eq!(result["a"], Value::Real(4.0));
/// assert_eq!(result["b"], Value::Real(8.0));
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    configuration: &'a Configuration,
    plan: ExecutionPlan,
    config: EvaluatorConfig,
}

impl<'a> Evaluator<'a> {
    /// Builds the execution plan for `configuration`.
    ///
    /// Fails if a rule is unprepared, two rules share a variable, or the
    /// rules depend on each other cyclically.
    pub fn new(configuration: &'a Configuration) -> Result<Self, ScoringError> {
        Ok(Self {
            configuration,
            plan: ExecutionPlan::new(configuration)?,
            config: EvaluatorConfig::default(),
        })
    }

    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn configuration(&self) -> &'a Configuration {
        self.configuration
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluates every rule for `item` and returns the final context.
    ///
    /// The working context starts as a copy of `seed`; external dependencies
    /// the item provides overwrite seed entries. Each rule's clamped result
    /// is then stored under its variable, where later rules read it.
    pub fn evaluate<E: Evaluable>(
        &self,
        item: &E,
        seed: Option<&Context>,
    ) -> Result<Context, ScoringError> {
        self.run(item, seed, None)
    }

    /// Like [`evaluate`](Self::evaluate), also recording each rule's raw
    /// and stored result.
    pub fn evaluate_traced<E: Evaluable>(
        &self,
        item: &E,
        seed: Option<&Context>,
    ) -> Result<Evaluation, ScoringError> {
        let mut steps = Vec::with_capacity(self.plan.order().len());
        let context = self.run(item, seed, Some(&mut steps))?;
        Ok(Evaluation {
            context,
            trace: steps,
        })
    }

    /// Evaluates each item independently, returning results in item order.
    ///
    /// Items are scored in parallel when [`EvaluatorConfig::parallel`] is set
    /// and the `parallel` feature is enabled.
    pub fn evaluate_batch<E: Evaluable + Sync>(
        &self,
        items: &[E],
    ) -> Vec<Result<Context, ScoringError>> {
        #[cfg(feature = "parallel")]
        if self.config.parallel {
            use rayon::prelude::*;
            return items
                .par_iter()
                .map(|item| self.evaluate(item, None))
                .collect();
        }

        items.iter().map(|item| self.evaluate(item, None)).collect()
    }

    fn run<E: Evaluable>(
        &self,
        item: &E,
        seed: Option<&Context>,
        mut steps: Option<&mut Vec<RuleTrace>>,
    ) -> Result<Context, ScoringError> {
        let mut context = seed.cloned().unwrap_or_default();

        for name in self.plan.external_dependencies() {
            match item.get(name) {
                Some(value) => {
                    context.insert(name.clone(), value);
                }
                None if !context.contains_key(name) => {
                    debug!(dependency = %name, "unresolved dependency defaults to 0");
                }
                None => {}
            }
        }

        let items = slice::from_ref(item);
        for rule in self.plan.rules(self.configuration) {
            let raw = rule.evaluate_raw(items, &context)?;
            let value = rule.clamp_value(raw.clone());
            trace!(variable = rule.variable(), %raw, %value, "evaluated rule");

            if let Some(steps) = steps.as_deref_mut() {
                steps.push(RuleTrace {
                    variable: rule.variable().to_string(),
                    raw,
                    value: value.clone(),
                });
            }
            context.insert(rule.variable().to_string(), value);
        }

        Ok(context)
    }
}

/// Evaluates `configuration` for a single item.
///
/// Shorthand for [`Evaluator::new`] followed by [`Evaluator::evaluate`].
pub fn evaluate<E: Evaluable>(
    configuration: &Configuration,
    item: &E,
    seed: Option<&Context>,
) -> Result<Context, ScoringError> {
    Evaluator::new(configuration)?.evaluate(item, seed)
}
