//! Configuration entity and builder.

use crate::error::ScoringError;
use crate::identity::IdRegistry;
use crate::parser::ParserService;
use crate::rule::Rule;
use chrono::{DateTime, Utc};
use tracing::debug;

/// A named, dated, ordered set of rules applied together to score items.
///
/// Built with [`ConfigurationBuilder`]. Rule order is preserved as given
/// but is not required to be a valid evaluation order; the engine derives
/// that from the rules' dependencies.
///
/// # Examples
///
/// ```
/// use u_scorecard::{Configuration, Rule};
///
/// let config = Configuration::builder()
///     .with_id("cfg-1")
///     .with_name("Teaching load")
///     .with_description("Points for teaching hours")
///     .created_now()
///     .with_rule(Rule::expression("nota", "points", "ch * 12.5").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.rules().len(), 1);
/// assert!(!config.is_prepared());
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    id: String,
    name: Option<String>,
    description: String,
    created_at: DateTime<Utc>,
    rules: Vec<Rule>,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-facing name, distinct from the unique [`id`](Self::id).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Rules in insertion order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Finds the rule storing into `variable`.
    pub fn rule(&self, variable: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.variable() == variable)
    }

    pub fn is_prepared(&self) -> bool {
        self.rules.iter().all(Rule::is_prepared)
    }

    /// Prepares every rule in insertion order.
    ///
    /// On the first failure the error is returned and no rule is changed.
    pub fn prepare<P: ParserService + ?Sized>(&mut self, parser: &P) -> Result<(), ScoringError> {
        let mut rules = self.rules.clone();
        for rule in &mut rules {
            rule.prepare(parser)?;
        }
        self.rules = rules;
        debug!(
            configuration = %self.id,
            rules = self.rules.len(),
            "prepared configuration"
        );
        Ok(())
    }
}

/// Builder for [`Configuration`].
///
/// `build` checks the required fields in order: id, description,
/// creation date, rules.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationBuilder {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    created_at: Option<DateTime<Utc>>,
    rules: Vec<Rule>,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the creation date to the current time.
    pub fn created_now(self) -> Self {
        self.with_created_at(Utc::now())
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Checks that every required field is present and non-empty.
    pub fn validate(&self) -> Result<(), ScoringError> {
        self.required().map(|_| ())
    }

    pub fn build(self) -> Result<Configuration, ScoringError> {
        let (id, description, created_at) = self.required()?;
        let (id, description) = (id.to_string(), description.to_string());

        Ok(Configuration {
            id,
            name: self.name,
            description,
            created_at,
            rules: self.rules,
        })
    }

    /// Required fields, checked in order: id, description, created_at, rules.
    fn required(&self) -> Result<(&str, &str, DateTime<Utc>), ScoringError> {
        let id = match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err(ScoringError::MissingRequiredField("id")),
        };
        let description = match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => return Err(ScoringError::MissingRequiredField("description")),
        };
        let created_at = self
            .created_at
            .ok_or(ScoringError::MissingRequiredField("created_at"))?;
        if self.rules.is_empty() {
            return Err(ScoringError::MissingRequiredField("rules"));
        }
        Ok((id, description, created_at))
    }

    /// Builds the configuration and claims its id in `ids`.
    ///
    /// Nothing is claimed if validation fails.
    pub fn build_registered(self, ids: &mut IdRegistry) -> Result<Configuration, ScoringError> {
        let configuration = self.build()?;
        ids.claim(configuration.id.clone())?;
        Ok(configuration)
    }
}
