//! Serializable configuration definitions.
//!
//! Definitions are plain data read from JSON, YAML or any other serde
//! format. Converting one into a [`Configuration`] runs the same validation
//! as [`ConfigurationBuilder::build`].

use super::types::{Configuration, ConfigurationBuilder};
use crate::error::ScoringError;
use crate::rule::{Rule, RuleKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Definition of a [`Configuration`].
///
/// Required fields default to empty so that a missing field is reported as
/// [`ScoringError::MissingRequiredField`] on conversion rather than as a
/// deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationDef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

/// Definition of a [`Rule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDef {
    pub variable: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<String>,
    #[serde(flatten)]
    pub kind: RuleKindDef,
}

/// Kind-specific part of a [`RuleDef`], tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKindDef {
    Expression {
        expression: String,
    },
    Conditional {
        condition: String,
        when_true: String,
        when_false: String,
    },
}

impl TryFrom<RuleDef> for Rule {
    type Error = ScoringError;

    fn try_from(def: RuleDef) -> Result<Self, Self::Error> {
        let mut rule = match def.kind {
            RuleKindDef::Expression { expression } => {
                Rule::expression(def.variable, def.description, expression)?
            }
            RuleKindDef::Conditional {
                condition,
                when_true,
                when_false,
            } => Rule::conditional(
                def.variable,
                def.description,
                condition,
                when_true,
                when_false,
            )?,
        };

        if let Some(max) = def.max_value {
            rule = rule.with_max_value(max);
        }
        if let Some(min) = def.min_value {
            rule = rule.with_min_value(min);
        }
        for function in def.functions {
            rule = rule.with_function(function);
        }
        Ok(rule)
    }
}

impl From<&Rule> for RuleDef {
    fn from(rule: &Rule) -> Self {
        let kind = match rule.kind() {
            RuleKind::Expression(e) => RuleKindDef::Expression {
                expression: e.expression().to_string(),
            },
            RuleKind::Conditional(c) => RuleKindDef::Conditional {
                condition: c.condition().to_string(),
                when_true: c.when_true().to_string(),
                when_false: c.when_false().to_string(),
            },
        };

        Self {
            variable: rule.variable().to_string(),
            description: rule.description().to_string(),
            max_value: rule.max_value(),
            min_value: rule.min_value(),
            functions: rule.functions().iter().cloned().collect(),
            kind,
        }
    }
}

impl TryFrom<ConfigurationDef> for Configuration {
    type Error = ScoringError;

    fn try_from(def: ConfigurationDef) -> Result<Self, Self::Error> {
        let mut builder = ConfigurationBuilder::new()
            .with_id(def.id)
            .with_description(def.description);
        if let Some(name) = def.name {
            builder = builder.with_name(name);
        }
        if let Some(created_at) = def.created_at {
            builder = builder.with_created_at(created_at);
        }

        let rules = def
            .rules
            .into_iter()
            .map(Rule::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        builder.with_rules(rules).build()
    }
}

impl From<&Configuration> for ConfigurationDef {
    fn from(configuration: &Configuration) -> Self {
        Self {
            id: configuration.id().to_string(),
            name: configuration.name().map(str::to_string),
            description: configuration.description().to_string(),
            created_at: Some(configuration.created_at()),
            rules: configuration.rules().iter().map(RuleDef::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITION: &str = r#"
{
  "id": "cfg-2016",
  "name": "Resolution 2016",
  "description": "Teaching and research points",
  "created_at": "2016-03-01T12:00:00Z",
  "rules": [
    {
      "variable": "nota",
      "description": "points per teaching hour",
      "kind": "expression",
      "expression": "ch * 12.5",
      "max_value": 100.0,
      "min_value": 0.0
    },
    {
      "variable": "extra",
      "description": "overtime bonus",
      "kind": "conditional",
      "condition": "ch > 40",
      "when_true": "bonus(ch)",
      "when_false": "0",
      "functions": ["bonus"]
    }
  ]
}
"#;

    #[test]
    fn test_parse_definition() {
        let def: ConfigurationDef = serde_json::from_str(DEFINITION).unwrap();
        let config = Configuration::try_from(def).unwrap();

        assert_eq!(config.id(), "cfg-2016");
        assert_eq!(config.name(), Some("Resolution 2016"));
        assert_eq!(config.rules().len(), 2);

        let nota = config.rule("nota").unwrap();
        assert_eq!(nota.max_value(), Some(100.0));
        assert_eq!(nota.min_value(), Some(0.0));
        assert!(matches!(nota.kind(), RuleKind::Expression(e) if e.expression() == "ch * 12.5"));

        let extra = config.rule("extra").unwrap();
        assert!(extra.functions().contains("bonus"));
        assert!(matches!(extra.kind(), RuleKind::Conditional(c) if c.when_true() == "bonus(ch)"));
    }

    #[test]
    fn test_definition_survives_configuration() {
        let def: ConfigurationDef = serde_json::from_str(DEFINITION).unwrap();
        let config = Configuration::try_from(def.clone()).unwrap();
        assert_eq!(ConfigurationDef::from(&config), def);
    }

    #[test]
    fn test_missing_fields_are_reported_by_name() {
        let def: ConfigurationDef = serde_json::from_str(
            r#"{ "id": "x", "description": "d", "rules": [
                { "variable": "a", "description": "d", "kind": "expression", "expression": "1" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(
            Configuration::try_from(def).unwrap_err(),
            ScoringError::MissingRequiredField("created_at")
        );

        let def: ConfigurationDef = serde_json::from_str(
            r#"{ "id": "x", "description": "d", "created_at": "2016-03-01T12:00:00Z" }"#,
        )
        .unwrap();
        assert_eq!(
            Configuration::try_from(def).unwrap_err(),
            ScoringError::MissingRequiredField("rules")
        );
    }

    #[test]
    fn test_invalid_rule_is_reported() {
        let def = RuleDef {
            variable: "a".into(),
            description: "d".into(),
            max_value: None,
            min_value: None,
            functions: Vec::new(),
            kind: RuleKindDef::Expression {
                expression: String::new(),
            },
        };
        assert_eq!(
            Rule::try_from(def).unwrap_err(),
            ScoringError::MissingRequiredField("expression")
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<RuleDef, _> = serde_json::from_str(
            r#"{ "variable": "a", "description": "d", "kind": "lookup", "table": "t" }"#,
        );
        assert!(result.is_err());
    }
}
