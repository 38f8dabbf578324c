//! Rule dependency graph and execution order.

use crate::configuration::Configuration;
use crate::error::ScoringError;
use crate::rule::Rule;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Evaluation order of a configuration's rules.
///
/// The graph has one node per rule, keyed by its variable, and an edge
/// `a -> b` whenever `b` depends on `a`'s variable. Rules are ordered
/// topologically; rules that become ready at the same time keep their
/// configuration insertion order, so the plan is fully deterministic.
///
/// Dependencies that match no rule variable are external: they are read from
/// the item being scored (or default to zero).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    order: Vec<usize>,
    external: Vec<String>,
}

impl ExecutionPlan {
    /// Builds the plan for a prepared configuration.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::UnpreparedRule`] if any rule is unprepared.
    /// - [`ScoringError::DuplicateVariable`] if two rules share a variable.
    /// - [`ScoringError::CyclicDependency`] naming the rules on cycles.
    pub fn new(configuration: &Configuration) -> Result<Self, ScoringError> {
        let rules = configuration.rules();
        let n = rules.len();

        if let Some(rule) = rules.iter().find(|r| !r.is_prepared()) {
            return Err(ScoringError::UnpreparedRule {
                variable: rule.variable().to_string(),
            });
        }

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(n);
        for (i, rule) in rules.iter().enumerate() {
            if index.insert(rule.variable(), i).is_some() {
                return Err(ScoringError::DuplicateVariable {
                    variable: rule.variable().to_string(),
                });
            }
        }

        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];
        let mut external: Vec<String> = Vec::new();

        for (b, rule) in rules.iter().enumerate() {
            for dependency in rule.depends_on() {
                match index.get(dependency.as_str()) {
                    Some(&a) => {
                        dependents[a].push(b);
                        in_degree[b] += 1;
                    }
                    None => {
                        if !external.contains(dependency) {
                            external.push(dependency.clone());
                        }
                    }
                }
            }
        }

        // Kahn's algorithm, always releasing the earliest inserted ready rule.
        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(next) = ready.pop_first() {
            order.push(next);
            for &dependent in &dependents[next] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() < n {
            let variables = cycle_members(&dependents, &in_degree)
                .into_iter()
                .map(|i| rules[i].variable().to_string())
                .collect();
            return Err(ScoringError::CyclicDependency { variables });
        }

        debug!(
            configuration = %configuration.id(),
            order = ?order.iter().map(|&i| rules[i].variable()).collect::<Vec<_>>(),
            external = ?external,
            "built execution plan"
        );

        Ok(Self { order, external })
    }

    /// Rule indices (into [`Configuration::rules`]) in evaluation order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Dependencies not produced by any rule, in first-appearance order.
    pub fn external_dependencies(&self) -> &[String] {
        &self.external
    }

    /// Rules of `configuration` in evaluation order.
    ///
    /// `configuration` must be the one the plan was built from.
    pub fn rules<'a>(
        &'a self,
        configuration: &'a Configuration,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        let rules = configuration.rules();
        self.order.iter().filter_map(move |&i| rules.get(i))
    }
}

/// Narrows the rules left unordered by Kahn's algorithm to those on a cycle.
///
/// Unordered rules are either on a cycle or downstream of one. Downstream
/// rules are peeled off by repeatedly removing rules with no unordered
/// dependents; what remains lies on cycles.
fn cycle_members(dependents: &[Vec<usize>], in_degree: &[usize]) -> Vec<usize> {
    let mut remaining: BTreeSet<usize> = (0..in_degree.len())
        .filter(|&i| in_degree[i] > 0)
        .collect();

    loop {
        let sinks: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|&i| !dependents[i].iter().any(|d| remaining.contains(d)))
            .collect();
        if sinks.is_empty() {
            break;
        }
        for sink in sinks {
            remaining.remove(&sink);
        }
    }

    remaining.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::testing::{var, ScriptedParser};

    /// Prepared configuration whose rules use their own variable name as
    /// expression text; each expression sums its listed dependencies.
    fn configuration(rules: &[(&str, &[&str])]) -> Configuration {
        let mut parser = ScriptedParser::new();
        for (variable, deps) in rules {
            let names: Vec<String> = deps.iter().map(|d| d.to_string()).collect();
            parser = parser.with_script(variable, deps, move |ctx| {
                names.iter().map(|n| var(ctx, n)).sum()
            });
        }

        let mut config = Configuration::builder()
            .with_id("plan")
            .with_description("plan test")
            .created_now()
            .with_rules(
                rules
                    .iter()
                    .map(|(v, _)| Rule::expression(*v, "rule", *v).unwrap()),
            )
            .build()
            .unwrap();
        config.prepare(&parser).unwrap();
        config
    }

    fn ordered(plan: &ExecutionPlan, config: &Configuration) -> Vec<String> {
        plan.rules(config).map(|r| r.variable().to_string()).collect()
    }

    #[test]
    fn test_dependencies_come_first() {
        let config = configuration(&[("b", &["a"]), ("a", &["x"])]);
        let plan = ExecutionPlan::new(&config).unwrap();
        assert_eq!(ordered(&plan, &config), vec!["a", "b"]);
        assert_eq!(plan.order(), [1, 0]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let config = configuration(&[
            ("c", &[]),
            ("a", &[]),
            ("d", &["c", "a"]),
            ("b", &[]),
        ]);
        let plan = ExecutionPlan::new(&config).unwrap();
        assert_eq!(ordered(&plan, &config), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_diamond() {
        let config = configuration(&[
            ("total", &["left", "right"]),
            ("right", &["base"]),
            ("left", &["base"]),
            ("base", &["x"]),
        ]);
        let plan = ExecutionPlan::new(&config).unwrap();
        assert_eq!(ordered(&plan, &config), vec!["base", "right", "left", "total"]);
    }

    #[test]
    fn test_external_dependencies() {
        let config = configuration(&[("a", &["x", "y"]), ("b", &["a", "x", "z"])]);
        let plan = ExecutionPlan::new(&config).unwrap();
        assert_eq!(plan.external_dependencies(), ["x", "y", "z"]);
    }

    #[test]
    fn test_two_rule_cycle() {
        let config = configuration(&[("a", &["b"]), ("b", &["a"])]);
        let err = ExecutionPlan::new(&config).unwrap_err();
        assert_eq!(
            err,
            ScoringError::CyclicDependency {
                variables: vec!["a".into(), "b".into()]
            }
        );
    }

    #[test]
    fn test_cycle_excludes_upstream_and_downstream() {
        let config = configuration(&[
            ("up", &["x"]),
            ("a", &["up", "c"]),
            ("b", &["a"]),
            ("c", &["b"]),
            ("down", &["c"]),
        ]);
        let err = ExecutionPlan::new(&config).unwrap_err();
        assert_eq!(
            err,
            ScoringError::CyclicDependency {
                variables: vec!["a".into(), "b".into(), "c".into()]
            }
        );
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let config = configuration(&[("a", &["a"])]);
        assert_eq!(
            ExecutionPlan::new(&config).unwrap_err(),
            ScoringError::CyclicDependency {
                variables: vec!["a".into()]
            }
        );
    }

    #[test]
    fn test_duplicate_variable() {
        let config = configuration(&[("a", &[]), ("b", &[])]);
        let duplicated = Configuration::builder()
            .with_id("dup")
            .with_description("d")
            .created_now()
            .with_rules(config.rules().iter().cloned())
            .with_rule(config.rules()[0].clone())
            .build()
            .unwrap();
        assert_eq!(
            ExecutionPlan::new(&duplicated).unwrap_err(),
            ScoringError::DuplicateVariable {
                variable: "a".into()
            }
        );
    }

    #[test]
    fn test_unprepared_rule() {
        let config = Configuration::builder()
            .with_id("raw")
            .with_description("d")
            .created_now()
            .with_rule(Rule::expression("a", "d", "x").unwrap())
            .build()
            .unwrap();
        assert_eq!(
            ExecutionPlan::new(&config).unwrap_err(),
            ScoringError::UnpreparedRule {
                variable: "a".into()
            }
        );
    }
}
