//! Named external functions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A numeric function callable from expressions.
pub type ScoreFunction = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// Registry of named functions available to compiled expressions.
///
/// Rules only record which identifiers they reference; invocation happens
/// inside the compiled expression of a parser built with this registry.
///
/// # Examples
///
/// ```
/// use u_scorecard::FunctionRegistry;
///
/// let functions = FunctionRegistry::new()
///     .with_function("double", |args: &[f64]| args.iter().sum::<f64>() * 2.0);
/// assert!(functions.contains("double"));
/// assert_eq!(functions.call("double", &[1.5]), Some(3.0));
/// ```
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, ScoreFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function, replacing any previous one with the same name.
    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.register(name, function);
        self
    }

    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ScoreFunction> {
        self.functions.get(name)
    }

    /// Calls `name` directly, returning `None` if it is not registered.
    pub fn call(&self, name: &str, args: &[f64]) -> Option<f64> {
        self.functions.get(name).map(|f| f(args))
    }

    /// Iterates over registered functions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScoreFunction)> {
        self.functions.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.functions.keys()).finish()
    }
}
