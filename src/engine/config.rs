//! Evaluator configuration.

/// Configuration for [`Evaluator`](super::Evaluator).
///
/// # Examples
///
/// ```
/// use u_scorecard::EvaluatorConfig;
///
/// let config = EvaluatorConfig::default().with_parallel(false);
/// assert!(!config.parallel);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Whether batches are scored in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature. Results are returned
    /// in item order either way.
    pub parallel: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl EvaluatorConfig {
    /// Enables or disables parallel batch evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
