//! Configuration for expression DAGs.

use symdag_rational::ApproxConfig;

/// Limits and tolerances used by an [`ExprDag`](crate::ExprDag).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DagConfig {
    /// Maximum node height. Every recursive walk is bounded by this.
    pub max_depth: usize,
    /// Tolerances for turning floating results into rationals.
    pub approx: ApproxConfig,
}

impl Default for DagConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            approx: ApproxConfig::default(),
        }
    }
}

impl DagConfig {
    /// Sets the maximum node height.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the rational approximation tolerances.
    #[must_use]
    pub fn with_approx(mut self, approx: ApproxConfig) -> Self {
        self.approx = approx;
        self
    }
}
