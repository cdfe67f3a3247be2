//! Configuration for the filter engine.

use serde::{Deserialize, Serialize};

/// Configuration for the filter engine.
///
/// Controls parallelism and criteria validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Enable parallel filtering (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum table size to trigger parallel filtering.
    /// Below this threshold, sequential is faster due to thread overhead.
    pub parallel_threshold: usize,

    /// Reject criteria naming product types or default reasons that are not
    /// in the loaded catalog.
    pub validate_catalog_values: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 10_000,
            validate_catalog_values: true,
        }
    }
}

impl EngineConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always filters sequentially.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets whether to use parallel filtering.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel filtering.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets whether unknown catalog values are rejected.
    #[must_use]
    pub fn with_catalog_validation(mut self, enabled: bool) -> Self {
        self.validate_catalog_values = enabled;
        self
    }

    /// Returns true if parallel filtering should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }
}
