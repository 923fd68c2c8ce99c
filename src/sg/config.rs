//! Selfish-gene run configuration.
//!
//! [`SgConfig`] holds the termination conditions and run-level options of
//! the competition loop.

/// Configuration for the selfish-gene loop.
///
/// # Defaults
///
/// ```
/// use u_sgx::sg::SgConfig;
///
/// let config = SgConfig::default();
/// assert_eq!(config.max_generations, 1_000);
/// assert_eq!(config.stagnation_limit, 0);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_sgx::sg::SgConfig;
///
/// let config = SgConfig::default()
///     .with_max_generations(5_000)
///     .with_stagnation_limit(200)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SgConfig {
    /// Maximum number of generations (one pairwise competition each).
    pub max_generations: usize,

    /// Number of consecutive generations without any archive change before
    /// stopping.
    ///
    /// Set to 0 to disable stagnation-based termination (the default).
    pub stagnation_limit: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Whether to evaluate the two competitors concurrently.
    ///
    /// Only honored with the `parallel` feature; worth it when the fitness
    /// function is expensive.
    pub parallel: bool,
}

impl Default for SgConfig {
    fn default() -> Self {
        Self {
            max_generations: 1_000,
            stagnation_limit: 0,
            seed: None,
            parallel: false,
        }
    }
}

impl SgConfig {
    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables concurrent evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Preset for quick exploratory runs.
    ///
    /// - Generations: 200, Stagnation limit: 50
    pub fn fast() -> Self {
        Self {
            max_generations: 200,
            stagnation_limit: 50,
            ..Self::default()
        }
    }

    /// Preset for long runs on hard landscapes.
    ///
    /// - Generations: 100 000, Stagnation limit: 10 000
    pub fn thorough() -> Self {
        Self {
            max_generations: 100_000,
            stagnation_limit: 10_000,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        Ok(())
    }
}
