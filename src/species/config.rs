//! Species configuration.
//!
//! [`SpeciesConfig`] holds the exploration rate and the comparison policy.

/// How two genotypes are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    /// Evaluate each genotype once and compare the fitness values.
    #[default]
    Simple,

    /// For noisy fitness functions: evaluate each genotype `evaluations`
    /// times, let every paired evaluation cast a vote, return the majority.
    ///
    /// Indistinguishable pairs cast no vote; a tied vote ranks the two
    /// genotypes as equal.
    Stochastic {
        /// Number of paired evaluations (at least 1).
        evaluations: usize,
    },
}

/// Configuration for a [`Species`](super::Species).
///
/// # Defaults
///
/// ```
/// use u_sgx::species::{Comparison, SpeciesConfig};
///
/// let config = SpeciesConfig::default();
/// assert_eq!(config.mutation_rate, None);
/// assert_eq!(config.comparison, Comparison::Simple);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_sgx::species::{Comparison, SpeciesConfig};
///
/// let config = SpeciesConfig::default()
///     .with_mutation_rate(0.05)
///     .with_comparison(Comparison::Stochastic { evaluations: 5 });
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpeciesConfig {
    /// Per-locus probability of sampling uniformly instead of from the
    /// learned distribution (0.0–1.0).
    ///
    /// `None` means `1 / genome length`.
    pub mutation_rate: Option<f64>,

    /// Comparison policy.
    pub comparison: Comparison,
}

impl SpeciesConfig {
    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = Some(rate.clamp(0.0, 1.0));
        self
    }

    /// Sets the comparison policy.
    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(rate) = self.mutation_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!("mutation_rate must be in [0, 1] (found {rate})"));
            }
        }
        if let Comparison::Stochastic { evaluations: 0 } = self.comparison {
            return Err("stochastic comparison needs at least 1 evaluation".into());
        }
        Ok(())
    }
}
