//! Boolean allele: a Bernoulli gene driven by a logistic bias.

use super::{check_learning_rate, invalid_gene, Allele, Gene, SampleMode, DEFAULT_LEARNING_RATE};
use crate::error::{Result, SgxError};
use crate::PARANOIA;
use rand::{Rng, RngCore};

/// Largest absolute bias. Beyond this, `sigmoid(x)` rounds to exactly 0 or
/// 1 in `f64`, so the bias saturates here instead.
pub const BIAS_LIMIT: f64 = 30.0;

/// A boolean gene.
///
/// The probability of sampling `true` is `sigmoid(x)` with a fixed
/// steepness `k`. Each competition where the winner had `true` and the loser
/// `false` moves `x` up by the learning rate; the opposite outcome moves it
/// down; agreement leaves it alone.
///
/// # Examples
///
/// ```
/// use u_sgx::allele::{Allele, Boolean};
/// use u_sgx::Gene;
///
/// let mut allele = Boolean::with_learning_rate(0.5).unwrap();
/// assert_eq!(allele.probability(), 0.5);
///
/// allele.update(&Gene::Bool(true), &Gene::Bool(false)).unwrap();
/// assert!(allele.probability() > 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Boolean {
    x: f64,
    k: f64,
    learning_rate: f64,
}

impl Boolean {
    /// Creates an unbiased allele with the default learning rate.
    pub fn new() -> Self {
        Self {
            x: 0.0,
            k: 1.0,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }

    /// Creates an unbiased allele with the given learning rate in `]0, 1[`.
    pub fn with_learning_rate(learning_rate: f64) -> Result<Self> {
        Ok(Self {
            learning_rate: check_learning_rate(learning_rate)?,
            ..Self::new()
        })
    }

    /// Logistic function with growth `k`.
    pub fn sigmoid(x: f64, k: f64) -> f64 {
        1.0 / (1.0 + (-k * x).exp())
    }

    /// Current bias `x`.
    pub fn bias(&self) -> f64 {
        self.x
    }

    /// Probability of sampling `true`.
    pub fn probability(&self) -> f64 {
        Self::sigmoid(self.x, self.k)
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl Default for Boolean {
    fn default() -> Self {
        Self::new()
    }
}

impl Allele for Boolean {
    fn sample(&self, mode: SampleMode, rng: &mut dyn RngCore) -> Gene {
        let value = match mode {
            SampleMode::Sample => rng.random_bool(self.probability()),
            SampleMode::Uniform => rng.random_bool(0.5),
            SampleMode::Mode => self.x > 0.0,
        };
        Gene::Bool(value)
    }

    fn update(&mut self, winner: &Gene, loser: &Gene) -> Result<()> {
        let (w, l) = match (winner, loser) {
            (Gene::Bool(w), Gene::Bool(l)) => (*w, *l),
            (Gene::Bool(_), other) | (other, _) => return Err(invalid_gene(other)),
        };

        match (w, l) {
            (true, false) => self.x += self.learning_rate,
            (false, true) => self.x -= self.learning_rate,
            _ => return Ok(()),
        }
        self.x = self.x.clamp(-BIAS_LIMIT, BIAS_LIMIT);
        log::trace!("boolean allele moved to {}", self.describe());

        if PARANOIA {
            self.run_paranoia_checks()?;
        }
        Ok(())
    }

    fn is_valid(&self, value: &Gene) -> bool {
        matches!(value, Gene::Bool(_))
    }

    fn describe(&self) -> String {
        format!("{:e}>{:.2}", self.x, self.probability())
    }

    fn is_squeezable(&self) -> bool {
        true
    }

    fn run_paranoia_checks(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate < 1.0) {
            return Err(SgxError::InvariantViolation(format!(
                "boolean learning rate {} outside ]0, 1[",
                self.learning_rate
            )));
        }
        if !self.x.is_finite() || self.x.abs() > BIAS_LIMIT {
            return Err(SgxError::InvariantViolation(format!(
                "boolean bias {} outside [-{BIAS_LIMIT}, {BIAS_LIMIT}]",
                self.x
            )));
        }
        let p = self.probability();
        if !(p > 0.0 && p < 1.0) {
            return Err(SgxError::InvariantViolation(format!(
                "boolean probability {p} saturated"
            )));
        }
        Ok(())
    }
}
