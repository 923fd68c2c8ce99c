//! Alleles: one learned sampling distribution per locus.
//!
//! An [`Allele`] can be sampled and then nudged by a pairwise competition
//! outcome: [`update`](Allele::update) makes the winner's value more likely
//! and the loser's value less likely the next time the allele is sampled.
//!
//! # Variants
//!
//! - [`Boolean`]: a single bias squashed through a logistic function
//! - [`FloatingPoint`]: a mixture of truncated normal components over `[a, b]`
//!
//! Other variants plug in by implementing [`Allele`].

mod boolean;
mod floating;

pub use boolean::{Boolean, BIAS_LIMIT};
pub use floating::{
    FloatingPoint, FloatingPointBuilder, UnitDistribution, DEFAULT_MIXTURE_SIZE, DEFAULT_SCALE,
};

use crate::error::{Result, SgxError};
use rand::RngCore;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Learning rate used when none is given explicitly.
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

/// How an allele should produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleMode {
    /// Draw from the current learned distribution.
    #[default]
    Sample,
    /// Draw uniformly over the allele's domain, ignoring what was learned.
    Uniform,
    /// Return the most likely value, deterministically.
    Mode,
}

/// A concrete gene value.
///
/// Equality and hashing on [`Gene::Float`] are bitwise, so `0.0` and `-0.0`
/// are different genes and a `NaN` equals itself. This keeps [`Gene`] usable
/// as (part of) a hash key.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gene {
    Bool(bool),
    Float(f64),
}

impl Gene {
    /// Returns the boolean value, if this is a boolean gene.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Gene::Bool(b) => Some(b),
            Gene::Float(_) => None,
        }
    }

    /// Returns the floating-point value, if this is a floating-point gene.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Gene::Float(x) => Some(x),
            Gene::Bool(_) => None,
        }
    }

    /// Numeric view of the gene: `false`/`true` map to `0.0`/`1.0`.
    pub fn to_f64(&self) -> f64 {
        match *self {
            Gene::Bool(b) => f64::from(u8::from(b)),
            Gene::Float(x) => x,
        }
    }
}

impl PartialEq for Gene {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Gene::Bool(a), Gene::Bool(b)) => a == b,
            (Gene::Float(a), Gene::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Gene {}

impl Hash for Gene {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match *self {
            Gene::Bool(b) => {
                0u8.hash(state);
                b.hash(state);
            }
            Gene::Float(x) => {
                1u8.hash(state);
                x.to_bits().hash(state);
            }
        }
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gene::Bool(b) => write!(f, "{b}"),
            Gene::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<bool> for Gene {
    fn from(b: bool) -> Self {
        Gene::Bool(b)
    }
}

impl From<f64> for Gene {
    fn from(x: f64) -> Self {
        Gene::Float(x)
    }
}

/// A single gene's sampling distribution plus its online update rule.
///
/// # Implementing
///
/// `sample` and `is_valid` must agree: every value returned by `sample`, in
/// any [`SampleMode`], must satisfy `is_valid`. `update` must leave the
/// allele in a state that passes
/// [`run_paranoia_checks`](Allele::run_paranoia_checks).
///
/// The random source is passed in explicitly so that runs are reproducible
/// from a single seed.
pub trait Allele: fmt::Debug + Send + Sync {
    /// Produces a gene value according to `mode`.
    fn sample(&self, mode: SampleMode, rng: &mut dyn RngCore) -> Gene;

    /// Reshapes the distribution toward `winner` and away from `loser`.
    ///
    /// Fails with [`SgxError::InvalidGene`] if either value is not a legal
    /// value for this allele, and with [`SgxError::InvariantViolation`] if
    /// the update broke the allele's internal consistency.
    fn update(&mut self, winner: &Gene, loser: &Gene) -> Result<()>;

    /// Whether `value` lies in this allele's domain.
    fn is_valid(&self, value: &Gene) -> bool;

    /// Human-readable summary of the current distribution.
    fn describe(&self) -> String;

    /// Whether genes of this allele can be rendered as a single character.
    fn is_squeezable(&self) -> bool {
        false
    }

    /// Checks internal consistency, returning the first violation found.
    fn run_paranoia_checks(&self) -> Result<()> {
        Ok(())
    }
}

/// Validates a learning rate against the open interval `]0, 1[`.
pub(crate) fn check_learning_rate(learning_rate: f64) -> Result<f64> {
    if learning_rate > 0.0 && learning_rate < 1.0 {
        Ok(learning_rate)
    } else {
        Err(SgxError::InvalidLearningRate(learning_rate))
    }
}

/// Error for a gene the allele can't accept. The genome fills in the locus.
pub(crate) fn invalid_gene(value: &Gene) -> SgxError {
    SgxError::InvalidGene {
        locus: 0,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    // ---- Gene ----

    #[test]
    fn test_gene_accessors() {
        assert_eq!(Gene::Bool(true).as_bool(), Some(true));
        assert_eq!(Gene::Bool(true).as_f64(), None);
        assert_eq!(Gene::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Gene::Float(2.5).as_bool(), None);
        assert_eq!(Gene::Bool(true).to_f64(), 1.0);
        assert_eq!(Gene::Bool(false).to_f64(), 0.0);
    }

    #[test]
    fn test_gene_equality_is_bitwise() {
        assert_eq!(Gene::Float(1.5), Gene::Float(1.5));
        assert_ne!(Gene::Float(0.0), Gene::Float(-0.0));
        assert_eq!(Gene::Float(f64::NAN), Gene::Float(f64::NAN));
        assert_ne!(Gene::Bool(true), Gene::Float(1.0));
    }

    #[test]
    fn test_gene_hash_consistent_with_eq() {
        let set: HashSet<Gene> = [
            Gene::Bool(true),
            Gene::Bool(true),
            Gene::Float(3.0),
            Gene::Float(3.0),
            Gene::Bool(false),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_gene_display() {
        assert_eq!(Gene::Bool(false).to_string(), "false");
        assert_eq!(Gene::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_default_sample_mode() {
        assert_eq!(SampleMode::default(), SampleMode::Sample);
    }

    #[test]
    fn test_check_learning_rate_bounds() {
        assert!(check_learning_rate(0.5).is_ok());
        assert!(check_learning_rate(0.0).is_err());
        assert!(check_learning_rate(1.0).is_err());
        assert!(check_learning_rate(f64::NAN).is_err());
    }

    // ---- Domain closure across variants ----

    const MODES: [SampleMode; 3] = [SampleMode::Sample, SampleMode::Uniform, SampleMode::Mode];

    proptest! {
        #[test]
        fn prop_floating_samples_are_valid(
            a in -100.0f64..100.0,
            width in 0.001f64..50.0,
            mixture in 1usize..12,
            scale in 0.01f64..10.0,
            seed in any::<u64>(),
        ) {
            let allele = FloatingPoint::builder(a, a + width)
                .mixture_size(mixture)
                .scale(scale)
                .build()
                .unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            for mode in MODES {
                for _ in 0..20 {
                    let g = allele.sample(mode, &mut rng);
                    prop_assert!(allele.is_valid(&g), "{:?} produced {}", mode, g);
                }
            }
        }

        #[test]
        fn prop_boolean_samples_are_valid(
            wins in 0usize..200,
            seed in any::<u64>(),
        ) {
            let mut allele = Boolean::with_learning_rate(0.3).unwrap();
            for _ in 0..wins {
                allele.update(&Gene::Bool(true), &Gene::Bool(false)).unwrap();
            }
            let mut rng = StdRng::seed_from_u64(seed);
            for mode in MODES {
                let g = allele.sample(mode, &mut rng);
                prop_assert!(allele.is_valid(&g));
            }
        }

        #[test]
        fn prop_floating_stays_valid_after_updates(
            updates in proptest::collection::vec((0.0f64..=10.0, 0.0f64..=10.0), 0..50),
            seed in any::<u64>(),
        ) {
            let mut allele = FloatingPoint::builder(0.0, 10.0).mixture_size(3).build().unwrap();
            for (w, l) in updates {
                allele.update(&Gene::Float(w), &Gene::Float(l)).unwrap();
            }
            prop_assert!(allele.run_paranoia_checks().is_ok());
            let mut rng = StdRng::seed_from_u64(seed);
            for mode in MODES {
                let g = allele.sample(mode, &mut rng);
                prop_assert!(allele.is_valid(&g));
            }
        }
    }
}
