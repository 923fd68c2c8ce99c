//! Error types.
//!
//! Construction and comparability problems are reported as [`SgxError`]
//! values as soon as they are detected. Domain checks (`is_valid`) never
//! produce errors; they return `bool`.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SgxError>;

/// Errors raised by alleles, genomes, fitness values, species and the archive.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SgxError {
    /// A floating-point allele was given an empty or inverted interval.
    #[error("illegal interval [{a}, {b}]")]
    InvalidInterval { a: f64, b: f64 },

    /// A floating-point allele was given zero mixture components.
    #[error("mixture size must be positive (found {0})")]
    InvalidMixtureSize(usize),

    #[error("learning rate must be in ]0, 1[ (found {0})")]
    InvalidLearningRate(f64),

    #[error("component scale must be positive and finite (found {0})")]
    InvalidScale(f64),

    #[error("mutation rate must be in [0, 1] (found {0})")]
    InvalidMutationRate(f64),

    #[error("a genome needs at least one allele")]
    EmptyGenome,

    /// Two fitness values of different variant or arity were compared.
    #[error("can't compare fitness values {left} and {right}")]
    Incomparable { left: String, right: String },

    #[error("expected {expected} loci, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// A gene value is outside the domain of the allele at `locus`.
    #[error("invalid gene {value} at locus {locus}")]
    InvalidGene { locus: usize, value: String },

    /// A vector fitness function returned the wrong number of objectives.
    #[error("fitness function returned {found} objectives, expected {expected}")]
    ArityMismatch { expected: usize, found: usize },

    /// A fitness value contains NaN or an infinity.
    #[error("fitness {0} is not finite")]
    NonFiniteFitness(String),

    /// An internal consistency check failed after a mutation.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SgxError {
    /// Re-labels an [`SgxError::InvalidGene`] with the locus it came from.
    ///
    /// Alleles don't know their position in the genome, so they report
    /// locus 0 and the genome fixes it up.
    pub(crate) fn at_locus(self, locus: usize) -> Self {
        match self {
            SgxError::InvalidGene { value, .. } => SgxError::InvalidGene { locus, value },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = SgxError::InvalidInterval { a: 3.0, b: 1.0 };
        assert_eq!(e.to_string(), "illegal interval [3, 1]");

        let e = SgxError::InvalidLearningRate(1.5);
        assert_eq!(e.to_string(), "learning rate must be in ]0, 1[ (found 1.5)");

        let e = SgxError::LengthMismatch {
            expected: 3,
            found: 2,
        };
        assert_eq!(e.to_string(), "expected 3 loci, found 2");

        let e = SgxError::NonFiniteFitness("NaN".into());
        assert_eq!(e.to_string(), "fitness NaN is not finite");
    }

    #[test]
    fn test_at_locus_relabels_invalid_gene() {
        let e = SgxError::InvalidGene {
            locus: 0,
            value: "11".into(),
        };
        assert_eq!(
            e.at_locus(4),
            SgxError::InvalidGene {
                locus: 4,
                value: "11".into()
            }
        );
    }

    #[test]
    fn test_at_locus_keeps_other_errors() {
        let e = SgxError::EmptyGenome;
        assert_eq!(e.at_locus(2), SgxError::EmptyGenome);
    }
}
