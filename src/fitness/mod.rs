//! Fitness values and the fitness-function boundary.
//!
//! A [`Fitness`] wraps one objective ([`Scalar`]) or several ([`Vector`]).
//! Three relations are kept distinct:
//!
//! - **distinguishable**: the values differ by more than the tolerance
//! - **fitter** (`a > b`): a total order within a variant; lexicographic for
//!   vectors
//! - **dominant** (`a >> b`): Pareto dominance; for scalars it coincides
//!   with fitter
//!
//! Comparing values of different variant, arity or optimization sense is a
//! caller bug and fails with [`SgxError::Incomparable`].

mod function;
mod scalar;
mod vector;

pub use function::FitnessFunction;
pub use scalar::{Scalar, Sense, Tolerance};
pub use vector::Vector;

use crate::error::{Result, SgxError};
use std::cmp::Ordering;
use std::fmt;

/// The comparison capabilities shared by every fitness variant.
pub trait Comparable: fmt::Display {
    /// Fails unless `self` and `other` can be compared.
    fn check_comparable(&self, other: &Self) -> Result<()>;

    /// Whether the two values differ by more than the tolerance.
    fn is_distinguishable(&self, other: &Self) -> Result<bool>;

    /// Strict total order: `self > other`.
    fn is_fitter(&self, other: &Self) -> Result<bool>;

    /// Pareto dominance: `self >> other`.
    fn is_dominant(&self, other: &Self) -> Result<bool> {
        self.is_fitter(other)
    }

    /// `Greater` if `self` is fitter, `Less` if `other` is, `Equal` otherwise.
    fn compare(&self, other: &Self) -> Result<Ordering> {
        if self.is_fitter(other)? {
            Ok(Ordering::Greater)
        } else if other.is_fitter(self)? {
            Ok(Ordering::Less)
        } else {
            Ok(Ordering::Equal)
        }
    }
}

pub(crate) fn incomparable(left: &impl fmt::Display, right: &impl fmt::Display) -> SgxError {
    SgxError::Incomparable {
        left: left.to_string(),
        right: right.to_string(),
    }
}

/// Variant and arity of a fitness value; equal kinds are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitnessKind {
    Scalar,
    Vector(usize),
}

impl fmt::Display for FitnessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitnessKind::Scalar => write!(f, "scalar"),
            FitnessKind::Vector(n) => write!(f, "vector[{n}]"),
        }
    }
}

/// A fitness value of any supported variant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fitness {
    Scalar(Scalar),
    Vector(Vector),
}

impl Fitness {
    pub fn kind(&self) -> FitnessKind {
        match self {
            Fitness::Scalar(_) => FitnessKind::Scalar,
            Fitness::Vector(v) => FitnessKind::Vector(v.arity()),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Fitness::Scalar(s) => Some(s),
            Fitness::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Vector> {
        match self {
            Fitness::Vector(v) => Some(v),
            Fitness::Scalar(_) => None,
        }
    }

    /// Raw objective values, in order.
    pub fn values(&self) -> Vec<f64> {
        match self {
            Fitness::Scalar(s) => vec![s.value()],
            Fitness::Vector(v) => v.iter().map(Scalar::value).collect(),
        }
    }
}

impl Comparable for Fitness {
    fn check_comparable(&self, other: &Self) -> Result<()> {
        match (self, other) {
            (Fitness::Scalar(a), Fitness::Scalar(b)) => a.check_comparable(b),
            (Fitness::Vector(a), Fitness::Vector(b)) => a.check_comparable(b),
            _ => Err(incomparable(self, other)),
        }
    }

    fn is_distinguishable(&self, other: &Self) -> Result<bool> {
        match (self, other) {
            (Fitness::Scalar(a), Fitness::Scalar(b)) => a.is_distinguishable(b),
            (Fitness::Vector(a), Fitness::Vector(b)) => a.is_distinguishable(b),
            _ => Err(incomparable(self, other)),
        }
    }

    fn is_fitter(&self, other: &Self) -> Result<bool> {
        match (self, other) {
            (Fitness::Scalar(a), Fitness::Scalar(b)) => a.is_fitter(b),
            (Fitness::Vector(a), Fitness::Vector(b)) => a.is_fitter(b),
            _ => Err(incomparable(self, other)),
        }
    }

    fn is_dominant(&self, other: &Self) -> Result<bool> {
        match (self, other) {
            (Fitness::Scalar(a), Fitness::Scalar(b)) => a.is_dominant(b),
            (Fitness::Vector(a), Fitness::Vector(b)) => a.is_dominant(b),
            _ => Err(incomparable(self, other)),
        }
    }
}

impl From<Scalar> for Fitness {
    fn from(s: Scalar) -> Self {
        Fitness::Scalar(s)
    }
}

impl From<Vector> for Fitness {
    fn from(v: Vector) -> Self {
        Fitness::Vector(v)
    }
}

impl fmt::Display for Fitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fitness::Scalar(s) => fmt::Display::fmt(s, f),
            Fitness::Vector(v) => fmt::Display::fmt(v, f),
        }
    }
}
