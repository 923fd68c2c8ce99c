//! Multi-objective fitness.

use super::{incomparable, Comparable, Scalar, Sense, Tolerance};
use crate::error::Result;
use std::fmt;

/// Dominance comparison result.
#[derive(Debug, PartialEq)]
enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// A vector of objectives, each a [`Scalar`] with its own sense.
///
/// - [`is_fitter`](Comparable::is_fitter) is lexicographic: the first
///   distinguishable component decides.
/// - [`is_dominant`](Comparable::is_dominant) is Pareto dominance: no worse
///   in any component and fitter in at least one.
///
/// # Examples
///
/// ```
/// use u_sgx::fitness::{Comparable, Vector};
///
/// let a = Vector::new([3.0, 3.0]);
/// let b = Vector::new([2.0, 3.0]);
/// let c = Vector::new([1.0, 5.0]);
///
/// assert!(a.is_dominant(&b).unwrap());
/// assert!(a.is_fitter(&c).unwrap());
/// assert!(!a.is_dominant(&c).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    values: Vec<Scalar>,
}

impl Vector {
    /// Maximized objectives with the default tolerance.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().map(Scalar::new).collect(),
        }
    }

    /// Builds a vector from already-configured components.
    pub fn from_scalars(values: Vec<Scalar>) -> Self {
        Self { values }
    }

    /// Sets the same sense on every component.
    pub fn with_sense(mut self, sense: Sense) -> Self {
        for v in &mut self.values {
            *v = v.with_sense(sense);
        }
        self
    }

    /// Sets the same tolerance on every component.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        for v in &mut self.values {
            *v = v.with_tolerance(tolerance);
        }
        self
    }

    /// Number of objectives.
    pub fn arity(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scalar> {
        self.values.iter()
    }

    /// Pareto comparison of two comparable vectors.
    fn dominance_cmp(&self, other: &Self) -> Result<Dominance> {
        let mut a_better_in_some = false;
        let mut b_better_in_some = false;

        for (va, vb) in self.values.iter().zip(other.values.iter()) {
            if va.is_fitter(vb)? {
                a_better_in_some = true;
            } else if vb.is_fitter(va)? {
                b_better_in_some = true;
            }
        }

        Ok(match (a_better_in_some, b_better_in_some) {
            (true, false) => Dominance::Left,
            (false, true) => Dominance::Right,
            _ => Dominance::Neither,
        })
    }
}

impl Comparable for Vector {
    fn check_comparable(&self, other: &Self) -> Result<()> {
        if self.values.len() != other.values.len() {
            return Err(incomparable(self, other));
        }
        for (a, b) in self.values.iter().zip(other.values.iter()) {
            a.check_comparable(b)?;
        }
        Ok(())
    }

    fn is_distinguishable(&self, other: &Self) -> Result<bool> {
        self.check_comparable(other)?;
        for (a, b) in self.values.iter().zip(other.values.iter()) {
            if a.is_distinguishable(b)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn is_fitter(&self, other: &Self) -> Result<bool> {
        self.check_comparable(other)?;
        for (a, b) in self.values.iter().zip(other.values.iter()) {
            if a.is_fitter(b)? {
                return Ok(true);
            }
            if b.is_fitter(a)? {
                return Ok(false);
            }
        }
        Ok(false)
    }

    fn is_dominant(&self, other: &Self) -> Result<bool> {
        self.check_comparable(other)?;
        Ok(self.dominance_cmp(other)? == Dominance::Left)
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a Scalar;
    type IntoIter = std::slice::Iter<'a, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}
