//! Single-objective fitness.

use super::{incomparable, Comparable};
use crate::error::Result;
use std::fmt;

/// Optimization direction of an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sense {
    /// Higher values are fitter.
    #[default]
    Maximize,
    /// Lower values are fitter.
    Minimize,
}

/// Approximate-equality policy.
///
/// Two values `a`, `b` are indistinguishable when
/// `|a - b| <= max(rel * max(|a|, |b|), abs)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerance {
    pub rel: f64,
    pub abs: f64,
}

impl Tolerance {
    /// Only bit-identical values are indistinguishable.
    pub const EXACT: Tolerance = Tolerance { rel: 0.0, abs: 0.0 };

    pub fn absolute(abs: f64) -> Self {
        Self { rel: 0.0, abs }
    }

    pub fn relative(rel: f64) -> Self {
        Self { rel, abs: 0.0 }
    }

    fn is_close(&self, a: f64, b: f64) -> bool {
        a == b || (a - b).abs() <= (self.rel * a.abs().max(b.abs())).max(self.abs)
    }

    /// The looser of two tolerances, component-wise.
    fn loosest(&self, other: &Tolerance) -> Tolerance {
        Tolerance {
            rel: self.rel.max(other.rel),
            abs: self.abs.max(other.abs),
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self { rel: 1e-9, abs: 0.0 }
    }
}

/// A single objective value.
///
/// # Examples
///
/// ```
/// use u_sgx::fitness::{Comparable, Scalar, Tolerance};
///
/// let a = Scalar::new(5.0);
/// let b = Scalar::new(3.0);
/// assert!(a.is_fitter(&b).unwrap());
///
/// let near = Scalar::new(5.05).with_tolerance(Tolerance::absolute(0.1));
/// assert!(!near.is_fitter(&a).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scalar {
    value: f64,
    sense: Sense,
    tolerance: Tolerance,
}

impl Scalar {
    /// A maximized value with the default tolerance.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            sense: Sense::Maximize,
            tolerance: Tolerance::default(),
        }
    }

    /// A minimized value with the default tolerance.
    pub fn minimizing(value: f64) -> Self {
        Self::new(value).with_sense(Sense::Minimize)
    }

    pub fn with_sense(mut self, sense: Sense) -> Self {
        self.sense = sense;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Whether `self` is better than `other` ignoring tolerance.
    fn is_better(&self, other: &Scalar) -> bool {
        match self.sense {
            Sense::Maximize => self.value > other.value,
            Sense::Minimize => self.value < other.value,
        }
    }
}

impl Comparable for Scalar {
    fn check_comparable(&self, other: &Self) -> Result<()> {
        if self.sense == other.sense {
            Ok(())
        } else {
            Err(incomparable(self, other))
        }
    }

    fn is_distinguishable(&self, other: &Self) -> Result<bool> {
        self.check_comparable(other)?;
        let tolerance = self.tolerance.loosest(&other.tolerance);
        Ok(!tolerance.is_close(self.value, other.value))
    }

    fn is_fitter(&self, other: &Self) -> Result<bool> {
        Ok(self.is_distinguishable(other)? && self.is_better(other))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SgxError;

    #[test]
    fn test_maximize_is_default() {
        let a = Scalar::new(3.0);
        assert_eq!(a.sense(), Sense::Maximize);
        assert!(Scalar::new(5.0).is_fitter(&a).unwrap());
        assert!(!a.is_fitter(&Scalar::new(5.0)).unwrap());
    }

    #[test]
    fn test_minimize() {
        let a = Scalar::minimizing(3.0);
        let b = Scalar::minimizing(5.0);
        assert!(a.is_fitter(&b).unwrap());
        assert!(a.is_dominant(&b).unwrap());
        assert!(!b.is_fitter(&a).unwrap());
    }

    #[test]
    fn test_mixed_sense_incomparable() {
        let a = Scalar::new(3.0);
        let b = Scalar::minimizing(3.0);
        assert!(matches!(a.is_fitter(&b), Err(SgxError::Incomparable { .. })));
    }

    #[test]
    fn test_equal_values_not_fitter() {
        let a = Scalar::new(2.0);
        assert!(!a.is_fitter(&a).unwrap());
        assert!(!a.is_distinguishable(&a).unwrap());
    }

    #[test]
    fn test_absolute_tolerance() {
        let tol = Tolerance::absolute(0.1);
        let a = Scalar::new(23.0).with_tolerance(tol);
        let b = Scalar::new(23.05).with_tolerance(tol);
        assert!(!b.is_fitter(&a).unwrap());
        assert!(!a.is_fitter(&b).unwrap());

        let c = Scalar::new(23.2).with_tolerance(tol);
        assert!(c.is_fitter(&a).unwrap());
    }

    #[test]
    fn test_default_relative_tolerance() {
        let a = Scalar::new(1.0);
        let b = Scalar::new(1.0 + 1e-12);
        assert!(!a.is_distinguishable(&b).unwrap());
        let c = Scalar::new(1.0 + 1e-6);
        assert!(c.is_fitter(&a).unwrap());
    }

    #[test]
    fn test_loosest_tolerance_wins() {
        let a = Scalar::new(1.0).with_tolerance(Tolerance::EXACT);
        let b = Scalar::new(1.05).with_tolerance(Tolerance::absolute(0.1));
        assert!(!a.is_distinguishable(&b).unwrap());
        assert!(!b.is_distinguishable(&a).unwrap());
    }

    #[test]
    fn test_exact_tolerance() {
        let a = Scalar::new(1.0).with_tolerance(Tolerance::EXACT);
        let b = Scalar::new(1.0 + f64::EPSILON).with_tolerance(Tolerance::EXACT);
        assert!(b.is_fitter(&a).unwrap());
    }

    #[test]
    fn test_relative_constructor() {
        let t = Tolerance::relative(0.01);
        assert_eq!(t.abs, 0.0);
        assert!(t.is_close(100.0, 100.5));
        assert!(!t.is_close(100.0, 102.0));
    }
}
