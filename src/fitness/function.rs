//! The fitness-function boundary.

use super::{Fitness, FitnessKind, Scalar, Sense, Tolerance, Vector};
use crate::error::{Result, SgxError};
use crate::genotype::Genotype;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

type ScalarFn = dyn Fn(&Genotype) -> f64 + Send + Sync;
type VectorFn = dyn Fn(&Genotype) -> Vec<f64> + Send + Sync;
type MapFn = dyn Fn(&Genotype) -> Genotype + Send + Sync;

enum Objective {
    Scalar(Box<ScalarFn>),
    Vector { arity: usize, f: Box<VectorFn> },
}

/// A user-supplied objective plus the fitness variant its results are
/// wrapped in.
///
/// The wrapped function is treated as opaque: only the shape of its return
/// value is checked, and NaN or infinite results are rejected. Every call is counted, which makes duplicate
/// evaluations visible (see [`evaluations`](Self::evaluations)).
///
/// # Examples
///
/// ```
/// use u_sgx::fitness::{Comparable, FitnessFunction};
/// use u_sgx::{Gene, Genotype};
///
/// // OneMax: count the true bits
/// let onemax = FitnessFunction::scalar(|g: &Genotype| g.to_f64_vec().iter().sum());
///
/// let g = Genotype::new(vec![Gene::Bool(true), Gene::Bool(true)]);
/// let h = Genotype::new(vec![Gene::Bool(true), Gene::Bool(false)]);
/// let (fg, fh) = (onemax.evaluate(&g).unwrap(), onemax.evaluate(&h).unwrap());
/// assert!(fg.is_fitter(&fh).unwrap());
/// assert_eq!(onemax.evaluations(), 2);
/// ```
pub struct FitnessFunction {
    objective: Objective,
    preprocess: Option<Box<MapFn>>,
    sense: Sense,
    tolerance: Tolerance,
    best_fitness: Option<Fitness>,
    evaluations: AtomicUsize,
}

impl FitnessFunction {
    /// Single-objective function; results become [`Fitness::Scalar`].
    pub fn scalar<F>(f: F) -> Self
    where
        F: Fn(&Genotype) -> f64 + Send + Sync + 'static,
    {
        Self::with_objective(Objective::Scalar(Box::new(f)))
    }

    /// Multi-objective function returning exactly `arity` values; results
    /// become [`Fitness::Vector`].
    pub fn vector<F>(arity: usize, f: F) -> Result<Self>
    where
        F: Fn(&Genotype) -> Vec<f64> + Send + Sync + 'static,
    {
        if arity == 0 {
            return Err(SgxError::InvalidConfig(
                "vector fitness needs at least one objective".into(),
            ));
        }
        Ok(Self::with_objective(Objective::Vector {
            arity,
            f: Box::new(f),
        }))
    }

    fn with_objective(objective: Objective) -> Self {
        Self {
            objective,
            preprocess: None,
            sense: Sense::default(),
            tolerance: Tolerance::default(),
            best_fitness: None,
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Transforms every genotype before the objective sees it, e.g. to
    /// decode raw genes into a problem-specific layout.
    ///
    /// Calling it again chains the transforms in call order.
    pub fn map_genotype<F>(mut self, f: F) -> Self
    where
        F: Fn(&Genotype) -> Genotype + Send + Sync + 'static,
    {
        let map: Box<MapFn> = match self.preprocess.take() {
            Some(prev) => Box::new(move |g: &Genotype| f(&prev(g))),
            None => Box::new(f),
        };
        self.preprocess = Some(map);
        self
    }

    /// Sense applied to every objective (default: maximize).
    pub fn with_sense(mut self, sense: Sense) -> Self {
        self.sense = sense;
        self
    }

    /// Tolerance applied to every objective.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Declares the best achievable raw value; a run can stop once the
    /// archive reaches it.
    ///
    /// Must be called after [`with_sense`](Self::with_sense) and
    /// [`with_tolerance`](Self::with_tolerance) so the target is wrapped
    /// the same way evaluations are.
    pub fn with_best_fitness(mut self, raw: &[f64]) -> Result<Self> {
        self.best_fitness = Some(self.wrap(raw)?);
        Ok(self)
    }

    pub fn kind(&self) -> FitnessKind {
        match &self.objective {
            Objective::Scalar(_) => FitnessKind::Scalar,
            Objective::Vector { arity, .. } => FitnessKind::Vector(*arity),
        }
    }

    pub fn best_fitness(&self) -> Option<&Fitness> {
        self.best_fitness.as_ref()
    }

    /// Number of times the wrapped function has been called.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Calls the function and wraps the raw result.
    pub fn evaluate(&self, genotype: &Genotype) -> Result<Fitness> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let mapped;
        let genotype = match &self.preprocess {
            Some(map) => {
                mapped = map(genotype);
                &mapped
            }
            None => genotype,
        };
        match &self.objective {
            Objective::Scalar(f) => self.wrap(&[f(genotype)]),
            Objective::Vector { f, .. } => self.wrap(&f(genotype)),
        }
    }

    /// Wraps raw objective values in this function's fitness variant.
    ///
    /// Fails with [`SgxError::NonFiniteFitness`] on NaN or infinite values.
    pub fn wrap(&self, raw: &[f64]) -> Result<Fitness> {
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(SgxError::NonFiniteFitness(format!("{raw:?}")));
        }
        match self.kind() {
            FitnessKind::Scalar => match raw {
                [value] => Ok(self.wrap_scalar(*value)),
                _ => Err(SgxError::ArityMismatch {
                    expected: 1,
                    found: raw.len(),
                }),
            },
            FitnessKind::Vector(arity) => {
                if raw.len() != arity {
                    return Err(SgxError::ArityMismatch {
                        expected: arity,
                        found: raw.len(),
                    });
                }
                Ok(Vector::new(raw.iter().copied())
                    .with_sense(self.sense)
                    .with_tolerance(self.tolerance)
                    .into())
            }
        }
    }

    fn wrap_scalar(&self, value: f64) -> Fitness {
        Scalar::new(value)
            .with_sense(self.sense)
            .with_tolerance(self.tolerance)
            .into()
    }
}

impl fmt::Debug for FitnessFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FitnessFunction")
            .field("kind", &self.kind())
            .field("preprocessed", &self.preprocess.is_some())
            .field("sense", &self.sense)
            .field("tolerance", &self.tolerance)
            .field("best_fitness", &self.best_fitness)
            .field("evaluations", &self.evaluations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allele::Gene;
    use crate::fitness::Comparable;

    fn floats(v: &[f64]) -> Genotype {
        v.iter().map(|&x| Gene::Float(x)).collect()
    }

    fn sphere() -> FitnessFunction {
        FitnessFunction::scalar(|g: &Genotype| g.to_f64_vec().iter().map(|x| x * x).sum())
            .with_sense(Sense::Minimize)
    }

    #[test]
    fn test_scalar_wrapping() {
        let f = sphere();
        assert_eq!(f.kind(), FitnessKind::Scalar);
        let fit = f.evaluate(&floats(&[1.0, 2.0])).unwrap();
        assert_eq!(fit.values(), vec![5.0]);
        assert_eq!(fit.as_scalar().unwrap().sense(), Sense::Minimize);
    }

    #[test]
    fn test_minimizing_order() {
        let f = sphere();
        let near = f.evaluate(&floats(&[0.1])).unwrap();
        let far = f.evaluate(&floats(&[3.0])).unwrap();
        assert!(near.is_fitter(&far).unwrap());
    }

    #[test]
    fn test_vector_wrapping() {
        let f = FitnessFunction::vector(2, |g: &Genotype| {
            let x = g[0].to_f64();
            vec![x, -x]
        })
        .unwrap();
        assert_eq!(f.kind(), FitnessKind::Vector(2));
        let fit = f.evaluate(&floats(&[2.0])).unwrap();
        assert_eq!(fit.values(), vec![2.0, -2.0]);
    }

    #[test]
    fn test_vector_arity_mismatch() {
        let f = FitnessFunction::vector(3, |_: &Genotype| vec![1.0]).unwrap();
        assert_eq!(
            f.evaluate(&floats(&[0.0])),
            Err(SgxError::ArityMismatch {
                expected: 3,
                found: 1
            })
        );
    }

    #[test]
    fn test_zero_arity_rejected() {
        assert!(FitnessFunction::vector(0, |_: &Genotype| vec![]).is_err());
    }

    #[test]
    fn test_best_fitness() {
        let f = sphere().with_best_fitness(&[0.0]).unwrap();
        let best = f.best_fitness().unwrap();
        assert_eq!(best.values(), vec![0.0]);
        assert_eq!(best.as_scalar().unwrap().sense(), Sense::Minimize);
        assert!(sphere().with_best_fitness(&[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_evaluations_counted() {
        let f = sphere();
        assert_eq!(f.evaluations(), 0);
        for _ in 0..3 {
            f.evaluate(&floats(&[1.0])).unwrap();
        }
        assert_eq!(f.evaluations(), 3);
        // wrapping doesn't call the function
        f.wrap(&[1.0]).unwrap();
        assert_eq!(f.evaluations(), 3);
    }

    #[test]
    fn test_non_finite_results_rejected() {
        let f = FitnessFunction::scalar(|g: &Genotype| g[0].to_f64().ln());
        assert!(matches!(
            f.evaluate(&floats(&[-1.0])),
            Err(SgxError::NonFiniteFitness(_))
        ));
        assert!(matches!(
            f.evaluate(&floats(&[0.0])),
            Err(SgxError::NonFiniteFitness(_))
        ));
        assert!(f.evaluate(&floats(&[1.0])).is_ok());

        let v = FitnessFunction::vector(2, |_: &Genotype| vec![1.0, f64::NAN]).unwrap();
        assert!(v.evaluate(&floats(&[0.0])).is_err());
        assert!(sphere().with_best_fitness(&[f64::INFINITY]).is_err());
    }

    // ---- Genotype mapping ----

    #[test]
    fn test_map_genotype_feeds_objective() {
        // genes are read as an offset from 10
        let f = FitnessFunction::scalar(|g: &Genotype| g[0].to_f64())
            .map_genotype(|g: &Genotype| g.iter().map(|x| Gene::Float(x.to_f64() + 10.0)).collect());
        assert_eq!(f.evaluate(&floats(&[2.5])).unwrap().values(), vec![12.5]);
        assert_eq!(f.evaluations(), 1);
    }

    #[test]
    fn test_map_genotype_chains_in_order() {
        let f = FitnessFunction::scalar(|g: &Genotype| g[0].to_f64())
            .map_genotype(|g: &Genotype| g.iter().map(|x| Gene::Float(x.to_f64() + 1.0)).collect())
            .map_genotype(|g: &Genotype| g.iter().map(|x| Gene::Float(x.to_f64() * 3.0)).collect());
        assert_eq!(f.evaluate(&floats(&[1.0])).unwrap().values(), vec![6.0]);
    }

    #[test]
    fn test_map_genotype_bools_to_integer() {
        // decode a bit string into one binary number
        let f = FitnessFunction::scalar(|g: &Genotype| g[0].to_f64()).map_genotype(|g: &Genotype| {
            let n = g.iter().fold(0.0, |acc, b| acc * 2.0 + b.to_f64());
            Genotype::new(vec![Gene::Float(n)])
        });
        let bits: Genotype = [true, false, true].into_iter().map(Gene::Bool).collect();
        assert_eq!(f.evaluate(&bits).unwrap().values(), vec![5.0]);
    }

    #[test]
    fn test_tolerance_applied() {
        let f = FitnessFunction::scalar(|g: &Genotype| g[0].to_f64())
            .with_tolerance(Tolerance::absolute(0.5));
        let a = f.evaluate(&floats(&[1.0])).unwrap();
        let b = f.evaluate(&floats(&[1.3])).unwrap();
        assert!(!b.is_fitter(&a).unwrap());
    }
}
