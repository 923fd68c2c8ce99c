//! Floating-point allele: a mixture of truncated normal components.

use super::{check_learning_rate, invalid_gene, Allele, Gene, SampleMode, DEFAULT_LEARNING_RATE};
use crate::error::{Result, SgxError};
use crate::PARANOIA;
use rand::{Rng, RngCore};
use rand_distr::StandardNormal;

/// Number of mixture components when none is given.
pub const DEFAULT_MIXTURE_SIZE: usize = 10;

/// Standard deviation of every mixture component when none is given.
pub const DEFAULT_SCALE: f64 = 0.5;

/// Draws outside the interval before a sample is clipped instead.
const MAX_REJECTIONS: usize = 64;

/// One unimodal component of a [`FloatingPoint`] mixture.
///
/// A normal distribution with location `loc` and standard deviation
/// `scale`, truncated to the owning allele's interval.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDistribution {
    loc: f64,
    scale: f64,
}

impl UnitDistribution {
    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Draws a value in `[a, b]`.
    ///
    /// Rejects out-of-range draws; after [`MAX_REJECTIONS`] misses the last
    /// draw is clipped to the interval.
    fn sample(&self, a: f64, b: f64, rng: &mut dyn RngCore) -> f64 {
        let mut value = self.loc;
        for _ in 0..MAX_REJECTIONS {
            let z: f64 = rng.sample(StandardNormal);
            value = self.loc + self.scale * z;
            if (a..=b).contains(&value) {
                return value;
            }
        }
        value.clamp(a, b)
    }
}

/// A floating-point gene over the closed interval `[a, b]`.
///
/// Sampling picks one component uniformly at random and draws from it.
/// [`update`](Allele::update) finds the component whose location is nearest
/// to the loser and relocates it onto the winner, so probability mass drains
/// away from losing regions and piles up where winners were seen.
///
/// # Examples
///
/// ```
/// use u_sgx::allele::{Allele, FloatingPoint};
/// use u_sgx::Gene;
///
/// let mut allele = FloatingPoint::builder(0.0, 10.0).mixture_size(2).build().unwrap();
/// assert_eq!(allele.locations(), vec![0.0, 10.0]);
///
/// allele.update(&Gene::Float(5.0), &Gene::Float(1.0)).unwrap();
/// assert_eq!(allele.locations(), vec![5.0, 10.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingPoint {
    interval: (f64, f64),
    mixture: Vec<UnitDistribution>,
    learning_rate: f64,
}

/// Builder for [`FloatingPoint`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct FloatingPointBuilder {
    a: f64,
    b: f64,
    mixture_size: usize,
    scale: f64,
    learning_rate: f64,
}

impl FloatingPointBuilder {
    pub fn mixture_size(mut self, n: usize) -> Self {
        self.mixture_size = n;
        self
    }

    /// Standard deviation shared by all components.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Learning rate, validated against `]0, 1[` like every allele's.
    ///
    /// Relocation moves a whole component onto the winner, so the update
    /// rule doesn't read it.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Validates the parameters and lays out the initial mixture.
    ///
    /// A single component sits at the midpoint; otherwise components are
    /// evenly spaced from `a` to `b` inclusive.
    pub fn build(self) -> Result<FloatingPoint> {
        let Self {
            a,
            b,
            mixture_size,
            scale,
            learning_rate,
        } = self;

        if !(a.is_finite() && b.is_finite() && a < b && (b - a).is_finite()) {
            return Err(SgxError::InvalidInterval { a, b });
        }
        if mixture_size == 0 {
            return Err(SgxError::InvalidMixtureSize(mixture_size));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SgxError::InvalidScale(scale));
        }
        let learning_rate = check_learning_rate(learning_rate)?;

        let mixture = if mixture_size == 1 {
            vec![UnitDistribution {
                loc: (a + b) / 2.0,
                scale,
            }]
        } else {
            let step = (b - a) / (mixture_size - 1) as f64;
            (0..mixture_size)
                .map(|m| UnitDistribution {
                    // last component lands exactly on b despite rounding
                    loc: if m + 1 == mixture_size {
                        b
                    } else {
                        a + step * m as f64
                    },
                    scale,
                })
                .collect()
        };

        let allele = FloatingPoint {
            interval: (a, b),
            mixture,
            learning_rate,
        };
        if PARANOIA {
            allele.run_paranoia_checks()?;
        }
        Ok(allele)
    }
}

impl FloatingPoint {
    /// Allele over `[a, b]` with default mixture size, scale and learning rate.
    pub fn new(a: f64, b: f64) -> Result<Self> {
        Self::builder(a, b).build()
    }

    /// Starts configuring an allele over `[a, b]`.
    pub fn builder(a: f64, b: f64) -> FloatingPointBuilder {
        FloatingPointBuilder {
            a,
            b,
            mixture_size: DEFAULT_MIXTURE_SIZE,
            scale: DEFAULT_SCALE,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }

    pub fn interval(&self) -> (f64, f64) {
        self.interval
    }

    pub fn mixture(&self) -> &[UnitDistribution] {
        &self.mixture
    }

    pub fn mixture_size(&self) -> usize {
        self.mixture.len()
    }

    /// Component locations, in component order.
    pub fn locations(&self) -> Vec<f64> {
        self.mixture.iter().map(|m| m.loc).collect()
    }

    /// Stored learning rate; see [`FloatingPointBuilder::learning_rate`].
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Index of the component whose location is nearest to `value`.
    ///
    /// Ties go to the lowest index.
    fn nearest(&self, value: f64) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, m) in self.mixture.iter().enumerate() {
            let d = (m.loc - value).abs();
            if d < best_distance {
                best = i;
                best_distance = d;
            }
        }
        best
    }

    /// Location of the component sitting where the mixture is densest.
    ///
    /// Density at each location is a Gaussian kernel sum over all component
    /// locations; the truncation constant is ignored. Ties go to the lowest
    /// index.
    fn densest_location(&self) -> f64 {
        let mut best = self.mixture[0].loc;
        let mut best_density = f64::NEG_INFINITY;
        for m in &self.mixture {
            let density: f64 = self
                .mixture
                .iter()
                .map(|other| {
                    let z = (m.loc - other.loc) / other.scale;
                    (-0.5 * z * z).exp() / other.scale
                })
                .sum();
            if density > best_density {
                best = m.loc;
                best_density = density;
            }
        }
        best
    }

    fn contains(&self, x: f64) -> bool {
        self.interval.0 <= x && x <= self.interval.1
    }
}

impl Allele for FloatingPoint {
    fn sample(&self, mode: SampleMode, rng: &mut dyn RngCore) -> Gene {
        let (a, b) = self.interval;
        let value = match mode {
            SampleMode::Sample => {
                let i = rng.random_range(0..self.mixture.len());
                self.mixture[i].sample(a, b, rng)
            }
            SampleMode::Uniform => rng.random_range(a..=b),
            SampleMode::Mode => self.densest_location(),
        };
        Gene::Float(value)
    }

    fn update(&mut self, winner: &Gene, loser: &Gene) -> Result<()> {
        let (w, l) = match (winner, loser) {
            (Gene::Float(w), Gene::Float(l)) => (*w, *l),
            (Gene::Float(_), other) | (other, _) => return Err(invalid_gene(other)),
        };
        if !self.contains(w) {
            return Err(invalid_gene(winner));
        }
        if !self.contains(l) {
            return Err(invalid_gene(loser));
        }

        let i = self.nearest(l);
        log::trace!(
            "floating allele: component {i} relocated {} -> {w}",
            self.mixture[i].loc
        );
        self.mixture[i].loc = w;

        if PARANOIA {
            self.run_paranoia_checks()?;
        }
        Ok(())
    }

    fn is_valid(&self, value: &Gene) -> bool {
        match value {
            Gene::Float(x) => self.contains(*x),
            Gene::Bool(_) => false,
        }
    }

    fn describe(&self) -> String {
        let locs: Vec<String> = self.mixture.iter().map(|m| format!("{:.3}", m.loc)).collect();
        format!(
            "[{},{}]/{} {{{}}}",
            self.interval.0,
            self.interval.1,
            self.mixture.len(),
            locs.join(", ")
        )
    }

    fn run_paranoia_checks(&self) -> Result<()> {
        let (a, b) = self.interval;
        if !(a < b) {
            return Err(SgxError::InvariantViolation(format!(
                "floating interval [{a}, {b}] is empty"
            )));
        }
        if self.mixture.is_empty() {
            return Err(SgxError::InvariantViolation("empty mixture".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate < 1.0) {
            return Err(SgxError::InvariantViolation(format!(
                "floating learning rate {} outside ]0, 1[",
                self.learning_rate
            )));
        }
        if let Some((i, m)) = self
            .mixture
            .iter()
            .enumerate()
            .find(|(_, m)| !self.contains(m.loc))
        {
            return Err(SgxError::InvariantViolation(format!(
                "component {i} at {} outside [{a}, {b}]",
                m.loc
            )));
        }
        Ok(())
    }
}
