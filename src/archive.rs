//! Archive of the non-dominated solutions seen so far.
//!
//! The archive is fed one generation at a time and keeps only the Pareto
//! frontier: a candidate is admitted when nothing in the archive dominates
//! it, and admitting it evicts every entry it dominates. No global re-sort
//! is ever needed; the invariant "no two entries dominate each other" is
//! preserved by construction.
//!
//! # Complexity
//!
//! O(n) dominance checks per candidate, where n is the archive size.

use crate::error::{Result, SgxError};
use crate::fitness::{Comparable, Fitness, FitnessKind};
use crate::genotype::Genotype;
use crate::PARANOIA;
use std::fmt;

/// An archived solution: what it was, how fit, and when it was seen.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub genotype: Genotype,
    pub fitness: Fitness,
    pub generation: usize,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} @ {}",
            self.genotype, self.fitness, self.generation
        )
    }
}

/// The best-known Pareto frontier across all generations.
///
/// The first admitted snapshot fixes the genotype length and
/// [`FitnessKind`] of the archive; later candidates of a different shape are
/// rejected with an error.
///
/// # Examples
///
/// ```
/// use u_sgx::{Archive, Fitness, Gene, Genotype};
/// use u_sgx::fitness::Scalar;
///
/// let g = |b| Genotype::new(vec![Gene::Bool(b)]);
/// let f = |v| Fitness::from(Scalar::new(v));
///
/// let mut archive = Archive::new();
/// assert!(archive.add_generation([(g(true), f(3.0))], None).unwrap());
/// assert!(!archive.add_generation([(g(false), f(2.0))], None).unwrap());
/// assert_eq!(archive.len(), 1);
/// assert_eq!(archive.age(), 2);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Archive {
    entries: Vec<Snapshot>,
    max_generation: usize,
    shape: Option<(usize, FitnessKind)>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers every individual of a generation to the archive.
    ///
    /// With `generation = None` the index is one past the highest seen so
    /// far. Returns whether the archive changed. Non-improving candidates
    /// are a normal outcome, not an error.
    ///
    /// The batch is applied as a whole: if any individual is rejected with
    /// an error, the archive is left exactly as it was.
    pub fn add_generation<I>(&mut self, individuals: I, generation: Option<usize>) -> Result<bool>
    where
        I: IntoIterator<Item = (Genotype, Fitness)>,
    {
        let mut staged = self.clone();
        let generation = match generation {
            Some(g) => {
                staged.max_generation = staged.max_generation.max(g);
                g
            }
            None => {
                staged.max_generation += 1;
                staged.max_generation
            }
        };

        let mut changed = false;
        for (genotype, fitness) in individuals {
            changed |= staged.add(genotype, fitness, generation)?;
        }

        if PARANOIA {
            staged.run_paranoia_checks()?;
        }
        *self = staged;
        Ok(changed)
    }

    /// Tries to admit one solution; returns `true` if it was admitted.
    fn add(&mut self, genotype: Genotype, fitness: Fitness, generation: usize) -> Result<bool> {
        self.check_shape(&genotype, &fitness)?;

        let candidate = Snapshot {
            genotype,
            fitness,
            generation,
        };
        // resampling a known solution keeps its first-seen generation
        if self
            .entries
            .iter()
            .any(|e| e.genotype == candidate.genotype && e.fitness == candidate.fitness)
        {
            return Ok(false);
        }
        for e in &self.entries {
            if e.fitness.is_dominant(&candidate.fitness)? {
                return Ok(false);
            }
        }

        let mut keep = Vec::with_capacity(self.entries.len());
        for e in &self.entries {
            keep.push(!candidate.fitness.is_dominant(&e.fitness)?);
        }
        let mut keep = keep.into_iter();
        let before = self.entries.len();
        self.entries.retain(|_| keep.next().unwrap_or(true));

        log::debug!(
            "archive: admitted {} (gen {generation}), evicted {}",
            candidate.fitness,
            before - self.entries.len()
        );

        if self.shape.is_none() {
            self.shape = Some((candidate.genotype.len(), candidate.fitness.kind()));
        }
        self.entries.push(candidate);
        Ok(true)
    }

    fn check_shape(&self, genotype: &Genotype, fitness: &Fitness) -> Result<()> {
        if fitness.values().iter().any(|v| !v.is_finite()) {
            return Err(SgxError::NonFiniteFitness(fitness.to_string()));
        }
        let Some((len, kind)) = self.shape else {
            return Ok(());
        };
        if genotype.len() != len {
            return Err(SgxError::LengthMismatch {
                expected: len,
                found: genotype.len(),
            });
        }
        if fitness.kind() != kind {
            return Err(SgxError::Incomparable {
                left: kind.to_string(),
                right: fitness.kind().to_string(),
            });
        }
        Ok(())
    }

    /// Number of archived snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All archived snapshots, in admission order.
    pub fn items(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.entries.iter()
    }

    /// Highest generation index seen so far (0 before any generation).
    pub fn age(&self) -> usize {
        self.max_generation
    }

    /// Generation of the most recently admitted surviving snapshot.
    ///
    /// `None` on an empty archive.
    pub fn last_improvement(&self) -> Option<usize> {
        self.entries.iter().map(|e| e.generation).max()
    }

    /// Generation of the oldest surviving snapshot.
    ///
    /// `None` on an empty archive.
    pub fn first_improvement(&self) -> Option<usize> {
        self.entries.iter().map(|e| e.generation).min()
    }

    /// The snapshot ranked first by the total order
    /// ([`is_fitter`](Comparable::is_fitter)); earliest admitted on ties.
    ///
    /// `Ok(None)` on an empty archive. Fails with
    /// [`SgxError::Incomparable`] if two archived fitness values disagree on
    /// their objectives' sense.
    pub fn best(&self) -> Result<Option<&Snapshot>> {
        let mut best: Option<&Snapshot> = None;
        for e in &self.entries {
            best = match best {
                Some(b) if !e.fitness.is_fitter(&b.fitness)? => Some(b),
                _ => Some(e),
            };
        }
        Ok(best)
    }

    /// Verifies that no archived fitness dominates another.
    pub fn run_paranoia_checks(&self) -> Result<()> {
        for (i, a) in self.entries.iter().enumerate() {
            for (j, b) in self.entries.iter().enumerate() {
                if i != j && a.fitness.is_dominant(&b.fitness)? {
                    return Err(SgxError::InvariantViolation(format!(
                        "archived {} dominates archived {}",
                        a.fitness, b.fitness
                    )));
                }
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Archive {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Archive; last generation: {}", self.max_generation)?;
        for e in &self.entries {
            write!(f, "\n  * {e}")?;
        }
        Ok(())
    }
}
