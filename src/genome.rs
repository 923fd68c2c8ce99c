//! Genomes: fixed-length sequences of alleles.

use crate::allele::{Allele, SampleMode};
use crate::error::{Result, SgxError};
use crate::genotype::Genotype;
use crate::PARANOIA;
use rand::Rng;
use std::fmt;

/// An ordered, fixed-length sequence of alleles, one per locus.
///
/// The genome owns its alleles. Loci can't be added or removed after
/// construction; the only way to change an allele is through
/// [`update`](Genome::update).
///
/// # Examples
///
/// ```
/// use u_sgx::allele::{Boolean, FloatingPoint};
/// use u_sgx::{Genome, SampleMode};
/// use rand::SeedableRng;
///
/// let genome = Genome::new(vec![
///     Box::new(Boolean::new()),
///     Box::new(FloatingPoint::new(0.0, 1.0).unwrap()),
/// ])
/// .unwrap();
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let genotype = genome.sample(SampleMode::Sample, &mut rng);
/// assert!(genome.is_valid(&genotype));
/// ```
pub struct Genome {
    alleles: Vec<Box<dyn Allele>>,
    squeezable: bool,
}

impl Genome {
    /// Builds a genome from its alleles. At least one allele is required.
    pub fn new(alleles: Vec<Box<dyn Allele>>) -> Result<Self> {
        if alleles.is_empty() {
            return Err(SgxError::EmptyGenome);
        }
        let squeezable = alleles.iter().all(|a| a.is_squeezable());
        let genome = Self {
            alleles,
            squeezable,
        };
        if PARANOIA {
            genome.run_paranoia_checks()?;
        }
        Ok(genome)
    }

    /// Number of loci.
    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    /// Always `false`; a genome can't be empty.
    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    /// Read-only access to the allele at `locus`.
    pub fn allele(&self, locus: usize) -> Option<&dyn Allele> {
        self.alleles.get(locus).map(|a| a.as_ref())
    }

    pub fn alleles(&self) -> impl Iterator<Item = &dyn Allele> + '_ {
        self.alleles.iter().map(|a| a.as_ref())
    }

    /// Whether every allele supports the compact rendering.
    pub fn is_squeezable(&self) -> bool {
        self.squeezable
    }

    /// Samples every locus independently, in locus order, with the same mode.
    pub fn sample<R: Rng>(&self, mode: SampleMode, rng: &mut R) -> Genotype {
        self.alleles.iter().map(|a| a.sample(mode, &mut *rng)).collect()
    }

    /// Samples each locus with the mode chosen for it by `mode_for`.
    ///
    /// `mode_for` is called once per locus, in locus order, before that
    /// locus is sampled.
    pub fn sample_with<R, F>(&self, rng: &mut R, mut mode_for: F) -> Genotype
    where
        R: Rng,
        F: FnMut(&mut R) -> SampleMode,
    {
        self.alleles
            .iter()
            .map(|a| {
                let mode = mode_for(&mut *rng);
                a.sample(mode, &mut *rng)
            })
            .collect()
    }

    /// Whether `genotype` has one valid value per locus.
    pub fn is_valid(&self, genotype: &Genotype) -> bool {
        genotype.len() == self.alleles.len()
            && self
                .alleles
                .iter()
                .zip(genotype.iter())
                .all(|(a, g)| a.is_valid(g))
    }

    /// Propagates a competition outcome to every locus independently.
    ///
    /// Both genotypes are checked up front, so an invalid pair leaves every
    /// allele untouched.
    pub fn update(&mut self, winner: &Genotype, loser: &Genotype) -> Result<()> {
        for genotype in [winner, loser] {
            self.check_shape(genotype)?;
        }
        for (locus, ((a, w), l)) in self
            .alleles
            .iter_mut()
            .zip(winner.iter())
            .zip(loser.iter())
            .enumerate()
        {
            a.update(w, l).map_err(|e| e.at_locus(locus))?;
        }
        Ok(())
    }

    /// Renders a genotype, compactly when every allele allows it.
    pub fn format_genotype(&self, genotype: &Genotype) -> String {
        if self.squeezable {
            genotype.squeeze()
        } else {
            genotype.to_string()
        }
    }

    /// One [`Allele::describe`] line per locus.
    pub fn describe(&self) -> Vec<String> {
        self.alleles.iter().map(|a| a.describe()).collect()
    }

    pub fn run_paranoia_checks(&self) -> Result<()> {
        if self.alleles.is_empty() {
            return Err(SgxError::InvariantViolation("genome has no loci".into()));
        }
        for (locus, a) in self.alleles.iter().enumerate() {
            a.run_paranoia_checks().map_err(|e| match e {
                SgxError::InvariantViolation(msg) => {
                    SgxError::InvariantViolation(format!("locus {locus}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Length and per-locus domain check with a descriptive error.
    fn check_shape(&self, genotype: &Genotype) -> Result<()> {
        if genotype.len() != self.alleles.len() {
            return Err(SgxError::LengthMismatch {
                expected: self.alleles.len(),
                found: genotype.len(),
            });
        }
        match self
            .alleles
            .iter()
            .zip(genotype.iter())
            .position(|(a, g)| !a.is_valid(g))
        {
            Some(locus) => Err(SgxError::InvalidGene {
                locus,
                value: genotype[locus].to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Genome")
            .field("loci", &self.alleles.len())
            .field("alleles", &self.describe())
            .finish()
    }
}
