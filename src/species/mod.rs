//! Species: a genome bound to a fitness function.
//!
//! A [`Species`] samples genotypes (occasionally exploring uniformly),
//! ranks pairs of them, and hands competition outcomes to its genome. Apart
//! from the alleles inside the genome it holds no state: the alleles are the
//! only memory of the search trajectory.
//!
//! # Key Types
//!
//! - [`Species`]: sampling, evaluation, comparison, update
//! - [`SpeciesConfig`]: mutation rate and comparison policy
//! - [`Comparison`]: simple or noise-tolerant ranking

mod config;

pub use config::{Comparison, SpeciesConfig};

use crate::allele::SampleMode;
use crate::error::{Result, SgxError};
use crate::fitness::{Comparable, Fitness, FitnessFunction};
use crate::genome::Genome;
use crate::genotype::Genotype;
use rand::Rng;
use std::cmp::Ordering;

/// A genome plus the function that judges its genotypes.
///
/// # Usage
///
/// ```
/// use u_sgx::allele::{Allele, Boolean};
/// use u_sgx::fitness::FitnessFunction;
/// use u_sgx::species::{Species, SpeciesConfig};
/// use u_sgx::{Genome, Genotype};
/// use rand::SeedableRng;
///
/// let genome = Genome::new(
///     (0..8).map(|_| Box::new(Boolean::new()) as Box<dyn Allele>).collect(),
/// )
/// .unwrap();
/// let onemax = FitnessFunction::scalar(|g: &Genotype| g.to_f64_vec().iter().sum());
/// let mut species = Species::new(genome, onemax, &SpeciesConfig::default()).unwrap();
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let a = species.sample(&mut rng);
/// let b = species.sample(&mut rng);
/// match species.compare(&a, &b).unwrap() {
///     std::cmp::Ordering::Greater => species.update(&a, &b).unwrap(),
///     std::cmp::Ordering::Less => species.update(&b, &a).unwrap(),
///     std::cmp::Ordering::Equal => {}
/// }
/// ```
#[derive(Debug)]
pub struct Species {
    genome: Genome,
    fitness_function: FitnessFunction,
    mutation_rate: f64,
    comparison: Comparison,
}

impl Species {
    /// Binds `genome` to `fitness_function`.
    ///
    /// Fails with [`SgxError::InvalidMutationRate`] for a rate outside
    /// `[0, 1]` and with [`SgxError::InvalidConfig`] for any other invalid
    /// setting.
    pub fn new(
        genome: Genome,
        fitness_function: FitnessFunction,
        config: &SpeciesConfig,
    ) -> Result<Self> {
        if let Some(rate) = config.mutation_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SgxError::InvalidMutationRate(rate));
            }
        }
        config.validate().map_err(SgxError::InvalidConfig)?;
        let mutation_rate = config
            .mutation_rate
            .unwrap_or(1.0 / genome.len() as f64);
        Ok(Self {
            genome,
            fitness_function,
            mutation_rate,
            comparison: config.comparison,
        })
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn fitness_function(&self) -> &FitnessFunction {
        &self.fitness_function
    }

    /// Effective per-locus exploration probability.
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// Samples a genotype.
    ///
    /// Each locus independently samples uniformly with probability
    /// [`mutation_rate`](Self::mutation_rate) and from its learned
    /// distribution otherwise.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Genotype {
        let p = self.mutation_rate;
        self.genome.sample_with(rng, |rng| {
            if rng.random_bool(p) {
                SampleMode::Uniform
            } else {
                SampleMode::Sample
            }
        })
    }

    /// Samples every locus with the same `mode`, without exploration.
    ///
    /// `SampleMode::Mode` yields the current point estimate.
    pub fn sample_mode<R: Rng>(&self, mode: SampleMode, rng: &mut R) -> Genotype {
        self.genome.sample(mode, rng)
    }

    /// Runs the fitness function on `genotype`.
    pub fn evaluate(&self, genotype: &Genotype) -> Result<Fitness> {
        self.fitness_function.evaluate(genotype)
    }

    /// Ranks two genotypes: `Greater` if `first` is fitter, `Less` if
    /// `second` is, `Equal` if they can't be told apart.
    ///
    /// Evaluates both genotypes (several times under
    /// [`Comparison::Stochastic`]). Callers that already hold the fitness
    /// values should use [`compare_evaluated`](Self::compare_evaluated).
    pub fn compare(&self, first: &Genotype, second: &Genotype) -> Result<Ordering> {
        let f1 = self.evaluate(first)?;
        let f2 = self.evaluate(second)?;
        self.compare_evaluated(first, &f1, second, &f2)
    }

    /// Like [`compare`](Self::compare), reusing one evaluation per genotype.
    ///
    /// Under [`Comparison::Simple`] the fitness function isn't called at all.
    /// Under [`Comparison::Stochastic`] the given values cast the first vote
    /// and the remaining `evaluations - 1` votes are fresh evaluations.
    pub fn compare_evaluated(
        &self,
        first: &Genotype,
        first_fitness: &Fitness,
        second: &Genotype,
        second_fitness: &Fitness,
    ) -> Result<Ordering> {
        match self.comparison {
            Comparison::Simple => first_fitness.compare(second_fitness),
            Comparison::Stochastic { evaluations } => {
                let mut votes = vote(first_fitness.compare(second_fitness)?);
                for _ in 1..evaluations {
                    let f1 = self.evaluate(first)?;
                    let f2 = self.evaluate(second)?;
                    votes += vote(f1.compare(&f2)?);
                }
                Ok(votes.cmp(&0))
            }
        }
    }

    /// Reshapes every allele toward `winner` and away from `loser`.
    pub fn update(&mut self, winner: &Genotype, loser: &Genotype) -> Result<()> {
        self.genome.update(winner, loser)
    }
}

fn vote(ordering: Ordering) -> i64 {
    match ordering {
        Ordering::Greater => 1,
        Ordering::Less => -1,
        Ordering::Equal => 0,
    }
}

// ============================================================================
// Tests
// ============================================================================
