//! Selfish-gene loop execution.
//!
//! [`SgRunner`] orchestrates the competition:
//! sample two → evaluate → compare → update alleles → archive → repeat.

use super::config::SgConfig;
use crate::archive::Archive;
use crate::error::{Result, SgxError};
use crate::fitness::{Comparable, Fitness};
use crate::genotype::Genotype;
use crate::species::Species;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

/// Result of a selfish-gene run.
#[derive(Debug, Clone)]
pub struct SgResult {
    /// Non-dominated solutions seen during the run.
    pub archive: Archive,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run was terminated due to stagnation.
    pub stagnated: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the archive reached the fitness function's declared best
    /// fitness.
    pub target_reached: bool,
}

/// Executes the selfish-gene loop.
///
/// The species is borrowed mutably: its alleles carry the learned
/// distributions after the run, so it can be sampled (e.g. with
/// `SampleMode::Mode`) or run again.
///
/// # Usage
///
/// ```
/// use u_sgx::allele::{Allele, Boolean};
/// use u_sgx::fitness::FitnessFunction;
/// use u_sgx::sg::{SgConfig, SgRunner};
/// use u_sgx::species::{Species, SpeciesConfig};
/// use u_sgx::{Genome, Genotype};
///
/// let genome = Genome::new(
///     (0..8)
///         .map(|_| Box::new(Boolean::with_learning_rate(0.1).unwrap()) as Box<dyn Allele>)
///         .collect(),
/// )
/// .unwrap();
/// let onemax = FitnessFunction::scalar(|g: &Genotype| g.to_f64_vec().iter().sum())
///     .with_best_fitness(&[8.0])
///     .unwrap();
/// let mut species = Species::new(genome, onemax, &SpeciesConfig::default()).unwrap();
///
/// let config = SgConfig::default().with_max_generations(5_000).with_seed(42);
/// let result = SgRunner::run(&mut species, &config).unwrap();
/// assert!(result.target_reached);
/// ```
pub struct SgRunner;

impl SgRunner {
    /// Runs the selfish-gene optimization.
    ///
    /// Fails with [`SgxError::InvalidConfig`] if the configuration is
    /// invalid, and with whatever error a fitness comparison, allele update
    /// or archive insertion raises.
    pub fn run(species: &mut Species, config: &SgConfig) -> Result<SgResult> {
        Self::run_with_cancel(species, config, None)
    }

    /// Runs the loop with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next generation and returns the archive built so far.
    pub fn run_with_cancel(
        species: &mut Species,
        config: &SgConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SgResult> {
        config.validate().map_err(SgxError::InvalidConfig)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let target = species.fitness_function().best_fitness().cloned();

        log::info!(
            "sg: {} loci, up to {} generations, seed {seed}",
            species.genome().len(),
            config.max_generations
        );

        let mut archive = Archive::new();
        let mut generations = 0usize;
        let mut stagnation_counter = 0usize;
        let mut stagnated = false;
        let mut cancelled = false;
        let mut target_reached = false;

        for gen in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(AtomicOrdering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let a = species.sample(&mut rng);
            let b = species.sample(&mut rng);
            let (fa, fb) = evaluate_pair(species, &a, &b, config.parallel)?;

            let outcome = species.compare_evaluated(&a, &fa, &b, &fb)?;
            log::debug!("gen {gen}: {fa} vs {fb} -> {outcome:?}");
            match outcome {
                Ordering::Greater => species.update(&a, &b)?,
                Ordering::Less => species.update(&b, &a)?,
                Ordering::Equal => {}
            }

            let changed = archive.add_generation([(a, fa), (b, fb)], Some(gen))?;
            generations = gen + 1;

            if changed {
                stagnation_counter = 0;
                if let Some(ref target) = target {
                    if reaches(&archive, target)? {
                        target_reached = true;
                        break;
                    }
                }
            } else {
                stagnation_counter += 1;
                if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                    stagnated = true;
                    break;
                }
            }
        }

        log::info!(
            "sg: stopped after {generations} generations ({} evaluations), archive size {}{}",
            species.fitness_function().evaluations(),
            archive.len(),
            if target_reached {
                ", target reached"
            } else if stagnated {
                ", stagnated"
            } else if cancelled {
                ", cancelled"
            } else {
                ""
            }
        );

        Ok(SgResult {
            archive,
            generations,
            stagnated,
            cancelled,
            target_reached,
        })
    }
}

/// Evaluates both competitors, concurrently when enabled.
fn evaluate_pair(
    species: &Species,
    a: &Genotype,
    b: &Genotype,
    parallel: bool,
) -> Result<(Fitness, Fitness)> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            let (fa, fb) = rayon::join(|| species.evaluate(a), || species.evaluate(b));
            return Ok((fa?, fb?));
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    Ok((species.evaluate(a)?, species.evaluate(b)?))
}

/// Whether some archived fitness is not worse than `target`.
fn reaches(archive: &Archive, target: &Fitness) -> Result<bool> {
    for snapshot in archive {
        if !target.is_fitter(&snapshot.fitness)? {
            return Ok(true);
        }
    }
    Ok(false)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allele::{Allele, Boolean, FloatingPoint, Gene, SampleMode};
    use crate::fitness::{FitnessFunction, Sense};
    use crate::genome::Genome;
    use crate::species::SpeciesConfig;

    fn onemax_species(n: usize, learning_rate: f64, best: Option<f64>) -> Species {
        let genome = Genome::new(
            (0..n)
                .map(|_| {
                    Box::new(Boolean::with_learning_rate(learning_rate).unwrap()) as Box<dyn Allele>
                })
                .collect(),
        )
        .unwrap();
        let mut f = FitnessFunction::scalar(|g: &Genotype| g.to_f64_vec().iter().sum());
        if let Some(best) = best {
            f = f.with_best_fitness(&[best]).unwrap();
        }
        Species::new(genome, f, &SpeciesConfig::default()).unwrap()
    }

    fn sphere_species() -> Species {
        let genome = Genome::new(
            (0..2)
                .map(|_| Box::new(FloatingPoint::new(-5.0, 5.0).unwrap()) as Box<dyn Allele>)
                .collect(),
        )
        .unwrap();
        let f = FitnessFunction::scalar(|g: &Genotype| g.to_f64_vec().iter().map(|x| x * x).sum())
            .with_sense(Sense::Minimize);
        Species::new(genome, f, &SpeciesConfig::default()).unwrap()
    }

    // ---- Convergence ----

    #[test]
    fn test_onemax_convergence() {
        let mut species = onemax_species(16, 0.05, None);
        let config = SgConfig::default().with_max_generations(5_000).with_seed(42);

        let result = SgRunner::run(&mut species, &config).unwrap();

        let best = result.archive.best().unwrap().unwrap().fitness.values()[0];
        assert!(best >= 15.0, "expected >= 15 ones out of 16, got {best}");
        assert_eq!(result.generations, 5_000);
        assert!(!result.stagnated && !result.cancelled && !result.target_reached);
    }

    #[test]
    fn test_onemax_learned_distribution() {
        let mut species = onemax_species(8, 0.1, None);
        let config = SgConfig::default().with_max_generations(3_000).with_seed(1);
        SgRunner::run(&mut species, &config).unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        let mode = species.sample_mode(SampleMode::Mode, &mut rng);
        let ones = mode.iter().filter(|&&g| g == Gene::Bool(true)).count();
        assert!(ones >= 7, "point estimate {mode} has only {ones} ones");
    }

    #[test]
    fn test_sphere_minimization() {
        let mut species = sphere_species();
        let config = SgConfig::default().with_max_generations(3_000).with_seed(42);

        let result = SgRunner::run(&mut species, &config).unwrap();

        let best = result.archive.best().unwrap().unwrap().fitness.values()[0];
        assert!(best < 0.5, "expected sphere < 0.5, got {best}");
        assert_eq!(result.archive.len(), 1);
    }

    // ---- Termination ----

    #[test]
    fn test_target_reached() {
        let mut species = onemax_species(4, 0.1, Some(4.0));
        let config = SgConfig::default().with_max_generations(10_000).with_seed(3);

        let result = SgRunner::run(&mut species, &config).unwrap();

        assert!(result.target_reached);
        assert!(result.generations < 10_000);
        assert_eq!(result.archive.best().unwrap().unwrap().fitness.values(), vec![4.0]);
    }

    #[test]
    fn test_stagnation_termination() {
        let mut species = onemax_species(4, 0.2, None);
        let config = SgConfig::default()
            .with_max_generations(100_000)
            .with_stagnation_limit(50)
            .with_seed(42);

        let result = SgRunner::run(&mut species, &config).unwrap();

        assert!(result.stagnated, "expected stagnation");
        assert!(result.generations < 100_000);
    }

    #[test]
    fn test_cancellation() {
        let mut species = onemax_species(16, 0.01, None);
        let config = SgConfig::default().with_max_generations(1_000).with_seed(42);

        let cancel = Arc::new(AtomicBool::new(true));
        let result = SgRunner::run_with_cancel(&mut species, &config, Some(cancel)).unwrap();

        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert!(result.archive.is_empty());
        assert_eq!(species.fitness_function().evaluations(), 0);
    }

    #[test]
    fn test_cancellation_from_other_thread() {
        let mut species = onemax_species(32, 0.01, None);
        let config = SgConfig::default()
            .with_max_generations(usize::MAX)
            .with_seed(42);

        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_clone = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            cancel_clone.store(true, AtomicOrdering::Relaxed);
        });

        let result = SgRunner::run_with_cancel(&mut species, &config, Some(cancel)).unwrap();
        assert!(result.cancelled, "expected cancelled result");
    }

    // ---- Bookkeeping ----

    #[test]
    fn test_two_evaluations_per_generation() {
        let mut species = onemax_species(8, 0.1, None);
        let config = SgConfig::default().with_max_generations(100).with_seed(5);
        let result = SgRunner::run(&mut species, &config).unwrap();
        assert_eq!(
            species.fitness_function().evaluations(),
            2 * result.generations
        );
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = SgConfig::default().with_max_generations(500).with_seed(11);

        let mut s1 = sphere_species();
        let mut s2 = sphere_species();
        let r1 = SgRunner::run(&mut s1, &config).unwrap();
        let r2 = SgRunner::run(&mut s2, &config).unwrap();

        assert_eq!(r1.archive.items(), r2.archive.items());
        assert_eq!(s1.genome().describe(), s2.genome().describe());
    }

    #[test]
    fn test_archive_generations_within_run() {
        let mut species = sphere_species();
        let config = SgConfig::default().with_max_generations(300).with_seed(8);
        let result = SgRunner::run(&mut species, &config).unwrap();
        assert!(result.archive.age() < 300);
        for snapshot in &result.archive {
            assert!(species.genome().is_valid(&snapshot.genotype));
        }
    }

    #[test]
    fn test_invalid_config() {
        let mut species = onemax_species(2, 0.1, None);
        let config = SgConfig::default().with_max_generations(0);
        assert!(matches!(
            SgRunner::run(&mut species, &config),
            Err(SgxError::InvalidConfig(_))
        ));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = SgConfig::default().with_max_generations(300).with_seed(4);
        let parallel = sequential.clone().with_parallel(true);

        let mut s1 = sphere_species();
        let mut s2 = sphere_species();
        let r1 = SgRunner::run(&mut s1, &sequential).unwrap();
        let r2 = SgRunner::run(&mut s2, &parallel).unwrap();
        assert_eq!(r1.archive.items(), r2.archive.items());
    }
}
