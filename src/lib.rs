//! Population-less evolutionary optimization ("selfish gene").
//!
//! Instead of evolving a population of candidate solutions, the optimizer
//! keeps one probability distribution per gene and nudges it after every
//! pairwise competition between two sampled candidates.
//!
//! - **Allele**: a single gene's sampling distribution plus its online
//!   update rule ([`allele::Boolean`], [`allele::FloatingPoint`]).
//! - **Genome / Genotype**: a fixed-length sequence of alleles, and the
//!   concrete values sampled from it.
//! - **Fitness**: scalar or vector objectives with a total order
//!   (`is_fitter`) and Pareto dominance (`is_dominant`).
//! - **Species**: binds a genome to a fitness function; samples with
//!   per-locus exploration and ranks competitors.
//! - **Archive**: the non-dominated frontier of everything seen so far.
//! - **SG**: the generational loop tying it all together ([`sg::SgRunner`]).
//!
//! # Example
//!
//! ```
//! use u_sgx::allele::{Allele, FloatingPoint};
//! use u_sgx::fitness::{FitnessFunction, Sense};
//! use u_sgx::sg::{SgConfig, SgRunner};
//! use u_sgx::species::{Species, SpeciesConfig};
//! use u_sgx::{Genome, Genotype};
//!
//! let genome = Genome::new(
//!     (0..3)
//!         .map(|_| Box::new(FloatingPoint::new(-5.0, 5.0).unwrap()) as Box<dyn Allele>)
//!         .collect(),
//! )
//! .unwrap();
//! let sphere = FitnessFunction::scalar(|g: &Genotype| g.to_f64_vec().iter().map(|x| x * x).sum())
//!     .with_sense(Sense::Minimize);
//! let mut species = Species::new(genome, sphere, &SpeciesConfig::default()).unwrap();
//!
//! let result = SgRunner::run(&mut species, &SgConfig::default().with_seed(42)).unwrap();
//! let best = result.archive.best().unwrap().unwrap();
//! println!("{}", species.genome().format_genotype(&best.genotype));
//! ```

pub mod allele;
pub mod archive;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod genotype;
pub mod sg;
pub mod species;

pub use allele::{Gene, SampleMode};
pub use archive::{Archive, Snapshot};
pub use error::{Result, SgxError};
pub use fitness::{Comparable, Fitness, FitnessFunction};
pub use genome::Genome;
pub use genotype::Genotype;
pub use species::Species;

/// Whether invariant checks run after every update and archive insertion.
pub(crate) const PARANOIA: bool = cfg!(any(debug_assertions, feature = "paranoia"));
