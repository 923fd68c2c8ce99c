//! Selfish-gene optimization loop.
//!
//! Each generation samples two genotypes from a [`Species`](crate::species::Species),
//! lets them compete, rewards the winner's genes and offers both
//! individuals to an [`Archive`](crate::Archive). There is no population:
//! the per-locus distributions inside the genome are the whole search state.
//!
//! # Key Types
//!
//! - [`SgConfig`]: termination conditions, seed, concurrency
//! - [`SgRunner`]: executes the loop
//! - [`SgResult`]: final archive and run statistics
//!
//! # References
//!
//! - Corno, Reorda, Squillero (1998), *The Selfish Gene Algorithm: a New
//!   Evolutionary Optimization Strategy*
//! - Harik, Lobo, Goldberg (1999), *The Compact Genetic Algorithm*

mod config;
mod runner;

pub use config::SgConfig;
pub use runner::{SgResult, SgRunner};
