//! Genetic Algorithm over real vectors.
//!
//! Chromosomes are real vectors scored by a
//! [`VectorProblem`](crate::problem::VectorProblem). Each generation keeps
//! the elites, then fills the population with tournament-selected parents
//! recombined by [`Crossover`] and perturbed by bounded offset mutation whose
//! rate anneals over the run.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, operators, presets)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Best chromosome with history
//!
//! # Submodules
//!
//! - [`operators`]: Real-vector crossover and mutation operators
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
pub mod operators;
mod runner;
mod selection;

pub use config::GaConfig;
pub use operators::Crossover;
pub use runner::{GaResult, GaRunner};
pub use selection::tournament;
