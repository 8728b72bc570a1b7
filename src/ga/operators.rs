//! Real-vector genetic operators.
//!
//! Crossover and mutation for chromosomes encoded as `&[f64]`.
//!
//! # Crossover Operators
//!
//! - [`uniform_crossover`]: each gene from either parent with equal
//!   probability, O(n)
//! - [`single_point_crossover`]: prefix from one parent, suffix from the
//!   other, O(n)
//!
//! # Mutation Operators
//!
//! - [`offset_mutation`]: per-gene bounded uniform offset, O(n)
//!
//! # References
//!
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"
//! - Eiben & Smith (2015), *Introduction to Evolutionary Computing*, Ch. 4

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Recombination operator used by the GA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Crossover {
    /// See [`uniform_crossover`].
    #[default]
    Uniform,
    /// See [`single_point_crossover`].
    SinglePoint,
}

impl Crossover {
    /// Produces one child from two parents.
    pub fn apply<R: Rng>(&self, parent1: &[f64], parent2: &[f64], rng: &mut R) -> Vec<f64> {
        match self {
            Crossover::Uniform => uniform_crossover(parent1, parent2, rng),
            Crossover::SinglePoint => single_point_crossover(parent1, parent2, rng),
        }
    }
}

/// Uniform crossover: each gene is taken from either parent with
/// probability ½.
///
/// # Panics
/// Panics if parents have different lengths.
pub fn uniform_crossover<R: Rng>(parent1: &[f64], parent2: &[f64], rng: &mut R) -> Vec<f64> {
    assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    parent1
        .iter()
        .zip(parent2)
        .map(|(&a, &b)| if rng.random_bool(0.5) { a } else { b })
        .collect()
}

/// Single-point crossover: genes before a random cut come from `parent1`,
/// the rest from `parent2`.
///
/// # Panics
/// Panics if parents have different lengths.
pub fn single_point_crossover<R: Rng>(parent1: &[f64], parent2: &[f64], rng: &mut R) -> Vec<f64> {
    assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    let n = parent1.len();
    if n == 0 {
        return Vec::new();
    }
    let cut = rng.random_range(0..=n);
    let mut child = Vec::with_capacity(n);
    child.extend_from_slice(&parent1[..cut]);
    child.extend_from_slice(&parent2[cut..]);
    child
}

/// Mutates each gene independently with probability `rate` by adding an
/// offset drawn uniformly from `[-step, step]`.
///
/// Returns the number of mutated genes.
pub fn offset_mutation<R: Rng>(genes: &mut [f64], rate: f64, step: f64, rng: &mut R) -> usize {
    let rate = rate.clamp(0.0, 1.0);
    let mut mutated = 0;
    for gene in genes.iter_mut() {
        if rng.random_bool(rate) {
            *gene += rng.random_range(-step..=step);
            mutated += 1;
        }
    }
    mutated
}
