//! The continuous problem both engines optimize.
//!
//! [`VectorProblem`] is the seam between the search engines and the
//! timetabling domain: engines only see real vectors and scalar fitness.
//! [`TimetableProblem`] implements it by decoding each vector with the
//! [`SolutionCodec`] and scoring the result with the
//! [`ConstraintEvaluator`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::codec::SolutionCodec;
use crate::evaluator::{ConstraintEvaluator, Evaluation, SoftWeights};
use crate::models::{Instance, Timetable};

/// A minimization problem over real vectors.
///
/// # Thread Safety
///
/// `VectorProblem` must be `Send + Sync` because runners may evaluate
/// candidates of one step in parallel using rayon.
pub trait VectorProblem: Send + Sync {
    /// Vector length.
    fn dimension(&self) -> usize;

    /// Exclusive upper bound of each gene's initialization range.
    ///
    /// Lower bounds are `0.0`. Length equals [`dimension`](Self::dimension).
    fn upper_bounds(&self) -> Vec<f64>;

    /// Creates a random starting vector.
    ///
    /// The default draws each gene uniformly from `[0, upper_bound)`.
    fn initial_vector<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.upper_bounds()
            .into_iter()
            .map(|hi| rng.random_range(0.0..hi))
            .collect()
    }

    /// Fitness of a vector. Lower is better.
    fn evaluate(&self, genes: &[f64]) -> f64;

    /// Called at the end of each iteration or generation with the best
    /// fitness recorded so far. The default implementation is a no-op.
    fn on_step(&self, _step: usize, _best_fitness: f64) {}
}

/// Why a runner stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StopReason {
    /// The iteration or generation budget was spent.
    Budget,
    /// The best fitness did not improve for the patience window.
    Stagnation,
    /// The cancellation flag was raised.
    Cancelled,
    /// The wall-clock limit elapsed.
    TimeLimit,
}

/// Timetabling as a [`VectorProblem`].
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    instance: Instance,
    weights: SoftWeights,
    bounds: Vec<f64>,
}

impl TimetableProblem {
    /// Creates the problem for a validated instance.
    pub fn new(instance: Instance, weights: SoftWeights) -> Self {
        let bounds = SolutionCodec::new(&instance).upper_bounds();
        Self {
            instance,
            weights,
            bounds,
        }
    }

    /// The problem's instance.
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Codec bound to this instance.
    pub fn codec(&self) -> SolutionCodec<'_> {
        SolutionCodec::new(&self.instance)
    }

    /// Evaluator bound to this instance and weights.
    pub fn evaluator(&self) -> ConstraintEvaluator<'_> {
        ConstraintEvaluator::new(&self.instance, self.weights)
    }

    /// Decodes a vector into a timetable.
    pub fn decode(&self, genes: &[f64]) -> Timetable {
        self.codec().decode(genes)
    }

    /// Decodes and fully scores a vector.
    pub fn assess(&self, genes: &[f64]) -> (Timetable, Evaluation) {
        let timetable = self.decode(genes);
        let evaluation = self.evaluator().evaluate(&timetable);
        (timetable, evaluation)
    }
}

impl VectorProblem for TimetableProblem {
    fn dimension(&self) -> usize {
        self.bounds.len()
    }

    fn upper_bounds(&self) -> Vec<f64> {
        self.bounds.clone()
    }

    fn initial_vector<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.codec().random_vector(rng)
    }

    fn evaluate(&self, genes: &[f64]) -> f64 {
        self.assess(genes).1.fitness
    }

    fn on_step(&self, step: usize, best_fitness: f64) {
        log::trace!("step {step}: best fitness {best_fitness}");
    }
}

/// Checks the external stop conditions at a step boundary.
pub(crate) fn interruption(
    cancel: Option<&AtomicBool>,
    started: Instant,
    time_limit_ms: Option<u64>,
) -> Option<StopReason> {
    if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
        return Some(StopReason::Cancelled);
    }
    match time_limit_ms {
        Some(ms) if started.elapsed().as_millis() >= u128::from(ms) => Some(StopReason::TimeLimit),
        _ => None,
    }
}

/// Applies `f` to every item, on the rayon pool when `parallel` is set.
#[cfg(feature = "parallel")]
pub(crate) fn for_each_candidate<T, F>(items: &mut [T], parallel: bool, f: F)
where
    T: Send,
    F: Fn(&mut T) + Send + Sync,
{
    use rayon::prelude::*;

    if parallel {
        items.par_iter_mut().for_each(f);
    } else {
        items.iter_mut().for_each(f);
    }
}

/// Applies `f` to every item in order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_candidate<T, F>(items: &mut [T], _parallel: bool, f: F)
where
    T: Send,
    F: Fn(&mut T) + Send + Sync,
{
    items.iter_mut().for_each(f);
}

/// Index of the lowest fitness, first index winning ties.
///
/// NaN fitness never wins.
pub(crate) fn best_index<I: Iterator<Item = f64>>(fitnesses: I) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, f) in fitnesses.enumerate() {
        match best {
            Some((_, b)) if f >= b || f.is_nan() => {}
            None if f.is_nan() => {}
            _ => best = Some((i, f)),
        }
    }
    best.map(|(i, _)| i)
}
