//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → selection → crossover → mutation → repeat.
//!
//! Selection and operators draw from the caller's RNG sequentially; only
//! offspring evaluation is distributed.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;

use super::config::GaConfig;
use super::operators::offset_mutation;
use super::selection::tournament;
use crate::problem::{best_index, for_each_candidate, interruption, StopReason, VectorProblem};

/// A chromosome and its fitness.
#[derive(Debug, Clone)]
struct Chromosome {
    genes: Vec<f64>,
    fitness: f64,
}

/// Result of a GA optimization run.
///
/// Contains the best chromosome found, along with statistics about the
/// evolutionary process.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best chromosome found during the entire run.
    pub best_genes: Vec<f64>,

    /// Fitness of `best_genes`.
    pub best_fitness: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Why the run stopped.
    pub stop_reason: StopReason,

    /// Best-ever fitness after initialization and after each generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let mut rng = StdRng::seed_from_u64(42);
/// let result = GaRunner::run(&problem, &GaConfig::default(), &mut rng);
/// println!("Best fitness: {}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`GaConfig::validate`] first
    /// to get a descriptive error).
    pub fn run<P: VectorProblem, R: Rng>(problem: &P, config: &GaConfig, rng: &mut R) -> GaResult {
        Self::run_with_cancel(problem, config, rng, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA will
    /// stop at the next generation boundary and return the best
    /// solution found so far.
    pub fn run_with_cancel<P: VectorProblem, R: Rng>(
        problem: &P,
        config: &GaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> GaResult {
        config.validate().expect("invalid GaConfig");
        let started = Instant::now();

        // 1. Initialize population
        let mut population: Vec<Chromosome> = (0..config.population_size)
            .map(|_| Chromosome {
                genes: problem.initial_vector(rng),
                fitness: f64::INFINITY,
            })
            .collect();

        // 2. Evaluate initial population
        for_each_candidate(&mut population, config.parallel, |c| {
            c.fitness = problem.evaluate(&c.genes);
        });

        // 3. Track best
        let first = best_index(population.iter().map(|c| c.fitness)).unwrap_or(0);
        let mut best = population[first].clone();
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.fitness);

        let mut stagnation_counter = 0usize;
        let mut generations = 0usize;
        let mut stop_reason = StopReason::Budget;

        // 4. Evolutionary loop
        for gen in 0..config.max_generations {
            if let Some(reason) = interruption(cancel.as_deref(), started, config.time_limit_ms) {
                stop_reason = reason;
                break;
            }

            // Sort population by fitness (ascending = best first, stable)
            population.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
            let fitness: Vec<f64> = population.iter().map(|c| c.fitness).collect();

            // Elite preservation
            let elite_count = config.elite_size;
            let mut next_gen: Vec<Chromosome> = population[..elite_count].to_vec();

            // Generate offspring
            let mutation_rate = config.mutation_rate_at(gen);
            while next_gen.len() < config.population_size {
                let p1 = tournament(&fitness, config.tournament_size, rng);
                let p2 = tournament(&fitness, config.tournament_size, rng);

                let mut genes =
                    config
                        .crossover
                        .apply(&population[p1].genes, &population[p2].genes, rng);
                offset_mutation(&mut genes, mutation_rate, config.mutation_step, rng);

                next_gen.push(Chromosome {
                    genes,
                    fitness: f64::INFINITY,
                });
            }

            // Evaluate new chromosomes (skip elites, they're already evaluated)
            for_each_candidate(&mut next_gen[elite_count..], config.parallel, |c| {
                c.fitness = problem.evaluate(&c.genes);
            });

            population = next_gen;

            // Update best
            let improved = match best_index(population.iter().map(|c| c.fitness)) {
                Some(i) if population[i].fitness < best.fitness => {
                    best = population[i].clone();
                    true
                }
                _ => false,
            };

            if improved {
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }

            generations = gen + 1;
            fitness_history.push(best.fitness);
            problem.on_step(generations, best.fitness);

            // Stagnation check
            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                stop_reason = StopReason::Stagnation;
                break;
            }
        }

        log::debug!(
            "GA stopped after {generations} generations ({stop_reason:?}), best fitness {}",
            best.fitness
        );

        GaResult {
            best_fitness: best.fitness,
            best_genes: best.genes,
            generations,
            stop_reason,
            fitness_history,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
