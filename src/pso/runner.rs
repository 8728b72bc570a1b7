//! PSO swarm loop execution.
//!
//! [`PsoRunner`] orchestrates the swarm:
//! initialization → evaluation → velocity/position update → evaluation →
//! best update → repeat.
//!
//! All random draws happen on the calling thread in particle order; only
//! fitness evaluation is distributed. Personal and global bests change on
//! strict improvement only, lowest particle index winning ties, so results
//! do not depend on evaluation order.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;

use super::config::PsoConfig;
use crate::problem::{best_index, for_each_candidate, interruption, StopReason, VectorProblem};

/// One particle of the swarm.
#[derive(Debug, Clone)]
struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    fitness: f64,
    best_position: Vec<f64>,
    best_fitness: f64,
}

/// Result of a PSO run.
#[derive(Debug, Clone)]
pub struct PsoResult {
    /// Global-best position found during the run.
    pub best_position: Vec<f64>,

    /// Fitness of `best_position`.
    pub best_fitness: f64,

    /// Number of completed iterations.
    pub iterations: usize,

    /// Why the run stopped.
    pub stop_reason: StopReason,

    /// Global-best fitness after initialization and after each iteration.
    pub fitness_history: Vec<f64>,

    /// Number of non-finite velocity or position components repaired.
    pub repaired_components: usize,
}

/// Executes the PSO swarm loop.
///
/// # Usage
///
/// ```ignore
/// let mut rng = StdRng::seed_from_u64(42);
/// let result = PsoRunner::run(&problem, &PsoConfig::default(), &mut rng);
/// println!("Best fitness: {}", result.best_fitness);
/// ```
pub struct PsoRunner;

impl PsoRunner {
    /// Runs PSO.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`PsoConfig::validate`]
    /// first to get a descriptive error).
    pub fn run<P: VectorProblem, R: Rng>(problem: &P, config: &PsoConfig, rng: &mut R) -> PsoResult {
        Self::run_with_cancel(problem, config, rng, None)
    }

    /// Runs PSO with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the swarm stops
    /// at the next iteration boundary and returns the best position so far.
    pub fn run_with_cancel<P: VectorProblem, R: Rng>(
        problem: &P,
        config: &PsoConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> PsoResult {
        config.validate().expect("invalid PsoConfig");
        let started = Instant::now();

        let bounds = problem.upper_bounds();
        let v_max = config.max_velocity;

        // 1. Initialize swarm
        let mut swarm: Vec<Particle> = (0..config.swarm_size)
            .map(|_| {
                let position = problem.initial_vector(rng);
                let velocity = (0..position.len())
                    .map(|_| rng.random_range(-v_max..=v_max))
                    .collect();
                Particle {
                    best_position: position.clone(),
                    position,
                    velocity,
                    fitness: f64::INFINITY,
                    best_fitness: f64::INFINITY,
                }
            })
            .collect();

        // 2. Evaluate initial swarm
        for_each_candidate(&mut swarm, config.parallel, |p| {
            p.fitness = problem.evaluate(&p.position);
            p.best_fitness = p.fitness;
        });

        // 3. Track global best
        let first = best_index(swarm.iter().map(|p| p.fitness)).unwrap_or(0);
        let mut global_best = swarm[first].position.clone();
        let mut global_best_fitness = swarm[first].fitness;

        let mut fitness_history = Vec::with_capacity(config.max_iterations + 1);
        fitness_history.push(global_best_fitness);

        let mut stagnation_counter = 0usize;
        let mut repaired_components = 0usize;
        let mut iterations = 0usize;
        let mut stop_reason = StopReason::Budget;

        // 4. Swarm loop
        for iter in 0..config.max_iterations {
            if let Some(reason) = interruption(cancel.as_deref(), started, config.time_limit_ms) {
                stop_reason = reason;
                break;
            }

            let inertia = config.inertia_at(iter);

            // Move every particle. Sequential: the RNG stream order is fixed.
            for particle in &mut swarm {
                let r1: f64 = rng.random();
                let r2: f64 = rng.random();
                repaired_components += move_particle(
                    particle,
                    &global_best,
                    &bounds,
                    inertia,
                    config.cognitive * r1,
                    config.social * r2,
                    v_max,
                );
            }

            for_each_candidate(&mut swarm, config.parallel, |p| {
                p.fitness = problem.evaluate(&p.position);
            });

            // Personal bests
            for particle in &mut swarm {
                if particle.fitness < particle.best_fitness {
                    particle.best_fitness = particle.fitness;
                    particle.best_position.clone_from(&particle.position);
                }
            }

            // Global best
            let improved = match best_index(swarm.iter().map(|p| p.fitness)) {
                Some(i) if swarm[i].fitness < global_best_fitness => {
                    global_best_fitness = swarm[i].fitness;
                    global_best.clone_from(&swarm[i].position);
                    true
                }
                _ => false,
            };

            if improved {
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }

            iterations = iter + 1;
            fitness_history.push(global_best_fitness);
            problem.on_step(iterations, global_best_fitness);

            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                stop_reason = StopReason::Stagnation;
                break;
            }
        }

        if repaired_components > 0 {
            log::warn!("PSO repaired {repaired_components} non-finite particle components");
        }
        log::debug!(
            "PSO stopped after {iterations} iterations ({stop_reason:?}), best fitness {global_best_fitness}"
        );

        PsoResult {
            best_position: global_best,
            best_fitness: global_best_fitness,
            iterations,
            stop_reason,
            fitness_history,
            repaired_components,
        }
    }
}

/// Applies one velocity and position update, returning how many
/// non-finite components were repaired.
///
/// `pull_own` and `pull_swarm` are `c1·r1` and `c2·r2`.
fn move_particle(
    particle: &mut Particle,
    global_best: &[f64],
    bounds: &[f64],
    inertia: f64,
    pull_own: f64,
    pull_swarm: f64,
    v_max: f64,
) -> usize {
    let mut repaired = 0;
    for d in 0..particle.position.len() {
        let x = particle.position[d];
        let mut v = inertia * particle.velocity[d]
            + pull_own * (particle.best_position[d] - x)
            + pull_swarm * (global_best[d] - x);
        if !v.is_finite() {
            v = 0.0;
            repaired += 1;
        }
        v = v.clamp(-v_max, v_max);
        particle.velocity[d] = v;

        let moved = x + v;
        particle.position[d] = if moved.is_finite() {
            moved
        } else {
            repaired += 1;
            repair_position(moved, bounds[d])
        };
    }
    repaired
}

/// Maps a non-finite coordinate back into `[0, upper)`.
fn repair_position(x: f64, upper: f64) -> f64 {
    if x == f64::INFINITY {
        (upper - 1.0).max(0.0)
    } else {
        0.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::Ordering;

    // ---- Shifted sphere: minimum at (2, 2, ..., 2) ----

    struct ShiftedSphere {
        dim: usize,
    }

    impl VectorProblem for ShiftedSphere {
        fn dimension(&self) -> usize {
            self.dim
        }

        fn upper_bounds(&self) -> Vec<f64> {
            vec![5.0; self.dim]
        }

        fn evaluate(&self, genes: &[f64]) -> f64 {
            genes.iter().map(|x| (x - 2.0).powi(2)).sum()
        }
    }

    fn config() -> PsoConfig {
        PsoConfig::default()
            .with_swarm_size(30)
            .with_max_iterations(100)
            .with_parallel(false)
    }

    #[test]
    fn test_sphere_convergence() {
        let problem = ShiftedSphere { dim: 4 };
        let mut rng = StdRng::seed_from_u64(42);
        let result = PsoRunner::run(&problem, &config().with_stagnation_limit(0), &mut rng);

        assert!(
            result.best_fitness < 0.5,
            "expected fitness < 0.5 for 4D sphere, got {}",
            result.best_fitness
        );
        assert_eq!(result.stop_reason, StopReason::Budget);
        assert_eq!(result.iterations, 100);
    }

    #[test]
    fn test_global_best_non_increasing() {
        let problem = ShiftedSphere { dim: 6 };
        let mut rng = StdRng::seed_from_u64(7);
        let result = PsoRunner::run(&problem, &config(), &mut rng);

        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "global best should never get worse: {} > {}",
                window[1],
                window[0]
            );
        }
        assert_eq!(result.fitness_history.len(), result.iterations + 1);
    }

    #[test]
    fn test_best_position_matches_fitness() {
        let problem = ShiftedSphere { dim: 3 };
        let mut rng = StdRng::seed_from_u64(3);
        let result = PsoRunner::run(&problem, &config(), &mut rng);
        assert!((problem.evaluate(&result.best_position) - result.best_fitness).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let problem = ShiftedSphere { dim: 5 };
        let a = PsoRunner::run(&problem, &config(), &mut StdRng::seed_from_u64(11));
        let b = PsoRunner::run(&problem, &config(), &mut StdRng::seed_from_u64(11));
        assert_eq!(a.best_position, b.best_position);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let problem = ShiftedSphere { dim: 5 };
        let seq = PsoRunner::run(&problem, &config(), &mut StdRng::seed_from_u64(5));
        let par = PsoRunner::run(
            &problem,
            &config().with_parallel(true),
            &mut StdRng::seed_from_u64(5),
        );
        assert_eq!(seq.best_position, par.best_position);
        assert_eq!(seq.fitness_history, par.fitness_history);
    }

    // ---- Flat landscape: nothing ever improves ----

    struct Flat;

    impl VectorProblem for Flat {
        fn dimension(&self) -> usize {
            2
        }

        fn upper_bounds(&self) -> Vec<f64> {
            vec![1.0; 2]
        }

        fn evaluate(&self, _genes: &[f64]) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_stagnation_termination() {
        let mut rng = StdRng::seed_from_u64(42);
        let result = PsoRunner::run(
            &Flat,
            &config().with_max_iterations(1000).with_stagnation_limit(10),
            &mut rng,
        );
        assert_eq!(result.stop_reason, StopReason::Stagnation);
        assert_eq!(result.iterations, 10);
    }

    #[test]
    fn test_cancellation() {
        let cancel = Arc::new(AtomicBool::new(true));
        let mut rng = StdRng::seed_from_u64(42);
        let result = PsoRunner::run_with_cancel(
            &ShiftedSphere { dim: 3 },
            &config(),
            &mut rng,
            Some(cancel.clone()),
        );
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.fitness_history.len(), 1);
        assert!(cancel.load(Ordering::Relaxed));
    }

    #[test]
    fn test_repair_non_finite() {
        let mut particle = Particle {
            position: vec![f64::MAX, 1.0],
            velocity: vec![f64::NAN, 0.0],
            fitness: 0.0,
            best_position: vec![1.0, 1.0],
            best_fitness: 0.0,
        };
        let repaired = move_particle(&mut particle, &[1.0, 1.0], &[5.0, 5.0], 0.5, 1.0, 1.0, 4.0);
        assert!(repaired >= 1);
        assert!(particle.velocity.iter().all(|v| v.is_finite()));
        assert!(particle.position.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_repair_position() {
        assert_eq!(repair_position(f64::NAN, 5.0), 0.0);
        assert_eq!(repair_position(f64::NEG_INFINITY, 5.0), 0.0);
        assert_eq!(repair_position(f64::INFINITY, 5.0), 4.0);
    }
}
