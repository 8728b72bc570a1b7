//! Run orchestration.
//!
//! [`Optimizer`] turns caller records into a validated instance, seeds one
//! RNG from [`RunConfig::seed`], runs the selected engine and decodes the
//! best vector into a [`BestTimetableResult`].
//!
//! # Lifecycle
//!
//! ```text
//! Init ──run()──▶ Running ──▶ Converged | Exhausted | InfeasibleAfterBudget ──▶ Done
//! ```

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::evaluator::SoftWeights;
use crate::ga::{GaConfig, GaRunner};
use crate::models::{CourseRecord, Instance, LecturerRecord, SessionRecord};
use crate::problem::{StopReason, TimetableProblem};
use crate::pso::{PsoConfig, PsoRunner};

/// Search engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    /// Particle Swarm Optimization.
    #[default]
    Pso,
    /// Genetic Algorithm.
    Ga,
}

/// Configuration of one optimization run.
///
/// `max_steps` and `patience`, when set, override the selected engine's
/// iteration/generation budget and stagnation limit. `time_limit_ms` and
/// `parallel` always apply to the selected engine.
///
/// # Examples
///
/// ```
/// use u_timetable::driver::{Algorithm, RunConfig};
///
/// let config = RunConfig::ga(7).with_max_steps(50).with_parallel(false);
/// assert_eq!(config.algorithm, Algorithm::Ga);
/// assert_eq!(config.ga_config().max_generations, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Engine to run.
    pub algorithm: Algorithm,

    /// Seed of the run's RNG. Same seed, input and config give the same
    /// result.
    pub seed: u64,

    /// Iteration (PSO) or generation (GA) budget override.
    #[cfg_attr(feature = "serde", serde(alias = "iteration_or_generation_budget"))]
    pub max_steps: Option<usize>,

    /// Stagnation limit override (0 disables).
    pub patience: Option<usize>,

    /// Optional wall-clock time limit in milliseconds.
    pub time_limit_ms: Option<u64>,

    /// Whether to evaluate candidates in parallel using rayon.
    pub parallel: bool,

    /// Soft-cost weights.
    pub weights: SoftWeights,

    /// PSO parameters.
    pub pso: PsoConfig,

    /// GA parameters.
    pub ga: GaConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            seed: 42,
            max_steps: None,
            patience: None,
            time_limit_ms: None,
            parallel: true,
            weights: SoftWeights::default(),
            pso: PsoConfig::default(),
            ga: GaConfig::default(),
        }
    }
}

impl RunConfig {
    /// PSO run with default parameters.
    pub fn pso(seed: u64) -> Self {
        Self {
            algorithm: Algorithm::Pso,
            seed,
            ..Self::default()
        }
    }

    /// GA run with default parameters.
    pub fn ga(seed: u64) -> Self {
        Self {
            algorithm: Algorithm::Ga,
            seed,
            ..Self::default()
        }
    }

    /// Sets the engine.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the engine's step budget.
    pub fn with_max_steps(mut self, n: usize) -> Self {
        self.max_steps = Some(n);
        self
    }

    /// Overrides the engine's stagnation limit.
    pub fn with_patience(mut self, n: usize) -> Self {
        self.patience = Some(n);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the soft-cost weights.
    pub fn with_weights(mut self, weights: SoftWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replaces the PSO parameters.
    pub fn with_pso(mut self, pso: PsoConfig) -> Self {
        self.pso = pso;
        self
    }

    /// Replaces the GA parameters.
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    /// PSO parameters with the run-level overrides applied.
    pub fn pso_config(&self) -> PsoConfig {
        let mut pso = self.pso.clone().with_parallel(self.parallel);
        if let Some(n) = self.max_steps {
            pso.max_iterations = n;
        }
        if let Some(n) = self.patience {
            pso.stagnation_limit = n;
        }
        pso.time_limit_ms = self.time_limit_ms;
        pso
    }

    /// GA parameters with the run-level overrides applied.
    pub fn ga_config(&self) -> GaConfig {
        let mut ga = self.ga.clone().with_parallel(self.parallel);
        if let Some(n) = self.max_steps {
            ga.max_generations = n;
        }
        if let Some(n) = self.patience {
            ga.stagnation_limit = n;
        }
        ga.time_limit_ms = self.time_limit_ms;
        ga
    }

    /// Validates the weights and the selected engine's effective parameters.
    pub fn validate(&self) -> Result<()> {
        let engine = match self.algorithm {
            Algorithm::Pso => self.pso_config().validate(),
            Algorithm::Ga => self.ga_config().validate(),
        };
        self.weights
            .validate()
            .and(engine)
            .map_err(TimetableError::InvalidConfig)
    }
}

/// Lifecycle state of an [`Optimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Instance and configuration validated; nothing run yet.
    Init,
    /// The engine is iterating.
    Running,
    /// Stopped on patience with a feasible incumbent.
    Converged,
    /// Stopped on budget, time limit or cancellation with a feasible incumbent.
    Exhausted,
    /// Stopped with hard violations remaining.
    InfeasibleAfterBudget,
    /// Result returned to the caller.
    Done,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    /// Feasible; stopped because the best stopped improving.
    Converged,
    /// Feasible; stopped on budget, time limit or cancellation.
    Exhausted,
    /// No feasible timetable was found.
    InfeasibleAfterBudget,
}

impl Outcome {
    /// Classifies a stopped run.
    pub fn classify(stop_reason: StopReason, feasible: bool) -> Self {
        match (feasible, stop_reason) {
            (false, _) => Outcome::InfeasibleAfterBudget,
            (true, StopReason::Stagnation) => Outcome::Converged,
            (true, _) => Outcome::Exhausted,
        }
    }

    fn phase(self) -> RunPhase {
        match self {
            Outcome::Converged => RunPhase::Converged,
            Outcome::Exhausted => RunPhase::Exhausted,
            Outcome::InfeasibleAfterBudget => RunPhase::InfeasibleAfterBudget,
        }
    }
}

/// Best timetable found by a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BestTimetableResult {
    /// One session per course, in course order.
    pub sessions: Vec<SessionRecord>,
    /// `true` if no hard constraint is violated.
    pub feasible: bool,
    /// Fitness of the best vector (lower is better).
    pub fitness: f64,
    /// Best fitness after initialization and after each step.
    pub trace: Vec<f64>,
    /// Classification of the stop.
    pub outcome: Outcome,
    /// Why the engine stopped.
    pub stop_reason: StopReason,
    /// Completed iterations or generations.
    pub steps: usize,
    /// Hard violations of the best timetable.
    pub hard_violations: u32,
    /// Soft cost of the best timetable.
    pub soft_cost: f64,
}

/// Entry point: validates input once, then runs the configured engine.
///
/// # Examples
///
/// ```
/// use u_timetable::driver::{Optimizer, RunConfig};
/// use u_timetable::models::{CourseRecord, LecturerRecord};
///
/// let courses = vec![CourseRecord::new(1, "Algebra", 2, vec![0, 1], 10)];
/// let lecturers = vec![LecturerRecord::new(10, "Dr. Noether")];
///
/// let mut optimizer = Optimizer::new(&courses, &lecturers, RunConfig::pso(1)).unwrap();
/// let result = optimizer.run();
/// assert!(result.feasible);
/// assert_eq!(result.sessions.len(), 1);
/// ```
#[derive(Debug)]
pub struct Optimizer {
    problem: TimetableProblem,
    config: RunConfig,
    phase: RunPhase,
}

impl Optimizer {
    /// Validates the records and configuration.
    ///
    /// # Errors
    ///
    /// [`TimetableError::InvalidCourseReference`] or
    /// [`TimetableError::MalformedInput`] for bad records,
    /// [`TimetableError::InvalidConfig`] for a rejected configuration.
    pub fn new(
        courses: &[CourseRecord],
        lecturers: &[LecturerRecord],
        config: RunConfig,
    ) -> Result<Self> {
        config.validate()?;
        let instance = Instance::from_records(courses, lecturers)?;
        Ok(Self {
            problem: TimetableProblem::new(instance, config.weights),
            config,
            phase: RunPhase::Init,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// The run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The problem being optimized, for decoding or violation reports.
    pub fn problem(&self) -> &TimetableProblem {
        &self.problem
    }

    /// Runs the configured engine to completion.
    pub fn run(&mut self) -> BestTimetableResult {
        self.run_inner(None)
    }

    /// Runs the configured engine, stopping early once `cancel` is set.
    ///
    /// The flag is checked at step boundaries; the best timetable so far is
    /// returned.
    pub fn run_with_cancel(&mut self, cancel: Arc<AtomicBool>) -> BestTimetableResult {
        self.run_inner(Some(cancel))
    }

    fn run_inner(&mut self, cancel: Option<Arc<AtomicBool>>) -> BestTimetableResult {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.phase = RunPhase::Running;
        log::info!(
            "starting {:?} run: {} courses, seed {}",
            self.config.algorithm,
            self.problem.instance().num_courses(),
            self.config.seed
        );

        // Configs were validated in `new`, so the runners cannot panic.
        let (genes, fitness, trace, steps, stop_reason) = match self.config.algorithm {
            Algorithm::Pso => {
                let r = PsoRunner::run_with_cancel(
                    &self.problem,
                    &self.config.pso_config(),
                    &mut rng,
                    cancel,
                );
                (r.best_position, r.best_fitness, r.fitness_history, r.iterations, r.stop_reason)
            }
            Algorithm::Ga => {
                let r = GaRunner::run_with_cancel(
                    &self.problem,
                    &self.config.ga_config(),
                    &mut rng,
                    cancel,
                );
                (r.best_genes, r.best_fitness, r.fitness_history, r.generations, r.stop_reason)
            }
        };

        let (timetable, evaluation) = self.problem.assess(&genes);
        let feasible = evaluation.is_feasible();
        let outcome = Outcome::classify(stop_reason, feasible);
        self.phase = outcome.phase();

        log::info!(
            "{:?} run finished: {outcome:?} after {steps} steps, {} hard violations, soft cost {:.3}",
            self.config.algorithm,
            evaluation.hard_violations,
            evaluation.soft_cost
        );

        let result = BestTimetableResult {
            sessions: timetable.to_records(),
            feasible,
            fitness,
            trace,
            outcome,
            stop_reason,
            steps,
            hard_violations: evaluation.hard_violations,
            soft_cost: evaluation.soft_cost,
        };
        self.phase = RunPhase::Done;
        result
    }
}
