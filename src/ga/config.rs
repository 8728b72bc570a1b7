//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::operators::Crossover;

/// Configuration for the Genetic Algorithm.
///
/// Controls population size, elitism, selection pressure, operator rates,
/// termination conditions, and parallelism.
///
/// # Defaults
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 200);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(150)
///     .with_tournament_size(5)
///     .with_elite_size(4)
///     .with_mutation_rate(0.1, 0.25);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Number of chromosomes in the population.
    ///
    /// Typical range: 50–200.
    #[cfg_attr(feature = "serde", serde(alias = "population"))]
    pub population_size: usize,

    /// Maximum number of generations before termination.
    ///
    /// Typical range: 100–500.
    pub max_generations: usize,

    /// Number of best chromosomes copied unchanged into the next generation.
    ///
    /// Typical range: 2–5.
    pub elite_size: usize,

    /// Number of chromosomes sampled per tournament.
    ///
    /// Higher = stronger selection pressure. Typical range: 3–5.
    pub tournament_size: usize,

    /// Recombination operator.
    pub crossover: Crossover,

    /// Per-gene mutation probability at the last generation.
    pub mutation_rate_min: f64,

    /// Per-gene mutation probability at the first generation.
    ///
    /// The rate anneals linearly toward `mutation_rate_min`.
    /// Typical range: 0.1–0.3.
    pub mutation_rate_max: f64,

    /// Bound of the uniform offset added to a mutated gene.
    pub mutation_step: f64,

    /// Generations without best-ever improvement before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Whether to evaluate offspring in parallel using rayon.
    pub parallel: bool,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// The check happens at the start of each generation, so the actual
    /// runtime may exceed this limit by one generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 200,
            elite_size: 2,
            tournament_size: 3,
            crossover: Crossover::default(),
            mutation_rate_min: 0.1,
            mutation_rate_max: 0.3,
            mutation_step: 2.0,
            stagnation_limit: 50,
            parallel: true,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the number of elites.
    pub fn with_elite_size(mut self, n: usize) -> Self {
        self.elite_size = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the mutation rate range, each clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, min: f64, max: f64) -> Self {
        self.mutation_rate_min = min.clamp(0.0, 1.0);
        self.mutation_rate_max = max.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation offset bound.
    pub fn with_mutation_step(mut self, step: f64) -> Self {
        self.mutation_step = step;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Per-gene mutation probability used in `generation` (0-based).
    ///
    /// Anneals linearly from `mutation_rate_max` at generation 0 to
    /// `mutation_rate_min` at the last generation.
    pub fn mutation_rate_at(&self, generation: usize) -> f64 {
        if self.max_generations <= 1 {
            return self.mutation_rate_max;
        }
        let progress = (generation as f64 / (self.max_generations - 1) as f64).min(1.0);
        self.mutation_rate_max - (self.mutation_rate_max - self.mutation_rate_min) * progress
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if self.elite_size >= self.population_size {
            return Err("elite_size too high: elites fill entire population".into());
        }
        if self.tournament_size == 0 {
            return Err("tournament_size must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate_min)
            || !(0.0..=1.0).contains(&self.mutation_rate_max)
        {
            return Err("mutation rates must lie in [0, 1]".into());
        }
        if self.mutation_rate_min > self.mutation_rate_max {
            return Err("mutation_rate_min must not exceed mutation_rate_max".into());
        }
        if !(self.mutation_step.is_finite() && self.mutation_step > 0.0) {
            return Err("mutation_step must be finite and positive".into());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 200);
        assert_eq!(config.elite_size, 2);
        assert_eq!(config.tournament_size, 3);
        assert_eq!(config.crossover, Crossover::Uniform);
        assert!((config.mutation_rate_min - 0.1).abs() < 1e-10);
        assert!((config.mutation_rate_max - 0.3).abs() < 1e-10);
        assert!((config.mutation_step - 2.0).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 50);
        assert!(config.parallel);
        assert!(config.time_limit_ms.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(60)
            .with_max_generations(400)
            .with_elite_size(5)
            .with_tournament_size(4)
            .with_crossover(Crossover::SinglePoint)
            .with_mutation_rate(0.05, 0.2)
            .with_mutation_step(1.0)
            .with_stagnation_limit(0)
            .with_parallel(false);

        assert_eq!(config.population_size, 60);
        assert_eq!(config.max_generations, 400);
        assert_eq!(config.elite_size, 5);
        assert_eq!(config.tournament_size, 4);
        assert_eq!(config.crossover, Crossover::SinglePoint);
        assert!((config.mutation_rate_min - 0.05).abs() < 1e-10);
        assert!((config.mutation_rate_max - 0.2).abs() < 1e-10);
        assert!((config.mutation_step - 1.0).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 0);
        assert!(!config.parallel);
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = GaConfig::default().with_max_generations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_elite_too_high() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elite_size(10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_tournament() {
        let config = GaConfig::default().with_tournament_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_inverted_mutation_rates() {
        let config = GaConfig::default().with_mutation_rate(0.3, 0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default().with_mutation_rate(-0.5, 2.0);
        assert!((config.mutation_rate_min - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate_max - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_zero_time_limit() {
        let config = GaConfig::default().with_time_limit_ms(0);
        assert!(config.validate().is_err());
    }

    // ---- Adaptive mutation ----

    #[test]
    fn test_mutation_rate_anneals() {
        let config = GaConfig::default().with_max_generations(11);
        assert!((config.mutation_rate_at(0) - 0.3).abs() < 1e-12);
        assert!((config.mutation_rate_at(5) - 0.2).abs() < 1e-12);
        assert!((config.mutation_rate_at(10) - 0.1).abs() < 1e-12);
        assert!((config.mutation_rate_at(50) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_mutation_rate_single_generation() {
        let config = GaConfig::default().with_max_generations(1);
        assert!((config.mutation_rate_at(0) - 0.3).abs() < 1e-12);
    }
}
