//! PSO configuration.
//!
//! [`PsoConfig`] holds all parameters that control the swarm loop.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for Particle Swarm Optimization.
///
/// # Defaults
///
/// ```
/// use u_timetable::pso::PsoConfig;
///
/// let config = PsoConfig::default();
/// assert_eq!(config.swarm_size, 50);
/// assert_eq!(config.max_iterations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::pso::PsoConfig;
///
/// let config = PsoConfig::default()
///     .with_swarm_size(80)
///     .with_inertia(0.4, 0.9)
///     .with_coefficients(1.8, 2.2)
///     .with_max_velocity(3.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PsoConfig {
    /// Number of particles.
    ///
    /// Typical range: 20–100.
    #[cfg_attr(feature = "serde", serde(alias = "particles"))]
    pub swarm_size: usize,

    /// Maximum number of iterations before termination.
    ///
    /// Typical range: 50–200.
    pub max_iterations: usize,

    /// Inertia weight at the last iteration.
    pub inertia_min: f64,

    /// Inertia weight at the first iteration.
    ///
    /// Inertia decays linearly from `inertia_max` to `inertia_min`.
    /// Typical range: 0.4–0.9.
    pub inertia_max: f64,

    /// Cognitive coefficient `c1`: pull toward the particle's own best.
    ///
    /// Typical range: 1.5–2.5.
    #[cfg_attr(feature = "serde", serde(alias = "c1"))]
    pub cognitive: f64,

    /// Social coefficient `c2`: pull toward the swarm's best.
    ///
    /// Typical range: 1.5–2.5.
    #[cfg_attr(feature = "serde", serde(alias = "c2"))]
    pub social: f64,

    /// Per-component velocity bound `v_max`.
    #[cfg_attr(feature = "serde", serde(alias = "v_max"))]
    pub max_velocity: f64,

    /// Iterations without global-best improvement before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Whether to evaluate particles in parallel using rayon.
    pub parallel: bool,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked once per iteration, so the run may exceed it by one
    /// iteration's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            swarm_size: 50,
            max_iterations: 100,
            inertia_min: 0.4,
            inertia_max: 0.9,
            cognitive: 2.0,
            social: 2.0,
            max_velocity: 4.0,
            stagnation_limit: 30,
            parallel: true,
            time_limit_ms: None,
        }
    }
}

impl PsoConfig {
    /// Sets the number of particles.
    pub fn with_swarm_size(mut self, n: usize) -> Self {
        self.swarm_size = n;
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the inertia range `[min, max]`.
    pub fn with_inertia(mut self, min: f64, max: f64) -> Self {
        self.inertia_min = min;
        self.inertia_max = max;
        self
    }

    /// Sets the cognitive (`c1`) and social (`c2`) coefficients.
    pub fn with_coefficients(mut self, cognitive: f64, social: f64) -> Self {
        self.cognitive = cognitive;
        self.social = social;
        self
    }

    /// Sets the velocity bound.
    pub fn with_max_velocity(mut self, v_max: f64) -> Self {
        self.max_velocity = v_max;
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

    /// Inertia weight used at `iteration` (0-based).
    ///
    /// `w = w_max − (w_max − w_min) · iteration / max_iterations`
    pub fn inertia_at(&self, iteration: usize) -> f64 {
        if self.max_iterations == 0 {
            return self.inertia_max;
        }
        let progress = iteration as f64 / self.max_iterations as f64;
        self.inertia_max - (self.inertia_max - self.inertia_min) * progress
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.swarm_size < 2 {
            return Err("swarm_size must be at least 2".into());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if !(self.inertia_min.is_finite() && self.inertia_max.is_finite()) {
            return Err("inertia weights must be finite".into());
        }
        if self.inertia_min < 0.0 || self.inertia_min > self.inertia_max {
            return Err("inertia must satisfy 0 <= inertia_min <= inertia_max".into());
        }
        if !(self.cognitive.is_finite() && self.cognitive >= 0.0) {
            return Err("cognitive coefficient must be finite and non-negative".into());
        }
        if !(self.social.is_finite() && self.social >= 0.0) {
            return Err("social coefficient must be finite and non-negative".into());
        }
        if !(self.max_velocity.is_finite() && self.max_velocity > 0.0) {
            return Err("max_velocity must be finite and positive".into());
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
        let config = PsoConfig::default();
        assert_eq!(config.swarm_size, 50);
        assert_eq!(config.max_iterations, 100);
        assert!((config.inertia_min - 0.4).abs() < 1e-10);
        assert!((config.inertia_max - 0.9).abs() < 1e-10);
        assert!((config.cognitive - 2.0).abs() < 1e-10);
        assert!((config.social - 2.0).abs() < 1e-10);
        assert!((config.max_velocity - 4.0).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 30);
        assert!(config.parallel);
        assert!(config.time_limit_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PsoConfig::default()
            .with_swarm_size(20)
            .with_max_iterations(200)
            .with_inertia(0.5, 0.8)
            .with_coefficients(1.5, 2.5)
            .with_max_velocity(2.0)
            .with_stagnation_limit(0)
            .with_parallel(false)
            .with_time_limit_ms(500);

        assert_eq!(config.swarm_size, 20);
        assert_eq!(config.max_iterations, 200);
        assert!((config.inertia_min - 0.5).abs() < 1e-10);
        assert!((config.inertia_max - 0.8).abs() < 1e-10);
        assert!((config.cognitive - 1.5).abs() < 1e-10);
        assert!((config.social - 2.5).abs() < 1e-10);
        assert!((config.max_velocity - 2.0).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 0);
        assert!(!config.parallel);
        assert_eq!(config.time_limit_ms, Some(500));
    }

    #[test]
    fn test_inertia_decays_linearly() {
        let config = PsoConfig::default().with_max_iterations(10);
        assert!((config.inertia_at(0) - 0.9).abs() < 1e-12);
        assert!((config.inertia_at(5) - 0.65).abs() < 1e-12);
        assert!((config.inertia_at(10) - 0.4).abs() < 1e-12);
        assert!(config.inertia_at(3) > config.inertia_at(4));
    }

    #[test]
    fn test_validate_swarm_too_small() {
        assert!(PsoConfig::default().with_swarm_size(1).validate().is_err());
    }

    #[test]
    fn test_validate_zero_iterations() {
        assert!(PsoConfig::default()
            .with_max_iterations(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_inverted_inertia() {
        assert!(PsoConfig::default()
            .with_inertia(0.9, 0.4)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_bad_coefficients() {
        assert!(PsoConfig::default()
            .with_coefficients(-1.0, 2.0)
            .validate()
            .is_err());
        assert!(PsoConfig::default()
            .with_coefficients(2.0, f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_velocity() {
        assert!(PsoConfig::default()
            .with_max_velocity(0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_time_limit() {
        assert!(PsoConfig::default()
            .with_time_limit_ms(0)
            .validate()
            .is_err());
    }
}
