//! Particle Swarm Optimization.
//!
//! A swarm of particles moves through the real-valued search space. Each
//! particle is pulled toward its own best position and the swarm's best
//! position, with inertia decaying linearly over the run:
//!
//! ```text
//! v = w·v + c1·r1·(pbest − x) + c2·r2·(gbest − x)
//! v = clamp(v, −v_max, v_max)
//! x = x + v
//! ```
//!
//! # Key Types
//!
//! - [`PsoConfig`]: Swarm size, inertia range, coefficients, termination
//! - [`PsoRunner`]: Executes the swarm loop against a
//!   [`VectorProblem`](crate::problem::VectorProblem)
//! - [`PsoResult`]: Global best with history
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Shi & Eberhart (1998), "A Modified Particle Swarm Optimizer"

mod config;
mod runner;

pub use config::PsoConfig;
pub use runner::{PsoResult, PsoRunner};
