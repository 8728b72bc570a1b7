//! University course timetabling by continuous metaheuristics.
//!
//! Courses are placed on a weekly grid of 5 days × 8 periods × 8 rooms.
//! Each candidate timetable is a real vector that decodes to one session
//! per course; two engines search that space:
//!
//! - **Particle Swarm Optimization (PSO)**: velocity-driven swarm with
//!   decaying inertia and velocity clamping.
//! - **Genetic Algorithm (GA)**: elitist evolution with tournament
//!   selection, real-vector crossover and annealed offset mutation.
//!
//! Candidates are scored by a two-tier [`evaluator`]: hard-constraint
//! violations dominate, soft cost (lecturer travel, room balance,
//! preferences) breaks ties among feasible timetables.
//!
//! # Quick Start
//!
//! ```
//! use u_timetable::{CourseRecord, LecturerRecord, Optimizer, RunConfig};
//!
//! let courses = vec![
//!     CourseRecord::new(1, "Algebra", 2, vec![0, 1], 10),
//!     CourseRecord::new(2, "Mechanics", 1, vec![0], 10),
//! ];
//! let lecturers = vec![LecturerRecord::new(10, "Dr. Noether")];
//!
//! let mut optimizer = Optimizer::new(&courses, &lecturers, RunConfig::ga(42))?;
//! let result = optimizer.run();
//! assert_eq!(result.sessions.len(), 2);
//! # Ok::<(), u_timetable::TimetableError>(())
//! ```
//!
//! # Architecture
//!
//! - [`models`] and [`validation`]: caller records → validated [`Instance`]
//! - [`codec`]: real vector ⇄ [`Timetable`]
//! - [`evaluator`]: hard violations, soft cost, fitness
//! - [`problem`]: the [`VectorProblem`] seam the engines optimize
//! - [`pso`], [`ga`]: the engines
//! - [`driver`]: seeded runs and result records
//!
//! The crate never installs a logger; it emits through the `log` facade.

pub mod codec;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod ga;
pub mod models;
pub mod problem;
pub mod pso;
pub mod validation;

pub use codec::SolutionCodec;
pub use driver::{Algorithm, BestTimetableResult, Optimizer, Outcome, RunConfig, RunPhase};
pub use error::{Result, TimetableError};
pub use evaluator::{ConstraintEvaluator, Evaluation, SoftWeights, Violation, ViolationBreakdown};
pub use models::{
    CourseRecord, Instance, LecturerRecord, Session, SessionRecord, TimeSlot, Timetable,
};
pub use problem::{StopReason, TimetableProblem, VectorProblem};
