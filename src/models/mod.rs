//! Timetabling domain models.
//!
//! Two layers live here:
//!
//! - **Input records** ([`CourseRecord`], [`LecturerRecord`]): loosely
//!   checked data as produced by the surrounding management layer.
//! - **Validated snapshot** ([`Instance`], [`Course`], [`Lecturer`]):
//!   strongly typed values built once by
//!   [`Instance::from_records`](crate::models::Instance::from_records) and
//!   read-only for the rest of a run.
//!
//! A solution is a [`Timetable`]: one [`Session`] per course, each
//! starting at a [`TimeSlot`].
//!
//! # Grid
//!
//! | Axis | Range | Constant |
//! |------|-------|----------|
//! | day | `0..5` | [`DAYS`] |
//! | period | `0..8` | [`PERIODS_PER_DAY`] |
//! | room | `0..8` | [`ROOMS`] |

mod course;
mod instance;
mod timetable;

pub use course::{Course, CourseRecord, Lecturer, LecturerRecord, SlotMask};
pub use instance::Instance;
pub use timetable::{Session, SessionRecord, TimeSlot, Timetable};

/// Number of teaching days in a week.
pub const DAYS: u8 = 5;

/// Number of teaching periods per day.
pub const PERIODS_PER_DAY: u8 = 8;

/// Number of rooms in the building.
pub const ROOMS: u8 = 8;
