//! Constraint evaluation and fitness.
//!
//! [`ConstraintEvaluator`] scores a decoded [`Timetable`] against an
//! [`Instance`] in two tiers:
//!
//! - **Hard violations** make a timetable unusable: room double-bookings,
//!   lecturer overlaps, sessions running past the last period, sessions
//!   outside declared lecturer availability, rooms outside a course's
//!   acceptable set, and courses left out or scheduled twice.
//! - **Soft cost** only degrades quality: lecturer travel between
//!   consecutive sessions, uneven room usage, and periods outside a
//!   lecturer's declared preferences.
//!
//! # Fitness
//!
//! Lower is better. A feasible timetable scores its soft cost. An infeasible
//! one scores `sentinel × hard_violations + soft_cost`, where `sentinel`
//! exceeds any soft cost attainable on the instance, so every feasible
//! timetable outranks every infeasible one and fewer violations rank better.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::models::{Instance, Session, TimeSlot, Timetable, PERIODS_PER_DAY, ROOMS};

/// Largest room-index distance between two sessions.
const MAX_ROOM_DISTANCE: f64 = (ROOMS - 1) as f64;

/// Weights of the soft-cost terms.
///
/// All default to `1.0`. There is no canonical weighting; callers tune
/// these for their institution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoftWeights {
    /// Weight of the room-distance travel proxy.
    pub travel: f64,
    /// Weight of the per-room session count variance.
    pub balance: f64,
    /// Weight of periods outside lecturer preferences.
    pub preference: f64,
}

impl Default for SoftWeights {
    fn default() -> Self {
        Self {
            travel: 1.0,
            balance: 1.0,
            preference: 1.0,
        }
    }
}

impl SoftWeights {
    /// Largest accepted weight.
    pub const MAX_WEIGHT: f64 = 1e6;

    /// Sets the travel weight.
    pub fn with_travel(mut self, w: f64) -> Self {
        self.travel = w;
        self
    }

    /// Sets the room balance weight.
    pub fn with_balance(mut self, w: f64) -> Self {
        self.balance = w;
        self
    }

    /// Sets the preference weight.
    pub fn with_preference(mut self, w: f64) -> Self {
        self.preference = w;
        self
    }

    /// Validates that all weights lie in `[0, MAX_WEIGHT]`.
    pub fn validate(&self) -> Result<(), String> {
        for (name, w) in [
            ("travel", self.travel),
            ("balance", self.balance),
            ("preference", self.preference),
        ] {
            if !(0.0..=Self::MAX_WEIGHT).contains(&w) {
                return Err(format!(
                    "{name} weight must lie in [0, {}]",
                    Self::MAX_WEIGHT
                ));
            }
        }
        Ok(())
    }
}

/// Hard-violation counts per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViolationBreakdown {
    /// Clashing (day, period, room) cells.
    pub room_conflicts: u32,
    /// Clashing (day, period) cells for the same lecturer.
    pub lecturer_conflicts: u32,
    /// Periods scheduled past the end of a day.
    pub day_overflows: u32,
    /// Occupied periods outside declared availability.
    pub unavailable: u32,
    /// Sessions in a room the course does not accept.
    pub room_type: u32,
    /// Courses without a session.
    pub missing_courses: u32,
    /// Extra sessions for an already scheduled course.
    pub duplicate_courses: u32,
    /// Sessions naming a course outside the instance.
    pub unknown_courses: u32,
}

impl ViolationBreakdown {
    /// Sum over all categories.
    pub fn total(&self) -> u32 {
        self.room_conflicts
            + self.lecturer_conflicts
            + self.day_overflows
            + self.unavailable
            + self.room_type
            + self.missing_courses
            + self.duplicate_courses
            + self.unknown_courses
    }

    fn record(&mut self, violation: &Violation) {
        match violation {
            Violation::RoomConflict { .. } => self.room_conflicts += 1,
            Violation::LecturerConflict { .. } => self.lecturer_conflicts += 1,
            Violation::DayOverflow { periods, .. } => self.day_overflows += periods,
            Violation::Unavailable { .. } => self.unavailable += 1,
            Violation::RoomTypeMismatch { .. } => self.room_type += 1,
            Violation::MissingCourse { .. } => self.missing_courses += 1,
            Violation::DuplicateCourse { .. } => self.duplicate_courses += 1,
            Violation::UnknownCourse { .. } => self.unknown_courses += 1,
        }
    }
}

/// Score of one timetable.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Evaluation {
    /// Total hard violations.
    pub hard_violations: u32,
    /// Weighted soft cost.
    pub soft_cost: f64,
    /// Scalar fitness (lower is better).
    pub fitness: f64,
    /// Hard violations per category.
    pub breakdown: ViolationBreakdown,
}

impl Evaluation {
    /// Returns `true` if there are no hard violations.
    pub fn is_feasible(&self) -> bool {
        self.hard_violations == 0
    }
}

/// A single hard-constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Violation {
    /// Two courses occupy the same room in the same period.
    RoomConflict {
        /// Earlier course in session order.
        course_a: u32,
        /// Later course in session order.
        course_b: u32,
        /// The clashing cell.
        slot: TimeSlot,
    },
    /// A lecturer teaches two courses in the same period.
    LecturerConflict {
        /// The double-booked lecturer.
        lecturer_id: u32,
        /// Earlier course in session order.
        course_a: u32,
        /// Later course in session order.
        course_b: u32,
        /// Day of the clash.
        day: u8,
        /// Period of the clash.
        period: u8,
    },
    /// A session runs past the last period of its day.
    DayOverflow {
        /// The overflowing course.
        course_id: u32,
        /// Number of periods past the end of the day.
        periods: u32,
    },
    /// A session occupies a period the lecturer is not available.
    Unavailable {
        /// The scheduled course.
        course_id: u32,
        /// Its lecturer.
        lecturer_id: u32,
        /// Day of the unavailable period.
        day: u8,
        /// The unavailable period.
        period: u8,
    },
    /// A session is placed in a room its course does not accept.
    RoomTypeMismatch {
        /// The misplaced course.
        course_id: u32,
        /// The room it was placed in.
        room: u8,
    },
    /// A course has no session.
    MissingCourse {
        /// The unscheduled course.
        course_id: u32,
    },
    /// A course has more than one session.
    DuplicateCourse {
        /// The course scheduled again.
        course_id: u32,
    },
    /// A session names a course the instance does not contain.
    UnknownCourse {
        /// The unresolved id.
        course_id: u32,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RoomConflict {
                course_a,
                course_b,
                slot,
            } => write!(
                f,
                "Room conflict: courses {course_a} and {course_b} both use room {} on {} at {}",
                slot.room,
                slot.day_name(),
                slot.start_time_label()
            ),
            Violation::LecturerConflict {
                lecturer_id,
                course_a,
                course_b,
                day,
                period,
            } => {
                let slot = TimeSlot::new(*day, *period, 0);
                write!(
                    f,
                    "Lecturer conflict: lecturer {lecturer_id} teaches courses {course_a} and {course_b} on {} at {}",
                    slot.day_name(),
                    slot.start_time_label()
                )
            }
            Violation::DayOverflow { course_id, periods } => write!(
                f,
                "Day overflow: course {course_id} runs {periods} period(s) past the end of the day"
            ),
            Violation::Unavailable {
                course_id,
                lecturer_id,
                day,
                period,
            } => {
                let slot = TimeSlot::new(*day, *period, 0);
                write!(
                    f,
                    "Unavailable: lecturer {lecturer_id} cannot teach course {course_id} on {} at {}",
                    slot.day_name(),
                    slot.start_time_label()
                )
            }
            Violation::RoomTypeMismatch { course_id, room } => write!(
                f,
                "Room type mismatch: course {course_id} cannot use room {room}"
            ),
            Violation::MissingCourse { course_id } => {
                write!(f, "Missing course: course {course_id} is not scheduled")
            }
            Violation::DuplicateCourse { course_id } => {
                write!(f, "Duplicate course: course {course_id} is scheduled more than once")
            }
            Violation::UnknownCourse { course_id } => {
                write!(f, "Unknown course: session names course {course_id}")
            }
        }
    }
}

/// Scores timetables of one instance.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintEvaluator<'a> {
    instance: &'a Instance,
    weights: SoftWeights,
}

impl<'a> ConstraintEvaluator<'a> {
    /// Creates an evaluator.
    pub fn new(instance: &'a Instance, weights: SoftWeights) -> Self {
        Self { instance, weights }
    }

    /// Soft-cost weights in use.
    pub fn weights(&self) -> SoftWeights {
        self.weights
    }

    /// Fitness unit per hard violation.
    ///
    /// Strictly greater than any soft cost attainable on this instance.
    /// Saturates at `f64::MAX`.
    pub fn infeasible_sentinel(&self) -> f64 {
        let n = self.instance.num_courses() as f64;
        // travel: at most n - 1 consecutive pairs, each at most 7 rooms apart
        // balance: variance of 8 counts summing to n is below n^2
        let bound = self.weights.travel * MAX_ROOM_DISTANCE * n
            + self.weights.balance * n * n
            + self.weights.preference * f64::from(self.instance.total_periods())
            + 1.0;
        bound.min(f64::MAX)
    }

    /// Scores a timetable.
    ///
    /// Sessions are matched to courses by `course_id`, so order does not
    /// matter. Missing, repeated or unknown courses count as hard violations.
    pub fn evaluate(&self, timetable: &Timetable) -> Evaluation {
        let mut breakdown = ViolationBreakdown::default();
        self.for_each_violation(timetable, |v| breakdown.record(&v));

        let hard_violations = breakdown.total();
        let soft_cost = self.soft_cost(timetable);
        let fitness = if hard_violations == 0 {
            soft_cost
        } else {
            (self.infeasible_sentinel() * f64::from(hard_violations) + soft_cost).min(f64::MAX)
        };

        Evaluation {
            hard_violations,
            soft_cost,
            fitness,
            breakdown,
        }
    }

    /// Lists every hard violation: coverage problems in session order,
    /// then per-session checks, then missing courses.
    pub fn violations(&self, timetable: &Timetable) -> Vec<Violation> {
        let mut out = Vec::new();
        self.for_each_violation(timetable, |v| out.push(v));
        out
    }

    /// Returns `true` if the timetable has no hard violations.
    pub fn is_valid(&self, timetable: &Timetable) -> bool {
        let mut valid = true;
        self.for_each_violation(timetable, |_| valid = false);
        valid
    }

    /// Weighted soft cost.
    pub fn soft_cost(&self, timetable: &Timetable) -> f64 {
        self.weights.travel * self.travel(timetable)
            + self.weights.balance * room_balance(timetable)
            + self.weights.preference * self.preference(timetable)
    }

    /// Pairs each session with the position of its course, in session order.
    ///
    /// Sessions naming an unknown course are skipped.
    fn resolve<'t>(&self, timetable: &'t Timetable) -> Vec<(&'t Session, usize)> {
        timetable
            .sessions()
            .iter()
            .filter_map(|s| self.instance.course_index(s.course_id).map(|c| (s, c)))
            .collect()
    }

    fn for_each_violation<F: FnMut(Violation)>(&self, timetable: &Timetable, mut emit: F) {
        let courses = self.instance.courses();
        let mut scheduled = vec![false; courses.len()];
        for session in timetable.sessions() {
            match self.instance.course_index(session.course_id) {
                None => emit(Violation::UnknownCourse {
                    course_id: session.course_id,
                }),
                Some(c) if scheduled[c] => emit(Violation::DuplicateCourse {
                    course_id: session.course_id,
                }),
                Some(c) => scheduled[c] = true,
            }
        }

        let resolved = self.resolve(timetable);
        for (i, &(session, c)) in resolved.iter().enumerate() {
            let course = &courses[c];
            let lecturer = self.instance.lecturer_for(c);

            if !course.accepts_room(session.slot.room) {
                emit(Violation::RoomTypeMismatch {
                    course_id: course.id,
                    room: session.slot.room,
                });
            }

            let end = session.end_period(course.duration);
            if end > u32::from(PERIODS_PER_DAY) {
                emit(Violation::DayOverflow {
                    course_id: course.id,
                    periods: end - u32::from(PERIODS_PER_DAY),
                });
            }

            for period in grid_periods(session, course.duration) {
                if !lecturer.is_available(session.slot.day, period) {
                    emit(Violation::Unavailable {
                        course_id: course.id,
                        lecturer_id: lecturer.id,
                        day: session.slot.day,
                        period,
                    });
                }
            }

            for &(other, oc) in &resolved[i + 1..] {
                let other_course = &courses[oc];
                let same_room = other.slot.room == session.slot.room;
                let same_lecturer = self.instance.lecturer_index(c) == self.instance.lecturer_index(oc);
                if other.slot.day != session.slot.day || !(same_room || same_lecturer) {
                    continue;
                }
                let start = session.slot.period.max(other.slot.period);
                let overlap = session.overlap(course.duration, other, other_course.duration);
                if overlap == 0 {
                    continue;
                }
                let clash = (u32::from(start)..u32::from(start) + overlap)
                    .filter(|&p| p < u32::from(PERIODS_PER_DAY))
                    .map(|p| p as u8);

                for period in clash {
                    if same_room {
                        emit(Violation::RoomConflict {
                            course_a: course.id,
                            course_b: other_course.id,
                            slot: TimeSlot::new(session.slot.day, period, session.slot.room),
                        });
                    }
                    if same_lecturer {
                        emit(Violation::LecturerConflict {
                            lecturer_id: lecturer.id,
                            course_a: course.id,
                            course_b: other_course.id,
                            day: session.slot.day,
                            period,
                        });
                    }
                }
            }
        }

        for (course, &done) in courses.iter().zip(&scheduled) {
            if !done {
                emit(Violation::MissingCourse {
                    course_id: course.id,
                });
            }
        }
    }

    /// Sum of room distances between each lecturer's consecutive same-day sessions.
    fn travel(&self, timetable: &Timetable) -> f64 {
        let mut keyed: Vec<(usize, u8, u8, u8)> = self
            .resolve(timetable)
            .into_iter()
            .map(|(s, c)| {
                (
                    self.instance.lecturer_index(c),
                    s.slot.day,
                    s.slot.period,
                    s.slot.room,
                )
            })
            .collect();
        keyed.sort_unstable();

        keyed
            .windows(2)
            .filter(|w| w[0].0 == w[1].0 && w[0].1 == w[1].1)
            .map(|w| f64::from(w[0].3.abs_diff(w[1].3)))
            .sum()
    }

    /// Occupied in-grid periods outside declared lecturer preferences.
    fn preference(&self, timetable: &Timetable) -> f64 {
        let mut count = 0u32;
        for (session, c) in self.resolve(timetable) {
            let course = &self.instance.courses()[c];
            let lecturer = self.instance.lecturer_for(c);
            count += grid_periods(session, course.duration)
                .filter(|&p| lecturer.is_unpreferred(session.slot.day, p))
                .count() as u32;
        }
        f64::from(count)
    }
}

/// Population variance of per-room session counts over all rooms.
fn room_balance(timetable: &Timetable) -> f64 {
    let mut counts = [0u32; ROOMS as usize];
    for session in timetable.sessions() {
        if let Some(c) = counts.get_mut(usize::from(session.slot.room)) {
            *c += 1;
        }
    }
    let n = counts.len() as f64;
    let mean = counts.iter().map(|&c| f64::from(c)).sum::<f64>() / n;
    counts
        .iter()
        .map(|&c| (f64::from(c) - mean).powi(2))
        .sum::<f64>()
        / n
}

/// Periods a session occupies that fall inside the day.
fn grid_periods(session: &Session, duration: u8) -> impl Iterator<Item = u8> {
    let end = session
        .end_period(duration)
        .min(u32::from(PERIODS_PER_DAY)) as u8;
    session.slot.period..end
}
