//! Timetable (solution) model.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::DAYS;

const DAY_NAMES: [&str; DAYS as usize] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// First period starts at 08:00.
const FIRST_PERIOD_HOUR: u32 = 8;

/// Each period lasts one hour.
const PERIOD_MINUTES: u32 = 60;

/// A (day, period, room) cell of the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSlot {
    /// Day index in `0..5`.
    pub day: u8,
    /// Period index in `0..8`.
    pub period: u8,
    /// Room index in `0..8`.
    pub room: u8,
}

impl TimeSlot {
    /// Creates a time slot.
    pub fn new(day: u8, period: u8, room: u8) -> Self {
        Self { day, period, room }
    }

    /// Weekday name of this slot's day, e.g. `"Monday"`.
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES
            .get(usize::from(self.day))
            .copied()
            .unwrap_or("Unknown")
    }

    /// Clock time at which this slot's period starts, e.g. `"09:00"`.
    pub fn start_time_label(&self) -> String {
        let minutes = FIRST_PERIOD_HOUR * 60 + u32::from(self.period) * PERIOD_MINUTES;
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

/// One scheduled occurrence of a course.
///
/// Occupies `duration` consecutive periods starting at `slot.period`, all
/// on `slot.day` in `slot.room`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Session {
    /// The scheduled course.
    pub course_id: u32,
    /// Starting cell.
    pub slot: TimeSlot,
}

impl Session {
    /// Creates a session.
    pub fn new(course_id: u32, slot: TimeSlot) -> Self {
        Self { course_id, slot }
    }

    /// Exclusive end period. May exceed the last period of the day.
    pub fn end_period(&self, duration: u8) -> u32 {
        u32::from(self.slot.period) + u32::from(duration)
    }

    /// Number of periods shared with `other` given both durations.
    ///
    /// Ignores day and room; callers check those.
    pub fn overlap(&self, duration: u8, other: &Session, other_duration: u8) -> u32 {
        let start = u32::from(self.slot.period.max(other.slot.period));
        let end = self
            .end_period(duration)
            .min(other.end_period(other_duration));
        end.saturating_sub(start)
    }
}

/// Output form of a session, flattened for the caller's reporting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionRecord {
    /// Scheduled course.
    pub course_id: u32,
    /// Day index.
    pub day: u8,
    /// Starting period.
    pub period: u8,
    /// Room index.
    pub room: u8,
}

impl From<&Session> for SessionRecord {
    fn from(session: &Session) -> Self {
        Self {
            course_id: session.course_id,
            day: session.slot.day,
            period: session.slot.period,
            room: session.slot.room,
        }
    }
}

/// A full assignment: exactly one session per course, in instance order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Timetable {
    sessions: Vec<Session>,
}

impl Timetable {
    /// Creates a timetable from sessions in course order.
    pub fn new(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    /// Sessions in course order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Session scheduled for `course_id`, if any.
    pub fn session_for(&self, course_id: u32) -> Option<&Session> {
        self.sessions.iter().find(|s| s.course_id == course_id)
    }

    /// Flattens the sessions into output records.
    pub fn to_records(&self) -> Vec<SessionRecord> {
        self.sessions.iter().map(SessionRecord::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_time_label() {
        assert_eq!(TimeSlot::new(0, 0, 0).start_time_label(), "08:00");
        assert_eq!(TimeSlot::new(0, 1, 0).start_time_label(), "09:00");
        assert_eq!(TimeSlot::new(0, 7, 0).start_time_label(), "15:00");
    }

    #[test]
    fn test_day_name() {
        assert_eq!(TimeSlot::new(0, 0, 0).day_name(), "Monday");
        assert_eq!(TimeSlot::new(4, 0, 0).day_name(), "Friday");
        assert_eq!(TimeSlot::new(9, 0, 0).day_name(), "Unknown");
    }

    #[test]
    fn test_overlap() {
        let a = Session::new(0, TimeSlot::new(0, 1, 0));
        let b = Session::new(1, TimeSlot::new(0, 2, 0));
        // a covers 1..4, b covers 2..3
        assert_eq!(a.overlap(3, &b, 1), 1);
        // a covers 1..2, b covers 2..4
        assert_eq!(a.overlap(1, &b, 2), 0);
        assert_eq!(a.overlap(2, &b, 2), 1);
    }

    #[test]
    fn test_end_period_past_day() {
        let s = Session::new(0, TimeSlot::new(0, 7, 0));
        assert_eq!(s.end_period(3), 10);
    }

    #[test]
    fn test_records_and_lookup() {
        let tt = Timetable::new(vec![
            Session::new(10, TimeSlot::new(1, 2, 3)),
            Session::new(20, TimeSlot::new(4, 5, 6)),
        ]);
        assert_eq!(tt.len(), 2);
        assert_eq!(tt.session_for(20).map(|s| s.slot.room), Some(6));
        assert!(tt.session_for(30).is_none());

        let records = tt.to_records();
        assert_eq!(
            records[0],
            SessionRecord {
                course_id: 10,
                day: 1,
                period: 2,
                room: 3
            }
        );
    }
}
