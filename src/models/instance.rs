//! Validated, immutable problem snapshot.

use std::collections::HashMap;

use super::{Course, CourseRecord, Lecturer, LecturerRecord};
use crate::error::Result;
use crate::validation;

/// Courses and lecturers of one timetabling problem.
///
/// Built once from records and never mutated. Course order is the record
/// order and fixes the gene layout used by the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    courses: Vec<Course>,
    lecturers: Vec<Lecturer>,
    /// `lecturer_of[i]` is the index into `lecturers` for course `i`.
    lecturer_of: Vec<usize>,
    /// Course id → position in `courses`.
    course_index: HashMap<u32, usize>,
}

impl Instance {
    /// Validates records and takes a value copy of them.
    ///
    /// # Errors
    /// - [`InvalidCourseReference`](crate::TimetableError::InvalidCourseReference)
    ///   for unknown lecturer or room ids.
    /// - [`MalformedInput`](crate::TimetableError::MalformedInput) for
    ///   duplicate ids, bad durations, empty room lists or out-of-grid slots.
    pub fn from_records(courses: &[CourseRecord], lecturers: &[LecturerRecord]) -> Result<Self> {
        validation::build_instance(courses, lecturers)
    }

    pub(crate) fn from_parts(
        courses: Vec<Course>,
        lecturers: Vec<Lecturer>,
        lecturer_of: Vec<usize>,
    ) -> Self {
        debug_assert_eq!(courses.len(), lecturer_of.len());
        let course_index = courses.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        Self {
            courses,
            lecturers,
            lecturer_of,
            course_index,
        }
    }

    /// Courses in gene order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Lecturers in record order.
    pub fn lecturers(&self) -> &[Lecturer] {
        &self.lecturers
    }

    /// Number of courses.
    pub fn num_courses(&self) -> usize {
        self.courses.len()
    }

    /// Position of the course with id `course_id`, if it exists.
    pub fn course_index(&self, course_id: u32) -> Option<usize> {
        self.course_index.get(&course_id).copied()
    }

    /// Lecturer teaching the course at `course_index`.
    ///
    /// # Panics
    /// Panics if `course_index` is out of range.
    pub fn lecturer_for(&self, course_index: usize) -> &Lecturer {
        &self.lecturers[self.lecturer_of[course_index]]
    }

    /// Index into [`lecturers`](Self::lecturers) for the course at `course_index`.
    pub fn lecturer_index(&self, course_index: usize) -> usize {
        self.lecturer_of[course_index]
    }

    /// Sum of all course durations.
    pub fn total_periods(&self) -> u32 {
        self.courses.iter().map(|c| u32::from(c.duration)).sum()
    }
}
