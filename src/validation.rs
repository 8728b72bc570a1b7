//! Input validation for timetabling problems.
//!
//! Converts loosely typed records into a strongly typed [`Instance`].
//! Detects:
//! - Empty course lists
//! - Duplicate course or lecturer IDs
//! - Unknown lecturer references and room IDs outside the building
//! - Durations of zero or longer than a day
//! - Empty room requirement lists
//! - Availability or preference pairs outside the weekly grid
//!
//! Validation stops at the first problem found, scanning lecturers first and
//! then courses in record order.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, TimetableError};
use crate::models::{
    Course, CourseRecord, Instance, Lecturer, LecturerRecord, SlotMask, DAYS, PERIODS_PER_DAY,
    ROOMS,
};

/// Builds an [`Instance`] from records, or reports the first defect.
pub fn build_instance(courses: &[CourseRecord], lecturers: &[LecturerRecord]) -> Result<Instance> {
    if courses.is_empty() {
        return Err(TimetableError::MalformedInput(
            "at least one course is required".into(),
        ));
    }

    let mut lecturer_index: HashMap<u32, usize> = HashMap::with_capacity(lecturers.len());
    let mut validated_lecturers = Vec::with_capacity(lecturers.len());
    for (i, record) in lecturers.iter().enumerate() {
        if lecturer_index.insert(record.id, i).is_some() {
            return Err(TimetableError::MalformedInput(format!(
                "duplicate lecturer ID: {}",
                record.id
            )));
        }
        validated_lecturers.push(validate_lecturer(record)?);
    }

    let mut course_ids = HashSet::with_capacity(courses.len());
    let mut validated_courses = Vec::with_capacity(courses.len());
    let mut lecturer_of = Vec::with_capacity(courses.len());
    for record in courses {
        if !course_ids.insert(record.id) {
            return Err(TimetableError::MalformedInput(format!(
                "duplicate course ID: {}",
                record.id
            )));
        }
        let idx = *lecturer_index.get(&record.lecturer_id).ok_or_else(|| {
            TimetableError::InvalidCourseReference {
                course_id: record.id,
                reference: format!("lecturer {}", record.lecturer_id),
            }
        })?;
        validated_courses.push(validate_course(record)?);
        lecturer_of.push(idx);
    }

    log::debug!(
        "validated instance: {} courses, {} lecturers",
        validated_courses.len(),
        validated_lecturers.len()
    );

    Ok(Instance::from_parts(
        validated_courses,
        validated_lecturers,
        lecturer_of,
    ))
}

fn validate_course(record: &CourseRecord) -> Result<Course> {
    if record.duration == 0 || record.duration > u32::from(PERIODS_PER_DAY) {
        return Err(TimetableError::MalformedInput(format!(
            "course {} has duration {}, expected 1..={}",
            record.id, record.duration, PERIODS_PER_DAY
        )));
    }
    if record.required_rooms.is_empty() {
        return Err(TimetableError::MalformedInput(format!(
            "course {} has no acceptable rooms",
            record.id
        )));
    }

    let mut rooms = Vec::with_capacity(record.required_rooms.len());
    for &room in &record.required_rooms {
        match u8::try_from(room) {
            Ok(r) if r < ROOMS => rooms.push(r),
            _ => {
                return Err(TimetableError::InvalidCourseReference {
                    course_id: record.id,
                    reference: format!("room {room}"),
                })
            }
        }
    }
    rooms.sort_unstable();
    rooms.dedup();

    Ok(Course {
        id: record.id,
        name: record.name.clone(),
        // duration is in 1..=PERIODS_PER_DAY, checked above
        duration: record.duration as u8,
        required_rooms: rooms,
        lecturer_id: record.lecturer_id,
    })
}

fn validate_lecturer(record: &LecturerRecord) -> Result<Lecturer> {
    let available = slot_mask(record.id, "available", &record.available_slots)?;
    let preferred = slot_mask(record.id, "preferred", &record.preferred_slots)?;
    Ok(Lecturer {
        id: record.id,
        name: record.name.clone(),
        available,
        preferred,
    })
}

/// Packs `[day, period]` pairs into a mask; an empty list means "not declared".
fn slot_mask(lecturer_id: u32, what: &str, slots: &[[u32; 2]]) -> Result<Option<SlotMask>> {
    if slots.is_empty() {
        return Ok(None);
    }
    let mut mask = SlotMask::empty();
    for &[day, period] in slots {
        if day >= u32::from(DAYS) || period >= u32::from(PERIODS_PER_DAY) {
            return Err(TimetableError::MalformedInput(format!(
                "lecturer {lecturer_id} has {what} slot [{day}, {period}] outside the {DAYS}x{PERIODS_PER_DAY} grid"
            )));
        }
        mask.insert(day as u8, period as u8);
    }
    Ok(Some(mask))
}
