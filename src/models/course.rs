//! Course and lecturer models.
//!
//! Records are the raw input contract; [`Course`] and [`Lecturer`] are the
//! validated forms held by an [`Instance`](super::Instance).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{DAYS, PERIODS_PER_DAY};

/// Course as supplied by the management layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CourseRecord {
    /// Unique course identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Number of consecutive periods one session needs.
    pub duration: u32,
    /// Rooms acceptable for this course.
    pub required_rooms: Vec<u32>,
    /// Identifier of the teaching lecturer.
    pub lecturer_id: u32,
}

impl CourseRecord {
    /// Creates a course record.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        duration: u32,
        required_rooms: Vec<u32>,
        lecturer_id: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            duration,
            required_rooms,
            lecturer_id,
        }
    }
}

/// Lecturer as supplied by the management layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LecturerRecord {
    /// Unique lecturer identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// `[day, period]` pairs the lecturer can teach. Empty = always available.
    #[cfg_attr(feature = "serde", serde(default))]
    pub available_slots: Vec<[u32; 2]>,
    /// `[day, period]` pairs the lecturer prefers. Empty = no preference.
    #[cfg_attr(feature = "serde", serde(default))]
    pub preferred_slots: Vec<[u32; 2]>,
}

impl LecturerRecord {
    /// Creates a lecturer record with no availability restriction.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            available_slots: Vec::new(),
            preferred_slots: Vec::new(),
        }
    }

    /// Restricts availability to the given `[day, period]` pairs.
    pub fn with_available_slots(mut self, slots: Vec<[u32; 2]>) -> Self {
        self.available_slots = slots;
        self
    }

    /// Declares preferred `[day, period]` pairs.
    pub fn with_preferred_slots(mut self, slots: Vec<[u32; 2]>) -> Self {
        self.preferred_slots = slots;
        self
    }
}

/// Set of (day, period) cells packed into one bit per cell.
///
/// Bit `day * 8 + period` is set when the cell is a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotMask(u64);

impl SlotMask {
    /// Empty mask.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Mask containing every cell of the weekly grid.
    pub fn full() -> Self {
        let cells = u32::from(DAYS) * u32::from(PERIODS_PER_DAY);
        Self((1u64 << cells) - 1)
    }

    fn bit(day: u8, period: u8) -> u64 {
        1u64 << (u32::from(day) * u32::from(PERIODS_PER_DAY) + u32::from(period))
    }

    /// Adds a cell. Out-of-grid cells are ignored.
    pub fn insert(&mut self, day: u8, period: u8) {
        if day < DAYS && period < PERIODS_PER_DAY {
            self.0 |= Self::bit(day, period);
        }
    }

    /// Returns `true` if the cell is a member.
    pub fn contains(&self, day: u8, period: u8) -> bool {
        day < DAYS && period < PERIODS_PER_DAY && self.0 & Self::bit(day, period) != 0
    }

    /// Number of member cells.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if no cell is a member.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<(u8, u8)> for SlotMask {
    fn from_iter<T: IntoIterator<Item = (u8, u8)>>(iter: T) -> Self {
        let mut mask = SlotMask::empty();
        for (day, period) in iter {
            mask.insert(day, period);
        }
        mask
    }
}

/// A validated course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Unique course identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Consecutive periods required, in `1..=8`.
    pub duration: u8,
    /// Acceptable rooms, deduplicated and ascending. Never empty.
    pub required_rooms: Vec<u8>,
    /// Teaching lecturer.
    pub lecturer_id: u32,
}

impl Course {
    /// Returns `true` if `room` is acceptable for this course.
    pub fn accepts_room(&self, room: u8) -> bool {
        self.required_rooms.binary_search(&room).is_ok()
    }
}

/// A validated lecturer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lecturer {
    /// Unique lecturer identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Declared availability, `None` when the lecturer is always available.
    pub available: Option<SlotMask>,
    /// Declared preferences, `None` when no preference is given.
    pub preferred: Option<SlotMask>,
}

impl Lecturer {
    /// Returns `true` if the lecturer may teach at (day, period).
    pub fn is_available(&self, day: u8, period: u8) -> bool {
        self.available.map_or(true, |mask| mask.contains(day, period))
    }

    /// Returns `true` if (day, period) falls outside declared preferences.
    ///
    /// Always `false` for lecturers without preferences.
    pub fn is_unpreferred(&self, day: u8, period: u8) -> bool {
        self.preferred.is_some_and(|mask| !mask.contains(day, period))
    }
}
