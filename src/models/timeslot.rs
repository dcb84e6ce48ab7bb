//! Time slot model.
//!
//! A time slot is a half-open interval [start, end) of minutes-from-midnight
//! on a specific weekday. Slot boundaries snap to a fixed 5-minute grid so
//! that two independently constructed slots either coincide or differ by a
//! whole grid step.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling"

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid granularity for slot boundaries (minutes).
pub const SLOT_GRID_MIN: i32 = 5;

/// Day of the week.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All days in week order.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Short display name.
    pub fn short_name(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Mon",
            DayOfWeek::Tuesday => "Tue",
            DayOfWeek::Wednesday => "Wed",
            DayOfWeek::Thursday => "Thu",
            DayOfWeek::Friday => "Fri",
            DayOfWeek::Saturday => "Sat",
            DayOfWeek::Sunday => "Sun",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A lecture time slot: half-open interval [start_min, end_min) on one day.
///
/// Times are minutes from midnight. A well-formed slot has
/// `start_min < end_min` and both boundaries on the [`SLOT_GRID_MIN`] grid;
/// use [`TimeSlot::is_well_formed`] to check, the constructor does not panic
/// on malformed input so that validation can report it instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day of week.
    pub day: DayOfWeek,
    /// Start time (minutes from midnight, inclusive).
    pub start_min: i32,
    /// End time (minutes from midnight, exclusive).
    pub end_min: i32,
}

impl TimeSlot {
    /// Creates a new time slot.
    pub fn new(day: DayOfWeek, start_min: i32, end_min: i32) -> Self {
        Self {
            day,
            start_min,
            end_min,
        }
    }

    /// Convenience constructor from (hour, minute) pairs.
    pub fn at(day: DayOfWeek, start: (i32, i32), end: (i32, i32)) -> Self {
        Self::new(day, start.0 * 60 + start.1, end.0 * 60 + end.1)
    }

    /// Slot duration in minutes.
    #[inline]
    pub fn duration_min(&self) -> i32 {
        self.end_min - self.start_min
    }

    /// Whether start precedes end and both lie on the grid.
    pub fn is_well_formed(&self) -> bool {
        self.start_min < self.end_min
            && self.start_min >= 0
            && self.end_min <= 24 * 60
            && self.start_min % SLOT_GRID_MIN == 0
            && self.end_min % SLOT_GRID_MIN == 0
    }

    /// Whether two slots overlap in time.
    ///
    /// Half-open semantics: back-to-back slots (one ending exactly when the
    /// other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day == other.day
            && self.start_min < other.end_min
            && other.start_min < self.end_min
    }

    /// Idle minutes strictly between this slot and a later one on the same
    /// day. Returns 0 for different days, overlapping, or adjacent slots.
    pub fn gap_to(&self, later: &TimeSlot) -> i32 {
        if self.day != later.day {
            return 0;
        }
        (later.start_min - self.end_min).max(0)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}-{:02}:{:02}",
            self.day,
            self.start_min / 60,
            self.start_min % 60,
            self.end_min / 60,
            self.end_min % 60
        )
    }
}
