//! Assignment and solution models.
//!
//! A [`ResourceTriple`] is one candidate value for a schedulable unit; an
//! [`Assignment`] binds a unit to exactly one triple; a [`Timetable`] is the
//! merged multi-level solution with lookup and utilization queries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{TimeSlot, UnitKey};

/// A candidate (timeslot, room, instructor) value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceTriple {
    /// Assigned time slot.
    pub slot: TimeSlot,
    /// Assigned room id.
    pub room_id: String,
    /// Assigned instructor id.
    pub instructor_id: String,
}

impl ResourceTriple {
    /// Creates a new triple.
    pub fn new(slot: TimeSlot, room_id: impl Into<String>, instructor_id: impl Into<String>) -> Self {
        Self {
            slot,
            room_id: room_id.into(),
            instructor_id: instructor_id.into(),
        }
    }
}

impl fmt::Display for ResourceTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {} by {}", self.slot, self.room_id, self.instructor_id)
    }
}

/// A schedulable unit bound to one resource triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The bound unit.
    pub unit: UnitKey,
    /// The value it is bound to.
    pub value: ResourceTriple,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(unit: UnitKey, value: ResourceTriple) -> Self {
        Self { unit, value }
    }

    /// Slot shorthand.
    #[inline]
    pub fn slot(&self) -> &TimeSlot {
        &self.value.slot
    }

    /// Whether two assignments occupy overlapping times.
    pub fn time_overlaps(&self, other: &Assignment) -> bool {
        self.value.slot.overlaps(&other.value.slot)
    }
}

/// The merged solution: all committed assignments across levels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timetable {
    /// All assignments, in commit order (levels ascending, units in
    /// creation order within a level).
    pub assignments: Vec<Assignment>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a timetable from an assignment list.
    pub fn from_assignments(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    /// Appends a level's committed assignments.
    pub fn extend(&mut self, assignments: impl IntoIterator<Item = Assignment>) {
        self.assignments.extend(assignments);
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the timetable is empty.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Finds the assignment for a unit.
    pub fn assignment_for(&self, unit: &UnitKey) -> Option<&Assignment> {
        self.assignments.iter().find(|a| &a.unit == unit)
    }

    /// All assignments for a level.
    pub fn assignments_for_level(&self, level: u8) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.unit.level == level)
            .collect()
    }

    /// All assignments using a room.
    pub fn assignments_for_room(&self, room_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.value.room_id == room_id)
            .collect()
    }

    /// All assignments taught by an instructor.
    pub fn assignments_for_instructor(&self, instructor_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.value.instructor_id == instructor_id)
            .collect()
    }

    /// Levels present, ascending.
    pub fn levels(&self) -> Vec<u8> {
        let mut levels: Vec<u8> = self.assignments.iter().map(|a| a.unit.level).collect();
        levels.sort_unstable();
        levels.dedup();
        levels
    }

    /// Busy minutes per room.
    pub fn room_busy_min(&self) -> HashMap<String, i32> {
        let mut busy: HashMap<String, i32> = HashMap::new();
        for a in &self.assignments {
            *busy.entry(a.value.room_id.clone()).or_insert(0) += a.value.slot.duration_min();
        }
        busy
    }

    /// Busy minutes per instructor.
    pub fn instructor_busy_min(&self) -> HashMap<String, i32> {
        let mut busy: HashMap<String, i32> = HashMap::new();
        for a in &self.assignments {
            *busy.entry(a.value.instructor_id.clone()).or_insert(0) +=
                a.value.slot.duration_min();
        }
        busy
    }
}
