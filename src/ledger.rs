//! Cross-level resource usage ledger.
//!
//! Records which (room, slot) and (instructor, slot) pairs are already
//! consumed by committed assignments from previously scheduled levels. An
//! explicit value threaded through the pipeline: levels read a snapshot of
//! it during search, and it is written exactly once per level, at commit
//! time — never during backtracking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Assignment, ResourceTriple, TimeSlot};

/// Committed resource usage across all levels processed so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceLedger {
    room_usage: HashMap<String, Vec<TimeSlot>>,
    instructor_usage: HashMap<String, Vec<TimeSlot>>,
    committed: usize,
}

impl ResourceLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a candidate triple collides with any committed usage.
    pub fn conflicts(&self, value: &ResourceTriple) -> bool {
        self.room_booked(&value.room_id, &value.slot)
            || self.instructor_booked(&value.instructor_id, &value.slot)
    }

    /// Whether the room is booked at an overlapping time.
    pub fn room_booked(&self, room_id: &str, slot: &TimeSlot) -> bool {
        self.room_usage
            .get(room_id)
            .is_some_and(|slots| slots.iter().any(|s| s.overlaps(slot)))
    }

    /// Whether the instructor is booked at an overlapping time.
    pub fn instructor_booked(&self, instructor_id: &str, slot: &TimeSlot) -> bool {
        self.instructor_usage
            .get(instructor_id)
            .is_some_and(|slots| slots.iter().any(|s| s.overlaps(slot)))
    }

    /// Commits a finalized level solution into the ledger.
    pub fn commit(&mut self, assignments: &[Assignment]) {
        for a in assignments {
            self.room_usage
                .entry(a.value.room_id.clone())
                .or_default()
                .push(a.value.slot);
            self.instructor_usage
                .entry(a.value.instructor_id.clone())
                .or_default()
                .push(a.value.slot);
        }
        self.committed += assignments.len();
    }

    /// Number of committed assignments.
    pub fn committed_count(&self) -> usize {
        self.committed
    }
}
