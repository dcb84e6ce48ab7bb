//! Course, room, and instructor models.
//!
//! These are read-only snapshots of the record store the engine is handed
//! before solving starts. The engine never fetches data itself; the storage
//! layer assembles a [`ResourcePool`] and passes it in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::TimeSlot;

/// Course classification, matched against [`RoomType`] when building domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseType {
    /// Standard lecture course.
    Lecture,
    /// Laboratory course requiring lab rooms.
    Lab,
    /// Small-group seminar.
    Seminar,
}

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Lecture,
    Lab,
    Seminar,
}

impl RoomType {
    /// Whether a room of this type can host a course of the given type.
    pub fn hosts(&self, course_type: CourseType) -> bool {
        matches!(
            (self, course_type),
            (RoomType::Lecture, CourseType::Lecture)
                | (RoomType::Lab, CourseType::Lab)
                | (RoomType::Seminar, CourseType::Seminar)
        )
    }
}

/// A course in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier (e.g., "CSC111").
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Room type this course requires.
    pub course_type: CourseType,
    /// Weekly credit hours; one lecture is scheduled per credit hour.
    pub credit_hours: u8,
    /// Minimum room capacity, if known.
    pub min_capacity: Option<u32>,
}

impl Course {
    /// Creates a new lecture course.
    pub fn new(id: impl Into<String>, course_type: CourseType, credit_hours: u8) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            course_type,
            credit_hours,
            min_capacity: None,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the minimum room capacity.
    pub fn with_min_capacity(mut self, capacity: u32) -> Self {
        self.min_capacity = Some(capacity);
        self
    }
}

/// A room available for scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier (e.g., "R101").
    pub id: String,
    /// Room classification.
    pub room_type: RoomType,
    /// Seat count; `None` when the record store has no capacity data.
    pub capacity: Option<u32>,
}

impl Room {
    /// Creates a new room.
    pub fn new(id: impl Into<String>, room_type: RoomType) -> Self {
        Self {
            id: id.into(),
            room_type,
            capacity: None,
        }
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Whether this room can host the given course (type + capacity).
    pub fn suits(&self, course: &Course) -> bool {
        if !self.room_type.hosts(course.course_type) {
            return false;
        }
        match (self.capacity, course.min_capacity) {
            (Some(cap), Some(min)) => cap >= min,
            // Unknown capacity on either side is not a type-level mismatch.
            _ => true,
        }
    }
}

/// An instructor with qualifications and an optional preferred window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    /// Unique instructor identifier.
    pub id: String,
    /// Course ids this instructor is qualified to teach.
    pub qualified_courses: Vec<String>,
    /// Earliest preferred start (minutes from midnight), if any.
    pub preferred_start_min: Option<i32>,
    /// Latest preferred end (minutes from midnight), if any.
    pub preferred_end_min: Option<i32>,
}

impl Instructor {
    /// Creates a new instructor.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            qualified_courses: Vec::new(),
            preferred_start_min: None,
            preferred_end_min: None,
        }
    }

    /// Adds a course qualification.
    pub fn qualified_for(mut self, course_id: impl Into<String>) -> Self {
        self.qualified_courses.push(course_id.into());
        self
    }

    /// Sets the preferred teaching window.
    pub fn with_preferred_window(mut self, start_min: i32, end_min: i32) -> Self {
        self.preferred_start_min = Some(start_min);
        self.preferred_end_min = Some(end_min);
        self
    }

    /// Whether this instructor may teach the given course.
    pub fn is_qualified(&self, course_id: &str) -> bool {
        self.qualified_courses.iter().any(|c| c == course_id)
    }
}

/// Snapshot of all schedulable resources, handed in by the storage layer.
///
/// Lookups are by id; iteration orders used for domain construction are
/// sorted so that identical snapshots always yield identical domains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    /// Course catalog by id.
    pub courses: HashMap<String, Course>,
    /// Rooms by id.
    pub rooms: HashMap<String, Room>,
    /// Instructors by id.
    pub instructors: HashMap<String, Instructor>,
    /// Legal timeslot grid per level.
    pub level_slots: HashMap<u8, Vec<TimeSlot>>,
}

impl ResourcePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a course.
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.insert(course.id.clone(), course);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.insert(room.id.clone(), room);
        self
    }

    /// Adds an instructor.
    pub fn with_instructor(mut self, instructor: Instructor) -> Self {
        self.instructors.insert(instructor.id.clone(), instructor);
        self
    }

    /// Sets the legal timeslots for a level.
    pub fn with_level_slots(mut self, level: u8, slots: Vec<TimeSlot>) -> Self {
        self.level_slots.insert(level, slots);
        self
    }

    /// Looks up a course.
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.get(id)
    }

    /// Looks up a room.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Looks up an instructor.
    pub fn instructor(&self, id: &str) -> Option<&Instructor> {
        self.instructors.get(id)
    }

    /// Legal slots for a level, sorted; empty if the level is unknown.
    pub fn slots_for_level(&self, level: u8) -> Vec<TimeSlot> {
        let mut slots = self
            .level_slots
            .get(&level)
            .cloned()
            .unwrap_or_default();
        slots.sort();
        slots
    }

    /// Room ids sorted lexicographically, for deterministic iteration.
    pub fn sorted_room_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.rooms.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Instructor ids sorted lexicographically, for deterministic iteration.
    pub fn sorted_instructor_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.instructors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Levels present in the slot grid, ascending.
    pub fn levels(&self) -> Vec<u8> {
        let mut levels: Vec<u8> = self.level_slots.keys().copied().collect();
        levels.sort_unstable();
        levels
    }

    /// Total scheduled-minutes capacity of the weekly grid, across the
    /// distinct slots of every level. Used as the utilization horizon.
    pub fn weekly_horizon_min(&self) -> i32 {
        let mut distinct: Vec<TimeSlot> = self
            .level_slots
            .values()
            .flatten()
            .copied()
            .collect();
        distinct.sort();
        distinct.dedup();
        distinct.iter().map(TimeSlot::duration_min).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayOfWeek;

    #[test]
    fn test_room_type_hosting() {
        assert!(RoomType::Lecture.hosts(CourseType::Lecture));
        assert!(RoomType::Lab.hosts(CourseType::Lab));
        assert!(!RoomType::Lecture.hosts(CourseType::Lab));
        assert!(!RoomType::Lab.hosts(CourseType::Seminar));
    }

    #[test]
    fn test_room_suits_capacity() {
        let course = Course::new("CSC111", CourseType::Lecture, 3).with_min_capacity(40);
        let big = Room::new("R1", RoomType::Lecture).with_capacity(60);
        let small = Room::new("R2", RoomType::Lecture).with_capacity(20);
        let unknown = Room::new("R3", RoomType::Lecture);

        assert!(big.suits(&course));
        assert!(!small.suits(&course));
        // Unknown capacity does not disqualify on its own
        assert!(unknown.suits(&course));
    }

    #[test]
    fn test_instructor_qualification() {
        let ins = Instructor::new("INS1")
            .qualified_for("CSC111")
            .qualified_for("CSC212");
        assert!(ins.is_qualified("CSC111"));
        assert!(!ins.is_qualified("MAT101"));
    }

    #[test]
    fn test_pool_sorted_ids_are_deterministic() {
        let pool = ResourcePool::new()
            .with_room(Room::new("R2", RoomType::Lecture))
            .with_room(Room::new("R1", RoomType::Lecture))
            .with_instructor(Instructor::new("B"))
            .with_instructor(Instructor::new("A"));

        assert_eq!(pool.sorted_room_ids(), vec!["R1", "R2"]);
        assert_eq!(pool.sorted_instructor_ids(), vec!["A", "B"]);
    }

    #[test]
    fn test_weekly_horizon_dedups_shared_slots() {
        let slot = TimeSlot::at(DayOfWeek::Monday, (9, 0), (10, 0));
        let pool = ResourcePool::new()
            .with_level_slots(1, vec![slot])
            .with_level_slots(2, vec![slot, TimeSlot::at(DayOfWeek::Monday, (10, 0), (11, 0))]);

        // Shared slot counted once: 60 + 60
        assert_eq!(pool.weekly_horizon_min(), 120);
    }

    #[test]
    fn test_pool_deserializes_from_snapshot_fixture() {
        // The shape a record-store export hands over the boundary.
        let json = r#"{
            "courses": {
                "CSC111": {
                    "id": "CSC111",
                    "title": "Intro to Computing",
                    "course_type": "Lecture",
                    "credit_hours": 2,
                    "min_capacity": 30
                }
            },
            "rooms": {
                "R101": { "id": "R101", "room_type": "Lecture", "capacity": 40 }
            },
            "instructors": {
                "INS1": {
                    "id": "INS1",
                    "qualified_courses": ["CSC111"],
                    "preferred_start_min": 540,
                    "preferred_end_min": 1020
                }
            },
            "level_slots": {
                "1": [
                    { "day": "Monday", "start_min": 540, "end_min": 600 },
                    { "day": "Tuesday", "start_min": 540, "end_min": 600 }
                ]
            }
        }"#;

        let pool: ResourcePool = serde_json::from_str(json).unwrap();
        assert_eq!(pool.course("CSC111").unwrap().credit_hours, 2);
        assert_eq!(pool.room("R101").unwrap().capacity, Some(40));
        assert!(pool.instructor("INS1").unwrap().is_qualified("CSC111"));
        assert_eq!(pool.slots_for_level(1).len(), 2);
        assert_eq!(pool.slots_for_level(1)[0].day, DayOfWeek::Monday);

        // Survives a round trip unchanged where it matters
        let back: ResourcePool =
            serde_json::from_str(&serde_json::to_string(&pool).unwrap()).unwrap();
        assert_eq!(back.sorted_room_ids(), pool.sorted_room_ids());
        assert_eq!(back.slots_for_level(1), pool.slots_for_level(1));
    }

    #[test]
    fn test_levels_ascending() {
        let pool = ResourcePool::new()
            .with_level_slots(3, vec![])
            .with_level_slots(1, vec![]);
        assert_eq!(pool.levels(), vec![1, 3]);
    }
}
