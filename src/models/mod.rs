//! Timetabling domain models.
//!
//! Core data types for the course timetabling CSP: time slots on a fixed
//! weekly grid, resource snapshots (courses, rooms, instructors), the
//! schedulable units the solver binds, and assignment/solution containers.
//!
//! All types are plain values exchanged by value; search-time mutation
//! happens only in the solver's domain store and trail, never here.

mod assignment;
mod course;
mod timeslot;
mod unit;

pub use assignment::{Assignment, ResourceTriple, Timetable};
pub use course::{Course, CourseType, Instructor, ResourcePool, Room, RoomType};
pub use timeslot::{DayOfWeek, TimeSlot, SLOT_GRID_MIN};
pub use unit::{expand_course, expand_level, SchedulableUnit, UnitKey, MAX_LECTURES_PER_COURSE};
