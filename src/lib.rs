//! Course timetabling as constraint satisfaction.
//!
//! Generates weekly university timetables level by level: every lecture of
//! every course section is bound to a (timeslot, room, instructor) triple
//! such that no instructor, room, or student cohort is double-booked, rooms
//! suit their courses, and instructors teach only what they are qualified
//! for. Soft preferences (compact days, utilization bands, preferred hours)
//! rank the valid solutions.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `TimeSlot`, `Course`, `Room`, `Instructor`,
//!   `SchedulableUnit`, `Assignment`, `Timetable`, `ResourcePool`
//! - **`catalog`**: Per-unit candidate domains with O(1) prune/restore
//! - **`constraints`**: Hard and soft constraint registry
//! - **`propagation`**: AC-3 arc-consistency preprocessing
//! - **`solver`**: Backtracking search with forward checking
//! - **`ledger`**: Cross-level resource usage ledger
//! - **`scheduler`**: Level-by-level generation pipeline
//! - **`validator`**: Independent solution re-validation and quality scoring
//! - **`validation`**: Input integrity checks
//!
//! # Pipeline
//!
//! For each level, ascending: expand course sections into lecture units,
//! build domains against the shared ledger, prune with arc consistency,
//! search, commit the best-scoring solution. A failed level is recorded and
//! the remaining levels still run.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Mackworth (1977), "Consistency in Networks of Relations"
//! - Russell & Norvig, "Artificial Intelligence: A Modern Approach", Ch. 6

pub mod catalog;
pub mod config;
pub mod constraints;
pub mod error;
pub mod ledger;
pub mod models;
pub mod propagation;
pub mod scheduler;
pub mod solver;
pub mod validation;
pub mod validator;

pub use catalog::{Domain, DomainCatalog};
pub use config::{SolveConfig, SoftWeights};
pub use constraints::{ConstraintRegistry, HardConstraint, HardViolation, SoftConstraint, SoftScore};
pub use error::ScheduleError;
pub use ledger::ResourceLedger;
pub use models::{
    Assignment, Course, CourseType, DayOfWeek, Instructor, ResourcePool, ResourceTriple, Room,
    RoomType, SchedulableUnit, TimeSlot, Timetable, UnitKey,
};
pub use scheduler::{GenerationStats, GeneratorResult, LevelFailure, LevelPlan, LevelScheduler};
pub use solver::{BacktrackingSolver, SolveOutcome, SolverStats};
pub use validator::{SolutionValidator, ValidationReport};
