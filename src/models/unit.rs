//! Schedulable unit model.
//!
//! A schedulable unit is one lecture occurrence of a course section: the
//! thing the solver binds to a (timeslot, room, instructor) triple. A course
//! with `n` credit hours expands into `n` units per section, one weekly
//! lecture each.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Course;

/// Upper bound on per-course lecture expansion.
pub const MAX_LECTURES_PER_COURSE: u8 = 10;

/// Composite identity of one lecture occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKey {
    /// Course identifier.
    pub course_id: String,
    /// Section identifier (student cohort within the level).
    pub section_id: String,
    /// Lecture number within the week (1-based).
    pub lecture_no: u8,
    /// Student level.
    pub level: u8,
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}#{}@L{}",
            self.course_id, self.section_id, self.lecture_no, self.level
        )
    }
}

/// One lecture occurrence to be scheduled.
///
/// Immutable once created; the search binds and unbinds values for it but
/// never alters the unit itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulableUnit {
    /// Composite identity.
    pub key: UnitKey,
}

impl SchedulableUnit {
    /// Creates a new unit.
    pub fn new(
        course_id: impl Into<String>,
        section_id: impl Into<String>,
        lecture_no: u8,
        level: u8,
    ) -> Self {
        Self {
            key: UnitKey {
                course_id: course_id.into(),
                section_id: section_id.into(),
                lecture_no,
                level,
            },
        }
    }

    /// Course id shorthand.
    pub fn course_id(&self) -> &str {
        &self.key.course_id
    }

    /// Level shorthand.
    pub fn level(&self) -> u8 {
        self.key.level
    }
}

/// Expands a course section into its weekly lecture units.
///
/// One unit per credit hour, capped at [`MAX_LECTURES_PER_COURSE`].
pub fn expand_course(course: &Course, section_id: &str, level: u8) -> Vec<SchedulableUnit> {
    let lectures = course.credit_hours.min(MAX_LECTURES_PER_COURSE);
    (1..=lectures)
        .map(|n| SchedulableUnit::new(course.id.clone(), section_id, n, level))
        .collect()
}

/// Expands a whole level's course list, in a stable creation order:
/// courses sorted by id, lectures ascending within each course.
pub fn expand_level(
    courses: &[(&Course, &str)],
    level: u8,
) -> Vec<SchedulableUnit> {
    let mut ordered: Vec<&(&Course, &str)> = courses.iter().collect();
    ordered.sort_by(|a, b| (&a.0.id, a.1).cmp(&(&b.0.id, b.1)));

    ordered
        .into_iter()
        .flat_map(|(course, section)| expand_course(course, section, level))
        .collect()
}
