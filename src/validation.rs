//! Input integrity checks.
//!
//! Catches malformed data before any scheduling starts: duplicate ids in
//! the raw record lists, empty identifiers, zero-credit courses,
//! qualifications naming unknown courses, off-grid or reversed timeslots,
//! and plans referencing courses or levels the pool does not have.
//! Reporting every issue at once beats failing on the first one when a
//! record store export is broken in several places.

use std::collections::HashSet;
use std::fmt;

use crate::models::{Course, Instructor, ResourcePool, Room};
use crate::scheduler::LevelPlan;

/// Classification of an input problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssueKind {
    /// Two records of the same kind share an id.
    DuplicateId,
    /// An id field is empty.
    EmptyIdentifier,
    /// A course has zero credit hours and would expand into nothing.
    ZeroCreditHours,
    /// A qualification or offering names a course the catalog lacks.
    UnknownCourseReference,
    /// A timeslot is reversed, out of day range, or off the grid.
    MalformedSlot,
    /// A planned level has no timeslot grid.
    MissingLevelSlots,
    /// The same (course, section) is offered twice in one plan.
    DuplicateOffering,
}

/// One input problem, with enough context to fix it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Classification.
    pub kind: ValidationIssueKind,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    fn new(kind: ValidationIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Checks raw record lists before they are pooled.
///
/// [`ResourcePool`] keys records by id, so a duplicate silently overwrites
/// its predecessor the moment it is inserted; this scan over the original
/// lists is the only place the collision is still visible. Call it on the
/// record-store export, then build the pool.
pub fn validate_records(
    courses: &[Course],
    rooms: &[Room],
    instructors: &[Instructor],
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut course_ids = HashSet::new();
    for c in courses {
        if !course_ids.insert(c.id.as_str()) {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::DuplicateId,
                format!("duplicate course id: {}", c.id),
            ));
        }
    }

    let mut room_ids = HashSet::new();
    for r in rooms {
        if !room_ids.insert(r.id.as_str()) {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::DuplicateId,
                format!("duplicate room id: {}", r.id),
            ));
        }
    }

    let mut instructor_ids = HashSet::new();
    for i in instructors {
        if !instructor_ids.insert(i.id.as_str()) {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::DuplicateId,
                format!("duplicate instructor id: {}", i.id),
            ));
        }
    }

    issues
}

/// Checks the resource pool. Issues are reported in a deterministic order
/// (sorted by id within each category).
pub fn validate_pool(pool: &ResourcePool) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut course_ids: Vec<&str> = pool.courses.keys().map(String::as_str).collect();
    course_ids.sort_unstable();
    for id in &course_ids {
        if id.is_empty() {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::EmptyIdentifier,
                "course with empty id",
            ));
        }
        if let Some(course) = pool.course(id) {
            if course.credit_hours == 0 {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::ZeroCreditHours,
                    format!("course {id} has zero credit hours"),
                ));
            }
        }
    }

    for id in pool.sorted_room_ids() {
        if id.is_empty() {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::EmptyIdentifier,
                "room with empty id",
            ));
        }
    }

    for id in pool.sorted_instructor_ids() {
        if id.is_empty() {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::EmptyIdentifier,
                "instructor with empty id",
            ));
        }
        if let Some(instructor) = pool.instructor(id) {
            for course_id in &instructor.qualified_courses {
                if pool.course(course_id).is_none() {
                    issues.push(ValidationIssue::new(
                        ValidationIssueKind::UnknownCourseReference,
                        format!("instructor {id} qualified for unknown course {course_id}"),
                    ));
                }
            }
        }
    }

    for level in pool.levels() {
        for slot in pool.slots_for_level(level) {
            if !slot.is_well_formed() {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::MalformedSlot,
                    format!("level {level} has malformed slot {slot}"),
                ));
            }
        }
    }

    issues
}

/// Checks level plans against the pool.
pub fn validate_plans(pool: &ResourcePool, plans: &[LevelPlan]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for plan in plans {
        if pool.slots_for_level(plan.level).is_empty() {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::MissingLevelSlots,
                format!("level {} has no timeslot grid", plan.level),
            ));
        }

        let mut seen: Vec<(&str, &str)> = Vec::new();
        for o in &plan.offerings {
            if pool.course(&o.course_id).is_none() {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::UnknownCourseReference,
                    format!(
                        "level {} offers unknown course {}",
                        plan.level, o.course_id
                    ),
                ));
            }
            let pair = (o.course_id.as_str(), o.section_id.as_str());
            if seen.contains(&pair) {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::DuplicateOffering,
                    format!(
                        "level {} offers {}/{} more than once",
                        plan.level, o.course_id, o.section_id
                    ),
                ));
            }
            seen.push(pair);
        }
    }

    issues
}

/// Runs every input check; `Err` carries the full issue list.
pub fn validate_inputs(
    pool: &ResourcePool,
    plans: &[LevelPlan],
) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = validate_pool(pool);
    issues.extend(validate_plans(pool, plans));
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
