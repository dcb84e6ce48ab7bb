//! Error taxonomy for the timetabling engine.
//!
//! Only genuinely external failures are errors. Internal search dead ends
//! (a candidate violating a hard constraint) are control flow inside the
//! solver and never surface here.

use std::fmt;

use crate::models::UnitKey;

/// Externally surfaced failures of the generation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A unit has zero type-matching candidates before search starts.
    /// A configuration/data problem; not retried.
    EmptyDomain {
        /// The unschedulable unit.
        unit: UnitKey,
    },
    /// Arc consistency proved no consistent assignment exists for a level.
    Unsatisfiable {
        /// The level that cannot be scheduled.
        level: u8,
        /// The unit whose domain was wiped out.
        unit: UnitKey,
    },
    /// Search exhausted its decision budget. Recoverable: the caller may
    /// retry with a larger budget or a smaller scope.
    BudgetExceeded {
        /// The level being searched.
        level: u8,
        /// The unbound unit with the smallest domain at the point of
        /// failure — the tightest spot in the problem.
        tightest_unit: UnitKey,
        /// Decision points explored before giving up.
        decisions: u64,
    },
    /// A finished solution failed independent re-validation. Fatal to the
    /// generation run; never returned as success.
    ValidationFailed {
        /// Number of hard violations found by the validator.
        violations: usize,
    },
}

impl ScheduleError {
    /// Whether the caller may sensibly retry with relaxed limits.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScheduleError::BudgetExceeded { .. })
    }
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::EmptyDomain { unit } => {
                write!(f, "unit {unit} has no type-matching candidates")
            }
            ScheduleError::Unsatisfiable { level, unit } => {
                write!(
                    f,
                    "level {level} is unsatisfiable: domain of {unit} emptied during propagation"
                )
            }
            ScheduleError::BudgetExceeded {
                level,
                tightest_unit,
                decisions,
            } => {
                write!(
                    f,
                    "search budget exhausted after {decisions} decisions on level {level}; \
                     tightest unit: {tightest_unit}"
                )
            }
            ScheduleError::ValidationFailed { violations } => {
                write!(f, "finished solution failed re-validation with {violations} violation(s)")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}
