//! Independent solution validation.
//!
//! Re-checks a finished timetable from scratch, trusting nothing the search
//! did: every hard constraint is evaluated pairwise over the merged solution,
//! soft penalties are re-scored, and per-resource utilization and per-level
//! distribution are reported. Validation is pure — it never mutates the
//! solution, and validating the same timetable twice produces identical
//! reports.

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::config::SolveConfig;
use crate::constraints::{band_distance, ConstraintRegistry, HardViolation, SoftScore};
use crate::error::ScheduleError;
use crate::models::{DayOfWeek, ResourcePool, Timetable};

/// Noon boundary for the morning/afternoon split.
const NOON_MIN: i32 = 12 * 60;

/// How one level's lectures spread over the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDistribution {
    /// The level.
    pub level: u8,
    /// Lectures starting before noon.
    pub morning: usize,
    /// Lectures starting at or after noon.
    pub afternoon: usize,
    /// Lecture count per weekday.
    pub by_day: BTreeMap<DayOfWeek, usize>,
}

/// The full validation report for one timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Hard violations found by the independent re-check.
    pub hard_violations: Vec<HardViolation>,
    /// Soft penalty breakdown.
    pub soft: SoftScore,
    /// Overall quality in [0, 1]. Any hard violation forces 0.
    pub quality_score: f64,
    /// Utilization ratio per room, sorted by id.
    pub room_utilization: Vec<(String, f64)>,
    /// Utilization ratio per instructor, sorted by id.
    pub instructor_utilization: Vec<(String, f64)>,
    /// Week spread per level, ascending.
    pub level_distribution: Vec<LevelDistribution>,
}

impl ValidationReport {
    /// Whether the solution satisfies every hard constraint.
    pub fn is_valid(&self) -> bool {
        self.hard_violations.is_empty()
    }

    /// Renders a short human-readable summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "validation: {} ({} hard violation(s)), quality {:.3}",
            if self.is_valid() { "OK" } else { "INVALID" },
            self.hard_violations.len(),
            self.quality_score
        );
        for v in &self.hard_violations {
            let _ = writeln!(out, "  ! {}", v.message);
        }
        for (constraint, raw, weighted) in &self.soft.penalties {
            let _ = writeln!(out, "  {constraint:?}: {raw:.2} (weighted {weighted:.2})");
        }
        for d in &self.level_distribution {
            let _ = writeln!(
                out,
                "  level {}: {} morning / {} afternoon",
                d.level, d.morning, d.afternoon
            );
        }
        out
    }
}

/// Stateless validator over a constraint registry.
#[derive(Debug, Default)]
pub struct SolutionValidator {
    registry: ConstraintRegistry,
}

impl SolutionValidator {
    /// Creates a validator with the standard constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator over a custom registry.
    pub fn with_registry(registry: ConstraintRegistry) -> Self {
        Self { registry }
    }

    /// Produces the full report for a timetable.
    pub fn validate(
        &self,
        timetable: &Timetable,
        pool: &ResourcePool,
        config: &SolveConfig,
    ) -> ValidationReport {
        let hard_violations = self.registry.check_all(timetable, pool);
        let soft = self.registry.score_soft(timetable, pool, config);

        let horizon = pool.weekly_horizon_min();
        let room_busy = timetable.room_busy_min();
        let instructor_busy = timetable.instructor_busy_min();
        let ratio = |busy: i32| {
            if horizon > 0 {
                busy as f64 / horizon as f64
            } else {
                0.0
            }
        };

        let room_utilization: Vec<(String, f64)> = pool
            .sorted_room_ids()
            .into_iter()
            .map(|id| (id.to_string(), ratio(*room_busy.get(id).unwrap_or(&0))))
            .collect();
        let instructor_utilization: Vec<(String, f64)> = pool
            .sorted_instructor_ids()
            .into_iter()
            .map(|id| (id.to_string(), ratio(*instructor_busy.get(id).unwrap_or(&0))))
            .collect();

        let quality_score = if hard_violations.is_empty() {
            quality(
                soft.total,
                &room_utilization,
                &instructor_utilization,
                config,
            )
        } else {
            0.0
        };

        debug!(
            "validated {} assignments: {} violation(s), quality {:.3}",
            timetable.len(),
            hard_violations.len(),
            quality_score
        );

        ValidationReport {
            hard_violations,
            soft,
            quality_score,
            room_utilization,
            instructor_utilization,
            level_distribution: level_distribution(timetable),
        }
    }

    /// Validates and converts hard violations into an error.
    pub fn ensure_valid(
        &self,
        timetable: &Timetable,
        pool: &ResourcePool,
        config: &SolveConfig,
    ) -> Result<ValidationReport, ScheduleError> {
        let report = self.validate(timetable, pool, config);
        if report.is_valid() {
            Ok(report)
        } else {
            Err(ScheduleError::ValidationFailed {
                violations: report.hard_violations.len(),
            })
        }
    }
}

/// Quality in [0, 1]: 0.7 from the soft-penalty component `1 - p/(1+p)`,
/// 0.3 from how close mean utilization sits to the configured band, clamped
/// so a degenerate band cannot push the score outside the range. Exactly
/// 1.0 only for a zero-penalty solution with in-band mean utilization.
fn quality(
    soft_total: f64,
    room_utilization: &[(String, f64)],
    instructor_utilization: &[(String, f64)],
    config: &SolveConfig,
) -> f64 {
    let penalty_component = 1.0 - soft_total / (1.0 + soft_total);

    let ratios: Vec<f64> = room_utilization
        .iter()
        .chain(instructor_utilization)
        .map(|(_, r)| *r)
        .collect();
    let band_component = if ratios.is_empty() {
        0.0
    } else {
        let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
        1.0 - band_distance(mean, config.low_utilization, config.high_utilization)
    };

    (0.7 * penalty_component + 0.3 * band_component).clamp(0.0, 1.0)
}

/// Morning/afternoon and per-day spread, per level ascending.
fn level_distribution(timetable: &Timetable) -> Vec<LevelDistribution> {
    timetable
        .levels()
        .into_iter()
        .map(|level| {
            let assignments = timetable.assignments_for_level(level);
            let morning = assignments
                .iter()
                .filter(|a| a.slot().start_min < NOON_MIN)
                .count();
            let by_day: BTreeMap<DayOfWeek, usize> = assignments
                .iter()
                .map(|a| a.slot().day)
                .counts()
                .into_iter()
                .collect();
            LevelDistribution {
                level,
                morning,
                afternoon: assignments.len() - morning,
                by_day,
            }
        })
        .collect()
}
