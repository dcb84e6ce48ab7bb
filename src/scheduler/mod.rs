//! Level-by-level generation pipeline.
//!
//! Levels are scheduled independently, in ascending order, against a shared
//! [`ResourceLedger`]: each level expands its course offerings into units,
//! builds domains, runs arc consistency, searches, scores the enumerated
//! solutions, and commits the best one. Commitment is one-way — a later
//! level's failure never reopens an earlier level's schedule; it is recorded
//! and the remaining levels still run.
//!
//! An unschedulable unit ([`ScheduleError::EmptyDomain`]) is different: it
//! means the input data cannot work at all, so the whole run aborts.

use log::{info, warn};

use crate::catalog::DomainCatalog;
use crate::config::SolveConfig;
use crate::constraints::ConstraintRegistry;
use crate::error::ScheduleError;
use crate::ledger::ResourceLedger;
use crate::models::{expand_level, Assignment, ResourcePool, SchedulableUnit, Timetable, UnitKey};
use crate::propagation::enforce_arc_consistency;
use crate::solver::BacktrackingSolver;

/// One course section offered to a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offering {
    /// Course id, resolved against the pool's catalog.
    pub course_id: String,
    /// Section id (student cohort within the level).
    pub section_id: String,
}

/// The course offerings of one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelPlan {
    /// Student level.
    pub level: u8,
    /// Offered course sections.
    pub offerings: Vec<Offering>,
}

impl LevelPlan {
    /// Creates an empty plan for a level.
    pub fn new(level: u8) -> Self {
        Self {
            level,
            offerings: Vec::new(),
        }
    }

    /// Adds a course section offering.
    pub fn offer(mut self, course_id: impl Into<String>, section_id: impl Into<String>) -> Self {
        self.offerings.push(Offering {
            course_id: course_id.into(),
            section_id: section_id.into(),
        });
        self
    }
}

/// A level that could not be scheduled, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFailure {
    /// The failed level.
    pub level: u8,
    /// Why it failed.
    pub error: ScheduleError,
}

/// Aggregated counters across the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Levels attempted.
    pub levels_attempted: usize,
    /// Levels successfully committed.
    pub levels_scheduled: usize,
    /// Units committed across all levels.
    pub units_scheduled: usize,
    /// Solver decision points, summed over levels.
    pub decisions: u64,
    /// Solver backtracks, summed over levels.
    pub backtracks: u64,
    /// Forward-checking prunes, summed over levels.
    pub forward_prunes: u64,
    /// Arc revisions during preprocessing, summed over levels.
    pub propagation_revisions: u64,
    /// Values pruned during preprocessing, summed over levels.
    pub propagation_pruned: u64,
}

/// The outcome of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratorResult {
    /// Committed assignments across all scheduled levels.
    pub timetable: Timetable,
    /// Levels that could not be scheduled.
    pub failures: Vec<LevelFailure>,
    /// Aggregated counters.
    pub stats: GenerationStats,
}

impl GeneratorResult {
    /// Whether every level was scheduled.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Schedules levels in ascending order against a shared resource ledger.
#[derive(Debug)]
pub struct LevelScheduler {
    registry: ConstraintRegistry,
    config: SolveConfig,
}

impl LevelScheduler {
    /// Creates a scheduler with the standard constraint set.
    pub fn new(config: SolveConfig) -> Self {
        Self {
            registry: ConstraintRegistry::standard(),
            config,
        }
    }

    /// Creates a scheduler with a custom constraint registry.
    pub fn with_registry(config: SolveConfig, registry: ConstraintRegistry) -> Self {
        Self { registry, config }
    }

    /// Runs the full pipeline over every level plan.
    ///
    /// Per-level failures (unsatisfiable, budget) are recorded in the result
    /// and later levels still run; an unschedulable unit aborts the run.
    pub fn generate(
        &self,
        pool: &ResourcePool,
        plans: &[LevelPlan],
    ) -> Result<GeneratorResult, ScheduleError> {
        let mut ordered: Vec<&LevelPlan> = plans.iter().collect();
        ordered.sort_by_key(|p| p.level);

        let mut ledger = ResourceLedger::new();
        let mut timetable = Timetable::new();
        let mut failures = Vec::new();
        let mut stats = GenerationStats::default();

        for plan in ordered {
            stats.levels_attempted += 1;
            let units = self.expand_plan(pool, plan)?;

            match self.schedule_level(pool, &ledger, &timetable, plan.level, &units, &mut stats) {
                Ok(assignments) => {
                    info!(
                        "level {}: committed {} assignments",
                        plan.level,
                        assignments.len()
                    );
                    ledger.commit(&assignments);
                    stats.levels_scheduled += 1;
                    stats.units_scheduled += assignments.len();
                    timetable.extend(assignments);
                }
                Err(e @ ScheduleError::EmptyDomain { .. }) => return Err(e),
                Err(error) => {
                    warn!("level {}: {error}", plan.level);
                    failures.push(LevelFailure {
                        level: plan.level,
                        error,
                    });
                }
            }
        }

        info!(
            "generation finished: {}/{} levels, {} assignments",
            stats.levels_scheduled,
            stats.levels_attempted,
            timetable.len()
        );
        Ok(GeneratorResult {
            timetable,
            failures,
            stats,
        })
    }

    /// Expands a plan into schedulable units, resolving course ids.
    fn expand_plan(
        &self,
        pool: &ResourcePool,
        plan: &LevelPlan,
    ) -> Result<Vec<SchedulableUnit>, ScheduleError> {
        let mut offerings = Vec::with_capacity(plan.offerings.len());
        for o in &plan.offerings {
            let course = pool.course(&o.course_id).ok_or_else(|| {
                // An offering for a course the catalog does not know cannot
                // be scheduled under any resource allocation.
                ScheduleError::EmptyDomain {
                    unit: UnitKey {
                        course_id: o.course_id.clone(),
                        section_id: o.section_id.clone(),
                        lecture_no: 1,
                        level: plan.level,
                    },
                }
            })?;
            offerings.push((course, o.section_id.as_str()));
        }
        Ok(expand_level(&offerings, plan.level))
    }

    /// Schedules one level: domains, propagation, search, best-of-n pick.
    fn schedule_level(
        &self,
        pool: &ResourcePool,
        ledger: &ResourceLedger,
        committed: &Timetable,
        level: u8,
        units: &[SchedulableUnit],
        stats: &mut GenerationStats,
    ) -> Result<Vec<Assignment>, ScheduleError> {
        let catalog = DomainCatalog::new(pool, ledger);
        let mut domains = catalog.build_all(units)?;

        let prop = enforce_arc_consistency(units, &mut domains, &self.registry, level)?;
        stats.propagation_revisions += prop.revisions;
        stats.propagation_pruned += prop.pruned;

        let solver = BacktrackingSolver::new(units, &self.registry, &self.config, level);
        let outcome = solver.solve(domains)?;
        stats.decisions += outcome.stats.decisions;
        stats.backtracks += outcome.stats.backtracks;
        stats.forward_prunes += outcome.stats.forward_prunes;

        // Score each enumerated solution in the context of everything
        // already committed; keep the first-found minimum so ties stay
        // deterministic.
        let mut best: Option<(f64, Vec<Assignment>)> = None;
        for solution in outcome.solutions {
            let mut merged = committed.clone();
            merged.extend(solution.iter().cloned());
            let total = self.registry.score_soft(&merged, pool, &self.config).total;
            let better = match &best {
                Some((current, _)) => total < *current,
                None => true,
            };
            if better {
                best = Some((total, solution));
            }
        }

        match best {
            Some((_, assignments)) => Ok(assignments),
            // solve() never returns Ok with zero solutions
            None => Err(ScheduleError::Unsatisfiable {
                level,
                unit: units
                    .first()
                    .map(|u| u.key.clone())
                    .unwrap_or(UnitKey {
                        course_id: String::new(),
                        section_id: String::new(),
                        lecture_no: 1,
                        level,
                    }),
            }),
        }
    }
}
