//! Backtracking search with forward checking.
//!
//! An iterative depth-first search over one level's units. Each decision
//! binds the most constrained unbound unit (smallest live domain, creation
//! order on ties) to its next candidate in catalog order, then forward-checks
//! the still-unbound neighbors, pruning their now-inconsistent values onto an
//! undo trail. Abandoning a decision pops the trail back to the frame's mark,
//! restoring every domain to its exact prior state.
//!
//! The search is deterministic: identical inputs explore identical decision
//! sequences and produce identical solutions.
//!
//! # Reference
//! Russell & Norvig, "Artificial Intelligence: A Modern Approach", Ch. 6

use log::{debug, trace};

use crate::catalog::Domain;
use crate::config::SolveConfig;
use crate::constraints::ConstraintRegistry;
use crate::error::ScheduleError;
use crate::models::{Assignment, SchedulableUnit, UnitKey};
use crate::propagation::neighbor_graph;

/// Counters from one level's search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    /// Decision points: value bindings attempted.
    pub decisions: u64,
    /// Frames abandoned after exhausting their values.
    pub backtracks: u64,
    /// Values pruned by forward checking.
    pub forward_prunes: u64,
    /// Complete solutions found.
    pub solutions_found: usize,
}

/// The result of one level's search: every enumerated solution plus the
/// search counters.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Complete assignments, one inner vector per solution, units in
    /// creation order.
    pub solutions: Vec<Vec<Assignment>>,
    /// Search counters.
    pub stats: SolverStats,
}

/// One open decision: a unit, its candidate snapshot, and the trail mark to
/// unwind to between attempts.
struct Frame {
    unit: usize,
    /// Live value indices at frame creation, in catalog order.
    values: Vec<usize>,
    cursor: usize,
    trail_mark: usize,
}

/// Depth-first solver for one level.
pub struct BacktrackingSolver<'a> {
    units: &'a [SchedulableUnit],
    registry: &'a ConstraintRegistry,
    config: &'a SolveConfig,
    level: u8,
}

impl<'a> BacktrackingSolver<'a> {
    /// Creates a solver over a level's units.
    pub fn new(
        units: &'a [SchedulableUnit],
        registry: &'a ConstraintRegistry,
        config: &'a SolveConfig,
        level: u8,
    ) -> Self {
        Self {
            units,
            registry,
            config,
            level,
        }
    }

    /// Searches for up to `solution_count` complete consistent assignments.
    ///
    /// Errors with [`ScheduleError::Unsatisfiable`] when the space is
    /// exhausted without a solution, and [`ScheduleError::BudgetExceeded`]
    /// when the decision budget runs out before the first solution. A budget
    /// hit after at least one solution returns the solutions found so far.
    pub fn solve(&self, mut domains: Vec<Domain>) -> Result<SolveOutcome, ScheduleError> {
        debug_assert_eq!(self.units.len(), domains.len());
        let mut stats = SolverStats::default();

        if self.units.is_empty() {
            stats.solutions_found = 1;
            return Ok(SolveOutcome {
                solutions: vec![Vec::new()],
                stats,
            });
        }

        let candidates: Vec<Vec<Assignment>> = self
            .units
            .iter()
            .zip(domains.iter())
            .map(|(unit, domain)| {
                (0..domain.capacity())
                    .map(|i| Assignment::new(unit.key.clone(), domain.value(i).clone()))
                    .collect()
            })
            .collect();
        let neighbors = neighbor_graph(self.units, &domains);

        let mut bound: Vec<Option<usize>> = vec![None; self.units.len()];
        let mut trail: Vec<(usize, usize)> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut solutions: Vec<Vec<Assignment>> = Vec::new();

        if let Some(first) = select_unbound(&bound, &domains) {
            stack.push(Frame {
                unit: first,
                values: domains[first].live_indices().collect(),
                cursor: 0,
                trail_mark: trail.len(),
            });
        }

        while let Some(frame) = stack.last_mut() {
            let unit = frame.unit;
            let trail_mark = frame.trail_mark;

            // Unwind the previous attempt at this frame exactly.
            while trail.len() > trail_mark {
                if let Some((u, v)) = trail.pop() {
                    domains[u].restore(v);
                }
            }
            bound[unit] = None;

            let Some(&value_idx) = frame.values.get(frame.cursor) else {
                stack.pop();
                stats.backtracks += 1;
                continue;
            };
            frame.cursor += 1;

            stats.decisions += 1;
            if stats.decisions > self.config.max_decisions {
                if solutions.is_empty() {
                    let tightest = tightest_unbound(&bound, &domains, self.units);
                    return Err(ScheduleError::BudgetExceeded {
                        level: self.level,
                        tightest_unit: tightest,
                        decisions: stats.decisions,
                    });
                }
                debug!(
                    "level {}: budget hit after {} solutions, returning early",
                    self.level,
                    solutions.len()
                );
                break;
            }

            trace!(
                "level {}: bind {} = {}",
                self.level,
                self.units[unit].key,
                candidates[unit][value_idx].value
            );
            bound[unit] = Some(value_idx);

            // Forward checking: prune inconsistent values from unbound
            // neighbors, recording every removal on the trail.
            let mut wiped = false;
            for &nb in &neighbors[unit] {
                if bound[nb].is_some() {
                    continue;
                }
                let va = &candidates[unit][value_idx];
                let doomed: Vec<usize> = domains[nb]
                    .live_indices()
                    .filter(|&j| !self.registry.consistent_pair(va, &candidates[nb][j]))
                    .collect();
                for j in doomed {
                    if domains[nb].deactivate(j) {
                        trail.push((nb, j));
                        stats.forward_prunes += 1;
                    }
                }
                if domains[nb].is_wiped() {
                    wiped = true;
                    break;
                }
            }
            if wiped {
                // Next value of the same frame; the unwind at the loop top
                // restores what this attempt pruned.
                continue;
            }

            match select_unbound(&bound, &domains) {
                Some(next) => {
                    let values: Vec<usize> = domains[next].live_indices().collect();
                    let trail_mark = trail.len();
                    stack.push(Frame {
                        unit: next,
                        values,
                        cursor: 0,
                        trail_mark,
                    });
                }
                None => {
                    let solution: Vec<Assignment> = bound
                        .iter()
                        .enumerate()
                        .filter_map(|(i, b)| b.map(|v| candidates[i][v].clone()))
                        .collect();
                    solutions.push(solution);
                    stats.solutions_found += 1;
                    if solutions.len() >= self.config.solution_count {
                        break;
                    }
                    // Keep enumerating: the loop top treats this frame as
                    // retryable and moves to its next value.
                }
            }
        }

        if solutions.is_empty() {
            let tightest = tightest_unbound(&bound, &domains, self.units);
            return Err(ScheduleError::Unsatisfiable {
                level: self.level,
                unit: tightest,
            });
        }

        debug!(
            "level {}: {} solution(s), {} decisions, {} backtracks, {} prunes",
            self.level,
            solutions.len(),
            stats.decisions,
            stats.backtracks,
            stats.forward_prunes
        );
        Ok(SolveOutcome { solutions, stats })
    }
}

/// Most constrained unbound unit: smallest live domain, creation order on
/// ties. `None` when everything is bound.
fn select_unbound(bound: &[Option<usize>], domains: &[Domain]) -> Option<usize> {
    bound
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_none())
        .map(|(i, _)| i)
        .min_by_key(|&i| (domains[i].live_count(), i))
}

/// The tightest spot in the problem, reported on failure. Falls back to the
/// first unit when everything happens to be bound.
fn tightest_unbound(
    bound: &[Option<usize>],
    domains: &[Domain],
    units: &[SchedulableUnit],
) -> UnitKey {
    match select_unbound(bound, domains) {
        Some(i) => units[i].key.clone(),
        None => units[0].key.clone(),
    }
}
