//! Arc-consistency preprocessing (AC-3).
//!
//! Before search, prunes every domain value that cannot participate in any
//! consistent assignment pair with some neighboring unit. Two units are
//! neighbors when a pairwise hard constraint can relate them: same cohort
//! (level and section), or initial domains drawing on a shared room or
//! instructor. A classic worklist algorithm: revising an arc (a, b) removes
//! the values of `a` with no consistent partner left in `b`, and every
//! removal re-enqueues the arcs pointing at `a`.
//!
//! Pruning here only ever removes values that no solution can use, so the
//! solution set is untouched; a wiped-out domain is a proof that the level
//! has no solution at all.
//!
//! # Reference
//! Mackworth (1977), "Consistency in Networks of Relations"

use log::debug;
use std::collections::{HashSet, VecDeque};

use crate::catalog::Domain;
use crate::constraints::ConstraintRegistry;
use crate::error::ScheduleError;
use crate::models::{Assignment, SchedulableUnit};

/// Counters from one propagation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Arc revisions performed.
    pub revisions: u64,
    /// Domain values pruned.
    pub pruned: u64,
}

/// Runs AC-3 over a level's units, pruning domains in place.
///
/// Returns [`ScheduleError::Unsatisfiable`] naming the first unit whose
/// domain is wiped out.
pub fn enforce_arc_consistency(
    units: &[SchedulableUnit],
    domains: &mut [Domain],
    registry: &ConstraintRegistry,
    level: u8,
) -> Result<PropagationStats, ScheduleError> {
    debug_assert_eq!(units.len(), domains.len());

    // Candidate assignments materialized once per unit so revisions compare
    // borrowed values instead of rebuilding keys in the inner loop.
    let candidates: Vec<Vec<Assignment>> = units
        .iter()
        .zip(domains.iter())
        .map(|(unit, domain)| {
            (0..domain.capacity())
                .map(|i| Assignment::new(unit.key.clone(), domain.value(i).clone()))
                .collect()
        })
        .collect();

    let neighbors = neighbor_graph(units, domains);

    let mut worklist: VecDeque<(usize, usize)> = VecDeque::new();
    for (a, adjacent) in neighbors.iter().enumerate() {
        for &b in adjacent {
            worklist.push_back((a, b));
        }
    }

    let mut stats = PropagationStats::default();
    let mut queued: HashSet<(usize, usize)> = worklist.iter().copied().collect();

    while let Some((a, b)) = worklist.pop_front() {
        queued.remove(&(a, b));
        stats.revisions += 1;

        let removed = revise(a, b, domains, &candidates, registry);
        if removed == 0 {
            continue;
        }
        stats.pruned += removed;

        if domains[a].is_wiped() {
            return Err(ScheduleError::Unsatisfiable {
                level,
                unit: units[a].key.clone(),
            });
        }

        for &c in &neighbors[a] {
            if c != b && queued.insert((c, a)) {
                worklist.push_back((c, a));
            }
        }
    }

    debug!(
        "arc consistency on level {level}: {} revisions, {} values pruned",
        stats.revisions, stats.pruned
    );
    Ok(stats)
}

/// Revises arc (a, b): prunes values of `a` with no live consistent partner
/// in `b`. Returns the number of values removed.
fn revise(
    a: usize,
    b: usize,
    domains: &mut [Domain],
    candidates: &[Vec<Assignment>],
    registry: &ConstraintRegistry,
) -> u64 {
    let mut to_remove = Vec::new();
    for i in domains[a].live_indices() {
        let va = &candidates[a][i];
        let supported = domains[b]
            .live_indices()
            .any(|j| registry.consistent_pair(va, &candidates[b][j]));
        if !supported {
            to_remove.push(i);
        }
    }

    let mut removed = 0;
    for i in to_remove {
        if domains[a].deactivate(i) {
            removed += 1;
        }
    }
    removed
}

/// Adjacency lists: units that some pairwise hard constraint can relate.
pub fn neighbor_graph(units: &[SchedulableUnit], domains: &[Domain]) -> Vec<Vec<usize>> {
    let rooms: Vec<HashSet<&str>> = domains
        .iter()
        .map(|d| d.live_values().map(|v| v.room_id.as_str()).collect())
        .collect();
    let instructors: Vec<HashSet<&str>> = domains
        .iter()
        .map(|d| d.live_values().map(|v| v.instructor_id.as_str()).collect())
        .collect();

    let mut neighbors = vec![Vec::new(); units.len()];
    for a in 0..units.len() {
        for b in (a + 1)..units.len() {
            let same_cohort = units[a].key.level == units[b].key.level
                && units[a].key.section_id == units[b].key.section_id;
            let shared = same_cohort
                || !rooms[a].is_disjoint(&rooms[b])
                || !instructors[a].is_disjoint(&instructors[b]);
            if shared {
                neighbors[a].push(b);
                neighbors[b].push(a);
            }
        }
    }
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DomainCatalog;
    use crate::ledger::ResourceLedger;
    use crate::models::{
        Course, CourseType, DayOfWeek, Instructor, ResourcePool, Room, RoomType, TimeSlot,
    };

    fn two_unit_setup(slot_count: usize) -> (ResourcePool, Vec<SchedulableUnit>) {
        let mut slots = Vec::new();
        for i in 0..slot_count {
            let start = 9 + i as i32;
            slots.push(TimeSlot::at(DayOfWeek::Monday, (start, 0), (start + 1, 0)));
        }
        let pool = ResourcePool::new()
            .with_course(Course::new("CSC111", CourseType::Lecture, 2))
            .with_room(Room::new("R101", RoomType::Lecture))
            .with_instructor(Instructor::new("INS1").qualified_for("CSC111"))
            .with_level_slots(1, slots);
        let units = vec![
            SchedulableUnit::new("CSC111", "S1", 1, 1),
            SchedulableUnit::new("CSC111", "S1", 2, 1),
        ];
        (pool, units)
    }

    #[test]
    fn test_propagation_keeps_satisfiable_domains() {
        // Two units, two slots, one room, one instructor: each value of one
        // unit has a consistent partner (the other slot) in the other unit.
        let (pool, units) = two_unit_setup(2);
        let ledger = ResourceLedger::new();
        let mut domains = DomainCatalog::new(&pool, &ledger).build_all(&units).unwrap();

        let registry = ConstraintRegistry::standard();
        let stats = enforce_arc_consistency(&units, &mut domains, &registry, 1).unwrap();

        assert_eq!(domains[0].live_count(), 2);
        assert_eq!(domains[1].live_count(), 2);
        assert_eq!(stats.pruned, 0);
    }

    #[test]
    fn test_propagation_detects_unsatisfiable_level() {
        // Two units fighting over a single (slot, room, instructor) triple:
        // no pair of distinct non-overlapping assignments exists.
        let (pool, units) = two_unit_setup(1);
        let ledger = ResourceLedger::new();
        let mut domains = DomainCatalog::new(&pool, &ledger).build_all(&units).unwrap();

        let registry = ConstraintRegistry::standard();
        let err = enforce_arc_consistency(&units, &mut domains, &registry, 1).unwrap_err();
        assert!(matches!(err, ScheduleError::Unsatisfiable { level: 1, .. }));
    }

    #[test]
    fn test_pruned_values_have_no_support() {
        // Unit A has two slots; unit B is pinned to the 9:00 slot because
        // its only other candidate conflicts with the ledger. After
        // propagation, A must lose its 9:00 value (same room+instructor).
        let pool = ResourcePool::new()
            .with_course(Course::new("CSC111", CourseType::Lecture, 2))
            .with_room(Room::new("R101", RoomType::Lecture))
            .with_instructor(Instructor::new("INS1").qualified_for("CSC111"))
            .with_level_slots(
                1,
                vec![
                    TimeSlot::at(DayOfWeek::Monday, (9, 0), (10, 0)),
                    TimeSlot::at(DayOfWeek::Monday, (10, 0), (11, 0)),
                ],
            );
        let units = vec![
            SchedulableUnit::new("CSC111", "S1", 1, 1),
            SchedulableUnit::new("CSC111", "S1", 2, 1),
        ];
        let ledger = ResourceLedger::new();
        let mut domains = DomainCatalog::new(&pool, &ledger).build_all(&units).unwrap();

        // Pin unit B to 9:00 by pruning its 10:00 value directly.
        let ten = domains[1]
            .live_indices()
            .find(|&i| domains[1].value(i).slot.start_min == 10 * 60)
            .unwrap();
        domains[1].deactivate(ten);

        let registry = ConstraintRegistry::standard();
        let stats = enforce_arc_consistency(&units, &mut domains, &registry, 1).unwrap();

        assert_eq!(stats.pruned, 1);
        assert_eq!(domains[0].live_count(), 1);
        assert_eq!(
            domains[0].live_values().next().unwrap().slot.start_min,
            10 * 60
        );
    }

    #[test]
    fn test_neighbor_graph_links_shared_resources() {
        let (pool, units) = two_unit_setup(2);
        let ledger = ResourceLedger::new();
        let domains = DomainCatalog::new(&pool, &ledger).build_all(&units).unwrap();

        let graph = neighbor_graph(&units, &domains);
        assert_eq!(graph[0], vec![1]);
        assert_eq!(graph[1], vec![0]);
    }

    #[test]
    fn test_disjoint_units_are_not_neighbors() {
        let pool = ResourcePool::new()
            .with_course(Course::new("CSC111", CourseType::Lecture, 1))
            .with_course(Course::new("PHY110", CourseType::Lab, 1))
            .with_room(Room::new("R101", RoomType::Lecture))
            .with_room(Room::new("LAB1", RoomType::Lab))
            .with_instructor(Instructor::new("INS1").qualified_for("CSC111"))
            .with_instructor(Instructor::new("INS2").qualified_for("PHY110"))
            .with_level_slots(1, vec![TimeSlot::at(DayOfWeek::Monday, (9, 0), (10, 0))]);
        // Different sections, disjoint rooms and instructors
        let units = vec![
            SchedulableUnit::new("CSC111", "S1", 1, 1),
            SchedulableUnit::new("PHY110", "S2", 1, 1),
        ];
        let ledger = ResourceLedger::new();
        let domains = DomainCatalog::new(&pool, &ledger).build_all(&units).unwrap();

        let graph = neighbor_graph(&units, &domains);
        assert!(graph[0].is_empty());
        assert!(graph[1].is_empty());
    }
}
