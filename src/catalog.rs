//! Domain catalog.
//!
//! Builds the initial candidate set for each schedulable unit: the cross
//! product of the level's legal timeslots, rooms whose type suits the
//! course, and instructors qualified for it, minus candidates already
//! consumed in the cross-level ledger. A pure function of the input
//! snapshots; nothing here mutates shared state.
//!
//! Candidate order is the deterministic catalog order — slots ascending,
//! then room id, then instructor id — and value ordering during search is
//! exactly this order.

use log::debug;

use crate::error::ScheduleError;
use crate::ledger::ResourceLedger;
use crate::models::{ResourcePool, ResourceTriple, SchedulableUnit};

/// The candidate values currently considered legal for one unit.
///
/// Values keep their catalog order for the unit's whole lifetime; pruning
/// flips an activation flag instead of removing entries, so undo is O(1)
/// and order never changes.
#[derive(Debug, Clone)]
pub struct Domain {
    values: Vec<ResourceTriple>,
    active: Vec<bool>,
    live: usize,
}

impl Domain {
    /// Creates a domain over an ordered candidate list.
    pub fn new(values: Vec<ResourceTriple>) -> Self {
        let live = values.len();
        let active = vec![true; live];
        Self {
            values,
            active,
            live,
        }
    }

    /// Number of live (unpruned) values.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Whether every value has been pruned.
    #[inline]
    pub fn is_wiped(&self) -> bool {
        self.live == 0
    }

    /// Total candidate count, pruned or not.
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Whether the value at `index` is live.
    #[inline]
    pub fn is_live(&self, index: usize) -> bool {
        self.active[index]
    }

    /// The value at `index`, live or not.
    #[inline]
    pub fn value(&self, index: usize) -> &ResourceTriple {
        &self.values[index]
    }

    /// Indices of live values, in catalog order.
    pub fn live_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.values.len()).filter(|&i| self.active[i])
    }

    /// Live values in catalog order.
    pub fn live_values(&self) -> impl Iterator<Item = &ResourceTriple> {
        self.live_indices().map(|i| &self.values[i])
    }

    /// Prunes the value at `index`. Returns `false` if it was already
    /// pruned (callers record only actual removals on the trail).
    pub fn deactivate(&mut self, index: usize) -> bool {
        if !self.active[index] {
            return false;
        }
        self.active[index] = false;
        self.live -= 1;
        true
    }

    /// Restores a previously pruned value. Exact inverse of
    /// [`Domain::deactivate`].
    pub fn restore(&mut self, index: usize) {
        debug_assert!(!self.active[index]);
        self.active[index] = true;
        self.live += 1;
    }
}

/// Builds initial domains for a level's units.
#[derive(Debug)]
pub struct DomainCatalog<'a> {
    pool: &'a ResourcePool,
    ledger: &'a ResourceLedger,
}

impl<'a> DomainCatalog<'a> {
    /// Creates a catalog over a resource snapshot and the committed ledger.
    pub fn new(pool: &'a ResourcePool, ledger: &'a ResourceLedger) -> Self {
        Self { pool, ledger }
    }

    /// Builds the initial domain for one unit.
    ///
    /// Fails with [`ScheduleError::EmptyDomain`] when type matching alone
    /// (suitable rooms x qualified instructors x level slots) yields no
    /// candidate — an unschedulable unit, detected before search starts and
    /// distinct from a mid-search dead end. Ledger-consumed candidates are
    /// filtered afterwards and may legally leave the domain empty only if
    /// type matching produced something first.
    pub fn build(&self, unit: &SchedulableUnit) -> Result<Domain, ScheduleError> {
        let course = self.pool.course(unit.course_id()).ok_or_else(|| {
            ScheduleError::EmptyDomain {
                unit: unit.key.clone(),
            }
        })?;

        let slots = self.pool.slots_for_level(unit.level());

        let rooms: Vec<&str> = self
            .pool
            .sorted_room_ids()
            .into_iter()
            .filter(|id| self.pool.room(id).is_some_and(|r| r.suits(course)))
            .collect();

        let instructors: Vec<&str> = self
            .pool
            .sorted_instructor_ids()
            .into_iter()
            .filter(|id| {
                self.pool
                    .instructor(id)
                    .is_some_and(|i| i.is_qualified(&course.id))
            })
            .collect();

        if slots.is_empty() || rooms.is_empty() || instructors.is_empty() {
            return Err(ScheduleError::EmptyDomain {
                unit: unit.key.clone(),
            });
        }

        let mut values = Vec::with_capacity(slots.len() * rooms.len() * instructors.len());
        for slot in &slots {
            for room in &rooms {
                for instructor in &instructors {
                    let triple = ResourceTriple::new(*slot, *room, *instructor);
                    if !self.ledger.conflicts(&triple) {
                        values.push(triple);
                    }
                }
            }
        }

        debug!(
            "domain for {}: {} candidates ({} slots x {} rooms x {} instructors, ledger-filtered)",
            unit.key,
            values.len(),
            slots.len(),
            rooms.len(),
            instructors.len()
        );

        Ok(Domain::new(values))
    }

    /// Builds domains for every unit of a level, in unit creation order.
    pub fn build_all(&self, units: &[SchedulableUnit]) -> Result<Vec<Domain>, ScheduleError> {
        units.iter().map(|u| self.build(u)).collect()
    }
}
