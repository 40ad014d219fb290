//! World access for the engines.
//!
//! An `Arena` is whatever the host keeps its units in. The engines
//! reach units (and their status trackers) exclusively through this
//! trait, so they can run against the real match state, a headless
//! simulation, or a two-unit test fixture without change.

use crate::effects::StatusTracker;

use super::unit::{Unit, UnitId};

/// Mutable access to one unit and its status tracker.
///
/// The two references are disjoint so the damage pipeline can mutate
/// the unit while walking the tracker.
pub struct UnitEntry<'a> {
    pub unit: &'a mut dyn Unit,
    pub effects: &'a mut StatusTracker,
}

/// Host-owned unit storage.
pub trait Arena {
    /// Look up a unit for reading.
    fn unit(&self, id: UnitId) -> Option<&dyn Unit>;

    /// Look up a unit's status tracker for reading.
    fn effects(&self, id: UnitId) -> Option<&StatusTracker>;

    /// Look up a unit and its tracker for mutation.
    fn entry_mut(&mut self, id: UnitId) -> Option<UnitEntry<'_>>;

    /// All unit IDs currently in the arena, including dead units.
    fn unit_ids(&self) -> Vec<UnitId>;
}
