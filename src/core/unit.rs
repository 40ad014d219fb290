//! Unit identity and the combat-unit collaborator trait.
//!
//! The engine never owns units. The host (game loop, scene, test
//! harness) owns them and hands the engine mutable access through the
//! `Unit` trait. Health, team, position, and action/movement pools are
//! the only things the engine needs to see.
//!
//! ## Usage
//!
//! ```
//! use dark_protocol::core::{Team, UnitId};
//!
//! let scout = UnitId::new(3);
//! assert_eq!(scout.raw(), 3);
//! assert_eq!(format!("{}", scout), "Unit(3)");
//!
//! let blue = Team::new(0);
//! let red = Team::new(1);
//! assert!(!blue.is_ally_of(red));
//! ```

use serde::{Deserialize, Serialize};

use super::grid::WorldPos;

/// Unique identifier for a combat unit.
///
/// Allocated by the host; the engine only compares and stores them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Create a new unit ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for UnitId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

/// Team affiliation for targeting checks.
///
/// Units on the same team are allies; everything else is an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team(pub u8);

impl Team {
    /// Create a new team.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Check whether two teams are allied (same team).
    #[must_use]
    pub const fn is_ally_of(self, other: Team) -> bool {
        self.0 == other.0
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team({})", self.0)
    }
}

/// Combat-unit collaborator.
///
/// Implemented by the host's unit type. The engine reads stats through
/// the getters and mutates health and point pools through the provided
/// entry points. Implementations own their clamping rules: `take_damage`
/// saturates at zero health, `heal` clamps at `max_health`. Point deltas
/// are signed and must be symmetric, because status-effect modifiers are
/// applied on creation and rolled back on removal with the negated
/// delta.
pub trait Unit {
    /// The unit's identifier.
    fn id(&self) -> UnitId;

    /// The unit's team, used for ally/enemy targeting checks.
    fn team(&self) -> Team;

    /// Current world-space position.
    fn position(&self) -> WorldPos;

    /// Move the unit to a new world-space position.
    ///
    /// Called by the host after a movement card resolves, never by the
    /// engine itself.
    fn set_position(&mut self, position: WorldPos);

    /// Maximum health.
    fn max_health(&self) -> u32;

    /// Current health. Zero means dead.
    fn current_health(&self) -> u32;

    /// Whether the unit is still alive.
    fn is_alive(&self) -> bool {
        self.current_health() > 0
    }

    /// Reduce health by `amount`, saturating at zero.
    ///
    /// `source` attributes the damage for host-side bookkeeping. The
    /// implementation must not invoke engine hooks itself; the engine
    /// drives the damage pipeline around this call.
    fn take_damage(&mut self, amount: u32, source: Option<UnitId>);

    /// Restore health by `amount`, clamped at `max_health`.
    fn heal(&mut self, amount: u32, source: Option<UnitId>);

    /// Current action points. May go negative under debuffs.
    fn action_points(&self) -> i32;

    /// Current movement points. May go negative under debuffs.
    fn movement_points(&self) -> i32;

    /// Apply a signed action-point delta.
    fn add_action_points(&mut self, delta: i32);

    /// Apply a signed movement-point delta.
    fn add_movement_points(&mut self, delta: i32);

    /// Pay an action-point cost.
    fn spend_action_points(&mut self, amount: u32) {
        self.add_action_points(-(amount as i32));
    }

    /// Grant action points.
    fn gain_action_points(&mut self, amount: u32) {
        self.add_action_points(amount as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id() {
        let id = UnitId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Unit(42)");
        assert_eq!(UnitId::from(42u32), id);
    }

    #[test]
    fn test_team_allies() {
        assert!(Team::new(0).is_ally_of(Team::new(0)));
        assert!(!Team::new(0).is_ally_of(Team::new(1)));
    }

    #[test]
    fn test_unit_id_serialization() {
        let id = UnitId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        let back: UnitId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
