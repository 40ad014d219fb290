//! The reference `Unit` implementation used by skirmish matches.

use serde::{Deserialize, Serialize};

use crate::core::{Team, Unit, UnitId, WorldPos};
use crate::effects::StatModifiers;

/// A skirmish combatant.
///
/// Owns its stat pools directly; status-effect bookkeeping lives in
/// the per-unit `StatusTracker` the match keeps alongside.
///
/// ## Example
///
/// ```
/// use dark_protocol::core::{Team, Unit, UnitId, WorldPos};
/// use dark_protocol::skirmish::SkirmishUnit;
///
/// let vex = SkirmishUnit::new(UnitId::new(1), "Vex", Team::new(0), WorldPos::new(0.0, 0.0))
///     .with_max_health(50)
///     .with_action_points(4);
///
/// assert_eq!(vex.current_health(), 50);
/// assert_eq!(vex.action_points(), 4);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkirmishUnit {
    id: UnitId,
    name: String,
    team: Team,
    position: WorldPos,
    max_health: u32,
    health: u32,
    base_action_points: i32,
    base_movement_points: i32,
    action_points: i32,
    movement_points: i32,
}

impl SkirmishUnit {
    /// Create a unit at full health with the default stat pools
    /// (100 health, 3 action points, 5 movement points).
    #[must_use]
    pub fn new(id: UnitId, name: impl Into<String>, team: Team, position: WorldPos) -> Self {
        Self {
            id,
            name: name.into(),
            team,
            position,
            max_health: 100,
            health: 100,
            base_action_points: 3,
            base_movement_points: 5,
            action_points: 3,
            movement_points: 5,
        }
    }

    /// Set maximum health; current health follows.
    #[must_use]
    pub fn with_max_health(mut self, max_health: u32) -> Self {
        self.max_health = max_health;
        self.health = max_health;
        self
    }

    /// Set the per-turn action-point pool; the current pool follows.
    #[must_use]
    pub fn with_action_points(mut self, action_points: i32) -> Self {
        self.base_action_points = action_points;
        self.action_points = action_points;
        self
    }

    /// Set the per-turn movement-point pool; the current pool follows.
    #[must_use]
    pub fn with_movement_points(mut self, movement_points: i32) -> Self {
        self.base_movement_points = movement_points;
        self.movement_points = movement_points;
        self
    }

    /// The unit's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Refill both point pools for a new turn.
    ///
    /// The refill is base pool plus the aggregate modifiers of the
    /// effects still active after ticking, so a slow that expired this
    /// turn no longer drags on the pool.
    pub fn refresh_for_turn(&mut self, modifiers: &StatModifiers) {
        self.action_points = self.base_action_points + modifiers.action_points;
        self.movement_points = self.base_movement_points + modifiers.movement_points;
    }
}

impl Unit for SkirmishUnit {
    fn id(&self) -> UnitId {
        self.id
    }

    fn team(&self) -> Team {
        self.team
    }

    fn position(&self) -> WorldPos {
        self.position
    }

    fn set_position(&mut self, position: WorldPos) {
        self.position = position;
    }

    fn max_health(&self) -> u32 {
        self.max_health
    }

    fn current_health(&self) -> u32 {
        self.health
    }

    fn take_damage(&mut self, amount: u32, _source: Option<UnitId>) {
        self.health = self.health.saturating_sub(amount);
    }

    fn heal(&mut self, amount: u32, _source: Option<UnitId>) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    fn action_points(&self) -> i32 {
        self.action_points
    }

    fn movement_points(&self) -> i32 {
        self.movement_points
    }

    fn add_action_points(&mut self, delta: i32) {
        self.action_points += delta;
    }

    fn add_movement_points(&mut self, delta: i32) {
        self.movement_points += delta;
    }
}
