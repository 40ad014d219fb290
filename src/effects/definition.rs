//! Status-effect definitions - static authored data.
//!
//! `EffectDefinition` holds the immutable properties of a status
//! effect. For example, "burn" is a harmful damage-over-time effect
//! dealing 5 per turn and stacking to 3 - all of that lives here.
//!
//! Per-unit runtime state (stacks, remaining turns) is stored
//! separately in `ActiveEffect`.

use serde::{Deserialize, Serialize};

use crate::handlers::HandlerId;

/// Unique identifier for an effect definition.
///
/// Definition IDs come from authored data ("burn", "shield_wall"),
/// not from an allocator. Serializes as the bare string so data files
/// read naturally.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(pub String);

impl EffectId {
    /// Create a new effect ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EffectId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EffectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Effect category.
///
/// The tracker interprets `DamageOverTime` and `HealOverTime` ticks
/// itself. Control kinds (`Stun`, `Root`, `Stealth`, `Shield`,
/// `Taunt`, `Confusion`) are recorded and surfaced through queries;
/// what they block is decided by the host's action system. `Custom`
/// effects carry all of their behavior in a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    DamageOverTime,
    HealOverTime,
    StatBuff,
    StatDebuff,
    Stun,
    Root,
    Stealth,
    Shield,
    Taunt,
    Confusion,
    Custom,
}

/// Whether an effect helps or harms its carrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Beneficial,
    Harmful,
}

impl Polarity {
    /// Whether this polarity marks a harmful effect.
    #[must_use]
    pub const fn is_harmful(self) -> bool {
        matches!(self, Polarity::Harmful)
    }
}

/// Flat and percentage stat deltas carried by an effect.
///
/// Point deltas apply once when the instance is created and are rolled
/// back with the negated value on removal. Percent fields are never
/// applied by the engine; hosts read them through
/// `StatusTracker::aggregate_modifiers`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifiers {
    /// Movement-point delta.
    #[serde(default)]
    pub movement_points: i32,
    /// Action-point delta.
    #[serde(default)]
    pub action_points: i32,
    /// Outgoing-damage modifier in percent, bounded to [-100, 100].
    #[serde(default)]
    pub damage_percent: i32,
    /// Incoming-healing modifier in percent, bounded to [-100, 100].
    #[serde(default)]
    pub healing_percent: i32,
}

impl StatModifiers {
    /// Whether every field is zero.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        self.movement_points == 0
            && self.action_points == 0
            && self.damage_percent == 0
            && self.healing_percent == 0
    }
}

fn default_max_stacks() -> u32 {
    1
}

/// Static status-effect definition.
///
/// Immutable once loaded; invariants (unique non-empty ID, stack cap
/// at least 1, percent bounds) are enforced by
/// `EffectCatalog::validate`, not by construction.
///
/// ## Example
///
/// ```
/// use dark_protocol::effects::{EffectDefinition, EffectKind, Polarity};
///
/// let burn = EffectDefinition::new("burn", "Burn", EffectKind::DamageOverTime, Polarity::Harmful)
///     .with_per_turn_value(5)
///     .with_stacking(3);
///
/// assert_eq!(burn.per_turn_value, 5);
/// assert!(burn.stackable);
/// assert_eq!(burn.max_stacks, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectDefinition {
    /// Unique identifier for this definition.
    pub id: EffectId,

    /// Display name (for UI/debugging).
    pub name: String,

    /// Effect category.
    pub kind: EffectKind,

    /// Beneficial or harmful.
    pub polarity: Polarity,

    /// One-shot magnitude applied when the instance is first created.
    /// Damage for `DamageOverTime`, healing for `HealOverTime`.
    #[serde(default)]
    pub instant_value: u32,

    /// Magnitude applied on every turn tick, multiplied by stacks.
    #[serde(default)]
    pub per_turn_value: u32,

    /// Whether reapplication adds stacks instead of only refreshing.
    #[serde(default)]
    pub stackable: bool,

    /// Stack cap; further applications refresh duration only.
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,

    /// Whether any health decrease strips this effect.
    #[serde(default)]
    pub removed_on_damage: bool,

    /// Stat deltas carried by the effect.
    #[serde(default)]
    pub modifiers: StatModifiers,

    /// Optional custom-behavior handler, invoked on every apply call
    /// and on removal.
    #[serde(default)]
    pub handler: Option<HandlerId>,
}

impl EffectDefinition {
    /// Create a new definition with no magnitudes and a stack cap of 1.
    #[must_use]
    pub fn new(
        id: impl Into<EffectId>,
        name: impl Into<String>,
        kind: EffectKind,
        polarity: Polarity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            polarity,
            instant_value: 0,
            per_turn_value: 0,
            stackable: false,
            max_stacks: 1,
            removed_on_damage: false,
            modifiers: StatModifiers::default(),
            handler: None,
        }
    }

    /// Set the instant (first-application) magnitude.
    #[must_use]
    pub fn with_instant_value(mut self, value: u32) -> Self {
        self.instant_value = value;
        self
    }

    /// Set the per-turn magnitude.
    #[must_use]
    pub fn with_per_turn_value(mut self, value: u32) -> Self {
        self.per_turn_value = value;
        self
    }

    /// Make the effect stackable up to `max_stacks`.
    #[must_use]
    pub fn with_stacking(mut self, max_stacks: u32) -> Self {
        self.stackable = true;
        self.max_stacks = max_stacks;
        self
    }

    /// Strip the effect whenever the carrier takes damage.
    #[must_use]
    pub fn with_removed_on_damage(mut self) -> Self {
        self.removed_on_damage = true;
        self
    }

    /// Set the stat deltas.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: StatModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Attach a custom-behavior handler.
    #[must_use]
    pub fn with_handler(mut self, handler: impl Into<HandlerId>) -> Self {
        self.handler = Some(handler.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_id() {
        let id = EffectId::new("burn");
        assert_eq!(id.as_str(), "burn");
        assert_eq!(format!("{}", id), "burn");
        assert_eq!(EffectId::from("burn"), id);
    }

    #[test]
    fn test_definition_builder() {
        let shield = EffectDefinition::new(
            "shield_wall",
            "Shield Wall",
            EffectKind::Shield,
            Polarity::Beneficial,
        )
        .with_removed_on_damage()
        .with_handler("shield_visual");

        assert_eq!(shield.id, EffectId::new("shield_wall"));
        assert!(shield.removed_on_damage);
        assert!(!shield.stackable);
        assert_eq!(shield.max_stacks, 1);
        assert_eq!(shield.handler, Some(HandlerId::new("shield_visual")));
    }

    #[test]
    fn test_stacking_builder() {
        let burn = EffectDefinition::new("burn", "Burn", EffectKind::DamageOverTime, Polarity::Harmful)
            .with_instant_value(2)
            .with_per_turn_value(5)
            .with_stacking(3);

        assert!(burn.stackable);
        assert_eq!(burn.max_stacks, 3);
        assert_eq!(burn.instant_value, 2);
    }

    #[test]
    fn test_modifiers_neutral() {
        assert!(StatModifiers::default().is_neutral());

        let slow = StatModifiers {
            movement_points: -2,
            ..StatModifiers::default()
        };
        assert!(!slow.is_neutral());
    }

    #[test]
    fn test_definition_serialization() {
        let focus = EffectDefinition::new("focus", "Focus", EffectKind::StatBuff, Polarity::Beneficial)
            .with_modifiers(StatModifiers {
                damage_percent: 25,
                ..StatModifiers::default()
            });

        let json = serde_json::to_string(&focus).unwrap();
        let back: EffectDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(focus, back);
    }
}
