//! Card definitions - static authored data.
//!
//! `CardDefinition` holds the immutable properties of a card type.
//! For example, "Railgun Shot" costs 2 action points and deals 12
//! damage at range 6 - these are part of the definition. What a card
//! *does* is its `CardEffect` variant; there is exactly one per card
//! by construction.

use serde::{Deserialize, Serialize};

use crate::handlers::HandlerId;

/// Unique identifier for a card definition.
///
/// Identifies the card type ("railgun_shot"), not a copy in a deck.
/// Serializes as the bare string so data files read naturally.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Card category, for deck building and UI grouping.
///
/// The resolver dispatches on `CardEffect`, not on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Attack,
    Support,
    Movement,
    Utility,
}

/// Card rarity tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// Targeting constraints checked during validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targeting {
    /// The play must supply a unit target or a target position.
    #[serde(default)]
    pub requires_target: bool,
    /// The caster may target itself.
    #[serde(default)]
    pub allow_self: bool,
    /// Units on the caster's team may be targeted.
    #[serde(default)]
    pub allow_allies: bool,
    /// Units on other teams may be targeted.
    #[serde(default)]
    pub allow_enemies: bool,
}

impl Targeting {
    /// No target at all (movement, self-contained utility).
    #[must_use]
    pub const fn none() -> Self {
        Self {
            requires_target: false,
            allow_self: false,
            allow_allies: false,
            allow_enemies: false,
        }
    }

    /// A required enemy unit target.
    #[must_use]
    pub const fn enemies() -> Self {
        Self {
            requires_target: true,
            allow_self: false,
            allow_allies: false,
            allow_enemies: true,
        }
    }

    /// A required friendly target, the caster included.
    #[must_use]
    pub const fn allies() -> Self {
        Self {
            requires_target: true,
            allow_self: true,
            allow_allies: true,
            allow_enemies: false,
        }
    }

    /// A required target of any kind.
    #[must_use]
    pub const fn anyone() -> Self {
        Self {
            requires_target: true,
            allow_self: true,
            allow_allies: true,
            allow_enemies: true,
        }
    }
}

/// What a card does when it resolves.
///
/// One variant per card; the variant's payload carries the magnitudes
/// that only make sense for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CardEffect {
    /// Single-target damage.
    Damage { base_damage: u32 },
    /// Single-target healing.
    Healing { base_healing: u32 },
    /// Delegated movement; the engine validates cost only.
    Movement,
    /// Damage in a radius around a target position, with linear
    /// falloff from the center.
    Area { base_damage: u32, radius: f32 },
    /// Buff resolved by a named handler.
    Buff { handler: HandlerId },
    /// Anything else, resolved by a named handler.
    Special { handler: HandlerId },
}

impl CardEffect {
    /// The handler name, for the two delegating variants.
    #[must_use]
    pub fn handler(&self) -> Option<&HandlerId> {
        match self {
            CardEffect::Buff { handler } | CardEffect::Special { handler } => Some(handler),
            _ => None,
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use dark_protocol::cards::{CardDefinition, CardEffect, CardKind, Targeting};
///
/// let shot = CardDefinition::new(
///     "railgun_shot",
///     "Railgun Shot",
///     CardKind::Attack,
///     CardEffect::Damage { base_damage: 12 },
/// )
/// .with_action_cost(2)
/// .with_range(6.0)
/// .with_targeting(Targeting::enemies());
///
/// assert_eq!(shot.action_cost, 2);
/// assert!(shot.targeting.allow_enemies);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card type.
    pub id: CardId,

    /// Card name (for display/debugging).
    pub name: String,

    /// Deck-building category.
    pub kind: CardKind,

    /// Rarity tier.
    #[serde(default)]
    pub rarity: Rarity,

    /// Action-point cost.
    #[serde(default)]
    pub action_cost: u32,

    /// Self-damage cost, paid on top of action points.
    #[serde(default)]
    pub health_cost: u32,

    /// Maximum cast range; range checking is the caller's duty.
    #[serde(default)]
    pub range: f32,

    /// Duration in turns for effects the card applies.
    #[serde(default)]
    pub duration: u32,

    /// Targeting constraints.
    #[serde(default)]
    pub targeting: Targeting,

    /// The card's single effect.
    pub effect: CardEffect,
}

impl CardDefinition {
    /// Create a new card definition with zero costs and no targeting.
    #[must_use]
    pub fn new(
        id: impl Into<CardId>,
        name: impl Into<String>,
        kind: CardKind,
        effect: CardEffect,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            rarity: Rarity::Common,
            action_cost: 0,
            health_cost: 0,
            range: 0.0,
            duration: 0,
            targeting: Targeting::none(),
            effect,
        }
    }

    /// Set the rarity tier.
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Set the action-point cost.
    #[must_use]
    pub fn with_action_cost(mut self, cost: u32) -> Self {
        self.action_cost = cost;
        self
    }

    /// Set the health cost.
    #[must_use]
    pub fn with_health_cost(mut self, cost: u32) -> Self {
        self.health_cost = cost;
        self
    }

    /// Set the cast range.
    #[must_use]
    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    /// Set the duration for applied effects.
    #[must_use]
    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    /// Set the targeting constraints.
    #[must_use]
    pub fn with_targeting(mut self, targeting: Targeting) -> Self {
        self.targeting = targeting;
        self
    }
}
