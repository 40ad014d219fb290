//! Combat events for the UI layer.
//!
//! The engines never talk to UI types. Everything the presentation
//! layer needs (icon creation, stack counters, damage numbers) is
//! published as a `CombatEvent` into the host-owned `EventLog`.
//!
//! ## Delivery contract
//!
//! Events are appended in the exact order the engine produced them and
//! `drain` hands each event out at most once. A host that drains after
//! every turn tick and card play sees a complete, ordered feed.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::effects::EffectId;

use super::grid::WorldPos;
use super::unit::UnitId;

/// Why an active effect left a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Remaining duration reached zero on a turn tick.
    Expired,
    /// An explicit removal request (cleanse, cancel).
    Dispelled,
    /// Stripped because the unit took damage.
    DamageBroken,
    /// The owning unit died.
    UnitDied,
}

/// A single notification from the combat core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A new effect instance was registered on a unit.
    EffectApplied {
        unit: UnitId,
        effect: EffectId,
        stacks: u32,
        remaining_turns: u32,
    },
    /// An existing instance gained a stack.
    EffectStacked {
        unit: UnitId,
        effect: EffectId,
        stacks: u32,
        remaining_turns: u32,
    },
    /// An existing instance had its duration refreshed.
    EffectRefreshed {
        unit: UnitId,
        effect: EffectId,
        remaining_turns: u32,
    },
    /// An instance survived a turn tick; counters changed.
    EffectTicked {
        unit: UnitId,
        effect: EffectId,
        stacks: u32,
        remaining_turns: u32,
    },
    /// An instance was torn down.
    EffectRemoved {
        unit: UnitId,
        effect: EffectId,
        reason: RemovalReason,
    },
    /// A unit lost health.
    DamageDealt {
        unit: UnitId,
        amount: u32,
        source: Option<UnitId>,
    },
    /// A unit recovered health.
    HealingReceived {
        unit: UnitId,
        amount: u32,
        source: Option<UnitId>,
    },
    /// A unit's health reached zero.
    UnitDied { unit: UnitId },
    /// A unit's turn began (emitted after its effects ticked).
    TurnStarted { unit: UnitId },
    /// A card play passed validation and paid its costs.
    CardPlayed { caster: UnitId, card: CardId },
    /// A movement card resolved; the host performs the actual move.
    MovementRequested {
        unit: UnitId,
        destination: Option<WorldPos>,
    },
}

/// Ordered, drain-once event feed owned by the host.
///
/// ## Example
///
/// ```
/// use dark_protocol::core::{CombatEvent, EventLog, UnitId};
///
/// let mut log = EventLog::new();
/// log.push(CombatEvent::TurnStarted { unit: UnitId::new(1) });
///
/// let events = log.drain();
/// assert_eq!(events.len(), 1);
/// assert!(log.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, event: CombatEvent) {
        tracing::trace!(?event, "combat event");
        self.events.push(event);
    }

    /// Take every pending event, leaving the log empty.
    ///
    /// Each event is delivered exactly once across all drains.
    #[must_use]
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log has no pending events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discard all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut log = EventLog::new();
        log.push(CombatEvent::TurnStarted { unit: UnitId::new(1) });
        log.push(CombatEvent::DamageDealt {
            unit: UnitId::new(2),
            amount: 5,
            source: Some(UnitId::new(1)),
        });
        log.push(CombatEvent::UnitDied { unit: UnitId::new(2) });

        let events = log.drain();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], CombatEvent::TurnStarted { .. }));
        assert!(matches!(events[1], CombatEvent::DamageDealt { .. }));
        assert!(matches!(events[2], CombatEvent::UnitDied { .. }));
    }

    #[test]
    fn test_drain_delivers_at_most_once() {
        let mut log = EventLog::new();
        log.push(CombatEvent::TurnStarted { unit: UnitId::new(1) });

        assert_eq!(log.drain().len(), 1);
        assert_eq!(log.drain().len(), 0);
    }

    #[test]
    fn test_iter_does_not_consume() {
        let mut log = EventLog::new();
        log.push(CombatEvent::UnitDied { unit: UnitId::new(9) });

        assert_eq!(log.iter().count(), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_event_serialization() {
        let event = CombatEvent::DamageDealt {
            unit: UnitId::new(3),
            amount: 12,
            source: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: CombatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
