//! Runtime state of one status effect on one unit.

use serde::{Deserialize, Serialize};

use crate::core::UnitId;

use super::definition::EffectId;

/// An active status effect on a unit.
///
/// References its definition by ID; the source unit is a non-owning
/// reference that may die or despawn while the effect persists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    /// The definition this instance was created from.
    pub effect: EffectId,
    /// The unit that applied the effect, if any.
    pub source: Option<UnitId>,
    /// Current stack count, starting at 1.
    pub stacks: u32,
    /// Turns left before expiry.
    pub remaining_turns: u32,
}

impl ActiveEffect {
    /// Create a fresh instance with a single stack.
    #[must_use]
    pub fn new(effect: EffectId, source: Option<UnitId>, duration: u32) -> Self {
        Self {
            effect,
            source,
            stacks: 1,
            remaining_turns: duration,
        }
    }

    /// Refresh the duration, keeping whichever is longer.
    ///
    /// Reapplication never shortens an effect.
    pub fn refresh(&mut self, duration: u32) {
        self.remaining_turns = self.remaining_turns.max(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_instance() {
        let burn = ActiveEffect::new(EffectId::new("burn"), Some(UnitId::new(1)), 3);
        assert_eq!(burn.stacks, 1);
        assert_eq!(burn.remaining_turns, 3);
        assert_eq!(burn.source, Some(UnitId::new(1)));
    }

    #[test]
    fn test_refresh_keeps_longer_duration() {
        let mut effect = ActiveEffect::new(EffectId::new("root"), None, 4);
        effect.refresh(2);
        assert_eq!(effect.remaining_turns, 4);
        effect.refresh(6);
        assert_eq!(effect.remaining_turns, 6);
    }

    #[test]
    fn test_serialization() {
        let effect = ActiveEffect::new(EffectId::new("stealth"), None, 2);
        let json = serde_json::to_string(&effect).unwrap();
        let back: ActiveEffect = serde_json::from_str(&json).unwrap();
        assert_eq!(effect, back);
    }
}
