//! Stock card handlers.
//!
//! These cover the common buff/special card shapes so most authored
//! content needs no bespoke code: apply a named status, trade health
//! for action points, strip harmful effects. Game-specific behavior
//! registers its own `CardHandler` next to these.

use tracing::debug;

use crate::effects::{ApplyResult, EffectId};

use super::{CardHandler, CardPlayContext};

/// Applies a named status effect to the card's target.
///
/// Buff cards pair with this: the card carries the duration, the
/// handler carries the effect ID. With no unit target the status
/// lands on the caster.
pub struct ApplyStatus {
    effect: EffectId,
}

impl ApplyStatus {
    /// Create a handler that applies `effect`.
    #[must_use]
    pub fn new(effect: impl Into<EffectId>) -> Self {
        Self {
            effect: effect.into(),
        }
    }
}

impl CardHandler for ApplyStatus {
    fn resolve(&self, ctx: &mut CardPlayContext<'_>) -> Result<(), String> {
        let target = ctx.target.unwrap_or(ctx.caster);
        let source = Some(ctx.caster);
        let Some(entry) = ctx.arena.entry_mut(target) else {
            return Err(format!("target {target} is not in the arena"));
        };

        let result = entry.effects.apply(
            entry.unit,
            &self.effect,
            source,
            ctx.duration,
            ctx.effects,
            ctx.handlers,
            ctx.events,
        );
        match result {
            ApplyResult::Ignored => Err(format!("status `{}` could not be applied", self.effect)),
            _ => Ok(()),
        }
    }
}

/// Trades the card's health cost for action points.
///
/// The health cost itself is paid by the resolver before the handler
/// runs; this handler only grants the payoff.
pub struct Overcharge {
    action_points: u32,
}

impl Overcharge {
    /// Create a handler granting `action_points` to the caster.
    #[must_use]
    pub fn new(action_points: u32) -> Self {
        Self { action_points }
    }
}

impl CardHandler for Overcharge {
    fn resolve(&self, ctx: &mut CardPlayContext<'_>) -> Result<(), String> {
        let Some(entry) = ctx.arena.entry_mut(ctx.caster) else {
            return Err(format!("caster {} is not in the arena", ctx.caster));
        };
        entry.unit.gain_action_points(self.action_points);
        debug!(unit = %ctx.caster, gained = self.action_points, "overcharge resolved");
        Ok(())
    }
}

/// Strips every harmful status effect from the card's target.
///
/// Stripping nothing is still a successful cleanse.
pub struct Cleanse;

impl CardHandler for Cleanse {
    fn resolve(&self, ctx: &mut CardPlayContext<'_>) -> Result<(), String> {
        let target = ctx.target.unwrap_or(ctx.caster);
        let Some(entry) = ctx.arena.entry_mut(target) else {
            return Err(format!("target {target} is not in the arena"));
        };

        let harmful: Vec<EffectId> = entry
            .effects
            .iter()
            .filter(|inst| {
                ctx.effects
                    .get(&inst.effect)
                    .map_or(false, |d| d.polarity.is_harmful())
            })
            .map(|inst| inst.effect.clone())
            .collect();

        for effect_id in harmful {
            entry.effects.remove(
                entry.unit,
                &effect_id,
                ctx.effects,
                ctx.handlers,
                ctx.events,
            );
        }
        Ok(())
    }
}
