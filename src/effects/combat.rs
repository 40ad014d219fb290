//! Shared damage and healing entry points.
//!
//! Every health change the engine causes - card damage, health costs,
//! effect ticks, instant components - flows through these two helpers
//! so the synchronous hooks always fire: any decrease strips
//! `removed_on_damage` effects, and a drop to zero clears the unit's
//! tracker through the death path.

use tracing::debug;

use crate::core::{CombatEvent, EventLog, Unit, UnitId};
use crate::handlers::HandlerRegistry;

use super::catalog::EffectCatalog;
use super::tracker::StatusTracker;

/// Deal damage to a unit and run the damage hooks.
///
/// Returns the health actually lost, which can be less than `amount`
/// if the unit's own `take_damage` mitigates or the unit was already
/// at low health. Zero-amount calls and dead targets are no-ops.
pub fn deal_damage(
    unit: &mut dyn Unit,
    tracker: &mut StatusTracker,
    amount: u32,
    source: Option<UnitId>,
    catalog: &EffectCatalog,
    handlers: &HandlerRegistry,
    events: &mut EventLog,
) -> u32 {
    if amount == 0 {
        return 0;
    }
    if !unit.is_alive() {
        debug!(unit = %unit.id(), "ignoring damage to a dead unit");
        return 0;
    }

    let before = unit.current_health();
    unit.take_damage(amount, source);
    let dealt = before.saturating_sub(unit.current_health());

    if dealt > 0 {
        events.push(CombatEvent::DamageDealt {
            unit: unit.id(),
            amount: dealt,
            source,
        });
        // synchronous strip on any health decrease, even mid-tick
        tracker.break_on_damage(unit, catalog, handlers, events);
    }

    if !unit.is_alive() {
        events.push(CombatEvent::UnitDied { unit: unit.id() });
        tracker.clear_on_death(unit, catalog, events);
    }

    dealt
}

/// Heal a unit.
///
/// Returns the health actually restored after the unit's own clamping.
/// Zero-amount calls and dead targets are no-ops; healing never
/// revives.
pub fn apply_healing(
    unit: &mut dyn Unit,
    amount: u32,
    source: Option<UnitId>,
    events: &mut EventLog,
) -> u32 {
    if amount == 0 {
        return 0;
    }
    if !unit.is_alive() {
        debug!(unit = %unit.id(), "ignoring healing on a dead unit");
        return 0;
    }

    let before = unit.current_health();
    unit.heal(amount, source);
    let healed = unit.current_health().saturating_sub(before);

    if healed > 0 {
        events.push(CombatEvent::HealingReceived {
            unit: unit.id(),
            amount: healed,
            source,
        });
    }

    healed
}
