//! Per-unit status-effect tracking.
//!
//! `StatusTracker` owns the active effects of exactly one unit and
//! runs the stacking/refresh/expiry state machine over them:
//!
//! **Absent → Active(stacks=1) → [Stacking ⟲ | Refreshing ⟲] → Expired/Removed**
//!
//! ## Lifecycle rules
//!
//! - First application creates the instance, lands the definition's
//!   instant component, and applies its point deltas once.
//! - Reapplication of a stackable effect below its cap adds a stack;
//!   every reapplication refreshes duration to `max(old, new)`. The
//!   instant component and point deltas never fire again.
//! - A definition's custom handler runs on **every** apply call, even
//!   pure refreshes. Removal runs the handler's removal hook except
//!   when the unit died.
//! - Turn ticks walk instances in insertion order: damage/heal
//!   `per_turn_value × stacks`, then decrement, then expire at zero.
//!
//! ## Damage interplay
//!
//! Tick damage goes through [`deal_damage`](super::combat::deal_damage),
//! the same path card damage uses. That path synchronously strips
//! `removed_on_damage` effects (a damage tick can strip the very
//! effect that dealt it) and clears the tracker when the unit dies.
//! The tick loop therefore walks a snapshot of IDs and re-finds each
//! instance before touching it.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::{CombatEvent, EventLog, RemovalReason, Unit, UnitId};
use crate::handlers::{HandlerRegistry, StatusContext};

use super::catalog::EffectCatalog;
use super::combat::{apply_healing, deal_damage};
use super::definition::{EffectId, EffectKind, StatModifiers};
use super::instance::ActiveEffect;

/// Outcome of a status application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    /// A new instance was created.
    Created,
    /// An existing instance gained a stack; carries the new count.
    Stacked(u32),
    /// An existing instance only had its duration refreshed.
    Refreshed,
    /// Nothing happened (dead unit, zero duration, unknown definition).
    Ignored,
}

/// Active status effects of a single unit.
///
/// ## Example
///
/// ```
/// use dark_protocol::core::{EventLog, Team, Unit, UnitId, WorldPos};
/// use dark_protocol::effects::{EffectCatalog, EffectId, StatusTracker};
/// use dark_protocol::handlers::HandlerRegistry;
/// use dark_protocol::skirmish::SkirmishUnit;
///
/// let catalog = EffectCatalog::from_ron_str(
///     r#"(
///         effects: [
///             (
///                 id: "burn",
///                 name: "Burn",
///                 kind: DamageOverTime,
///                 polarity: Harmful,
///                 per_turn_value: 5,
///                 stackable: true,
///                 max_stacks: 3,
///             ),
///         ],
///     )"#,
/// )
/// .unwrap();
///
/// let handlers = HandlerRegistry::new();
/// let mut events = EventLog::new();
/// let mut unit = SkirmishUnit::new(UnitId::new(1), "Vex", Team::new(0), WorldPos::new(0.0, 0.0))
///     .with_max_health(50);
/// let mut tracker = StatusTracker::new();
///
/// let burn = EffectId::new("burn");
/// tracker.apply(&mut unit, &burn, None, 2, &catalog, &handlers, &mut events);
/// tracker.process_turn_start(&mut unit, &catalog, &handlers, &mut events);
///
/// assert_eq!(unit.current_health(), 45);
/// assert_eq!(tracker.stacks(&burn), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StatusTracker {
    effects: SmallVec<[ActiveEffect; 4]>,
}

impl StatusTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect to the unit.
    ///
    /// Creates, stacks, or refreshes per the definition's stacking
    /// policy. The definition's handler is invoked on every call
    /// regardless of which branch was taken. Applications with zero
    /// duration, an unknown definition, or a dead unit are logged
    /// no-ops.
    ///
    /// A fatal instant component still completes the application, then
    /// clears the tracker through the death path.
    pub fn apply(
        &mut self,
        unit: &mut dyn Unit,
        effect_id: &EffectId,
        source: Option<UnitId>,
        duration: u32,
        catalog: &EffectCatalog,
        handlers: &HandlerRegistry,
        events: &mut EventLog,
    ) -> ApplyResult {
        if duration == 0 {
            warn!(effect = %effect_id, "ignoring status application with zero duration");
            return ApplyResult::Ignored;
        }
        let Some(definition) = catalog.get(effect_id) else {
            warn!(effect = %effect_id, "ignoring status application with unknown definition");
            return ApplyResult::Ignored;
        };
        if !unit.is_alive() {
            debug!(unit = %unit.id(), effect = %effect_id, "ignoring status application on a dead unit");
            return ApplyResult::Ignored;
        }

        let result = match self.position(effect_id) {
            Some(ix) => {
                let instance = &mut self.effects[ix];
                if definition.stackable && instance.stacks < definition.max_stacks {
                    instance.stacks += 1;
                    instance.refresh(duration);
                    let (stacks, remaining) = (instance.stacks, instance.remaining_turns);
                    events.push(CombatEvent::EffectStacked {
                        unit: unit.id(),
                        effect: effect_id.clone(),
                        stacks,
                        remaining_turns: remaining,
                    });
                    ApplyResult::Stacked(stacks)
                } else {
                    instance.refresh(duration);
                    let remaining = instance.remaining_turns;
                    events.push(CombatEvent::EffectRefreshed {
                        unit: unit.id(),
                        effect: effect_id.clone(),
                        remaining_turns: remaining,
                    });
                    ApplyResult::Refreshed
                }
            }
            None => {
                // instant component lands before the instance registers
                match definition.kind {
                    EffectKind::DamageOverTime if definition.instant_value > 0 => {
                        deal_damage(
                            unit,
                            self,
                            definition.instant_value,
                            source,
                            catalog,
                            handlers,
                            events,
                        );
                    }
                    EffectKind::HealOverTime if definition.instant_value > 0 => {
                        apply_healing(unit, definition.instant_value, source, events);
                    }
                    _ => {}
                }
                self.effects
                    .push(ActiveEffect::new(effect_id.clone(), source, duration));
                apply_point_deltas(unit, &definition.modifiers);
                events.push(CombatEvent::EffectApplied {
                    unit: unit.id(),
                    effect: effect_id.clone(),
                    stacks: 1,
                    remaining_turns: duration,
                });
                ApplyResult::Created
            }
        };

        // the handler runs on every application, including refreshes
        if let Some(handler_id) = &definition.handler {
            match handlers.status(handler_id) {
                Some(handler) => {
                    if let Some(instance) = self.get(effect_id).cloned() {
                        let mut ctx = StatusContext {
                            unit: &mut *unit,
                            definition,
                            effect: &instance,
                            events,
                        };
                        handler.on_applied(&mut ctx);
                    }
                }
                None => {
                    warn!(effect = %effect_id, handler = %handler_id, "status handler not registered");
                }
            }
        }

        // a fatal instant component leaves no instance on the corpse
        if !unit.is_alive() && !self.effects.is_empty() {
            self.clear_on_death(unit, catalog, events);
        }

        result
    }

    /// Remove an effect by ID.
    ///
    /// Idempotent: returns `false` without side effects when the
    /// effect is not present. Rolls back point deltas and invokes the
    /// handler's removal hook.
    pub fn remove(
        &mut self,
        unit: &mut dyn Unit,
        effect_id: &EffectId,
        catalog: &EffectCatalog,
        handlers: &HandlerRegistry,
        events: &mut EventLog,
    ) -> bool {
        match self.position(effect_id) {
            Some(ix) => {
                self.teardown(
                    ix,
                    unit,
                    RemovalReason::Dispelled,
                    catalog,
                    Some(handlers),
                    events,
                );
                true
            }
            None => false,
        }
    }

    /// Run the unit's turn-start tick.
    ///
    /// Walks instances in insertion order: per-turn damage/heal
    /// (`per_turn_value × stacks`), duration decrement, expiry. The
    /// whole pass completes before the host publishes the unit's
    /// turn-started event. Stops early if a tick kills the unit.
    pub fn process_turn_start(
        &mut self,
        unit: &mut dyn Unit,
        catalog: &EffectCatalog,
        handlers: &HandlerRegistry,
        events: &mut EventLog,
    ) {
        // ticking can strip or kill mid-loop, so walk a snapshot of
        // IDs and re-find each instance before touching it
        let ids: SmallVec<[EffectId; 4]> =
            self.effects.iter().map(|inst| inst.effect.clone()).collect();

        for effect_id in ids {
            if !unit.is_alive() {
                break;
            }
            let Some(ix) = self.position(&effect_id) else {
                continue; // stripped by an earlier tick this turn
            };
            let Some(definition) = catalog.get(&effect_id) else {
                warn!(effect = %effect_id, "dropping instance with no definition in catalog");
                let instance = self.effects.remove(ix);
                events.push(CombatEvent::EffectRemoved {
                    unit: unit.id(),
                    effect: instance.effect,
                    reason: RemovalReason::Dispelled,
                });
                continue;
            };

            let (stacks, source) = {
                let instance = &self.effects[ix];
                (instance.stacks, instance.source)
            };
            match definition.kind {
                EffectKind::DamageOverTime if definition.per_turn_value > 0 => {
                    deal_damage(
                        unit,
                        self,
                        definition.per_turn_value * stacks,
                        source,
                        catalog,
                        handlers,
                        events,
                    );
                }
                EffectKind::HealOverTime if definition.per_turn_value > 0 => {
                    apply_healing(unit, definition.per_turn_value * stacks, source, events);
                }
                _ => {}
            }

            if !unit.is_alive() {
                break; // the tick was fatal; the tracker is already cleared
            }
            let Some(ix) = self.position(&effect_id) else {
                continue; // the tick stripped its own effect
            };

            let remaining = {
                let instance = &mut self.effects[ix];
                instance.remaining_turns = instance.remaining_turns.saturating_sub(1);
                instance.remaining_turns
            };
            if remaining == 0 {
                self.teardown(
                    ix,
                    unit,
                    RemovalReason::Expired,
                    catalog,
                    Some(handlers),
                    events,
                );
            } else {
                let stacks = self.effects[ix].stacks;
                events.push(CombatEvent::EffectTicked {
                    unit: unit.id(),
                    effect: effect_id.clone(),
                    stacks,
                    remaining_turns: remaining,
                });
            }
        }
    }

    /// Strip every `removed_on_damage` effect.
    ///
    /// [`deal_damage`](super::combat::deal_damage) calls this on every
    /// health decrease. A host that routes damage around that helper
    /// must call it itself, synchronously, whenever health drops.
    pub fn break_on_damage(
        &mut self,
        unit: &mut dyn Unit,
        catalog: &EffectCatalog,
        handlers: &HandlerRegistry,
        events: &mut EventLog,
    ) {
        let ids: SmallVec<[EffectId; 4]> = self
            .effects
            .iter()
            .filter(|inst| {
                catalog
                    .get(&inst.effect)
                    .map_or(false, |d| d.removed_on_damage)
            })
            .map(|inst| inst.effect.clone())
            .collect();

        for effect_id in ids {
            if let Some(ix) = self.position(&effect_id) {
                self.teardown(
                    ix,
                    unit,
                    RemovalReason::DamageBroken,
                    catalog,
                    Some(handlers),
                    events,
                );
            }
        }
    }

    /// Clear every effect because the unit died.
    ///
    /// Point deltas are still rolled back so a revived unit starts
    /// from clean pools, but handler removal hooks are bypassed.
    pub fn clear_on_death(
        &mut self,
        unit: &mut dyn Unit,
        catalog: &EffectCatalog,
        events: &mut EventLog,
    ) {
        let cleared = std::mem::take(&mut self.effects);
        for instance in cleared {
            if let Some(definition) = catalog.get(&instance.effect) {
                rollback_point_deltas(unit, &definition.modifiers);
            }
            events.push(CombatEvent::EffectRemoved {
                unit: unit.id(),
                effect: instance.effect,
                reason: RemovalReason::UnitDied,
            });
        }
    }

    /// Get an active instance by ID.
    #[must_use]
    pub fn get(&self, effect_id: &EffectId) -> Option<&ActiveEffect> {
        self.effects.iter().find(|inst| &inst.effect == effect_id)
    }

    /// Whether an effect is active.
    #[must_use]
    pub fn has(&self, effect_id: &EffectId) -> bool {
        self.get(effect_id).is_some()
    }

    /// Current stack count of an effect, zero if absent.
    #[must_use]
    pub fn stacks(&self, effect_id: &EffectId) -> u32 {
        self.get(effect_id).map_or(0, |inst| inst.stacks)
    }

    /// Number of active effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Whether no effects are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate active instances in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    /// Whether any active effect has the given kind.
    #[must_use]
    pub fn has_kind(&self, kind: EffectKind, catalog: &EffectCatalog) -> bool {
        self.effects
            .iter()
            .any(|inst| catalog.get(&inst.effect).map_or(false, |d| d.kind == kind))
    }

    /// Whether the unit may take actions (not stunned).
    #[must_use]
    pub fn can_act(&self, catalog: &EffectCatalog) -> bool {
        !self.has_kind(EffectKind::Stun, catalog)
    }

    /// Whether the unit may move (neither stunned nor rooted).
    #[must_use]
    pub fn can_move(&self, catalog: &EffectCatalog) -> bool {
        !self.has_kind(EffectKind::Stun, catalog) && !self.has_kind(EffectKind::Root, catalog)
    }

    /// Whether the unit is stealthed.
    #[must_use]
    pub fn is_stealthed(&self, catalog: &EffectCatalog) -> bool {
        self.has_kind(EffectKind::Stealth, catalog)
    }

    /// Sum of stat modifiers across active instances.
    ///
    /// Counted once per instance, not per stack. Percent sums are
    /// floored at -100 so hosts never scale a number below zero.
    #[must_use]
    pub fn aggregate_modifiers(&self, catalog: &EffectCatalog) -> StatModifiers {
        let mut total = StatModifiers::default();
        for instance in &self.effects {
            if let Some(definition) = catalog.get(&instance.effect) {
                let m = &definition.modifiers;
                total.movement_points += m.movement_points;
                total.action_points += m.action_points;
                total.damage_percent += m.damage_percent;
                total.healing_percent += m.healing_percent;
            }
        }
        total.damage_percent = total.damage_percent.max(-100);
        total.healing_percent = total.healing_percent.max(-100);
        total
    }

    fn position(&self, effect_id: &EffectId) -> Option<usize> {
        self.effects
            .iter()
            .position(|inst| &inst.effect == effect_id)
    }

    fn teardown(
        &mut self,
        ix: usize,
        unit: &mut dyn Unit,
        reason: RemovalReason,
        catalog: &EffectCatalog,
        handlers: Option<&HandlerRegistry>,
        events: &mut EventLog,
    ) {
        let instance = self.effects.remove(ix);
        match catalog.get(&instance.effect) {
            Some(definition) => {
                rollback_point_deltas(unit, &definition.modifiers);
                if let (Some(handlers), Some(handler_id)) = (handlers, &definition.handler) {
                    match handlers.status(handler_id) {
                        Some(handler) => {
                            let mut ctx = StatusContext {
                                unit: &mut *unit,
                                definition,
                                effect: &instance,
                                events,
                            };
                            handler.on_removed(&mut ctx, reason);
                        }
                        None => {
                            warn!(effect = %instance.effect, handler = %handler_id, "status handler not registered");
                        }
                    }
                }
            }
            None => {
                warn!(effect = %instance.effect, "removing instance with no definition in catalog");
            }
        }
        events.push(CombatEvent::EffectRemoved {
            unit: unit.id(),
            effect: instance.effect,
            reason,
        });
    }
}

fn apply_point_deltas(unit: &mut dyn Unit, modifiers: &StatModifiers) {
    if modifiers.movement_points != 0 {
        unit.add_movement_points(modifiers.movement_points);
    }
    if modifiers.action_points != 0 {
        unit.add_action_points(modifiers.action_points);
    }
}

fn rollback_point_deltas(unit: &mut dyn Unit, modifiers: &StatModifiers) {
    if modifiers.movement_points != 0 {
        unit.add_movement_points(-modifiers.movement_points);
    }
    if modifiers.action_points != 0 {
        unit.add_action_points(-modifiers.action_points);
    }
}
