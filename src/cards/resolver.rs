//! Card play validation and resolution.
//!
//! `CardResolver` is stateless; every call gets the world it needs
//! through a [`ResolveContext`]. Resolution runs in a fixed order:
//!
//! 1. Look up the card definition.
//! 2. Validate the play (targeting, action points, health cost).
//! 3. Pay costs. Costs are not refunded if a later step fails.
//! 4. Dispatch on the card's effect variant.
//!
//! Range is deliberately not validated here. The host owns line of
//! sight and pathfinding, so it owns the range check too.

use thiserror::Error;

use crate::cards::{CardCatalog, CardDefinition, CardEffect, CardId};
use crate::core::{Arena, CombatEvent, EventLog, Grid, Unit, UnitId, WorldPos};
use crate::effects::{apply_healing, deal_damage, EffectCatalog};
use crate::handlers::{CardPlayContext, HandlerId, HandlerRegistry};

/// Why a card play was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlayError {
    #[error("unknown card {0}")]
    UnknownCard(CardId),

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("card {0} is not in the caster's hand")]
    NotInHand(CardId),

    #[error("card requires a target")]
    MissingTarget,

    #[error("card cannot target the caster")]
    CannotTargetSelf,

    #[error("card cannot target allies")]
    CannotTargetAllies,

    #[error("card cannot target enemies")]
    CannotTargetEnemies,

    #[error("need {required} action points, have {available}")]
    InsufficientActionPoints { required: u32, available: i32 },

    #[error("health cost {cost} would be fatal at {health} health")]
    InsufficientHealth { cost: u32, health: u32 },

    #[error("no units in the blast area")]
    NoUnitsHit,

    #[error("no handler registered under {0}")]
    MissingHandler(HandlerId),

    #[error("handler {handler} failed: {reason}")]
    HandlerFailed { handler: HandlerId, reason: String },
}

/// A unit struck by an area card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AreaHit {
    pub unit: UnitId,
    pub damage: u32,
}

/// What a successful play did.
#[derive(Clone, Debug, PartialEq)]
pub enum CardOutcome {
    /// Single-target damage; `dealt` is the health actually lost.
    Damage { target: UnitId, dealt: u32 },
    /// Single-target healing; `healed` is the health actually gained.
    Healing { target: UnitId, healed: u32 },
    /// Movement delegated to the host, toward the requested spot.
    Movement { destination: Option<WorldPos> },
    /// Area damage; one entry per unit that took damage.
    Area { hits: Vec<AreaHit> },
    /// A handler card ran to completion.
    Handled,
}

/// Everything a resolution needs, borrowed for the duration of one
/// play.
pub struct ResolveContext<'a> {
    pub arena: &'a mut dyn Arena,
    pub grid: &'a dyn Grid,
    pub cards: &'a CardCatalog,
    pub effects: &'a EffectCatalog,
    pub handlers: &'a HandlerRegistry,
    pub events: &'a mut EventLog,
}

/// Stateless card resolution.
pub struct CardResolver;

impl CardResolver {
    /// Check whether a play is legal, without touching any state.
    ///
    /// A required target is satisfied by either a unit target or a
    /// target position. The targeting flags only constrain unit
    /// targets; a position is never walled off by them.
    pub fn validate(
        card: &CardDefinition,
        caster: &dyn Unit,
        target: Option<&dyn Unit>,
        target_pos: Option<WorldPos>,
    ) -> Result<(), PlayError> {
        if card.targeting.requires_target && target.is_none() && target_pos.is_none() {
            return Err(PlayError::MissingTarget);
        }

        if let Some(target) = target {
            if target.id() == caster.id() {
                if !card.targeting.allow_self {
                    return Err(PlayError::CannotTargetSelf);
                }
            } else if target.team().is_ally_of(caster.team()) {
                if !card.targeting.allow_allies {
                    return Err(PlayError::CannotTargetAllies);
                }
            } else if !card.targeting.allow_enemies {
                return Err(PlayError::CannotTargetEnemies);
            }
        }

        if caster.action_points() < card.action_cost as i32 {
            return Err(PlayError::InsufficientActionPoints {
                required: card.action_cost,
                available: caster.action_points(),
            });
        }

        // The health cost must leave the caster alive.
        if card.health_cost > 0 && caster.current_health() <= card.health_cost {
            return Err(PlayError::InsufficientHealth {
                cost: card.health_cost,
                health: caster.current_health(),
            });
        }

        Ok(())
    }

    /// Validate and resolve one card play.
    ///
    /// Costs are paid after validation and before dispatch, so a
    /// dispatch failure (say, an empty blast area) leaves them spent.
    pub fn resolve(
        ctx: &mut ResolveContext<'_>,
        card_id: &CardId,
        caster: UnitId,
        target: Option<UnitId>,
        target_pos: Option<WorldPos>,
    ) -> Result<CardOutcome, PlayError> {
        let card = ctx
            .cards
            .get(card_id)
            .ok_or_else(|| PlayError::UnknownCard(card_id.clone()))?;

        {
            let caster_ref = ctx.arena.unit(caster).ok_or(PlayError::UnknownUnit(caster))?;
            let target_ref = match target {
                Some(id) => Some(ctx.arena.unit(id).ok_or(PlayError::UnknownUnit(id))?),
                None => None,
            };
            Self::validate(card, caster_ref, target_ref, target_pos)?;
        }

        {
            let entry = ctx
                .arena
                .entry_mut(caster)
                .ok_or(PlayError::UnknownUnit(caster))?;
            entry.unit.spend_action_points(card.action_cost);
            if card.health_cost > 0 {
                deal_damage(
                    &mut *entry.unit,
                    &mut *entry.effects,
                    card.health_cost,
                    Some(caster),
                    ctx.effects,
                    ctx.handlers,
                    ctx.events,
                );
            }
        }

        ctx.events.push(CombatEvent::CardPlayed {
            caster,
            card: card_id.clone(),
        });

        match &card.effect {
            CardEffect::Damage { base_damage } => {
                let target_id = target.ok_or(PlayError::MissingTarget)?;
                let entry = ctx
                    .arena
                    .entry_mut(target_id)
                    .ok_or(PlayError::UnknownUnit(target_id))?;
                let dealt = deal_damage(
                    &mut *entry.unit,
                    &mut *entry.effects,
                    *base_damage,
                    Some(caster),
                    ctx.effects,
                    ctx.handlers,
                    ctx.events,
                );
                Ok(CardOutcome::Damage {
                    target: target_id,
                    dealt,
                })
            }

            CardEffect::Healing { base_healing } => {
                let target_id = target.ok_or(PlayError::MissingTarget)?;
                let entry = ctx
                    .arena
                    .entry_mut(target_id)
                    .ok_or(PlayError::UnknownUnit(target_id))?;
                let healed = apply_healing(&mut *entry.unit, *base_healing, Some(caster), ctx.events);
                Ok(CardOutcome::Healing {
                    target: target_id,
                    healed,
                })
            }

            CardEffect::Movement => {
                ctx.events.push(CombatEvent::MovementRequested {
                    unit: caster,
                    destination: target_pos,
                });
                Ok(CardOutcome::Movement {
                    destination: target_pos,
                })
            }

            CardEffect::Area { base_damage, radius } => {
                let center = target_pos.ok_or(PlayError::MissingTarget)?;
                let mut hits = Vec::new();
                for unit_id in ctx.grid.units_in_radius(center, *radius) {
                    let distance = match ctx.arena.unit(unit_id) {
                        Some(unit) if unit.is_alive() => unit.position().distance(center),
                        _ => continue,
                    };
                    let damage = area_damage(*base_damage, distance, *radius);
                    if damage == 0 {
                        continue;
                    }
                    let Some(entry) = ctx.arena.entry_mut(unit_id) else {
                        continue;
                    };
                    let dealt = deal_damage(
                        &mut *entry.unit,
                        &mut *entry.effects,
                        damage,
                        Some(caster),
                        ctx.effects,
                        ctx.handlers,
                        ctx.events,
                    );
                    hits.push(AreaHit {
                        unit: unit_id,
                        damage: dealt,
                    });
                }
                if hits.is_empty() {
                    return Err(PlayError::NoUnitsHit);
                }
                Ok(CardOutcome::Area { hits })
            }

            CardEffect::Buff { handler } | CardEffect::Special { handler } => {
                let card_handler = ctx
                    .handlers
                    .card(handler)
                    .ok_or_else(|| PlayError::MissingHandler(handler.clone()))?;
                let mut play = CardPlayContext {
                    caster,
                    target,
                    target_pos,
                    duration: card.duration,
                    arena: &mut *ctx.arena,
                    grid: ctx.grid,
                    effects: ctx.effects,
                    handlers: ctx.handlers,
                    events: &mut *ctx.events,
                };
                card_handler
                    .resolve(&mut play)
                    .map_err(|reason| PlayError::HandlerFailed {
                        handler: handler.clone(),
                        reason,
                    })?;
                Ok(CardOutcome::Handled)
            }
        }
    }
}

/// Area damage at a given distance from the blast center.
///
/// Falls off linearly: full damage at the center, zero at the edge of
/// the radius. The boundary itself takes nothing.
///
/// ## Example
///
/// ```
/// use dark_protocol::cards::area_damage;
///
/// assert_eq!(area_damage(20, 0.0, 2.0), 20);
/// assert_eq!(area_damage(20, 1.0, 2.0), 10);
/// assert_eq!(area_damage(20, 2.0, 2.0), 0);
/// ```
#[must_use]
pub fn area_damage(base: u32, distance: f32, radius: f32) -> u32 {
    if radius <= 0.0 || distance >= radius {
        return 0;
    }
    let scaled = base as f32 * (1.0 - distance / radius);
    (scaled.round() as u32).min(base)
}
