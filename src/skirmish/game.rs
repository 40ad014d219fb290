//! The reference skirmish match.
//!
//! `Skirmish` wires every engine piece together the way a host is
//! expected to: a `Roster` of units with their status trackers, a
//! `SkirmishGrid` for occupancy, shared catalogs and handlers, an
//! `EventLog`, and a seeded `MatchRng` for shuffles. Two matches built
//! from the same seed and the same plays replay identically.
//!
//! ## Turn Pipeline
//!
//! `begin_turn` runs in a fixed order:
//!
//! 1. Status effects tick (damage, healing, expiry).
//! 2. If the unit survived, point pools refill under the modifiers of
//!    the effects still active.
//! 3. The unit draws a card, reshuffling its discard pile if the draw
//!    pile ran dry.
//! 4. `TurnStarted` is logged. A unit that died to its own ticks never
//!    reports a turn.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::cards::{
    CardCatalog, CardId, CardOutcome, CardResolver, DeckDefinition, PlayError, ResolveContext,
};
use crate::core::{
    Arena, CombatEvent, EventLog, Grid, GridPos, Team, Unit, UnitEntry, UnitId, WorldPos,
};
use crate::effects::{ApplyResult, CatalogError, EffectCatalog, EffectId, StatusTracker};
use crate::handlers::HandlerRegistry;

use super::grid::SkirmishGrid;
use super::rng::MatchRng;
use super::unit::SkirmishUnit;

/// Cards dealt to each unit when the match starts.
pub const STARTING_HAND_SIZE: usize = 4;

/// One unit's complete match state.
#[derive(Clone, Debug)]
pub struct Slot {
    pub unit: SkirmishUnit,
    pub effects: StatusTracker,
    /// Draw pile; the top card is last.
    pub draw: Vec<CardId>,
    pub hand: Vec<CardId>,
    pub discard: Vec<CardId>,
}

/// Slot storage in spawn order, indexed by unit ID.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    slots: Vec<Slot>,
    index: FxHashMap<UnitId, usize>,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slot.
    ///
    /// # Panics
    ///
    /// Panics if the unit's ID is already present.
    pub fn insert(&mut self, slot: Slot) {
        let id = slot.unit.id();
        assert!(
            !self.index.contains_key(&id),
            "{id} already in the roster"
        );
        self.index.insert(id, self.slots.len());
        self.slots.push(slot);
    }

    /// Look up a slot for reading.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Slot> {
        self.index.get(&id).map(|&ix| &self.slots[ix])
    }

    /// Look up a slot for mutation.
    #[must_use]
    pub fn slot_mut(&mut self, id: UnitId) -> Option<&mut Slot> {
        let ix = *self.index.get(&id)?;
        Some(&mut self.slots[ix])
    }

    /// All unit IDs in spawn order.
    #[must_use]
    pub fn ids(&self) -> Vec<UnitId> {
        self.slots.iter().map(|s| s.unit.id()).collect()
    }

    /// Iterate slots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Number of slots, dead units included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Arena for Roster {
    fn unit(&self, id: UnitId) -> Option<&dyn Unit> {
        self.get(id).map(|slot| &slot.unit as &dyn Unit)
    }

    fn effects(&self, id: UnitId) -> Option<&StatusTracker> {
        self.get(id).map(|slot| &slot.effects)
    }

    fn entry_mut(&mut self, id: UnitId) -> Option<UnitEntry<'_>> {
        let slot = self.slot_mut(id)?;
        Some(UnitEntry {
            unit: &mut slot.unit,
            effects: &mut slot.effects,
        })
    }

    fn unit_ids(&self) -> Vec<UnitId> {
        self.ids()
    }
}

/// A running match.
pub struct Skirmish {
    roster: Roster,
    grid: SkirmishGrid,
    cards: CardCatalog,
    effects: EffectCatalog,
    handlers: HandlerRegistry,
    events: EventLog,
    rng: MatchRng,
    turn: u32,
}

impl Skirmish {
    /// The roster, dead units included.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The occupancy grid. Dead units have been swept off it.
    #[must_use]
    pub fn grid(&self) -> &SkirmishGrid {
        &self.grid
    }

    /// The card catalog this match plays from.
    #[must_use]
    pub fn cards(&self) -> &CardCatalog {
        &self.cards
    }

    /// The effect catalog this match plays from.
    #[must_use]
    pub fn effects(&self) -> &EffectCatalog {
        &self.effects
    }

    /// Events logged so far.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take all pending events, oldest first.
    #[must_use]
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.events.drain()
    }

    /// Turns begun so far.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// A unit by ID.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&SkirmishUnit> {
        self.roster.get(id).map(|slot| &slot.unit)
    }

    /// A unit's current hand.
    #[must_use]
    pub fn hand(&self, id: UnitId) -> Option<&[CardId]> {
        self.roster.get(id).map(|slot| slot.hand.as_slice())
    }

    /// Start a unit's turn: tick statuses, refill pools, draw.
    ///
    /// See the module docs for the exact ordering. Calling this for a
    /// dead or unknown unit is a logged no-op.
    pub fn begin_turn(&mut self, unit_id: UnitId) {
        self.turn += 1;
        let Some(slot) = self.roster.slot_mut(unit_id) else {
            warn!(%unit_id, "begin_turn for a unit not in the roster");
            return;
        };

        slot.effects.process_turn_start(
            &mut slot.unit,
            &self.effects,
            &self.handlers,
            &mut self.events,
        );
        if !slot.unit.is_alive() {
            debug!(%unit_id, "unit died to its own status ticks");
            self.grid.remove(unit_id);
            return;
        }

        let modifiers = slot.effects.aggregate_modifiers(&self.effects);
        slot.unit.refresh_for_turn(&modifiers);

        if slot.draw.is_empty() && !slot.discard.is_empty() {
            slot.draw.append(&mut slot.discard);
            self.rng.shuffle(&mut slot.draw);
            debug!(%unit_id, "reshuffled discard into the draw pile");
        }
        if let Some(card) = slot.draw.pop() {
            slot.hand.push(card);
        }

        self.events.push(CombatEvent::TurnStarted { unit: unit_id });
    }

    /// Play a card from a unit's hand.
    ///
    /// On success the card moves to the discard pile and, for movement
    /// cards, the unit is walked to the requested cell. A rejected
    /// play leaves the card in hand; note that the resolver pays costs
    /// before dispatch, so a play rejected in dispatch (say, an empty
    /// blast area) has still spent them.
    pub fn play_card(
        &mut self,
        caster: UnitId,
        card: &CardId,
        target: Option<UnitId>,
        target_pos: Option<WorldPos>,
    ) -> Result<CardOutcome, PlayError> {
        {
            let slot = self.roster.get(caster).ok_or(PlayError::UnknownUnit(caster))?;
            if !slot.hand.contains(card) {
                return Err(PlayError::NotInHand(card.clone()));
            }
        }

        let outcome = {
            let mut ctx = ResolveContext {
                arena: &mut self.roster,
                grid: &self.grid,
                cards: &self.cards,
                effects: &self.effects,
                handlers: &self.handlers,
                events: &mut self.events,
            };
            CardResolver::resolve(&mut ctx, card, caster, target, target_pos)?
        };

        if let Some(slot) = self.roster.slot_mut(caster) {
            if let Some(ix) = slot.hand.iter().position(|c| c == card) {
                let played = slot.hand.remove(ix);
                slot.discard.push(played);
            }
        }

        if let CardOutcome::Movement {
            destination: Some(destination),
        } = outcome
        {
            self.walk_to(caster, destination);
        }

        self.sweep_dead();
        Ok(outcome)
    }

    /// Apply a status effect outside card play (hazards, scripting).
    pub fn afflict(
        &mut self,
        unit_id: UnitId,
        effect: &EffectId,
        source: Option<UnitId>,
        duration: u32,
    ) -> ApplyResult {
        let Some(slot) = self.roster.slot_mut(unit_id) else {
            warn!(%unit_id, "afflict for a unit not in the roster");
            return ApplyResult::Ignored;
        };
        let result = slot.effects.apply(
            &mut slot.unit,
            effect,
            source,
            duration,
            &self.effects,
            &self.handlers,
            &mut self.events,
        );
        self.sweep_dead();
        result
    }

    /// Strip one status effect from a unit. Returns whether it was
    /// present.
    pub fn dispel(&mut self, unit_id: UnitId, effect: &EffectId) -> bool {
        let Some(slot) = self.roster.slot_mut(unit_id) else {
            return false;
        };
        slot.effects.remove(
            &mut slot.unit,
            effect,
            &self.effects,
            &self.handlers,
            &mut self.events,
        )
    }

    /// Unit IDs of every living member of a team, in spawn order.
    #[must_use]
    pub fn living_on(&self, team: Team) -> Vec<UnitId> {
        self.roster
            .iter()
            .filter(|slot| slot.unit.team() == team && slot.unit.is_alive())
            .map(|slot| slot.unit.id())
            .collect()
    }

    /// A match is decided when at most one team still has living
    /// units. Returns the winning team, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        let mut survivor: Option<Team> = None;
        for slot in self.roster.iter() {
            if !slot.unit.is_alive() {
                continue;
            }
            match survivor {
                None => survivor = Some(slot.unit.team()),
                Some(team) if team != slot.unit.team() => return None,
                Some(_) => {}
            }
        }
        survivor
    }

    fn walk_to(&mut self, unit_id: UnitId, destination: WorldPos) {
        let cell = self.grid.world_to_grid(destination);
        if !self.grid.move_unit(unit_id, cell) {
            debug!(%unit_id, %cell, "movement blocked");
            return;
        }
        let snapped = self.grid.grid_to_world(cell);
        if let Some(slot) = self.roster.slot_mut(unit_id) {
            slot.unit.set_position(snapped);
        }
    }

    fn sweep_dead(&mut self) {
        for id in self.roster.ids() {
            let dead = self.roster.get(id).is_some_and(|slot| !slot.unit.is_alive());
            if dead {
                self.grid.remove(id);
            }
        }
    }
}

/// Builds a [`Skirmish`] from catalogs, handlers, and spawns.
///
/// ## Example
///
/// ```
/// use dark_protocol::cards::{CardCatalog, CardDefinition, CardEffect, CardKind, DeckDefinition};
/// use dark_protocol::core::{GridPos, Team};
/// use dark_protocol::skirmish::SkirmishBuilder;
///
/// let mut cards = CardCatalog::new();
/// cards.register(CardDefinition::new(
///     "sprint",
///     "Sprint",
///     CardKind::Movement,
///     CardEffect::Movement,
/// ));
/// let deck = DeckDefinition::new("Basics");
///
/// let mut builder = SkirmishBuilder::new(42).with_cards(cards);
/// let scout = builder.spawn("Scout", Team::new(0), GridPos::new(0, 0), &deck);
/// let raider = builder.spawn("Raider", Team::new(1), GridPos::new(4, 0), &deck);
///
/// let skirmish = builder.build().unwrap();
/// assert_eq!(skirmish.roster().len(), 2);
/// assert_ne!(scout, raider);
/// ```
pub struct SkirmishBuilder {
    seed: u64,
    cell_size: f32,
    cards: CardCatalog,
    effects: EffectCatalog,
    handlers: HandlerRegistry,
    spawns: Vec<Spawn>,
    next_id: u32,
}

struct Spawn {
    unit: SkirmishUnit,
    cell: GridPos,
    deck: DeckDefinition,
}

impl SkirmishBuilder {
    /// Start building a match with the given RNG seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            cell_size: 1.0,
            cards: CardCatalog::new(),
            effects: EffectCatalog::new(),
            handlers: HandlerRegistry::new(),
            spawns: Vec::new(),
            next_id: 1,
        }
    }

    /// Set the grid cell edge length (default 1.0).
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the card catalog.
    #[must_use]
    pub fn with_cards(mut self, cards: CardCatalog) -> Self {
        self.cards = cards;
        self
    }

    /// Set the effect catalog.
    #[must_use]
    pub fn with_effects(mut self, effects: EffectCatalog) -> Self {
        self.effects = effects;
        self
    }

    /// Set the handler registry.
    #[must_use]
    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Spawn a unit with default stats.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        team: Team,
        cell: GridPos,
        deck: &DeckDefinition,
    ) -> UnitId {
        self.spawn_with(name, team, cell, deck, |unit| unit)
    }

    /// Spawn a unit, customizing its stats before it enters the match.
    ///
    /// ```
    /// # use dark_protocol::cards::DeckDefinition;
    /// # use dark_protocol::core::{GridPos, Team};
    /// # use dark_protocol::skirmish::SkirmishBuilder;
    /// let mut builder = SkirmishBuilder::new(1);
    /// let deck = DeckDefinition::new("Empty");
    /// let tank = builder.spawn_with("Bulwark", Team::new(0), GridPos::new(0, 0), &deck, |unit| {
    ///     unit.with_max_health(220).with_movement_points(3)
    /// });
    /// # let _ = tank;
    /// ```
    pub fn spawn_with(
        &mut self,
        name: impl Into<String>,
        team: Team,
        cell: GridPos,
        deck: &DeckDefinition,
        customize: impl FnOnce(SkirmishUnit) -> SkirmishUnit,
    ) -> UnitId {
        let id = UnitId::new(self.next_id);
        self.next_id += 1;

        // Position is provisional; build() snaps it to the cell center
        // once the cell size is final.
        let unit = customize(SkirmishUnit::new(id, name, team, WorldPos::default()));
        self.spawns.push(Spawn {
            unit,
            cell,
            deck: deck.clone(),
        });
        id
    }

    /// Validate everything and assemble the match.
    ///
    /// Checks handler references in both catalogs, validates each deck
    /// against the card catalog, and rejects overlapping spawn cells.
    /// Each unit's deck is composed, shuffled with the match seed, and
    /// dealt a starting hand of [`STARTING_HAND_SIZE`].
    pub fn build(self) -> Result<Skirmish, CatalogError> {
        self.effects.validate()?;
        self.effects.validate_handlers(&self.handlers)?;
        self.cards.validate_handlers(&self.handlers)?;

        let mut grid = SkirmishGrid::new(self.cell_size);
        let mut roster = Roster::new();
        let mut rng = MatchRng::new(self.seed);

        for spawn in self.spawns {
            let Spawn { mut unit, cell, deck } = spawn;
            deck.validate(&self.cards)?;

            if !grid.place(unit.id(), cell) {
                return Err(CatalogError::Invalid {
                    id: unit.name().to_string(),
                    reason: format!("spawn cell {cell} is already occupied"),
                });
            }
            unit.set_position(grid.grid_to_world(cell));

            let mut draw = deck.compose(&self.cards);
            rng.shuffle(&mut draw);
            let deal = draw.len().min(STARTING_HAND_SIZE);
            let hand = draw.split_off(draw.len() - deal);

            roster.insert(Slot {
                unit,
                effects: StatusTracker::new(),
                draw,
                hand,
                discard: Vec::new(),
            });
        }

        debug!(
            seed = self.seed,
            units = roster.len(),
            cards = self.cards.len(),
            effects = self.effects.len(),
            "skirmish assembled"
        );

        Ok(Skirmish {
            roster,
            grid,
            cards: self.cards,
            effects: self.effects,
            handlers: self.handlers,
            events: EventLog::new(),
            rng,
            turn: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardEffect, CardKind};

    fn movement_cards() -> CardCatalog {
        let mut cards = CardCatalog::new();
        for name in ["sprint", "crawl", "vault"] {
            cards.register(CardDefinition::new(
                name,
                name,
                CardKind::Movement,
                CardEffect::Movement,
            ));
        }
        cards
    }

    fn build_pair() -> (Skirmish, UnitId, UnitId) {
        let deck = DeckDefinition::new("Basics");
        let mut builder = SkirmishBuilder::new(42).with_cards(movement_cards());
        let a = builder.spawn("Scout", Team::new(0), GridPos::new(0, 0), &deck);
        let b = builder.spawn("Raider", Team::new(1), GridPos::new(4, 0), &deck);
        (builder.build().unwrap(), a, b)
    }

    #[test]
    fn test_build_deals_starting_hands() {
        let (skirmish, a, _) = build_pair();
        // 3 commons x 2 copies = 6 cards; 4 dealt, 2 left to draw.
        assert_eq!(skirmish.hand(a).map(|h| h.len()), Some(4));
        assert_eq!(skirmish.roster().get(a).map(|s| s.draw.len()), Some(2));
    }

    #[test]
    fn test_same_seed_same_hands() {
        let (first, a1, _) = build_pair();
        let (second, a2, _) = build_pair();
        assert_eq!(first.hand(a1), second.hand(a2));
    }

    #[test]
    fn test_spawn_collision_rejected() {
        let deck = DeckDefinition::new("Basics");
        let mut builder = SkirmishBuilder::new(1).with_cards(movement_cards());
        builder.spawn("A", Team::new(0), GridPos::new(0, 0), &deck);
        builder.spawn("B", Team::new(1), GridPos::new(0, 0), &deck);
        assert!(matches!(
            builder.build(),
            Err(CatalogError::Invalid { .. })
        ));
    }

    #[test]
    fn test_begin_turn_draws_and_logs() {
        let (mut skirmish, a, _) = build_pair();
        skirmish.begin_turn(a);

        assert_eq!(skirmish.hand(a).map(|h| h.len()), Some(5));
        let events = skirmish.drain_events();
        assert!(
            events.contains(&CombatEvent::TurnStarted { unit: a }),
            "expected TurnStarted, got {events:?}"
        );
    }

    #[test]
    fn test_reshuffle_when_draw_pile_empty() {
        let (mut skirmish, a, _) = build_pair();

        // Burn through the draw pile (2 cards), then the discard has
        // nothing so later draws must come from reshuffles.
        skirmish.begin_turn(a);
        skirmish.begin_turn(a);
        assert_eq!(skirmish.roster().get(a).map(|s| s.draw.len()), Some(0));

        // Playing moves cards to the discard pile.
        let card = skirmish.hand(a).and_then(|h| h.first().cloned()).unwrap();
        skirmish
            .play_card(a, &card, None, Some(WorldPos::new(1.5, 0.5)))
            .unwrap();
        assert_eq!(skirmish.roster().get(a).map(|s| s.discard.len()), Some(1));

        skirmish.begin_turn(a);
        assert_eq!(
            skirmish.roster().get(a).map(|s| s.discard.len()),
            Some(0),
            "discard reshuffled into draw"
        );
    }

    #[test]
    fn test_play_requires_card_in_hand() {
        let (mut skirmish, a, _) = build_pair();
        let result = skirmish.play_card(a, &CardId::new("ghost"), None, None);
        assert_eq!(result, Err(PlayError::NotInHand(CardId::new("ghost"))));
    }

    #[test]
    fn test_movement_play_walks_the_unit() {
        let (mut skirmish, a, _) = build_pair();
        let card = skirmish.hand(a).and_then(|h| h.first().cloned()).unwrap();

        let outcome = skirmish
            .play_card(a, &card, None, Some(WorldPos::new(2.5, 0.5)))
            .unwrap();
        assert!(matches!(outcome, CardOutcome::Movement { .. }));
        assert_eq!(
            skirmish.grid().cell_of(a),
            Some(GridPos::new(2, 0)),
            "unit walked to the requested cell"
        );
        assert_eq!(
            skirmish.unit(a).map(|u| u.position()),
            Some(WorldPos::new(2.5, 0.5)),
            "position snapped to the cell center"
        );
    }

    #[test]
    fn test_winner() {
        let (mut skirmish, a, b) = build_pair();
        assert_eq!(skirmish.winner(), None);

        // Strike the raider down outside card play.
        if let Some(slot) = skirmish.roster.slot_mut(b) {
            slot.unit.take_damage(1000, None);
        }
        skirmish.sweep_dead();

        assert_eq!(skirmish.living_on(Team::new(1)), Vec::<UnitId>::new());
        assert_eq!(skirmish.winner(), Some(Team::new(0)));
        assert!(skirmish.grid().cell_of(b).is_none(), "corpse swept off the grid");
        let _ = a;
    }
}
