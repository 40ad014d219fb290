//! # dark-protocol-core
//!
//! Engine-neutral combat core for a tactical grid skirmish: stacking
//! status effects, card validation and resolution, and the event feed
//! a presentation layer renders from.
//!
//! ## Design Principles
//!
//! 1. **Rules, Not Scenes**: The crate owns combat rules. Units, the
//!    grid, and turn order belong to the host, which hands them in
//!    through the `Unit`, `Arena`, and `Grid` collaborator traits.
//!
//! 2. **Data-Driven**: Effects and cards are authored RON records
//!    validated at load time. A definition never changes mid-match;
//!    behavior beyond the built-in kinds lives in named handlers.
//!
//! 3. **Dependency Injection, No Singletons**: Every operation receives
//!    the catalogs, handler registry, and event log it works against.
//!
//! 4. **Synchronous Effects**: Damage hooks (break-on-damage, death
//!    cleanup) run inside the call that dealt the damage, so state is
//!    consistent the moment any operation returns.
//!
//! 5. **Deterministic**: Seeded RNG, insertion-ordered effect
//!    processing, and sorted spatial queries make matches replayable.
//!
//! ## Modules
//!
//! - `core`: IDs, positions, collaborator traits, combat events
//! - `effects`: status-effect definitions, catalog, per-unit tracker
//! - `cards`: card definitions, catalog, decks, play resolution
//! - `handlers`: named behavior extensions for cards and effects
//! - `skirmish`: a complete reference match wiring it all together
//!
//! ## Quick Start
//!
//! ```
//! use dark_protocol::core::{EventLog, Team, Unit, UnitId, WorldPos};
//! use dark_protocol::effects::{
//!     EffectCatalog, EffectDefinition, EffectKind, Polarity, StatusTracker,
//! };
//! use dark_protocol::handlers::HandlerRegistry;
//! use dark_protocol::skirmish::SkirmishUnit;
//!
//! let mut catalog = EffectCatalog::new();
//! catalog.register(
//!     EffectDefinition::new("burn", "Burn", EffectKind::DamageOverTime, Polarity::Harmful)
//!         .with_per_turn_value(5)
//!         .with_stacking(3),
//! );
//! let handlers = HandlerRegistry::new();
//! let mut events = EventLog::new();
//!
//! let mut raider =
//!     SkirmishUnit::new(UnitId::new(1), "Raider", Team::new(1), WorldPos::new(0.0, 0.0));
//! let mut tracker = StatusTracker::new();
//!
//! tracker.apply(&mut raider, &"burn".into(), None, 3, &catalog, &handlers, &mut events);
//! tracker.apply(&mut raider, &"burn".into(), None, 3, &catalog, &handlers, &mut events);
//! tracker.process_turn_start(&mut raider, &catalog, &handlers, &mut events);
//!
//! // Two stacks of burn tick for 10.
//! assert_eq!(raider.current_health(), 90);
//! ```

pub mod cards;
pub mod core;
pub mod effects;
pub mod handlers;
pub mod skirmish;

// Re-export commonly used types
pub use crate::core::{
    Arena, CombatEvent, EventLog, Grid, GridPos, RemovalReason, Team, Unit, UnitEntry, UnitId,
    WorldPos,
};

pub use crate::effects::{
    ActiveEffect, ApplyResult, CatalogError, EffectCatalog, EffectDefinition, EffectId, EffectKind,
    Polarity, StatModifiers, StatusTracker,
};

pub use crate::cards::{
    CardCatalog, CardDefinition, CardEffect, CardId, CardKind, CardOutcome, CardResolver,
    DeckDefinition, PlayError, Rarity, ResolveContext, Targeting,
};

pub use crate::handlers::{
    CardHandler, CardPlayContext, HandlerId, HandlerRegistry, StatusContext, StatusHandler,
};

pub use crate::skirmish::{Skirmish, SkirmishBuilder, SkirmishGrid, SkirmishUnit};
