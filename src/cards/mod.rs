//! Card system: definitions, catalog, decks, play resolution.
//!
//! ## Key Types
//!
//! - `CardDefinition` / `CardId`: authored card data with exactly one
//!   `CardEffect`
//! - `CardCatalog`: validated definition lookup, loaded from RON
//! - `DeckDefinition`: specialized picks over the common pool,
//!   expanded by `compose` into the list a match shuffles
//! - `CardResolver`: stateless validate-then-resolve for one play
//!
//! ## Resolution
//!
//! Engine-native effects (damage, healing, area, movement) resolve
//! inline; `Buff` and `Special` cards dispatch to a `CardHandler`
//! registered under the name the definition carries. Costs are paid
//! between validation and dispatch and are never refunded.

pub mod catalog;
pub mod deck;
pub mod definition;
pub mod resolver;

pub use catalog::CardCatalog;
pub use deck::{DeckDefinition, DeckStats, MAX_SPECIALIZED_CARDS};
pub use definition::{CardDefinition, CardEffect, CardId, CardKind, Rarity, Targeting};
pub use resolver::{area_damage, AreaHit, CardOutcome, CardResolver, PlayError, ResolveContext};
