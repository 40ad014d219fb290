//! Status-effect system: definitions, catalog, per-unit tracking.
//!
//! ## Key Types
//!
//! - `EffectDefinition` / `EffectId`: immutable authored effect data
//! - `EffectCatalog`: validated definition lookup, loaded from RON
//! - `ActiveEffect`: runtime instance on one unit
//! - `StatusTracker`: the per-unit stacking/refresh/expiry engine
//! - `deal_damage` / `apply_healing`: the shared health-change path
//!   that keeps the damage hooks synchronous
//!
//! ## Design Philosophy
//!
//! Definitions are data; behavior beyond tick damage/healing and stat
//! deltas lives in handlers resolved by name at apply time. The
//! tracker never reaches into the host: units arrive as `&mut dyn
//! Unit` and everything the UI needs leaves through the `EventLog`.

pub mod catalog;
pub mod combat;
pub mod definition;
pub mod instance;
pub mod tracker;

pub use catalog::{CatalogError, EffectCatalog};
pub use combat::{apply_healing, deal_damage};
pub use definition::{EffectDefinition, EffectId, EffectKind, Polarity, StatModifiers};
pub use instance::ActiveEffect;
pub use tracker::{ApplyResult, StatusTracker};
