//! Core types: unit identity, positions, collaborator traits, events.
//!
//! ## Key Types
//!
//! - `UnitId` / `Team`: identity and affiliation
//! - `Unit`: the combat-unit collaborator trait the host implements
//! - `WorldPos` / `GridPos` / `Grid`: positions and the spatial query trait
//! - `Arena` / `UnitEntry`: host-owned unit storage access
//! - `CombatEvent` / `EventLog`: ordered, drain-once UI notifications

pub mod arena;
pub mod events;
pub mod grid;
pub mod unit;

pub use arena::{Arena, UnitEntry};
pub use events::{CombatEvent, EventLog, RemovalReason};
pub use grid::{Grid, GridPos, WorldPos};
pub use unit::{Team, Unit, UnitId};
