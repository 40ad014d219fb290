//! Reference match: a complete, headless wiring of the engine.
//!
//! Nothing in `core`, `effects`, or `cards` depends on this module; a
//! host with its own unit and grid types can ignore it entirely. It
//! exists so the crate ships one working composition (and so the
//! integration tests have a real match to drive).
//!
//! ## Key Types
//!
//! - `Skirmish` / `SkirmishBuilder`: the match and its setup
//! - `Roster` / `Slot`: unit storage implementing `Arena`
//! - `SkirmishUnit`: the reference `Unit` implementation
//! - `SkirmishGrid`: cell-based occupancy implementing `Grid`
//! - `MatchRng`: seeded, checkpointable randomness for shuffles

pub mod game;
pub mod grid;
pub mod rng;
pub mod unit;

pub use game::{Roster, Skirmish, SkirmishBuilder, Slot, STARTING_HAND_SIZE};
pub use grid::SkirmishGrid;
pub use rng::{MatchRng, MatchRngState};
pub use unit::SkirmishUnit;
