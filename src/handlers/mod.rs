//! Pluggable effect behavior.
//!
//! Cards and status effects reference custom behavior by name. At
//! startup the host registers an implementation per name in a
//! `HandlerRegistry`; at play time the engines resolve the name and
//! call through a small capability trait. This replaces any notion of
//! runtime type lookup: a name that was never registered is a
//! configuration error reported at resolution, not a crash.
//!
//! Two capability shapes exist:
//!
//! - [`CardHandler`]: executes a buff/special card play.
//! - [`StatusHandler`]: rides along with a status effect, notified on
//!   every application and on removal.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Arena, EventLog, Grid, RemovalReason, Unit, UnitId, WorldPos};
use crate::effects::{ActiveEffect, EffectCatalog, EffectDefinition};

mod builtin;

pub use builtin::{ApplyStatus, Cleanse, Overcharge};

/// Name under which a handler is registered.
///
/// Serializes as the bare string so data files read naturally.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerId(pub String);

impl HandlerId {
    /// Create a new handler ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HandlerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for HandlerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a card handler may touch while resolving a play.
///
/// Costs are already paid when the handler runs; targeting flags are
/// already validated.
pub struct CardPlayContext<'a> {
    /// The unit that played the card.
    pub caster: UnitId,
    /// The card's unit target, if one was supplied.
    pub target: Option<UnitId>,
    /// The card's position target, if one was supplied.
    pub target_pos: Option<WorldPos>,
    /// The card's duration field, for handlers that apply statuses.
    pub duration: u32,
    /// Unit storage.
    pub arena: &'a mut dyn Arena,
    /// Spatial queries.
    pub grid: &'a dyn Grid,
    /// Effect definitions.
    pub effects: &'a EffectCatalog,
    /// The registry itself, so handlers can chain into status applies.
    pub handlers: &'a HandlerRegistry,
    /// UI event feed.
    pub events: &'a mut EventLog,
}

/// Custom card behavior, resolved by name for buff/special cards.
///
/// Returns `Err` with a reason when the play could not take effect;
/// the resolver propagates that verbatim without interpreting it.
pub trait CardHandler {
    fn resolve(&self, ctx: &mut CardPlayContext<'_>) -> Result<(), String>;
}

/// What a status handler sees when its effect is applied or removed.
pub struct StatusContext<'a> {
    /// The unit carrying the effect.
    pub unit: &'a mut dyn Unit,
    /// The effect's definition.
    pub definition: &'a EffectDefinition,
    /// The instance as it stands after the state change.
    pub effect: &'a ActiveEffect,
    /// UI event feed.
    pub events: &'a mut EventLog,
}

/// Custom status-effect behavior.
///
/// `on_applied` fires on **every** application - creation, stacking,
/// and pure refreshes alike. `on_removed` fires for every removal
/// except a death clear.
pub trait StatusHandler {
    fn on_applied(&self, ctx: &mut StatusContext<'_>);

    fn on_removed(&self, ctx: &mut StatusContext<'_>, reason: RemovalReason) {
        let _ = (ctx, reason);
    }
}

/// Name-to-handler lookup, populated once at startup.
///
/// ## Example
///
/// ```
/// use dark_protocol::handlers::{HandlerId, HandlerRegistry, Overcharge};
///
/// let mut registry = HandlerRegistry::new();
/// registry.register_card("overcharge", Overcharge::new(2));
///
/// assert!(registry.contains_card(&HandlerId::new("overcharge")));
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    cards: FxHashMap<HandlerId, Box<dyn CardHandler>>,
    statuses: FxHashMap<HandlerId, Box<dyn StatusHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card handler.
    ///
    /// Panics if the name is already taken; registration happens at
    /// startup where a duplicate is a programming error.
    pub fn register_card(&mut self, id: impl Into<HandlerId>, handler: impl CardHandler + 'static) {
        let id = id.into();
        if self.cards.contains_key(&id) {
            panic!("Card handler {:?} already registered", id);
        }
        self.cards.insert(id, Box::new(handler));
    }

    /// Register a status handler.
    ///
    /// Panics if the name is already taken.
    pub fn register_status(
        &mut self,
        id: impl Into<HandlerId>,
        handler: impl StatusHandler + 'static,
    ) {
        let id = id.into();
        if self.statuses.contains_key(&id) {
            panic!("Status handler {:?} already registered", id);
        }
        self.statuses.insert(id, Box::new(handler));
    }

    /// Look up a card handler.
    #[must_use]
    pub fn card(&self, id: &HandlerId) -> Option<&dyn CardHandler> {
        self.cards.get(id).map(|h| h.as_ref())
    }

    /// Look up a status handler.
    #[must_use]
    pub fn status(&self, id: &HandlerId) -> Option<&dyn StatusHandler> {
        self.statuses.get(id).map(|h| h.as_ref())
    }

    /// Whether a card handler is registered under this name.
    #[must_use]
    pub fn contains_card(&self, id: &HandlerId) -> bool {
        self.cards.contains_key(id)
    }

    /// Whether a status handler is registered under this name.
    #[must_use]
    pub fn contains_status(&self, id: &HandlerId) -> bool {
        self.statuses.contains_key(id)
    }

    /// Whether no handlers are registered at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.statuses.is_empty()
    }
}
