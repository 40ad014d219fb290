//! Effect catalog: definition lookup and data loading.
//!
//! Authored effect data is loaded once at startup from a RON document
//! and validated before any match starts. After that the catalog is an
//! immutable lookup table keyed by `EffectId`.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::handlers::HandlerRegistry;

use super::definition::{EffectDefinition, EffectId, EffectKind};

/// Errors raised while loading or validating authored catalogs.
///
/// These surface misauthored data at startup; they are never produced
/// during a match.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The RON document could not be parsed.
    #[error("failed to parse definitions: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// A definition has an empty ID string.
    #[error("definition has an empty id")]
    EmptyId,

    /// Two definitions share an ID.
    #[error("duplicate definition id `{0}`")]
    DuplicateId(String),

    /// A definition violates a field invariant.
    #[error("`{id}`: {reason}")]
    Invalid { id: String, reason: String },

    /// A definition references something that does not exist.
    #[error("`{id}` references unknown {kind} `{name}`")]
    UnknownReference {
        id: String,
        kind: &'static str,
        name: String,
    },
}

/// Root shape of an effects data file.
#[derive(Debug, Deserialize)]
struct EffectSet {
    effects: Vec<EffectDefinition>,
}

/// Catalog of effect definitions.
///
/// ## Example
///
/// ```
/// use dark_protocol::effects::EffectCatalog;
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
/// assert_eq!(catalog.len(), 1);
/// assert_eq!(catalog.get_unchecked(&"burn".into()).per_turn_value, 5);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EffectCatalog {
    effects: FxHashMap<EffectId, EffectDefinition>,
}

impl EffectCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a RON document and validate every definition.
    pub fn from_ron_str(source: &str) -> Result<Self, CatalogError> {
        let set: EffectSet = ron::from_str(source)?;
        let mut catalog = Self::new();
        for definition in set.effects {
            if catalog.effects.contains_key(&definition.id) {
                return Err(CatalogError::DuplicateId(definition.id.0.clone()));
            }
            catalog.effects.insert(definition.id.clone(), definition);
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Register a definition built in code.
    ///
    /// Panics if a definition with the same ID already exists. Data
    /// files go through `from_ron_str`, which reports duplicates as
    /// errors instead.
    pub fn register(&mut self, definition: EffectDefinition) {
        if self.effects.contains_key(&definition.id) {
            panic!("Effect with ID {:?} already registered", definition.id);
        }
        self.effects.insert(definition.id.clone(), definition);
    }

    /// Check every definition against the authoring invariants.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for definition in self.effects.values() {
            if definition.id.as_str().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if definition.max_stacks < 1 {
                return Err(CatalogError::Invalid {
                    id: definition.id.0.clone(),
                    reason: "max_stacks must be at least 1".to_string(),
                });
            }
            if !definition.stackable && definition.max_stacks != 1 {
                return Err(CatalogError::Invalid {
                    id: definition.id.0.clone(),
                    reason: "non-stackable effects must keep max_stacks at 1".to_string(),
                });
            }
            let mods = &definition.modifiers;
            for (field, value) in [
                ("damage_percent", mods.damage_percent),
                ("healing_percent", mods.healing_percent),
            ] {
                if !(-100..=100).contains(&value) {
                    return Err(CatalogError::Invalid {
                        id: definition.id.0.clone(),
                        reason: format!("{field} must lie within [-100, 100], got {value}"),
                    });
                }
            }
            if definition.kind == EffectKind::Custom && definition.handler.is_none() {
                return Err(CatalogError::Invalid {
                    id: definition.id.0.clone(),
                    reason: "custom effects must name a handler".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check that every handler named by a definition is registered.
    ///
    /// Run once after both the catalog and the handler registry are
    /// built; apply-time lookups then cannot miss.
    pub fn validate_handlers(&self, handlers: &HandlerRegistry) -> Result<(), CatalogError> {
        for definition in self.effects.values() {
            if let Some(handler) = &definition.handler {
                if !handlers.contains_status(handler) {
                    return Err(CatalogError::UnknownReference {
                        id: definition.id.0.clone(),
                        kind: "status handler",
                        name: handler.as_str().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get a definition by ID.
    #[must_use]
    pub fn get(&self, id: &EffectId) -> Option<&EffectDefinition> {
        self.effects.get(id)
    }

    /// Get a definition by ID, panicking if not found.
    ///
    /// Use when you're certain the effect exists.
    #[must_use]
    pub fn get_unchecked(&self, id: &EffectId) -> &EffectDefinition {
        self.effects.get(id).expect("Effect not found in catalog")
    }

    /// Check if an effect ID is registered.
    #[must_use]
    pub fn contains(&self, id: &EffectId) -> bool {
        self.effects.contains_key(id)
    }

    /// Get the number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate over all definitions.
    pub fn iter(&self) -> impl Iterator<Item = &EffectDefinition> {
        self.effects.values()
    }

    /// Find definitions matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &EffectDefinition>
    where
        F: Fn(&EffectDefinition) -> bool,
    {
        self.effects.values().filter(move |e| predicate(e))
    }
}
