//! Card catalog - the set of all known card definitions.
//!
//! Load once at startup, from code or from a RON document, then share
//! immutably. Every lookup during play goes through here.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, CardEffect, CardId};
use crate::effects::CatalogError;
use crate::handlers::HandlerRegistry;

/// Root of a RON card document.
#[derive(Debug, Serialize, Deserialize)]
struct CardSet {
    cards: Vec<CardDefinition>,
}

/// Catalog of card definitions, indexed by ID.
///
/// ## Example
///
/// ```
/// use dark_protocol::cards::CardCatalog;
///
/// let catalog = CardCatalog::from_ron_str(
///     r#"(cards: [
///         (
///             id: "railgun_shot",
///             name: "Railgun Shot",
///             kind: Attack,
///             action_cost: 2,
///             range: 6.0,
///             targeting: (requires_target: true, allow_enemies: true),
///             effect: Damage(base_damage: 12),
///         ),
///     ])"#,
/// )
/// .unwrap();
///
/// assert_eq!(catalog.len(), 1);
/// assert!(catalog.contains(&"railgun_shot".into()));
/// ```
#[derive(Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a RON card document and validate every definition.
    pub fn from_ron_str(source: &str) -> Result<Self, CatalogError> {
        let set: CardSet = ron::from_str(source)?;
        let mut catalog = Self::new();
        for card in set.cards {
            if catalog.cards.contains_key(&card.id) {
                return Err(CatalogError::DuplicateId(card.id.0.clone()));
            }
            catalog.validate(&card)?;
            catalog.cards.insert(card.id.clone(), card);
        }
        Ok(catalog)
    }

    /// Register a card definition built in code.
    ///
    /// # Panics
    ///
    /// Panics if a card with the same ID is already registered.
    pub fn register(&mut self, card: CardDefinition) {
        assert!(
            !self.cards.contains_key(&card.id),
            "Card with ID {:?} already registered",
            card.id
        );
        self.cards.insert(card.id.clone(), card);
    }

    /// Check a single definition for internal consistency.
    pub fn validate(&self, card: &CardDefinition) -> Result<(), CatalogError> {
        if card.id.as_str().is_empty() {
            return Err(CatalogError::EmptyId);
        }
        match &card.effect {
            CardEffect::Damage { .. } | CardEffect::Healing { .. } => {
                if !card.targeting.requires_target {
                    return Err(CatalogError::Invalid {
                        id: card.id.0.clone(),
                        reason: "single-target cards must require a target".into(),
                    });
                }
            }
            CardEffect::Movement => {
                if card.targeting.requires_target {
                    return Err(CatalogError::Invalid {
                        id: card.id.0.clone(),
                        reason: "movement cards take no unit target".into(),
                    });
                }
            }
            CardEffect::Area { radius, .. } => {
                if *radius <= 0.0 {
                    return Err(CatalogError::Invalid {
                        id: card.id.0.clone(),
                        reason: "area radius must be positive".into(),
                    });
                }
            }
            CardEffect::Buff { handler } => {
                if handler.as_str().is_empty() {
                    return Err(CatalogError::Invalid {
                        id: card.id.0.clone(),
                        reason: "buff cards name a handler".into(),
                    });
                }
                if card.duration == 0 {
                    return Err(CatalogError::Invalid {
                        id: card.id.0.clone(),
                        reason: "buff duration must be at least one turn".into(),
                    });
                }
            }
            CardEffect::Special { handler } => {
                if handler.as_str().is_empty() {
                    return Err(CatalogError::Invalid {
                        id: card.id.0.clone(),
                        reason: "special cards name a handler".into(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Check that every handler named by a card is registered.
    ///
    /// Run once after both the catalog and the handler registry are
    /// built; play-time lookups then cannot miss.
    pub fn validate_handlers(&self, handlers: &HandlerRegistry) -> Result<(), CatalogError> {
        for card in self.cards.values() {
            if let Some(handler) = card.effect.handler() {
                if !handlers.contains_card(handler) {
                    return Err(CatalogError::UnknownReference {
                        id: card.id.0.clone(),
                        kind: "card handler",
                        name: handler.as_str().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    /// Get a card definition, panicking if absent.
    ///
    /// # Panics
    ///
    /// Panics if no card with the given ID is registered.
    #[must_use]
    pub fn get_unchecked(&self, id: &CardId) -> &CardDefinition {
        self.cards
            .get(id)
            .unwrap_or_else(|| panic!("Card {:?} not found in catalog", id))
    }

    /// Check whether a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all registered definitions, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find all cards matching a predicate.
    pub fn find(&self, predicate: impl Fn(&CardDefinition) -> bool) -> Vec<&CardDefinition> {
        self.cards.values().filter(|c| predicate(c)).collect()
    }
}
