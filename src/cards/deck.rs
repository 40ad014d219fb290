//! Deck definitions - a common pool plus a few specialized picks.
//!
//! A deck is not a list of every copy. It names up to
//! [`MAX_SPECIALIZED_CARDS`] specialized cards and a copy count for
//! the common pool; [`DeckDefinition::compose`] expands that into the
//! concrete card list a match shuffles.

use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardId, Rarity};
use crate::effects::CatalogError;

/// Upper bound on specialized cards per deck.
pub const MAX_SPECIALIZED_CARDS: usize = 3;

fn default_common_copies() -> u32 {
    2
}

/// Derived cost summary of a composed deck.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeckStats {
    /// Total cards after composition.
    pub cards: usize,
    pub min_action_cost: u32,
    pub max_action_cost: u32,
    pub mean_action_cost: f32,
}

/// A named deck: specialized picks over a shared common pool.
///
/// Stats are derived from the catalog on load and after every
/// mutation; they are never serialized.
///
/// ## Example
///
/// ```
/// use dark_protocol::cards::{
///     CardCatalog, CardDefinition, CardEffect, CardId, CardKind, DeckDefinition, Rarity,
///     Targeting,
/// };
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(
///     CardDefinition::new("shot", "Shot", CardKind::Attack, CardEffect::Damage { base_damage: 8 })
///         .with_action_cost(1)
///         .with_targeting(Targeting::enemies()),
/// );
/// catalog.register(
///     CardDefinition::new("sprint", "Sprint", CardKind::Movement, CardEffect::Movement)
///         .with_action_cost(1),
/// );
/// catalog.register(
///     CardDefinition::new("railgun", "Railgun", CardKind::Attack, CardEffect::Damage { base_damage: 25 })
///         .with_action_cost(3)
///         .with_rarity(Rarity::Rare)
///         .with_targeting(Targeting::enemies()),
/// );
///
/// let mut deck = DeckDefinition::new("Vanguard");
/// deck.add_specialized(CardId::new("railgun"), &catalog).unwrap();
///
/// // Two copies of each common card, plus the specialized pick.
/// assert_eq!(deck.compose(&catalog).len(), 5);
/// assert_eq!(deck.stats().max_action_cost, 3);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeckDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Specialized picks, at most [`MAX_SPECIALIZED_CARDS`].
    #[serde(default)]
    specialized: Vec<CardId>,

    /// Copies of each common-rarity card in the composed deck.
    #[serde(default = "default_common_copies")]
    pub common_copies: u32,

    #[serde(skip)]
    stats: DeckStats,
}

impl DeckDefinition {
    /// Create an empty deck with the default common pool.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            specialized: Vec::new(),
            common_copies: default_common_copies(),
            stats: DeckStats::default(),
        }
    }

    /// Parse a RON deck and derive its stats against the catalog.
    pub fn from_ron_str(source: &str, catalog: &CardCatalog) -> Result<Self, CatalogError> {
        let mut deck: DeckDefinition = ron::from_str(source)?;
        deck.validate(catalog)?;
        deck.recompute_stats(catalog);
        Ok(deck)
    }

    /// The specialized picks, in pick order.
    #[must_use]
    pub fn specialized(&self) -> &[CardId] {
        &self.specialized
    }

    /// Derived stats as of the last mutation.
    #[must_use]
    pub fn stats(&self) -> DeckStats {
        self.stats
    }

    /// Add a specialized pick.
    ///
    /// Fails if the deck is at the specialized cap or the card is not
    /// in the catalog.
    pub fn add_specialized(
        &mut self,
        card: CardId,
        catalog: &CardCatalog,
    ) -> Result<(), CatalogError> {
        if self.specialized.len() >= MAX_SPECIALIZED_CARDS {
            return Err(CatalogError::Invalid {
                id: self.name.clone(),
                reason: format!("deck already has {MAX_SPECIALIZED_CARDS} specialized cards"),
            });
        }
        if !catalog.contains(&card) {
            return Err(CatalogError::UnknownReference {
                id: self.name.clone(),
                kind: "card",
                name: card.0,
            });
        }
        self.specialized.push(card);
        self.recompute_stats(catalog);
        Ok(())
    }

    /// Remove a specialized pick. Returns whether it was present.
    pub fn remove_specialized(&mut self, card: &CardId, catalog: &CardCatalog) -> bool {
        let Some(ix) = self.specialized.iter().position(|c| c == card) else {
            return false;
        };
        self.specialized.remove(ix);
        self.recompute_stats(catalog);
        true
    }

    /// Check the deck against the catalog.
    pub fn validate(&self, catalog: &CardCatalog) -> Result<(), CatalogError> {
        if self.specialized.len() > MAX_SPECIALIZED_CARDS {
            return Err(CatalogError::Invalid {
                id: self.name.clone(),
                reason: format!(
                    "{} specialized cards exceeds the cap of {MAX_SPECIALIZED_CARDS}",
                    self.specialized.len()
                ),
            });
        }
        for card in &self.specialized {
            if !catalog.contains(card) {
                return Err(CatalogError::UnknownReference {
                    id: self.name.clone(),
                    kind: "card",
                    name: card.0.clone(),
                });
            }
        }
        Ok(())
    }

    /// Expand the deck into the concrete card list a match shuffles.
    ///
    /// Commons are sorted by ID so that composition is deterministic
    /// and a seeded shuffle reproduces.
    #[must_use]
    pub fn compose(&self, catalog: &CardCatalog) -> Vec<CardId> {
        let mut commons: Vec<&CardId> = catalog
            .iter()
            .filter(|c| c.rarity == Rarity::Common)
            .map(|c| &c.id)
            .collect();
        commons.sort();

        let mut cards =
            Vec::with_capacity(commons.len() * self.common_copies as usize + self.specialized.len());
        for id in commons {
            for _ in 0..self.common_copies {
                cards.push(id.clone());
            }
        }
        cards.extend(self.specialized.iter().cloned());
        cards
    }

    /// Recompute the derived stats from the composed deck.
    pub fn recompute_stats(&mut self, catalog: &CardCatalog) {
        let composed = self.compose(catalog);
        if composed.is_empty() {
            self.stats = DeckStats::default();
            return;
        }

        let mut min = u32::MAX;
        let mut max = 0;
        let mut total = 0u64;
        for id in &composed {
            let Some(card) = catalog.get(id) else { continue };
            min = min.min(card.action_cost);
            max = max.max(card.action_cost);
            total += u64::from(card.action_cost);
        }

        self.stats = DeckStats {
            cards: composed.len(),
            min_action_cost: if min == u32::MAX { 0 } else { min },
            max_action_cost: max,
            mean_action_cost: total as f32 / composed.len() as f32,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardEffect, CardKind, Targeting};

    fn catalog() -> CardCatalog {
        let mut catalog = CardCatalog::new();
        catalog.register(
            CardDefinition::new(
                "shot",
                "Shot",
                CardKind::Attack,
                CardEffect::Damage { base_damage: 8 },
            )
            .with_action_cost(1)
            .with_targeting(Targeting::enemies()),
        );
        catalog.register(
            CardDefinition::new("sprint", "Sprint", CardKind::Movement, CardEffect::Movement)
                .with_action_cost(1),
        );
        catalog.register(
            CardDefinition::new(
                "railgun",
                "Railgun",
                CardKind::Attack,
                CardEffect::Damage { base_damage: 25 },
            )
            .with_action_cost(3)
            .with_rarity(Rarity::Rare)
            .with_targeting(Targeting::enemies()),
        );
        catalog
    }

    #[test]
    fn test_compose_counts_and_order() {
        let catalog = catalog();
        let mut deck = DeckDefinition::new("Vanguard");
        deck.add_specialized(CardId::new("railgun"), &catalog).unwrap();

        let cards = deck.compose(&catalog);
        assert_eq!(
            cards,
            vec![
                CardId::new("shot"),
                CardId::new("shot"),
                CardId::new("sprint"),
                CardId::new("sprint"),
                CardId::new("railgun"),
            ],
            "commons sorted by ID, doubled, specialized appended"
        );
    }

    #[test]
    fn test_specialized_cap() {
        let mut catalog = catalog();
        for i in 0..4 {
            catalog.register(
                CardDefinition::new(
                    format!("rare_{i}"),
                    "Rare",
                    CardKind::Utility,
                    CardEffect::Movement,
                )
                .with_rarity(Rarity::Rare),
            );
        }

        let mut deck = DeckDefinition::new("Greedy");
        for i in 0..MAX_SPECIALIZED_CARDS {
            deck.add_specialized(CardId::new(format!("rare_{i}")), &catalog)
                .unwrap();
        }
        let result = deck.add_specialized(CardId::new("rare_3"), &catalog);
        assert!(matches!(result, Err(CatalogError::Invalid { .. })));
    }

    #[test]
    fn test_unknown_specialized_rejected() {
        let catalog = catalog();
        let mut deck = DeckDefinition::new("Typo");
        let result = deck.add_specialized(CardId::new("railgnu"), &catalog);
        assert!(matches!(
            result,
            Err(CatalogError::UnknownReference { kind: "card", .. })
        ));
    }

    #[test]
    fn test_stats_recomputed_on_mutation() {
        let catalog = catalog();
        let mut deck = DeckDefinition::new("Vanguard");
        deck.recompute_stats(&catalog);
        assert_eq!(deck.stats().cards, 4);
        assert_eq!(deck.stats().max_action_cost, 1);

        deck.add_specialized(CardId::new("railgun"), &catalog).unwrap();
        assert_eq!(deck.stats().cards, 5);
        assert_eq!(deck.stats().max_action_cost, 3);
        assert!((deck.stats().mean_action_cost - 7.0 / 5.0).abs() < f32::EPSILON);

        deck.remove_specialized(&CardId::new("railgun"), &catalog);
        assert_eq!(deck.stats().max_action_cost, 1);
    }

    #[test]
    fn test_from_ron() {
        let catalog = catalog();
        let deck = DeckDefinition::from_ron_str(
            r#"(
                name: "Vanguard",
                specialized: ["railgun"],
            )"#,
            &catalog,
        )
        .unwrap();

        assert_eq!(deck.common_copies, 2, "copy count defaults when omitted");
        assert_eq!(deck.specialized(), &[CardId::new("railgun")]);
        assert_eq!(deck.stats().cards, 5, "stats derived on load");
    }

    #[test]
    fn test_from_ron_unknown_card_rejected() {
        let catalog = catalog();
        let result = DeckDefinition::from_ron_str(
            r#"(name: "Typo", specialized: ["missing"])"#,
            &catalog,
        );
        assert!(matches!(result, Err(CatalogError::UnknownReference { .. })));
    }
}
