//! Data-file loading tests.
//!
//! Catalogs load from RON at startup and every definition is checked
//! before a match can use it:
//! - Round trips for realistic effect and card documents
//! - Authoring-invariant rejections, with the offending ID reported
//! - Handler cross-references against the registry
//! - Deck composition and derived stats

use dark_protocol::cards::{
    CardCatalog, CardEffect, CardId, CardKind, DeckDefinition, Rarity, MAX_SPECIALIZED_CARDS,
};
use dark_protocol::effects::{CatalogError, EffectCatalog, EffectId, EffectKind};
use dark_protocol::handlers::{ApplyStatus, HandlerRegistry, StatusContext, StatusHandler};

const EFFECTS_RON: &str = r#"(
    effects: [
        (
            id: "burn",
            name: "Burn",
            kind: DamageOverTime,
            polarity: Harmful,
            per_turn_value: 5,
            stackable: true,
            max_stacks: 3,
        ),
        (
            id: "stealth",
            name: "Stealth",
            kind: Stealth,
            polarity: Beneficial,
            removed_on_damage: true,
        ),
        (
            id: "slow",
            name: "Slow",
            kind: StatDebuff,
            polarity: Harmful,
            modifiers: (movement_points: -2),
        ),
        (
            id: "focus",
            name: "Focus",
            kind: StatBuff,
            polarity: Beneficial,
            modifiers: (action_points: 1, damage_percent: 10),
        ),
        (
            id: "marked",
            name: "Marked",
            kind: Custom,
            polarity: Harmful,
            handler: Some("mark"),
        ),
    ],
)"#;

const CARDS_RON: &str = r#"(
    cards: [
        (
            id: "railgun",
            name: "Railgun Shot",
            kind: Attack,
            action_cost: 2,
            range: 6.0,
            targeting: (requires_target: true, allow_enemies: true),
            effect: Damage(base_damage: 12),
        ),
        (
            id: "medkit",
            name: "Medkit",
            kind: Support,
            rarity: Uncommon,
            action_cost: 1,
            range: 3.0,
            targeting: (requires_target: true, allow_self: true, allow_allies: true),
            effect: Healing(base_healing: 15),
        ),
        (
            id: "frag",
            name: "Frag Grenade",
            kind: Attack,
            action_cost: 2,
            range: 5.0,
            targeting: (requires_target: true),
            effect: Area(base_damage: 20, radius: 2.0),
        ),
        (
            id: "sprint",
            name: "Sprint",
            kind: Movement,
            action_cost: 1,
            effect: Movement,
        ),
        (
            id: "stim",
            name: "Stim Shot",
            kind: Support,
            rarity: Rare,
            action_cost: 1,
            duration: 3,
            targeting: (requires_target: true, allow_self: true, allow_allies: true),
            effect: Buff(handler: "apply_focus"),
        ),
    ],
)"#;

/// A realistic effect document loads with defaults filled in.
#[test]
fn test_effect_document_loads() {
    let catalog = EffectCatalog::from_ron_str(EFFECTS_RON).unwrap();
    assert_eq!(catalog.len(), 5);

    let burn = catalog.get_unchecked(&EffectId::new("burn"));
    assert_eq!(burn.kind, EffectKind::DamageOverTime);
    assert_eq!(burn.per_turn_value, 5);
    assert_eq!(burn.max_stacks, 3);
    assert_eq!(burn.instant_value, 0, "omitted fields default");

    let stealth = catalog.get_unchecked(&EffectId::new("stealth"));
    assert!(stealth.removed_on_damage);
    assert!(!stealth.stackable);
    assert_eq!(stealth.max_stacks, 1);

    let slow = catalog.get_unchecked(&EffectId::new("slow"));
    assert_eq!(slow.modifiers.movement_points, -2);
    assert_eq!(slow.modifiers.damage_percent, 0);
}

/// A realistic card document loads every effect variant.
#[test]
fn test_card_document_loads() {
    let catalog = CardCatalog::from_ron_str(CARDS_RON).unwrap();
    assert_eq!(catalog.len(), 5);

    let frag = catalog.get_unchecked(&CardId::new("frag"));
    assert_eq!(
        frag.effect,
        CardEffect::Area {
            base_damage: 20,
            radius: 2.0,
        }
    );
    assert!(frag.targeting.requires_target);
    assert!(!frag.targeting.allow_enemies, "area cards target positions");

    let medkit = catalog.get_unchecked(&CardId::new("medkit"));
    assert_eq!(medkit.rarity, Rarity::Uncommon);
    assert_eq!(medkit.health_cost, 0, "omitted costs default to zero");

    let sprint = catalog.get_unchecked(&CardId::new("sprint"));
    assert_eq!(sprint.kind, CardKind::Movement);
}

/// Stackability and stack caps must agree.
#[test]
fn test_effect_stacking_invariant() {
    let result = EffectCatalog::from_ron_str(
        r#"(
            effects: [
                (
                    id: "bad",
                    name: "Bad",
                    kind: DamageOverTime,
                    polarity: Harmful,
                    max_stacks: 4,
                ),
            ],
        )"#,
    );

    match result {
        Err(CatalogError::Invalid { id, .. }) => assert_eq!(id, "bad"),
        other => panic!("expected Invalid, got {other:?}"),
    }
}

/// Percent modifiers outside [-100, 100] are authoring errors.
#[test]
fn test_percent_range_invariant() {
    let result = EffectCatalog::from_ron_str(
        r#"(
            effects: [
                (
                    id: "mega",
                    name: "Mega",
                    kind: StatBuff,
                    polarity: Beneficial,
                    modifiers: (damage_percent: 250),
                ),
            ],
        )"#,
    );
    assert!(matches!(result, Err(CatalogError::Invalid { .. })));
}

/// Single-target cards must require a target; movement cards must not.
#[test]
fn test_card_targeting_invariants() {
    let no_target_damage = CardCatalog::from_ron_str(
        r#"(cards: [(
            id: "shot",
            name: "Shot",
            kind: Attack,
            effect: Damage(base_damage: 5),
        )])"#,
    );
    assert!(matches!(no_target_damage, Err(CatalogError::Invalid { .. })));

    let targeted_movement = CardCatalog::from_ron_str(
        r#"(cards: [(
            id: "dash",
            name: "Dash",
            kind: Movement,
            targeting: (requires_target: true),
            effect: Movement,
        )])"#,
    );
    assert!(matches!(targeted_movement, Err(CatalogError::Invalid { .. })));
}

/// Buff cards need a duration for the status they apply.
#[test]
fn test_buff_duration_invariant() {
    let result = CardCatalog::from_ron_str(
        r#"(cards: [(
            id: "stim",
            name: "Stim",
            kind: Support,
            targeting: (requires_target: true, allow_allies: true),
            effect: Buff(handler: "apply_focus"),
        )])"#,
    );
    assert!(matches!(result, Err(CatalogError::Invalid { .. })));
}

struct NoopStatus;

impl StatusHandler for NoopStatus {
    fn on_applied(&self, _ctx: &mut StatusContext<'_>) {}
}

/// Handler references resolve against the registry, or loading fails.
#[test]
fn test_handler_cross_references() {
    let effects = EffectCatalog::from_ron_str(EFFECTS_RON).unwrap();
    let cards = CardCatalog::from_ron_str(CARDS_RON).unwrap();

    let empty = HandlerRegistry::new();
    assert!(matches!(
        effects.validate_handlers(&empty),
        Err(CatalogError::UnknownReference { kind: "status handler", .. })
    ));
    assert!(matches!(
        cards.validate_handlers(&empty),
        Err(CatalogError::UnknownReference { kind: "card handler", .. })
    ));

    let mut registry = HandlerRegistry::new();
    registry.register_status("mark", NoopStatus);
    registry.register_card("apply_focus", ApplyStatus::new("focus"));

    assert!(effects.validate_handlers(&registry).is_ok());
    assert!(cards.validate_handlers(&registry).is_ok());
}

/// Decks compose the common pool plus specialized picks, with stats
/// derived from the result.
#[test]
fn test_deck_composition_and_stats() {
    let catalog = CardCatalog::from_ron_str(CARDS_RON).unwrap();

    let mut deck = DeckDefinition::new("Vanguard");
    deck.recompute_stats(&catalog);

    // Commons: railgun, frag, sprint (medkit and stim are rarer).
    assert_eq!(deck.stats().cards, 6);

    deck.add_specialized(CardId::new("stim"), &catalog).unwrap();
    deck.add_specialized(CardId::new("medkit"), &catalog).unwrap();

    let composed = deck.compose(&catalog);
    assert_eq!(composed.len(), 8);
    assert_eq!(
        composed.iter().filter(|c| c.as_str() == "railgun").count(),
        2,
        "two copies of each common"
    );
    assert_eq!(
        composed.iter().filter(|c| c.as_str() == "stim").count(),
        1,
        "one copy of a specialized pick"
    );

    let stats = deck.stats();
    assert_eq!(stats.min_action_cost, 1);
    assert_eq!(stats.max_action_cost, 2);
    // (2+2+2+2+1+1) commons + 1 + 1 specialized = 12 over 8 cards.
    assert!((stats.mean_action_cost - 1.5).abs() < f32::EPSILON);
}

/// The specialized list is bounded.
#[test]
fn test_deck_specialized_cap() {
    let catalog = CardCatalog::from_ron_str(CARDS_RON).unwrap();
    let mut deck = DeckDefinition::new("Greedy");

    for card in ["stim", "medkit", "frag"] {
        deck.add_specialized(CardId::new(card), &catalog).unwrap();
    }
    assert_eq!(deck.specialized().len(), MAX_SPECIALIZED_CARDS);

    let result = deck.add_specialized(CardId::new("railgun"), &catalog);
    assert!(matches!(result, Err(CatalogError::Invalid { .. })));
}

/// Decks load from RON against a catalog.
#[test]
fn test_deck_from_ron() {
    let catalog = CardCatalog::from_ron_str(CARDS_RON).unwrap();
    let deck = DeckDefinition::from_ron_str(
        r#"(
            name: "Vanguard",
            description: "Front-line pressure.",
            specialized: ["stim"],
            common_copies: 3,
        )"#,
        &catalog,
    )
    .unwrap();

    assert_eq!(deck.common_copies, 3);
    assert_eq!(deck.stats().cards, 10, "3 x 3 commons + 1 specialized");

    let unknown = DeckDefinition::from_ron_str(
        r#"(name: "Typo", specialized: ["railgnu"])"#,
        &catalog,
    );
    assert!(matches!(unknown, Err(CatalogError::UnknownReference { .. })));
}
