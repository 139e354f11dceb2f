//! Card registry for definition lookup.
//!
//! The `CardRegistry` is the card-definition lookup table supplied by the
//! surrounding application at battle start. Lookups return `Option`; the
//! engine treats a missing id as a no-op.

use rustc_hash::FxHashMap;

use super::definition::{CardCategory, CardDefinition, CardId};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use ether_battle::cards::{CardCategory, CardDefinition, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.insert(CardDefinition::new(CardId::new(1), "Slash", CardCategory::Attack).with_damage(6));
///
/// assert_eq!(registry.get(CardId::new(1)).map(|c| c.damage), Some(6));
/// assert!(registry.get(CardId::new(2)).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a card pool.
    ///
    /// Later definitions replace earlier ones with the same id.
    pub fn from_cards(cards: impl IntoIterator<Item = CardDefinition>) -> Self {
        let mut registry = Self::new();
        for card in cards {
            registry.insert(card);
        }
        registry
    }

    /// Insert a card definition, returning the one it replaced.
    pub fn insert(&mut self, card: CardDefinition) -> Option<CardDefinition> {
        self.cards.insert(card.id, card)
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find cards by category.
    pub fn find_by_category(&self, category: CardCategory) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().filter(move |c| c.category == category)
    }
}
