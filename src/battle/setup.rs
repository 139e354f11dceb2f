//! Battle-start configuration.

use crate::cards::{CardDefinition, CardId, CardRegistry};
use crate::core::{BattleError, Combatant, EngineConfig, Result};
use crate::effects::{AbilityCatalog, AbilityId};
use crate::timeline::PassModifiers;

/// Everything the surrounding application supplies to start a battle.
///
/// ## Example
///
/// ```
/// use ether_battle::battle::BattleSetup;
/// use ether_battle::cards::{CardCategory, CardDefinition, CardId};
/// use ether_battle::core::Combatant;
///
/// let setup = BattleSetup::new(Combatant::new(60), Combatant::new(45))
///     .with_cards([CardDefinition::new(CardId::new(1), "Slash", CardCategory::Attack).with_damage(6)])
///     .with_deck([CardId::new(1); 8])
///     .with_seed(99);
///
/// assert!(setup.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct BattleSetup {
    pub player: Combatant,
    pub enemy: Combatant,
    /// Card pool; every card a deck or plan names must be here.
    pub cards: Vec<CardDefinition>,
    pub deck: Vec<CardId>,
    pub catalog: AbilityCatalog,
    /// Abilities the player brings into battle.
    pub abilities: Vec<AbilityId>,
    pub config: EngineConfig,
    pub modifiers: PassModifiers,
    pub insight: i32,
    pub shuffle_deck: bool,
    pub seed: u64,
}

impl BattleSetup {
    #[must_use]
    pub fn new(player: Combatant, enemy: Combatant) -> Self {
        Self {
            player,
            enemy,
            cards: Vec::new(),
            deck: Vec::new(),
            catalog: AbilityCatalog::new(),
            abilities: Vec::new(),
            config: EngineConfig::default(),
            modifiers: PassModifiers::default(),
            insight: 0,
            shuffle_deck: true,
            seed: 0,
        }
    }

    #[must_use]
    pub fn with_cards(mut self, cards: impl IntoIterator<Item = CardDefinition>) -> Self {
        self.cards.extend(cards);
        self
    }

    #[must_use]
    pub fn with_deck(mut self, deck: impl IntoIterator<Item = CardId>) -> Self {
        self.deck = deck.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_abilities(mut self, catalog: AbilityCatalog, ids: impl IntoIterator<Item = AbilityId>) -> Self {
        self.catalog = catalog;
        self.abilities = ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: PassModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_insight(mut self, level: i32) -> Self {
        self.insight = level;
        self
    }

    /// Keep the deck in the given order instead of shuffling it.
    #[must_use]
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle_deck = false;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Registry built from the card pool.
    #[must_use]
    pub fn registry(&self) -> CardRegistry {
        CardRegistry::from_cards(self.cards.iter().cloned())
    }

    /// Check the setup before a battle is built from it.
    pub fn validate(&self) -> Result<()> {
        if self.player.max_hp <= 0 || self.enemy.max_hp <= 0 {
            return Err(BattleError::InvalidSetup("combatants need positive max hp".into()));
        }
        if self.player.is_dead() || self.enemy.is_dead() {
            return Err(BattleError::InvalidSetup("combatants must start alive".into()));
        }
        if self.config.max_energy <= 0 {
            return Err(BattleError::InvalidSetup("max energy must be positive".into()));
        }
        let registry = self.registry();
        if let Some(&missing) = self.deck.iter().find(|id| !registry.contains(**id)) {
            return Err(BattleError::UnknownCard(missing));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardCategory;

    #[test]
    fn test_rejects_bad_hp() {
        let setup = BattleSetup::new(Combatant::new(0), Combatant::new(10));
        assert!(matches!(setup.validate(), Err(BattleError::InvalidSetup(_))));

        let setup = BattleSetup::new(Combatant::new(10).with_hp(0), Combatant::new(10));
        assert!(matches!(setup.validate(), Err(BattleError::InvalidSetup(_))));
    }

    #[test]
    fn test_rejects_unknown_deck_card() {
        let setup = BattleSetup::new(Combatant::new(10), Combatant::new(10))
            .with_cards([CardDefinition::new(CardId::new(1), "Slash", CardCategory::Attack)])
            .with_deck([CardId::new(1), CardId::new(2)]);

        assert!(matches!(setup.validate(), Err(BattleError::UnknownCard(id)) if id == CardId::new(2)));
    }

    #[test]
    fn test_rejects_zero_energy() {
        let setup = BattleSetup::new(Combatant::new(10), Combatant::new(10))
            .with_config(EngineConfig::default().with_max_energy(0));
        assert!(setup.validate().is_err());
    }
}
