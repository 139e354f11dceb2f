//! Card definitions - immutable card templates.
//!
//! `CardDefinition` holds everything the rules need to know about a card
//! type. A card placed on the timeline gets a per-instance overlay
//! (`QueueEntry`: ghost flag, uid) that never touches the template.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::specials::NextTurnEffects;
use crate::tokens::TokenId;

/// Unique identifier for a card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card category. Some damage bonuses apply per category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Attack,
    Fencing,
    Gun,
    Defense,
    Skill,
}

/// Card traits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardTrait {
    /// Effective damage is multiplied when compared against block.
    Crush,
    /// Damage skips the defender's block entirely.
    IgnoreBlock,
    /// May be dragged later on the timeline.
    Leisure,
    /// May be dragged earlier on the timeline.
    Strain,
    /// Leaves the battle after being played.
    Vanish,
    /// Leaves the deck for the rest of the turn after being played.
    Escape,
}

/// Which combatant a card effect lands on, relative to the card's actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTarget {
    Actor,
    Opponent,
}

/// One-off effects attached to a card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CardSpecial {
    // === Pre-attack triggers ===

    /// Adds a random bonus in `0..=max` to damage. Rolled once per card play.
    RandomBonus { max: i64 },

    /// Extra damage when the defender is at or below `hp_percent` of max hp.
    ExecuteBelow { hp_percent: i64, bonus: i64 },

    /// Extra damage per point of energy the actor still has.
    EnergyScaling { per_energy: i64 },

    /// Extra damage when this is the actor's last card of the turn.
    LastCardBonus { bonus: i64 },

    // === On-play effects ===

    /// Grant a token. `magnitude` feeds stat tokens (strength gained).
    ApplyToken {
        target: EffectTarget,
        token: TokenId,
        stacks: u32,
        magnitude: i64,
    },

    /// Restore hp to the actor.
    Heal(i64),
}

impl CardSpecial {
    /// Whether this special is evaluated in the hit resolver's first step.
    #[must_use]
    pub fn is_pre_attack(&self) -> bool {
        matches!(
            self,
            CardSpecial::RandomBonus { .. }
                | CardSpecial::ExecuteBelow { .. }
                | CardSpecial::EnergyScaling { .. }
                | CardSpecial::LastCardBonus { .. }
        )
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ether_battle::cards::{CardCategory, CardDefinition, CardId, CardTrait};
///
/// let smash = CardDefinition::new(CardId::new(1), "Smash", CardCategory::Attack)
///     .with_damage(10)
///     .with_speed(4)
///     .with_trait(CardTrait::Crush);
///
/// assert!(smash.is_attack());
/// assert!(smash.has_trait(CardTrait::Crush));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub category: CardCategory,

    /// Base damage per hit.
    pub damage: i64,

    /// Block gained by the actor.
    pub block: i64,

    /// Number of hits (at least 1 for attacks).
    pub hits: u32,

    /// Timeline distance this card occupies.
    pub speed: i64,

    /// Energy spent to play the card.
    pub action_cost: i64,

    /// Ether points scored when the card resolves.
    pub ether: i64,

    pub traits: SmallVec<[CardTrait; 4]>,

    pub specials: SmallVec<[CardSpecial; 2]>,

    /// Deltas merged into the actor's next-turn effects when played.
    pub next_turn: Option<NextTurnEffects>,
}

impl CardDefinition {
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, category: CardCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            damage: 0,
            block: 0,
            hits: 1,
            speed: 1,
            action_cost: 1,
            ether: 0,
            traits: SmallVec::new(),
            specials: SmallVec::new(),
            next_turn: None,
        }
    }

    #[must_use]
    pub fn with_damage(mut self, damage: i64) -> Self {
        self.damage = damage.max(0);
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: i64) -> Self {
        self.block = block.max(0);
        self
    }

    #[must_use]
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = hits.max(1);
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: i64) -> Self {
        self.speed = speed.max(0);
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i64) -> Self {
        self.action_cost = cost.max(0);
        self
    }

    #[must_use]
    pub fn with_ether(mut self, ether: i64) -> Self {
        self.ether = ether.max(0);
        self
    }

    #[must_use]
    pub fn with_trait(mut self, card_trait: CardTrait) -> Self {
        if !self.traits.contains(&card_trait) {
            self.traits.push(card_trait);
        }
        self
    }

    #[must_use]
    pub fn with_special(mut self, special: CardSpecial) -> Self {
        self.specials.push(special);
        self
    }

    #[must_use]
    pub fn with_next_turn(mut self, effects: NextTurnEffects) -> Self {
        self.next_turn = Some(effects);
        self
    }

    #[must_use]
    pub fn has_trait(&self, card_trait: CardTrait) -> bool {
        self.traits.contains(&card_trait)
    }

    #[must_use]
    pub fn is_attack(&self) -> bool {
        self.damage > 0
    }

    pub fn pre_attack_specials(&self) -> impl Iterator<Item = &CardSpecial> {
        self.specials.iter().filter(|s| s.is_pre_attack())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_builder_defaults_and_clamps() {
        let card = CardDefinition::new(CardId::new(1), "Jab", CardCategory::Attack)
            .with_damage(-3)
            .with_hits(0);

        assert_eq!(card.damage, 0);
        assert_eq!(card.hits, 1);
        assert_eq!(card.speed, 1);
        assert!(!card.is_attack());
    }

    #[test]
    fn test_traits_deduplicate() {
        let card = CardDefinition::new(CardId::new(1), "Drift", CardCategory::Skill)
            .with_trait(CardTrait::Leisure)
            .with_trait(CardTrait::Leisure);

        assert_eq!(card.traits.len(), 1);
        assert!(card.has_trait(CardTrait::Leisure));
        assert!(!card.has_trait(CardTrait::Strain));
    }

    #[test]
    fn test_pre_attack_filter() {
        let card = CardDefinition::new(CardId::new(2), "Gamble", CardCategory::Attack)
            .with_special(CardSpecial::RandomBonus { max: 5 })
            .with_special(CardSpecial::Heal(3));

        let pre: Vec<_> = card.pre_attack_specials().collect();
        assert_eq!(pre, vec![&CardSpecial::RandomBonus { max: 5 }]);
    }

    #[test]
    fn test_card_definition_serialization() {
        let card = CardDefinition::new(CardId::new(1), "Test", CardCategory::Gun)
            .with_damage(6)
            .with_trait(CardTrait::IgnoreBlock);

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: CardDefinition = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }
}
