//! Deferred card effects.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// Effect deltas a played card carries.
///
/// Numeric fields add, flags OR and card lists concatenate when merged.
/// `bonus_energy`, `bonus_block`, `extra_draw` and `guaranteed_crit` wait
/// for the next turn start; the other fields are one-shot and are
/// dispatched as soon as the card resolves.
///
/// ```
/// use ether_battle::specials::NextTurnEffects;
///
/// let a = NextTurnEffects::new().with_bonus_energy(1).with_repeat_my_timeline();
/// let b = NextTurnEffects::new().with_bonus_energy(2).with_bonus_block(4);
///
/// let merged = a.merged(&b);
/// assert_eq!(merged.bonus_energy, 3);
/// assert_eq!(merged.bonus_block, 4);
/// assert!(merged.repeat_my_timeline);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextTurnEffects {
    pub bonus_energy: i64,
    pub bonus_block: i64,
    pub extra_draw: u32,

    /// First attack next turn is critical.
    pub guaranteed_crit: bool,

    // === One-shot ===
    /// Cards drawn immediately.
    pub emergency_draw: u32,
    /// Inserted as ghost actions right after the playing card.
    pub bonus_cards: Vec<CardId>,
    /// Copies added to hand.
    pub add_to_hand: Vec<CardId>,
    /// Duplicate the actor's unresolved actions at the end of the queue.
    pub repeat_my_timeline: bool,
}

impl NextTurnEffects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bonus_energy(mut self, amount: i64) -> Self {
        self.bonus_energy += amount;
        self
    }

    #[must_use]
    pub fn with_bonus_block(mut self, amount: i64) -> Self {
        self.bonus_block += amount;
        self
    }

    #[must_use]
    pub fn with_extra_draw(mut self, count: u32) -> Self {
        self.extra_draw += count;
        self
    }

    #[must_use]
    pub fn with_guaranteed_crit(mut self) -> Self {
        self.guaranteed_crit = true;
        self
    }

    #[must_use]
    pub fn with_emergency_draw(mut self, count: u32) -> Self {
        self.emergency_draw += count;
        self
    }

    #[must_use]
    pub fn with_bonus_card(mut self, card: CardId) -> Self {
        self.bonus_cards.push(card);
        self
    }

    #[must_use]
    pub fn with_card_to_hand(mut self, card: CardId) -> Self {
        self.add_to_hand.push(card);
        self
    }

    #[must_use]
    pub fn with_repeat_my_timeline(mut self) -> Self {
        self.repeat_my_timeline = true;
        self
    }

    /// Field-wise merge.
    #[must_use]
    pub fn merged(&self, other: &NextTurnEffects) -> Self {
        let mut bonus_cards = self.bonus_cards.clone();
        bonus_cards.extend_from_slice(&other.bonus_cards);
        let mut add_to_hand = self.add_to_hand.clone();
        add_to_hand.extend_from_slice(&other.add_to_hand);

        Self {
            bonus_energy: self.bonus_energy + other.bonus_energy,
            bonus_block: self.bonus_block + other.bonus_block,
            extra_draw: self.extra_draw + other.extra_draw,
            guaranteed_crit: self.guaranteed_crit || other.guaranteed_crit,
            emergency_draw: self.emergency_draw + other.emergency_draw,
            bonus_cards,
            add_to_hand,
            repeat_my_timeline: self.repeat_my_timeline || other.repeat_my_timeline,
        }
    }

    /// Copy with every one-shot field cleared.
    #[must_use]
    pub fn without_one_shots(&self) -> Self {
        Self {
            emergency_draw: 0,
            bonus_cards: Vec::new(),
            add_to_hand: Vec::new(),
            repeat_my_timeline: false,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn has_one_shots(&self) -> bool {
        self.emergency_draw > 0
            || !self.bonus_cards.is_empty()
            || !self.add_to_hand.is_empty()
            || self.repeat_my_timeline
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_concatenates_cards() {
        let a = NextTurnEffects::new().with_bonus_card(CardId::new(1));
        let b = NextTurnEffects::new().with_bonus_card(CardId::new(2)).with_extra_draw(1);

        let merged = a.merged(&b);
        assert_eq!(merged.bonus_cards, vec![CardId::new(1), CardId::new(2)]);
        assert_eq!(merged.extra_draw, 1);
    }

    #[test]
    fn test_flags_or() {
        let a = NextTurnEffects::new().with_guaranteed_crit();
        let merged = a.merged(&NextTurnEffects::new());
        assert!(merged.guaranteed_crit);
        assert!(!merged.repeat_my_timeline);
    }

    #[test]
    fn test_without_one_shots_keeps_deferred() {
        let effects = NextTurnEffects::new()
            .with_bonus_energy(2)
            .with_emergency_draw(1)
            .with_card_to_hand(CardId::new(4))
            .with_repeat_my_timeline();

        assert!(effects.has_one_shots());
        let kept = effects.without_one_shots();
        assert!(!kept.has_one_shots());
        assert_eq!(kept.bonus_energy, 2);
    }

    #[test]
    fn test_partial_json() {
        let effects: NextTurnEffects = serde_json::from_str(r#"{"bonus_block": 3}"#).unwrap();
        assert_eq!(effects, NextTurnEffects::new().with_bonus_block(3));
    }
}
