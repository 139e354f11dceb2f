//! Insight: how much of the enemy's plan the player gets to see.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardRegistry};

/// Lowest insight level.
pub const MIN_INSIGHT: i32 = -3;
/// Highest insight level; reveals the whole plan.
pub const MAX_INSIGHT: i32 = 3;

/// One revealed enemy action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedAction {
    pub card_id: CardId,
    /// Scheduled speed value, shown from level 2.
    pub sp: Option<i64>,
}

/// What the player sees of the enemy's plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightView {
    /// Clamped level the view was derived from.
    pub level: i32,
    pub revealed: Vec<RevealedAction>,
    /// Actions that stay hidden.
    pub hidden: usize,
}

/// Number of actions revealed at `level`, out of `planned`.
#[must_use]
pub fn reveal_count(level: i32, planned: usize) -> usize {
    match level.clamp(MIN_INSIGHT, MAX_INSIGHT) {
        i32::MIN..=0 => 0,
        1 => planned.min(1),
        2 => planned.min(2),
        _ => planned,
    }
}

/// Derive the player's view of `plan` at `level`.
///
/// ```
/// use ether_battle::battle::reveal;
/// use ether_battle::cards::{CardCategory, CardDefinition, CardId, CardRegistry};
///
/// let cards = CardRegistry::from_cards([
///     CardDefinition::new(CardId::new(1), "Claw", CardCategory::Attack).with_speed(3),
/// ]);
/// let plan = [CardId::new(1), CardId::new(1), CardId::new(1)];
///
/// let view = reveal(2, &plan, &cards);
/// assert_eq!(view.revealed.len(), 2);
/// assert_eq!(view.revealed[1].sp, Some(6));
/// assert_eq!(view.hidden, 1);
///
/// assert!(reveal(-1, &plan, &cards).revealed.is_empty());
/// ```
#[must_use]
pub fn reveal(level: i32, plan: &[CardId], cards: &CardRegistry) -> InsightView {
    let level = level.clamp(MIN_INSIGHT, MAX_INSIGHT);
    let count = reveal_count(level, plan.len());
    let show_speed = level >= 2;

    let mut sp = 0;
    let revealed = plan
        .iter()
        .take(count)
        .map(|&card_id| {
            sp += cards.get(card_id).map_or(0, |c| c.speed);
            RevealedAction {
                card_id,
                sp: show_speed.then_some(sp),
            }
        })
        .collect();

    InsightView {
        level,
        revealed,
        hidden: plan.len() - count,
    }
}
