//! Card-play specials processor.
//!
//! Each `process_*` function is pure: it receives the current snapshot
//! pieces and returns only what changed (`None` when nothing did). The
//! executor swaps changed pieces into its state wholesale.

use tracing::{debug, warn};

use super::next_turn::NextTurnEffects;
use super::piles::{CardOrigin, CardPiles};
use crate::cards::{CardId, CardRegistry};
use crate::combat::BattleEvent;
use crate::core::{GameRng, Side};
use crate::timeline::Timeline;

/// Snapshot pieces a card's specials may edit.
#[derive(Clone, Copy, Debug)]
pub struct SpecialsInput<'a> {
    pub timeline: &'a Timeline,
    /// Index of the entry being resolved.
    pub index: usize,
    pub actor: Side,
    pub piles: &'a CardPiles,
    pub cards: &'a CardRegistry,
}

/// Changes produced by `process_all_next_turn_effects`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpecialsDiff {
    pub timeline: Option<Timeline>,
    pub piles: Option<CardPiles>,
    /// Accumulated deferred effects with one-shots cleared.
    pub next_turn: NextTurnEffects,
    pub events: Vec<BattleEvent>,
}

/// Insert `bonus` as ghost entries right after `index`.
///
/// Ghosts are spaced by their own speeds starting at the current entry.
#[must_use]
pub fn process_bonus_cards(
    timeline: &Timeline,
    index: usize,
    actor: Side,
    bonus: &[CardId],
    cards: &CardRegistry,
) -> Option<(Timeline, Vec<BattleEvent>)> {
    let mut sp = timeline.get(index)?.sp;
    let mut ghosts = Vec::with_capacity(bonus.len());
    for &card_id in bonus {
        let Some(card) = cards.get(card_id) else {
            warn!(card = %card_id, "unknown bonus card, skipping");
            continue;
        };
        sp += card.speed;
        ghosts.push((actor, card_id, sp));
    }
    if ghosts.is_empty() {
        return None;
    }

    let (next, inserted) = timeline.insert_ghosts_after(index, ghosts);
    let events = inserted
        .iter()
        .map(|e| BattleEvent::GhostInserted {
            actor: e.actor,
            card: e.card_id,
            sp: e.sp,
        })
        .collect();
    Some((next, events))
}

/// Draw `count` cards straight into the hand.
#[must_use]
pub fn process_emergency_draw(
    piles: &CardPiles,
    count: u32,
    rng: &mut GameRng,
) -> Option<(CardPiles, Vec<BattleEvent>)> {
    if count == 0 {
        return None;
    }
    let draw = piles.draw(count as usize, rng);

    let mut events = Vec::new();
    if let Some(size) = draw.reshuffled {
        events.push(BattleEvent::DeckReshuffled { size });
    }
    if draw.drawn.is_empty() && draw.reshuffled.is_none() {
        return None;
    }
    events.push(BattleEvent::CardsDrawn { cards: draw.drawn });
    Some((draw.piles, events))
}

/// Append generated copies of registered cards to the hand.
#[must_use]
pub fn process_add_card_to_hand(
    piles: &CardPiles,
    added: &[CardId],
    cards: &CardRegistry,
) -> Option<(CardPiles, Vec<BattleEvent>)> {
    let mut next = piles.clone();
    let mut events = Vec::new();
    for &card in added {
        if !cards.contains(card) {
            warn!(card = %card, "unknown card for hand, skipping");
            continue;
        }
        next = next.with_card_in_hand(card, CardOrigin::Generated);
        events.push(BattleEvent::CardAddedToHand { card });
    }
    (!events.is_empty()).then_some((next, events))
}

/// Duplicate the actor's unresolved entries at the end of the queue.
#[must_use]
pub fn process_repeat_my_timeline(
    timeline: &Timeline,
    index: usize,
    actor: Side,
) -> Option<(Timeline, Vec<BattleEvent>)> {
    let (next, copies) = timeline.repeat_remaining(actor, index);
    if copies.is_empty() {
        return None;
    }
    Some((
        next,
        vec![BattleEvent::TimelineRepeated {
            actor,
            copies: copies.len(),
        }],
    ))
}

/// Merge a card's deltas into the actor's deferred effects and dispatch
/// the one-shot parts.
///
/// The timeline is repeated before bonus cards are inserted, so bonus
/// ghosts run once. Hand and draw effects only apply to the player.
#[must_use]
pub fn process_all_next_turn_effects(
    accumulated: &NextTurnEffects,
    delta: &NextTurnEffects,
    input: SpecialsInput,
    rng: &mut GameRng,
) -> SpecialsDiff {
    let merged = accumulated.merged(delta);
    let mut diff = SpecialsDiff {
        next_turn: merged.without_one_shots(),
        ..SpecialsDiff::default()
    };
    if !merged.has_one_shots() {
        return diff;
    }

    let mut timeline = input.timeline.clone();
    if merged.repeat_my_timeline {
        if let Some((next, events)) = process_repeat_my_timeline(&timeline, input.index, input.actor) {
            timeline = next;
            diff.timeline = Some(timeline.clone());
            diff.events.extend(events);
        }
    }
    if let Some((next, events)) =
        process_bonus_cards(&timeline, input.index, input.actor, &merged.bonus_cards, input.cards)
    {
        diff.timeline = Some(next);
        diff.events.extend(events);
    }

    if input.actor.is_player() {
        let mut piles = input.piles.clone();
        if let Some((next, events)) = process_emergency_draw(&piles, merged.emergency_draw, rng) {
            piles = next;
            diff.piles = Some(piles.clone());
            diff.events.extend(events);
        }
        if let Some((next, events)) = process_add_card_to_hand(&piles, &merged.add_to_hand, input.cards) {
            diff.piles = Some(next);
            diff.events.extend(events);
        }
    } else if merged.emergency_draw > 0 || !merged.add_to_hand.is_empty() {
        debug!("enemy has no hand, dropping draw effects");
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCategory, CardDefinition};

    fn cards() -> CardRegistry {
        CardRegistry::from_cards([
            CardDefinition::new(CardId::new(1), "Jab", CardCategory::Attack).with_speed(2),
            CardDefinition::new(CardId::new(2), "Echo", CardCategory::Skill).with_speed(1),
        ])
    }

    fn timeline() -> Timeline {
        Timeline::from_plans(&[CardId::new(1), CardId::new(1)], &[CardId::new(1)], &cards())
    }

    #[test]
    fn test_bonus_cards_follow_current_entry() {
        let (next, events) = process_bonus_cards(&timeline(), 0, Side::Player, &[CardId::new(2)], &cards()).unwrap();

        // P2 E2 G3 P4
        assert_eq!(next.len(), 4);
        assert_eq!(events.len(), 1);
        assert!(next.is_ordered());
        let ghost = next.iter().find(|e| e.is_ghost).unwrap();
        assert_eq!(ghost.sp, 3);
    }

    #[test]
    fn test_bonus_cards_skip_unknown() {
        assert!(process_bonus_cards(&timeline(), 0, Side::Player, &[CardId::new(77)], &cards()).is_none());
    }

    #[test]
    fn test_emergency_draw_zero_is_none() {
        let piles = CardPiles::new([CardId::new(1)]);
        assert!(process_emergency_draw(&piles, 0, &mut GameRng::new(1)).is_none());
    }

    #[test]
    fn test_add_card_to_hand() {
        let (piles, events) =
            process_add_card_to_hand(&CardPiles::default(), &[CardId::new(2), CardId::new(50)], &cards()).unwrap();

        assert_eq!(piles.hand.len(), 1);
        assert_eq!(piles.hand[0].origin, CardOrigin::Generated);
        assert_eq!(events, vec![BattleEvent::CardAddedToHand { card: CardId::new(2) }]);
    }

    #[test]
    fn test_aggregator_clears_one_shots() {
        let timeline = timeline();
        let piles = CardPiles::new([CardId::new(1), CardId::new(2)]);
        let cards = cards();
        let input = SpecialsInput {
            timeline: &timeline,
            index: 0,
            actor: Side::Player,
            piles: &piles,
            cards: &cards,
        };
        let delta = NextTurnEffects::new()
            .with_bonus_energy(1)
            .with_emergency_draw(1)
            .with_repeat_my_timeline()
            .with_bonus_card(CardId::new(2));

        let diff = process_all_next_turn_effects(&NextTurnEffects::new(), &delta, input, &mut GameRng::new(3));

        assert_eq!(diff.next_turn, NextTurnEffects::new().with_bonus_energy(1));
        let next_timeline = diff.timeline.unwrap();
        // 3 scheduled + 1 repeated + 1 bonus ghost
        assert_eq!(next_timeline.len(), 5);
        assert_eq!(next_timeline.iter().filter(|e| e.is_ghost).count(), 2);
        assert_eq!(diff.piles.unwrap().hand.len(), 1);
    }

    #[test]
    fn test_enemy_skips_hand_effects() {
        let timeline = timeline();
        let piles = CardPiles::new([CardId::new(1)]);
        let cards = cards();
        let input = SpecialsInput {
            timeline: &timeline,
            index: 1,
            actor: Side::Enemy,
            piles: &piles,
            cards: &cards,
        };
        let delta = NextTurnEffects::new().with_emergency_draw(2);

        let diff = process_all_next_turn_effects(&NextTurnEffects::new(), &delta, input, &mut GameRng::new(3));

        assert!(diff.piles.is_none());
        assert!(diff.timeline.is_none());
        assert!(diff.next_turn.is_empty());
    }
}
