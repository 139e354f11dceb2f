//! The player's deck, discard pile and hand.

use im::{HashSet, Vector};
use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, CardId, CardTrait};
use crate::core::GameRng;

/// How a card got into the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardOrigin {
    /// Drawn from the deck.
    Deck,
    /// Created by an effect; it leaves the battle when played.
    Generated,
}

/// A card instance in hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandCard {
    pub card_id: CardId,
    pub uid: u64,
    pub origin: CardOrigin,
}

/// Result of a draw.
#[derive(Clone, Debug, PartialEq)]
pub struct Draw {
    pub piles: CardPiles,
    pub drawn: Vec<CardId>,
    /// Size of the discard pile shuffled back in, if a reshuffle happened.
    pub reshuffled: Option<usize>,
}

/// Card collections owned by the player side.
///
/// `banned` cards never return; `vanished` cards left this battle;
/// `escaped` cards are out until the end of the turn. Draws skip all three.
/// Cards committed to the timeline wait in `in_play` until they resolve.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPiles {
    pub deck: Vector<CardId>,
    pub discard: Vector<CardId>,
    pub hand: Vector<HandCard>,
    pub in_play: Vector<HandCard>,
    pub banned: HashSet<CardId>,
    pub escaped: HashSet<CardId>,
    pub vanished: HashSet<CardId>,
    next_uid: u64,
}

impl CardPiles {
    #[must_use]
    pub fn new(deck: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            deck: deck.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_banned(mut self, cards: impl IntoIterator<Item = CardId>) -> Self {
        self.banned.extend(cards);
        self
    }

    /// Whether draws must skip `card`.
    #[must_use]
    pub fn is_excluded(&self, card: CardId) -> bool {
        self.banned.contains(&card) || self.escaped.contains(&card) || self.vanished.contains(&card)
    }

    #[must_use]
    pub fn hand_contains(&self, card: CardId) -> bool {
        self.hand.iter().any(|c| c.card_id == card)
    }

    pub fn hand_ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.hand.iter().map(|c| c.card_id)
    }

    /// Add a card to hand.
    #[must_use]
    pub fn with_card_in_hand(&self, card: CardId, origin: CardOrigin) -> Self {
        let mut next = self.clone();
        next.hand.push_back(HandCard {
            card_id: card,
            uid: next.next_uid,
            origin,
        });
        next.next_uid += 1;
        next
    }

    /// Move the first copy of `card` from the hand to `in_play`.
    #[must_use]
    pub fn play_from_hand(&self, card: CardId) -> Option<Self> {
        let index = self.hand.iter().position(|c| c.card_id == card)?;
        let mut next = self.clone();
        let taken = next.hand.remove(index);
        next.in_play.push_back(taken);
        Some(next)
    }

    /// Route a resolved card out of `in_play`. A card that was never
    /// committed from the hand is routed as a deck card.
    #[must_use]
    pub fn resolve_played(&self, card: &CardDefinition) -> Self {
        let mut next = self.clone();
        let origin = match next.in_play.iter().position(|c| c.card_id == card.id) {
            Some(index) => next.in_play.remove(index).origin,
            None => CardOrigin::Deck,
        };
        next.after_play(card, origin)
    }

    /// Draw up to `count` cards into the hand.
    ///
    /// When the deck runs dry the discard pile is shuffled in once.
    /// Excluded cards are passed over and stay on top of the deck.
    #[must_use]
    pub fn draw(&self, count: usize, rng: &mut GameRng) -> Draw {
        let mut next = self.clone();
        let mut drawn = Vec::with_capacity(count);
        let mut skipped = Vector::new();
        let mut reshuffled = None;

        while drawn.len() < count {
            match next.deck.pop_front() {
                Some(card) if next.is_excluded(card) => skipped.push_back(card),
                Some(card) => {
                    next = next.with_card_in_hand(card, CardOrigin::Deck);
                    drawn.push(card);
                }
                None if reshuffled.is_none() && !next.discard.is_empty() => {
                    reshuffled = Some(next.discard.len());
                    next.deck = rng.shuffled(&next.discard);
                    next.discard = Vector::new();
                }
                None => break,
            }
        }

        skipped.append(next.deck);
        next.deck = skipped;

        Draw {
            piles: next,
            drawn,
            reshuffled,
        }
    }

    /// Route a played card. Vanish removes it from the battle, escape
    /// discards it but keeps it out of draws this turn, generated cards
    /// disappear.
    #[must_use]
    pub fn after_play(&self, card: &CardDefinition, origin: CardOrigin) -> Self {
        let mut next = self.clone();
        if card.has_trait(CardTrait::Vanish) {
            next.vanished.insert(card.id);
            return next;
        }
        if origin == CardOrigin::Generated {
            return next;
        }
        if card.has_trait(CardTrait::Escape) {
            next.escaped.insert(card.id);
        }
        next.discard.push_back(card.id);
        next
    }

    /// Move the hand and unresolved cards to the discard pile and lift
    /// turn-long exclusions.
    #[must_use]
    pub fn end_turn(&self) -> Self {
        let mut next = self.clone();
        for card in self.hand.iter().chain(self.in_play.iter()) {
            if card.origin == CardOrigin::Deck {
                next.discard.push_back(card.card_id);
            }
        }
        next.hand = Vector::new();
        next.in_play = Vector::new();
        next.escaped = HashSet::new();
        next
    }
}
