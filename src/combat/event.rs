//! Typed battle events.
//!
//! The engine never drives presentation directly. Every observable change
//! is reported as a `BattleEvent`; the presentation layer animates them and
//! the `Display` impl produces the textual battle log.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::Side;
use crate::timeline::ComboKind;
use crate::tokens::TokenId;

/// Why a queued action did not execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The enemy was already defeated in this pass.
    EnemyDefeated,
    /// The card id is not in the registry.
    UnknownCard,
}

/// Something that happened during resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    TurnStarted { turn: u32 },
    TurnEnded { turn: u32 },

    CardResolved { actor: Side, card: CardId, ghost: bool },
    ActionSkipped { actor: Side, card: CardId, reason: SkipReason },

    PreAttackBonus { actor: Side, card: CardId, bonus: i64 },
    Attack { actor: Side, card: CardId, damage: i64, critical: bool },
    Missed { actor: Side, card: CardId },
    EvadeCounter { side: Side, damage: i64 },

    BlockAbsorbed { side: Side, absorbed: i64, remaining: i64 },
    BlockBroken { side: Side, absorbed: i64 },
    Damage { side: Side, amount: i64 },

    Counter { side: Side, damage: i64 },
    Reflect { side: Side, damage: i64 },
    CounterShot { side: Side, damage: i64 },
    Guard { side: Side, block: i64, push: i64 },

    BlockGained { side: Side, amount: i64 },
    Healed { side: Side, amount: i64 },
    StrengthGained { side: Side, amount: i64 },
    TokenGranted { side: Side, token: TokenId, stacks: u32 },
    TokenConsumed { side: Side, token: TokenId, stacks: u32 },
    TokenExpired { side: Side, token: TokenId },
    Burn { side: Side, damage: i64 },

    EtherGained { side: Side, amount: i64, total: i64 },
    EtherScored { side: Side, sum: i64, combo: ComboKind, multiplier: f64, total: i64 },

    UnitDefeated { index: usize },

    GhostInserted { actor: Side, card: CardId, sp: i64 },
    CardsDrawn { cards: Vec<CardId> },
    DeckReshuffled { size: usize },
    CardAddedToHand { card: CardId },
    TimelineRepeated { actor: Side, copies: usize },
    TimelinePushed { actor: Side, amount: i64 },

    EnemyDefeated,
    PlayerDefeated,
}

impl std::fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BattleEvent::*;

        match self {
            TurnStarted { turn } => write!(f, "--- Turn {} ---", turn),
            TurnEnded { turn } => write!(f, "Turn {} ends", turn),
            CardResolved { actor, card, ghost } => {
                let tag = if *ghost { " (ghost)" } else { "" };
                write!(f, "{} plays {}{}", actor, card, tag)
            }
            ActionSkipped { actor, card, reason } => {
                write!(f, "{}'s {} is skipped ({:?})", actor, card, reason)
            }
            PreAttackBonus { actor, card, bonus } => {
                write!(f, "{}'s {} gains +{} damage", actor, card, bonus)
            }
            Attack { actor, card, damage, critical } => {
                let crit = if *critical { " critical" } else { "" };
                write!(f, "{} attacks with {} for {}{}", actor, card, damage, crit)
            }
            Missed { actor, card } => write!(f, "{}'s {} misses", actor, card),
            EvadeCounter { side, damage } => write!(f, "{} counters the miss for {}", side, damage),
            BlockAbsorbed { side, absorbed, remaining } => {
                write!(f, "{} blocks {} ({} block left)", side, absorbed, remaining)
            }
            BlockBroken { side, absorbed } => write!(f, "{}'s block breaks after absorbing {}", side, absorbed),
            Damage { side, amount } => write!(f, "{} takes {} damage", side, amount),
            Counter { side, damage } => write!(f, "{} retaliates for {}", side, damage),
            Reflect { side, damage } => write!(f, "{} reflects {}", side, damage),
            CounterShot { side, damage } => write!(f, "{} fires a counter shot for {}", side, damage),
            Guard { side, block, push } => {
                write!(f, "{} guards: +{} block, attacker pushed {}", side, block, push)
            }
            BlockGained { side, amount } => write!(f, "{} gains {} block", side, amount),
            Healed { side, amount } => write!(f, "{} heals {}", side, amount),
            StrengthGained { side, amount } => write!(f, "{} gains {} strength", side, amount),
            TokenGranted { side, token, stacks } => write!(f, "{} gains {} x{}", side, token, stacks),
            TokenConsumed { side, token, stacks } => write!(f, "{} uses {} x{}", side, token, stacks),
            TokenExpired { side, token } => write!(f, "{}'s {} wears off", side, token),
            Burn { side, damage } => write!(f, "{} burns for {}", side, damage),
            EtherGained { side, amount, total } => write!(f, "{} gains {} ether ({})", side, amount, total),
            EtherScored { side, sum, combo, multiplier, total } => {
                write!(f, "{} scores {} ether ({} x{:.2} {:?})", side, total, sum, multiplier, combo)
            }
            UnitDefeated { index } => write!(f, "Enemy unit {} falls", index),
            GhostInserted { actor, card, sp } => write!(f, "{} gains ghost {} at sp {}", actor, card, sp),
            CardsDrawn { cards } => write!(f, "Drew {} card(s)", cards.len()),
            DeckReshuffled { size } => write!(f, "Discard shuffled into deck ({} cards)", size),
            CardAddedToHand { card } => write!(f, "{} added to hand", card),
            TimelineRepeated { actor, copies } => write!(f, "{} repeats {} action(s)", actor, copies),
            TimelinePushed { actor, amount } => write!(f, "{}'s timeline pushed back {}", actor, amount),
            EnemyDefeated => write!(f, "Enemy defeated"),
            PlayerDefeated => write!(f, "Player defeated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let event = BattleEvent::Attack {
            actor: Side::Player,
            card: CardId::new(3),
            damage: 12,
            critical: true,
        };
        assert_eq!(event.to_string(), "Player attacks with Card(3) for 12 critical");
        assert_eq!(BattleEvent::Damage { side: Side::Enemy, amount: 4 }.to_string(), "Enemy takes 4 damage");
    }

    #[test]
    fn test_event_serialization() {
        let event = BattleEvent::TokenGranted { side: Side::Enemy, token: TokenId::Burn, stacks: 2 };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: BattleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
