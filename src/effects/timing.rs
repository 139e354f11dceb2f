//! Timing events.
//!
//! A timing event is a named point in the battle lifecycle at which
//! registered ability handlers may fire. The set is closed: adding an event
//! is a compile-visible change to every exhaustive match.

use serde::{Deserialize, Serialize};

/// Points in the battle lifecycle where abilities can react.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimingEvent {
    BattleStart,
    TurnStart,
    /// A card of the ability owner's side resolved.
    CardPlayed,
    /// The owner is about to attack; `damage_bonus` is read.
    BeforeAttack,
    /// The owner is about to take hp damage; `damage_reduction` is read.
    BeforeDamageTaken,
    /// The owner lost hp.
    DamageTaken,
    /// An attack against the owner missed.
    AttackMissed,
    /// The opponent was defeated (fires once per battle).
    EnemyDefeated,
    TurnEnd,
    BattleEnd,
}

impl std::fmt::Display for TimingEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
