//! Battle phases and the terminal outcome.
//!
//! A turn moves through `select → respond → resolve → post`. `post` is only
//! reached when the battle ends; otherwise `resolve` loops back to `select`
//! for the next turn. `resolve` carries the ether sub-phase so observers can
//! show the scoring steps.

use serde::{Deserialize, Serialize};

/// Sub-phase of the ether scoring pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EtherPhase {
    #[default]
    Idle,
    Sum,
    Multiply,
    Deflation,
    Result,
}

impl EtherPhase {
    /// The following step, saturating at `Result`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            EtherPhase::Idle => EtherPhase::Sum,
            EtherPhase::Sum => EtherPhase::Multiply,
            EtherPhase::Multiply => EtherPhase::Deflation,
            EtherPhase::Deflation | EtherPhase::Result => EtherPhase::Result,
        }
    }
}

/// Final result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    Victory,
    Defeat,
}

/// Per-battle phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Player is choosing cards.
    #[default]
    Select,
    /// Player has committed; enemy plan is being revealed/attached.
    Respond,
    /// Timeline is being resolved.
    Resolve(EtherPhase),
    /// Battle is over.
    Post(OutcomeKind),
}

impl BattlePhase {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BattlePhase::Select => "select",
            BattlePhase::Respond => "respond",
            BattlePhase::Resolve(_) => "resolve",
            BattlePhase::Post(_) => "post",
        }
    }

    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, BattlePhase::Post(_))
    }
}

impl std::fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome object handed to the progression layer when a battle ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub kind: OutcomeKind,
    /// Number of turns played, including the final one.
    pub turns: u32,
    pub player_hp: i64,
    /// Ether scored by the player over the whole battle.
    pub player_ether: i64,
    pub enemy_ether: i64,
    /// Gold granted by abilities on battle end.
    pub gold: i64,
}

impl BattleOutcome {
    #[must_use]
    pub fn is_victory(&self) -> bool {
        self.kind == OutcomeKind::Victory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ether_phase_sequence() {
        let mut phase = EtherPhase::default();
        let mut seen = vec![phase];
        while phase != EtherPhase::Result {
            phase = phase.next();
            seen.push(phase);
        }

        assert_eq!(
            seen,
            vec![
                EtherPhase::Idle,
                EtherPhase::Sum,
                EtherPhase::Multiply,
                EtherPhase::Deflation,
                EtherPhase::Result,
            ]
        );
        assert_eq!(EtherPhase::Result.next(), EtherPhase::Result);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(BattlePhase::Select.to_string(), "select");
        assert_eq!(BattlePhase::Resolve(EtherPhase::Sum).to_string(), "resolve");
        assert!(BattlePhase::Post(OutcomeKind::Defeat).is_over());
        assert!(!BattlePhase::Respond.is_over());
    }
}
