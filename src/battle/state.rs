//! Battle snapshot.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{BattleOutcome, BattlePhase, Combatant, Result, Sides};
use crate::timeline::{ComboHistory, PassState};

/// Complete state of one battle between driver calls.
///
/// Every driver operation takes a `&BattleState` and returns a new one.
/// The snapshot owns the RNG, so restoring bytes written by `to_bytes`
/// replays the remaining battle exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub phase: BattlePhase,
    /// Combatants, queue, piles and RNG.
    pub pass: PassState,
    pub player_plan: Vec<CardId>,
    pub enemy_plan: Vec<CardId>,
    pub combo_history: ComboHistory,
    /// Ether scored per side over the whole battle.
    pub ether_totals: Sides<i64>,
    pub insight: i32,
    pub outcome: Option<BattleOutcome>,
}

impl BattleState {
    #[must_use]
    pub fn new(pass: PassState, insight: i32) -> Self {
        Self {
            phase: BattlePhase::Select,
            pass,
            player_plan: Vec::new(),
            enemy_plan: Vec::new(),
            combo_history: ComboHistory::new(),
            ether_totals: Sides::with_value(0),
            insight,
            outcome: None,
        }
    }

    #[must_use]
    pub fn player(&self) -> &Combatant {
        &self.pass.combatants.player
    }

    #[must_use]
    pub fn enemy(&self) -> &Combatant {
        &self.pass.combatants.enemy
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.pass.turn
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    /// Encode the snapshot with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a snapshot written by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
