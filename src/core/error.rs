//! Errors raised at the battle driver boundary.
//!
//! The resolution core never fails: missing lookups degrade to no-ops and
//! numbers are clamped where they are computed. `BattleError` only covers
//! caller mistakes at the outer API (bad setup, wrong phase, illegal
//! reorder) and snapshot encoding.

use thiserror::Error;

use super::phase::BattlePhase;
use crate::cards::CardId;
use crate::timeline::EntryUid;

/// Errors returned by the battle driver.
#[derive(Debug, Error)]
pub enum BattleError {
    #[error("invalid battle setup: {0}")]
    InvalidSetup(String),

    #[error("card {0} is not registered")]
    UnknownCard(CardId),

    #[error("card {0} is not in hand")]
    CardNotInHand(CardId),

    #[error("plan costs {cost} energy but only {available} is available")]
    EnergyExceeded { cost: i64, available: i64 },

    #[error("operation requires phase {expected}, battle is in {actual}")]
    WrongPhase {
        expected: &'static str,
        actual: BattlePhase,
    },

    #[error("no queued entry with uid {0}")]
    UnknownEntry(EntryUid),

    #[error("entry {uid} cannot move to sp {requested}: legal range is {min}..={max}")]
    IllegalReorder {
        uid: EntryUid,
        requested: i64,
        min: i64,
        max: i64,
    },

    #[error("battle already ended")]
    BattleOver,

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),
}

/// Result alias for driver operations.
pub type Result<T> = std::result::Result<T, BattleError>;
