//! # ether-battle
//!
//! Rules engine for a turn-based tactical card battler.
//!
//! Each turn both sides commit a plan of cards. The plans are merged into a
//! timeline ordered by speed, resolved action by action, and the ether each
//! side produced is scored through combo multipliers with deflation.
//!
//! ## Design Principles
//!
//! 1. **Pure snapshots**: Every operation takes a state value and returns a
//!    new one. Persistent collections from `im-rs` make the copies cheap,
//!    so previews and undo are just old snapshots.
//!
//! 2. **Closed vocabularies**: Tokens, timing events, ability handlers and
//!    card specials are enums. There is no string dispatch.
//!
//! 3. **Deterministic**: All randomness comes from the `GameRng` stored in
//!    the snapshot. Same seed and same inputs give the same battle.
//!
//! ## Modules
//!
//! - `core`: Sides, combatants, phases, RNG, configuration, errors
//! - `tokens`: Status token ledger (buffs, debuffs, their lifetimes)
//! - `cards`: Card definitions and the card registry
//! - `effects`: Ability registry fired at timing events
//! - `combat`: Single-hit resolution and the battle event log
//! - `specials`: Card piles and deferred next-turn effects
//! - `timeline`: Action queue, resolution pass and ether scoring
//! - `battle`: Setup, snapshot and the per-turn driver

pub mod core;
pub mod tokens;
pub mod cards;
pub mod effects;
pub mod combat;
pub mod specials;
pub mod timeline;
pub mod battle;

// Re-export commonly used types
pub use crate::core::{
    Side, Sides,
    Combatant, EnemyUnit,
    BattleOutcome, BattlePhase, EtherPhase, OutcomeKind,
    GameRng, GameRngState,
    ComboMultipliers, EngineConfig,
    BattleError, Result,
};

pub use crate::tokens::{TokenCategory, TokenId, TokenLedger};

pub use crate::cards::{CardCategory, CardDefinition, CardId, CardRegistry, CardSpecial, CardTrait};

pub use crate::effects::{
    AbilityCatalog, AbilityDefinition, AbilityId,
    EffectContext, EffectRegistry, EffectResult, Handler, TimingEvent,
};

pub use crate::combat::{BattleEvent, Rules};

pub use crate::specials::{CardPiles, NextTurnEffects};

pub use crate::timeline::{
    ComboKind, EntryUid, EtherCalculation,
    PassResult, PassState, QueueEntry, Timeline,
};

pub use crate::battle::{Battle, BattleSetup, BattleState, InsightView, TurnReport};
