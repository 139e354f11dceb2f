//! Core battle types: sides, combatants, phases, RNG, configuration, errors.
//!
//! Everything here is a plain value. The engine threads these values through
//! pure functions and never keeps ambient state of its own.

pub mod side;
pub mod combatant;
pub mod phase;
pub mod rng;
pub mod config;
pub mod error;

pub use side::{Side, Sides};
pub use combatant::{Combatant, EnemyUnit};
pub use phase::{BattleOutcome, BattlePhase, EtherPhase, OutcomeKind};
pub use rng::{GameRng, GameRngState};
pub use config::{ComboMultipliers, EngineConfig};
pub use error::{BattleError, Result};
