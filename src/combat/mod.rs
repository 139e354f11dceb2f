//! Hit resolution and the battle event log.
//!
//! - `resolve_hit`: one hit of a card against a defender
//! - `Rules`: read-only tables (config, cards, abilities) resolution consults
//! - `BattleEvent`: typed record of everything that happened, for the
//!   presentation layer and the textual log

mod event;
mod hit;
mod rules;

pub use event::{BattleEvent, SkipReason};
pub use hit::{prepare_attack, resolve_hit, HitContext, HitOutcome, PreparedAttack};
pub use rules::{apply_effect_result, Rules};
