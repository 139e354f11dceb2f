//! Token/status ledger.
//!
//! Tokens are stacking buffs and debuffs attached to a combatant. Each kind
//! has a lifecycle category:
//!
//! - **Usage**: consumed by the interaction that reads it (one dodge, one
//!   counter-shot)
//! - **Turn**: loses a stack at every turn boundary, removed at 0
//! - **Permanent**: stays until explicitly removed
//!
//! ## Example
//!
//! ```
//! use ether_battle::core::Combatant;
//! use ether_battle::tokens::{self, TokenCategory, TokenId};
//!
//! let hero = Combatant::new(40);
//! let hero = tokens::add_token(&hero, TokenId::Dodge, 2);
//! let hero = tokens::remove_token(&hero, TokenId::Dodge, TokenCategory::Usage, 1);
//!
//! assert_eq!(tokens::get_token_stacks(&hero, TokenId::Dodge), 1);
//! ```

mod ledger;
mod token;

pub use ledger::{
    active_effects, add_token, decrease_durations, get_token_stacks, grant_token, has_token,
    remove_token, ActiveEffect, TokenLedger,
};
pub use token::{BoundStat, Polarity, Token, TokenCategory, TokenEffect, TokenId};
