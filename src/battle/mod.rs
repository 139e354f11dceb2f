//! Battle driver: setup, snapshot and the per-turn phase machine.
//!
//! ## Usage
//!
//! ```
//! use ether_battle::battle::{Battle, BattleSetup};
//! use ether_battle::cards::{CardCategory, CardDefinition, CardId};
//! use ether_battle::core::{BattlePhase, Combatant};
//!
//! let slash = CardDefinition::new(CardId::new(1), "Slash", CardCategory::Attack).with_damage(6);
//! let setup = BattleSetup::new(Combatant::new(50), Combatant::new(20))
//!     .with_cards([slash])
//!     .with_deck([CardId::new(1); 10])
//!     .with_seed(3);
//!
//! let (battle, state, _) = Battle::start(setup).unwrap();
//! let state = battle.select(&state, &[CardId::new(1), CardId::new(1)]).unwrap();
//! let state = battle.respond(&state, &[]).unwrap();
//! let report = battle.resolve(&state).unwrap();
//!
//! assert_eq!(report.state.enemy().hp, 8);
//! assert_eq!(report.state.phase, BattlePhase::Select);
//! ```

mod driver;
mod insight;
mod setup;
mod state;

pub use driver::{Battle, TurnReport};
pub use insight::{reveal, reveal_count, InsightView, RevealedAction, MAX_INSIGHT, MIN_INSIGHT};
pub use setup::BattleSetup;
pub use state::BattleState;
