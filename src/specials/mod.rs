//! Card-play specials.
//!
//! Cards carry declarative `NextTurnEffects`. When a card resolves, the
//! processor merges them into the actor's accumulated record and turns the
//! one-shot parts into concrete edits of the queue and card piles:
//!
//! - bonus cards become ghost entries after the current action
//! - emergency draw moves cards from the deck into the hand
//! - add-to-hand creates generated copies
//! - repeat-my-timeline duplicates the actor's unresolved entries
//!
//! The deferred parts (energy, block, draw, critical) are applied by the
//! battle driver at the next turn start.

mod next_turn;
mod piles;
mod processor;

pub use next_turn::NextTurnEffects;
pub use piles::{CardOrigin, CardPiles, Draw, HandCard};
pub use processor::{
    process_add_card_to_hand, process_all_next_turn_effects, process_bonus_cards,
    process_emergency_draw, process_repeat_my_timeline, SpecialsDiff, SpecialsInput,
};
