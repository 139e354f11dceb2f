//! Effect context and ability handlers.

use serde::{Deserialize, Serialize};

use super::result::EffectResult;
use super::timing::TimingEvent;
use crate::cards::{CardCategory, CardDefinition};
use crate::core::{Combatant, Side};

/// Read-only view of the battle handed to ability handlers.
#[derive(Clone, Copy, Debug)]
pub struct EffectContext<'a> {
    pub event: TimingEvent,
    /// Side the event happened to.
    pub side: Side,
    pub player: &'a Combatant,
    pub enemy: &'a Combatant,
    /// Card involved in the event, if any.
    pub card: Option<&'a CardDefinition>,
    /// Damage involved in the event (dealt, taken or incoming).
    pub damage: i64,
    pub turn: u32,
    /// Cards the owner's side has resolved this turn, including this one.
    pub cards_played: u32,
}

impl<'a> EffectContext<'a> {
    #[must_use]
    pub fn new(event: TimingEvent, player: &'a Combatant, enemy: &'a Combatant) -> Self {
        Self {
            event,
            side: Side::Player,
            player,
            enemy,
            card: None,
            damage: 0,
            turn: 1,
            cards_played: 0,
        }
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    #[must_use]
    pub fn with_card(mut self, card: &'a CardDefinition) -> Self {
        self.card = Some(card);
        self
    }

    #[must_use]
    pub fn with_damage(mut self, damage: i64) -> Self {
        self.damage = damage;
        self
    }

    #[must_use]
    pub fn with_turn(mut self, turn: u32) -> Self {
        self.turn = turn;
        self
    }

    #[must_use]
    pub fn with_cards_played(mut self, count: u32) -> Self {
        self.cards_played = count;
        self
    }

    /// The combatant on `side`.
    #[must_use]
    pub fn combatant(&self, side: Side) -> &'a Combatant {
        match side {
            Side::Player => self.player,
            Side::Enemy => self.enemy,
        }
    }
}

/// What an ability does when its timing event fires.
///
/// All variants except `AmplifyEther` are order-insensitive: they ignore
/// what other handlers produced and their results are summed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Handler {
    /// Always produce the same result.
    Flat(EffectResult),

    /// Result multiplied by the number of cards played this turn.
    PerCardPlayed(EffectResult),

    /// Fires while the event side's hp is at or below `percent` of max hp.
    WhenHpBelow { percent: i64, result: EffectResult },

    /// Fires when the event's card has the given category.
    ForCategory { category: CardCategory, result: EffectResult },

    /// Fires when the event's damage is at least `min`.
    DamageAtLeast { min: i64, result: EffectResult },

    /// Adds `percent`% of the ether produced by handlers that ran before it.
    ///
    /// Order-sensitive: only sees higher-priority handlers' output.
    AmplifyEther { percent: i64 },

    /// Game-specific handler.
    #[serde(skip)]
    Custom(fn(&EffectContext) -> EffectResult),
}

impl Handler {
    /// Whether the handler's output depends on earlier handlers.
    #[must_use]
    pub fn is_order_sensitive(&self) -> bool {
        matches!(self, Handler::AmplifyEther { .. })
    }

    /// Evaluate the handler. `so_far` is the sum of results from handlers
    /// that already ran for this event.
    #[must_use]
    pub fn apply(&self, ctx: &EffectContext, so_far: &EffectResult) -> EffectResult {
        match self {
            Handler::Flat(result) => *result,
            Handler::PerCardPlayed(result) => result.scaled(i64::from(ctx.cards_played)),
            Handler::WhenHpBelow { percent, result } => {
                let holder = ctx.combatant(ctx.side);
                if holder.max_hp > 0 && holder.hp * 100 <= holder.max_hp * percent {
                    *result
                } else {
                    EffectResult::default()
                }
            }
            Handler::ForCategory { category, result } => match ctx.card {
                Some(card) if card.category == *category => *result,
                _ => EffectResult::default(),
            },
            Handler::DamageAtLeast { min, result } => {
                if ctx.damage >= *min {
                    *result
                } else {
                    EffectResult::default()
                }
            }
            Handler::AmplifyEther { percent } => EffectResult::ether(so_far.ether_gain * percent / 100),
            Handler::Custom(f) => f(ctx),
        }
    }
}
