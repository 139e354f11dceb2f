//! Read-only rule tables shared by the hit resolver and the executor.

use crate::cards::{CardDefinition, CardRegistry};
use crate::core::{Combatant, EngineConfig, Side};
use crate::effects::{AbilityId, EffectContext, EffectRegistry, EffectResult, TimingEvent};

use super::event::BattleEvent;

/// Everything resolution reads but never changes.
///
/// Abilities belong to the player; enemy actions never fire the registry
/// on their own behalf.
#[derive(Clone, Copy, Debug)]
pub struct Rules<'a> {
    pub config: &'a EngineConfig,
    pub cards: &'a CardRegistry,
    pub effects: &'a EffectRegistry,
    pub abilities: &'a [AbilityId],
}

impl<'a> Rules<'a> {
    #[must_use]
    pub fn new(
        config: &'a EngineConfig,
        cards: &'a CardRegistry,
        effects: &'a EffectRegistry,
        abilities: &'a [AbilityId],
    ) -> Self {
        Self {
            config,
            cards,
            effects,
            abilities,
        }
    }

    /// Run the player's abilities for one event.
    #[must_use]
    pub fn fire(&self, ctx: &EffectContext) -> EffectResult {
        self.effects.execute(ctx.event, self.abilities, ctx)
    }

    /// Fire `event` from the point of view of `side`, where `own` is that
    /// side's combatant and `other` its opponent.
    #[must_use]
    pub fn fire_for(
        &self,
        event: TimingEvent,
        side: Side,
        own: &Combatant,
        other: &Combatant,
        card: Option<&CardDefinition>,
        damage: i64,
    ) -> EffectResult {
        let (player, enemy) = match side {
            Side::Player => (own, other),
            Side::Enemy => (other, own),
        };
        let mut ctx = EffectContext::new(event, player, enemy)
            .with_side(side)
            .with_damage(damage);
        if let Some(card) = card {
            ctx = ctx.with_card(card);
        }
        self.fire(&ctx)
    }
}

/// Apply the combatant-facing part of an ability result.
///
/// Block, heal, strength and ether land on `entity`; damage and discount
/// fields are read by whoever fired the event.
#[must_use]
pub fn apply_effect_result(
    entity: &Combatant,
    result: &EffectResult,
    side: Side,
    events: &mut Vec<BattleEvent>,
) -> Combatant {
    let mut next = entity.clone();

    if result.block_bonus > 0 {
        next = next.gain_block(result.block_bonus);
        events.push(BattleEvent::BlockGained { side, amount: result.block_bonus });
    }
    if result.heal > 0 {
        let (healed, amount) = next.heal(result.heal);
        next = healed;
        if amount > 0 {
            events.push(BattleEvent::Healed { side, amount });
        }
    }
    if result.strength != 0 {
        next = next.gain_strength(result.strength);
        events.push(BattleEvent::StrengthGained { side, amount: result.strength });
    }
    if result.ether_gain > 0 {
        next = next.gain_ether(result.ether_gain);
        events.push(BattleEvent::EtherGained {
            side,
            amount: result.ether_gain,
            total: next.ether_pts,
        });
    }

    next
}
