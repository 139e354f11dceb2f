//! Hit resolution.
//!
//! `resolve_hit` computes the full outcome of one hit of a card against a
//! defender. It is a pure function of its inputs plus the RNG stream, so a
//! preview run on a cloned snapshot rolls exactly what the real run rolls.
//!
//! ## Pipeline
//!
//! 1. Pre-attack specials (skipped when a cached [`PreparedAttack`] is given)
//! 2. Attacker token modifiers (sharpen, weak, overdrive, focus)
//! 3. Base + category bonuses + strength, then overdrive, then critical
//! 4. Crush (block comparison only)
//! 5. Dodge; a successful dodge ends the hit
//! 6. Block
//! 7. Vulnerability, then hp loss
//! 8. Retaliation (counter, reflect, counter-shot) and guard

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::event::BattleEvent;
use super::rules::{apply_effect_result, Rules};
use crate::cards::{CardCategory, CardDefinition, CardSpecial, CardTrait};
use crate::core::{Combatant, GameRng, Side};
use crate::effects::TimingEvent;
use crate::tokens::{has_token, remove_token, TokenCategory, TokenId};

/// Per-hit battle context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitContext {
    /// Side that plays the card.
    pub actor: Side,
    /// Attacker's energy left after paying for the card.
    pub remaining_energy: i64,
    /// No later entry of the actor is queued this turn.
    pub is_last_card: bool,
    /// Added to fencing cards.
    pub fencing_bonus: i64,
    /// Added to every attack.
    pub style_bonus: i64,
    /// External damage-taken multiplier (battlefield anomaly).
    pub anomaly_vuln_mult: f64,
    pub turn: u32,
    pub cards_played: u32,
}

impl HitContext {
    #[must_use]
    pub fn new(actor: Side) -> Self {
        Self {
            actor,
            remaining_energy: 0,
            is_last_card: false,
            fencing_bonus: 0,
            style_bonus: 0,
            anomaly_vuln_mult: 1.0,
            turn: 1,
            cards_played: 1,
        }
    }

    #[must_use]
    pub fn with_energy(mut self, remaining: i64) -> Self {
        self.remaining_energy = remaining;
        self
    }

    #[must_use]
    pub fn with_last_card(mut self, is_last: bool) -> Self {
        self.is_last_card = is_last;
        self
    }

    #[must_use]
    pub fn with_bonuses(mut self, fencing: i64, style: i64) -> Self {
        self.fencing_bonus = fencing;
        self.style_bonus = style;
        self
    }

    #[must_use]
    pub fn with_anomaly(mut self, mult: f64) -> Self {
        self.anomaly_vuln_mult = mult;
        self
    }

    #[must_use]
    pub fn with_turn(mut self, turn: u32, cards_played: u32) -> Self {
        self.turn = turn;
        self.cards_played = cards_played;
        self
    }
}

/// Result of a card's pre-attack specials.
///
/// Computed once per card play and reused for every further hit of the
/// card and for repeated copies of it, so random bonuses are not re-rolled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedAttack {
    pub bonus: i64,
}

/// Everything one hit changed.
#[derive(Clone, Debug, PartialEq)]
pub struct HitOutcome {
    pub attacker: Combatant,
    pub defender: Combatant,
    pub events: Vec<BattleEvent>,
    /// Hp the defender actually lost.
    pub damage_dealt: i64,
    pub dodged: bool,
    /// Amount the attacker's remaining timeline is pushed back (guard).
    pub timeline_push: i64,
    pub prepared: PreparedAttack,
}

/// Evaluate a card's pre-attack specials.
pub fn prepare_attack(
    card: &CardDefinition,
    defender: &Combatant,
    ctx: &HitContext,
    rng: &mut GameRng,
) -> PreparedAttack {
    let mut bonus = 0;
    for special in card.pre_attack_specials() {
        bonus += match *special {
            CardSpecial::RandomBonus { max } => rng.roll_inclusive(0, max),
            CardSpecial::ExecuteBelow { hp_percent, bonus } => {
                if defender.max_hp > 0 && defender.hp * 100 <= defender.max_hp * hp_percent {
                    bonus
                } else {
                    0
                }
            }
            CardSpecial::EnergyScaling { per_energy } => per_energy * ctx.remaining_energy.max(0),
            CardSpecial::LastCardBonus { bonus } => {
                if ctx.is_last_card {
                    bonus
                } else {
                    0
                }
            }
            CardSpecial::ApplyToken { .. } | CardSpecial::Heal(_) => 0,
        };
    }
    PreparedAttack { bonus }
}

/// Consume one usage stack of `id`, reporting whether there was one.
fn consume_one(entity: &Combatant, id: TokenId, side: Side, events: &mut Vec<BattleEvent>) -> (Combatant, bool) {
    if !has_token(entity, id) {
        return (entity.clone(), false);
    }
    events.push(BattleEvent::TokenConsumed { side, token: id, stacks: 1 });
    (remove_token(entity, id, TokenCategory::Usage, 1), true)
}

fn scale(amount: i64, mult: f64) -> i64 {
    ((amount as f64) * mult).floor().max(0.0) as i64
}

/// Resolve one hit of `card` from `attacker` against `defender`.
///
/// ## Example
///
/// ```
/// use ether_battle::cards::{CardCategory, CardDefinition, CardId, CardRegistry, CardTrait};
/// use ether_battle::combat::{resolve_hit, HitContext, Rules};
/// use ether_battle::core::{Combatant, EngineConfig, GameRng, Side};
/// use ether_battle::effects::EffectRegistry;
///
/// let config = EngineConfig::default();
/// let (cards, effects) = (CardRegistry::new(), EffectRegistry::new());
/// let rules = Rules::new(&config, &cards, &effects, &[]);
///
/// let smash = CardDefinition::new(CardId::new(1), "Smash", CardCategory::Attack)
///     .with_damage(10)
///     .with_trait(CardTrait::Crush);
/// let hero = Combatant::new(40);
/// let brute = Combatant::new(40).with_block(6);
///
/// let outcome = resolve_hit(&hero, &brute, &smash, &HitContext::new(Side::Player), &rules, &mut GameRng::new(1), None);
///
/// assert_eq!(outcome.defender.block, 0);
/// assert_eq!(outcome.damage_dealt, 14);
/// ```
pub fn resolve_hit(
    attacker: &Combatant,
    defender: &Combatant,
    card: &CardDefinition,
    ctx: &HitContext,
    rules: &Rules,
    rng: &mut GameRng,
    cached: Option<PreparedAttack>,
) -> HitOutcome {
    let config = rules.config;
    let attacker_side = ctx.actor;
    let defender_side = attacker_side.opponent();
    let mut events = Vec::new();
    let mut attacker = attacker.clone();
    let mut defender = defender.clone();

    // 1. Pre-attack specials
    let prepared = match cached {
        Some(prepared) => prepared,
        None => {
            let prepared = prepare_attack(card, &defender, ctx, rng);
            if prepared.bonus != 0 {
                events.push(BattleEvent::PreAttackBonus {
                    actor: attacker_side,
                    card: card.id,
                    bonus: prepared.bonus,
                });
            }
            prepared
        }
    };

    // 2. Attacker token modifiers
    let mut damage = card.damage + prepared.bonus;

    let sharpen = attacker.tokens.stacks(TokenId::Sharpen);
    if sharpen > 0 {
        damage += config.sharpen_bonus * i64::from(sharpen);
        attacker = remove_token(&attacker, TokenId::Sharpen, TokenCategory::Usage, sharpen);
        events.push(BattleEvent::TokenConsumed {
            side: attacker_side,
            token: TokenId::Sharpen,
            stacks: sharpen,
        });
    }

    let (next, overdrive) = consume_one(&attacker, TokenId::Overdrive, attacker_side, &mut events);
    let (next, critical) = consume_one(&next, TokenId::Focus, attacker_side, &mut events);
    attacker = next;

    if has_token(&attacker, TokenId::Weak) {
        damage = scale(damage, config.weak_multiplier);
    }

    // 3. Bonuses, overdrive, critical
    let mut bonus = ctx.style_bonus;
    if card.category == CardCategory::Fencing {
        bonus += ctx.fencing_bonus;
    }
    if attacker_side.is_player() {
        bonus += rules
            .fire_for(TimingEvent::BeforeAttack, attacker_side, &attacker, &defender, Some(card), damage)
            .damage_bonus;
    }
    damage = (damage + bonus + attacker.strength).max(0);

    if overdrive {
        damage *= 2;
    }
    if critical {
        damage = scale(damage, config.crit_multiplier);
    }

    events.push(BattleEvent::Attack {
        actor: attacker_side,
        card: card.id,
        damage,
        critical,
    });

    // 4. Crush
    let versus_block = if card.has_trait(CardTrait::Crush) {
        damage * config.crush_multiplier
    } else {
        damage
    };

    // 5. Dodge
    let (next, dodge_attempt) = consume_one(&defender, TokenId::Dodge, defender_side, &mut events);
    defender = next;
    if dodge_attempt && rng.roll_percent(config.dodge_chance) {
        events.push(BattleEvent::Missed { actor: attacker_side, card: card.id });

        let evade = defender.tokens.stacks(TokenId::EvadeCounter);
        if evade > 0 {
            let (hit, lost) = attacker.lose_hp(i64::from(evade));
            attacker = hit;
            events.push(BattleEvent::EvadeCounter { side: defender_side, damage: lost });
        }
        if defender_side.is_player() {
            let result =
                rules.fire_for(TimingEvent::AttackMissed, defender_side, &defender, &attacker, Some(card), damage);
            defender = apply_effect_result(&defender, &result, defender_side, &mut events);
        }

        trace!(card = %card.id, actor = %attacker_side, "hit dodged");
        return HitOutcome {
            attacker,
            defender,
            events,
            damage_dealt: 0,
            dodged: true,
            timeline_push: 0,
            prepared,
        };
    }

    // 6. Block
    let carried = if card.has_trait(CardTrait::IgnoreBlock) || defender.block == 0 {
        damage
    } else if versus_block < defender.block {
        let remaining = defender.block - versus_block;
        defender = defender.with_block(remaining);
        if versus_block > 0 {
            events.push(BattleEvent::BlockAbsorbed {
                side: defender_side,
                absorbed: versus_block,
                remaining,
            });
        }
        0
    } else {
        let absorbed = defender.block;
        defender = defender.with_block(0);
        events.push(BattleEvent::BlockBroken { side: defender_side, absorbed });
        versus_block - absorbed
    };

    // 7. Vulnerability and hp loss
    let mut incoming = carried;
    if defender_side.is_player() && incoming > 0 {
        let reduction = rules
            .fire_for(TimingEvent::BeforeDamageTaken, defender_side, &defender, &attacker, Some(card), incoming)
            .damage_reduction;
        incoming = (incoming - reduction).max(0);
    }
    let final_damage = scale(incoming, defender.vuln_mult * ctx.anomaly_vuln_mult);
    let (hit, damage_dealt) = defender.lose_hp(final_damage);
    defender = hit;
    if damage_dealt > 0 {
        events.push(BattleEvent::Damage { side: defender_side, amount: damage_dealt });
    }

    // 8. Retaliation
    if damage_dealt > 0 {
        if defender.counter > 0 {
            let (hit, lost) = attacker.lose_hp(defender.counter);
            attacker = hit;
            events.push(BattleEvent::Counter { side: defender_side, damage: lost });
        }

        if has_token(&defender, TokenId::Reflect) {
            let reflected = damage_dealt * config.reflect_percent / 100;
            if reflected > 0 {
                let (hit, lost) = attacker.lose_hp(reflected);
                attacker = hit;
                events.push(BattleEvent::Reflect { side: defender_side, damage: lost });
            }
        }

        let (next, shot) = consume_one(&defender, TokenId::CounterShot, defender_side, &mut events);
        defender = next;
        if shot {
            let (hit, lost) = attacker.lose_hp(config.counter_shot_damage);
            attacker = hit;
            events.push(BattleEvent::CounterShot { side: defender_side, damage: lost });
        }

        if defender_side.is_player() {
            let result =
                rules.fire_for(TimingEvent::DamageTaken, defender_side, &defender, &attacker, Some(card), damage_dealt);
            defender = apply_effect_result(&defender, &result, defender_side, &mut events);
        }
    }

    let guard = i64::from(defender.tokens.stacks(TokenId::Guard));
    let mut timeline_push = 0;
    if guard > 0 {
        let block = config.guard_block * guard;
        timeline_push = config.guard_push * guard;
        defender = defender.gain_block(block);
        events.push(BattleEvent::Guard {
            side: defender_side,
            block,
            push: timeline_push,
        });
    }

    trace!(card = %card.id, actor = %attacker_side, damage, damage_dealt, "hit resolved");

    HitOutcome {
        attacker,
        defender,
        events,
        damage_dealt,
        dodged: false,
        timeline_push,
        prepared,
    }
}
