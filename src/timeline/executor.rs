//! Timeline executor.
//!
//! `run_pass` drives one resolution pass over the turn's queue. It takes a
//! `PassState` snapshot and returns a new one; the input is never touched,
//! so a preview pass and the real pass can start from the same snapshot.
//!
//! ## Pass outcome
//!
//! - `Continue`: queue exhausted, both sides alive
//! - `EnemyDefeated`: the enemy fell; later enemy entries were skipped but
//!   the player's remaining entries still ran
//! - `Defeat`: the player fell; the pass stopped right after the lethal
//!   action

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::queue::{EntryUid, QueueEntry, Timeline};
use crate::cards::{CardDefinition, CardSpecial, EffectTarget};
use crate::combat::{
    apply_effect_result, resolve_hit, BattleEvent, HitContext, PreparedAttack, Rules, SkipReason,
};
use crate::core::{Combatant, EngineConfig, GameRng, Side, Sides};
use crate::effects::{EffectContext, EffectResult, TimingEvent};
use crate::specials::{process_all_next_turn_effects, CardPiles, NextTurnEffects, SpecialsInput};
use crate::tokens::{grant_token, TokenId};

/// Terminal state of a resolution pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassResult {
    Continue,
    EnemyDefeated,
    Defeat,
}

/// Battle-long attack modifiers supplied at setup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassModifiers {
    /// Added to the player's fencing cards.
    pub fencing_bonus: i64,
    /// Added to every player attack.
    pub style_bonus: i64,
    /// Damage-taken multiplier for both sides.
    pub anomaly_vuln_mult: f64,
}

impl Default for PassModifiers {
    fn default() -> Self {
        Self {
            fencing_bonus: 0,
            style_bonus: 0,
            anomaly_vuln_mult: 1.0,
        }
    }
}

/// Everything a resolution pass reads and replaces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PassState {
    pub combatants: Sides<Combatant>,
    pub timeline: Timeline,
    /// Next queue index to resolve.
    pub index: usize,
    pub piles: CardPiles,
    pub next_turn: Sides<NextTurnEffects>,
    /// Energy left this turn.
    pub energy: Sides<i64>,
    pub cards_played: Sides<u32>,
    /// Latched the first time the enemy reaches 0 hp in a pass.
    pub enemy_defeated: bool,
    /// Gold granted by abilities so far.
    pub gold: i64,
    pub turn: u32,
    pub modifiers: PassModifiers,
    pub rng: GameRng,
}

impl PassState {
    #[must_use]
    pub fn new(player: Combatant, enemy: Combatant, timeline: Timeline, seed: u64) -> Self {
        Self {
            combatants: Sides::new(player, enemy),
            timeline,
            index: 0,
            piles: CardPiles::default(),
            next_turn: Sides::default(),
            energy: Sides::with_value(0),
            cards_played: Sides::with_value(0),
            enemy_defeated: false,
            gold: 0,
            turn: 1,
            modifiers: PassModifiers::default(),
            rng: GameRng::new(seed),
        }
    }

    #[must_use]
    pub fn with_piles(mut self, piles: CardPiles) -> Self {
        self.piles = piles;
        self
    }

    #[must_use]
    pub fn with_energy(mut self, player: i64, enemy: i64) -> Self {
        self.energy = Sides::new(player, enemy);
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: PassModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Ether each side has accumulated this turn.
    #[must_use]
    pub fn ether(&self) -> Sides<i64> {
        Sides::new(self.combatants.player.ether_pts, self.combatants.enemy.ether_pts)
    }
}

/// Output of a resolution pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PassReport {
    pub state: PassState,
    pub result: PassResult,
    pub events: Vec<BattleEvent>,
    pub ether: Sides<i64>,
}

/// Resolve the queue from `state.index` to a terminal state.
///
/// ## Example
///
/// ```
/// use ether_battle::cards::{CardCategory, CardDefinition, CardId, CardRegistry};
/// use ether_battle::combat::Rules;
/// use ether_battle::core::{Combatant, EngineConfig};
/// use ether_battle::effects::EffectRegistry;
/// use ether_battle::timeline::{run_pass, PassResult, PassState, Timeline};
///
/// let cards = CardRegistry::from_cards([
///     CardDefinition::new(CardId::new(1), "Slash", CardCategory::Attack).with_damage(6),
/// ]);
/// let (config, effects) = (EngineConfig::default(), EffectRegistry::new());
/// let rules = Rules::new(&config, &cards, &effects, &[]);
///
/// let timeline = Timeline::from_plans(&[CardId::new(1)], &[CardId::new(1)], &cards);
/// let state = PassState::new(Combatant::new(20), Combatant::new(20), timeline, 1);
///
/// let report = run_pass(&state, &rules);
/// assert_eq!(report.result, PassResult::Continue);
/// assert_eq!(report.state.combatants.enemy.hp, 14);
/// assert_eq!(state.combatants.enemy.hp, 20); // input untouched
/// ```
#[must_use]
pub fn run_pass(start: &PassState, rules: &Rules) -> PassReport {
    let mut state = start.clone();
    let mut events = Vec::new();
    let mut prepared: FxHashMap<EntryUid, PreparedAttack> = FxHashMap::default();

    while let Some(entry) = state.timeline.get(state.index).cloned() {
        let index = state.index;
        state.index += 1;

        if entry.actor == Side::Enemy && state.enemy_defeated {
            events.push(BattleEvent::ActionSkipped {
                actor: entry.actor,
                card: entry.card_id,
                reason: SkipReason::EnemyDefeated,
            });
            continue;
        }

        let Some(card) = rules.cards.get(entry.card_id) else {
            warn!(card = %entry.card_id, uid = %entry.uid, "queued card not registered, skipping");
            events.push(BattleEvent::ActionSkipped {
                actor: entry.actor,
                card: entry.card_id,
                reason: SkipReason::UnknownCard,
            });
            continue;
        };

        resolve_entry(&mut state, &entry, index, card, rules, &mut prepared, &mut events);
        burn_tick(&mut state, rules.config, &mut events);

        if state.combatants.player.is_dead() {
            debug!(index, "player defeated");
            events.push(BattleEvent::PlayerDefeated);
            let ether = state.ether();
            return PassReport {
                state,
                result: PassResult::Defeat,
                events,
                ether,
            };
        }

        if !state.enemy_defeated && state.combatants.enemy.is_dead() {
            debug!(index, "enemy defeated, latching");
            state.enemy_defeated = true;
            events.push(BattleEvent::EnemyDefeated);

            let result = rules.fire_for(
                TimingEvent::EnemyDefeated,
                Side::Player,
                &state.combatants.player,
                &state.combatants.enemy,
                Some(card),
                0,
            );
            state.gold += result.gold_gain;
            state.combatants.player =
                apply_effect_result(&state.combatants.player, &result, Side::Player, &mut events);
        }
    }

    let result = if state.enemy_defeated {
        PassResult::EnemyDefeated
    } else {
        PassResult::Continue
    };
    let ether = state.ether();
    PassReport {
        state,
        result,
        events,
        ether,
    }
}

fn resolve_entry(
    state: &mut PassState,
    entry: &QueueEntry,
    index: usize,
    card: &CardDefinition,
    rules: &Rules,
    prepared: &mut FxHashMap<EntryUid, PreparedAttack>,
    events: &mut Vec<BattleEvent>,
) {
    let actor = entry.actor;
    let opponent = actor.opponent();

    if !entry.is_ghost {
        state.energy[actor] = (state.energy[actor] - card.action_cost).max(0);
    }
    state.cards_played[actor] += 1;
    events.push(BattleEvent::CardResolved {
        actor,
        card: card.id,
        ghost: entry.is_ghost,
    });
    debug!(index, %actor, card = %card.id, sp = entry.sp, ghost = entry.is_ghost, "resolving entry");

    let is_last_card = state.timeline.remaining_for(actor, index).next().is_none();
    let mut ctx = HitContext::new(actor)
        .with_energy(state.energy[actor])
        .with_last_card(is_last_card)
        .with_anomaly(state.modifiers.anomaly_vuln_mult)
        .with_turn(state.turn, state.cards_played[actor]);
    if actor.is_player() {
        ctx = ctx.with_bonuses(state.modifiers.fencing_bonus, state.modifiers.style_bonus);
    }

    if card.is_attack() {
        let mut cached = entry.origin.and_then(|origin| prepared.get(&origin).copied());
        for _ in 0..card.hits {
            let defender_before = state.combatants[opponent].clone();
            let outcome = resolve_hit(
                &state.combatants[actor],
                &defender_before,
                card,
                &ctx,
                rules,
                &mut state.rng,
                cached,
            );
            cached = Some(outcome.prepared);
            events.extend(outcome.events);

            let mut defender = outcome.defender;
            if defender_before.has_units() && outcome.damage_dealt > 0 {
                let (split, died) = defender_before.damage_unit(outcome.damage_dealt);
                defender.units = split.units;
                defender.hp = split.hp;
                if let Some(unit) = died {
                    events.push(BattleEvent::UnitDefeated { index: unit });
                }
            }
            state.combatants[actor] = outcome.attacker;
            state.combatants[opponent] = defender;

            if outcome.timeline_push > 0 {
                state.timeline = state.timeline.push_actor(actor, index, outcome.timeline_push);
                events.push(BattleEvent::TimelinePushed {
                    actor,
                    amount: outcome.timeline_push,
                });
            }

            if state.combatants.player.is_dead() || state.combatants.enemy.is_dead() {
                break;
            }
        }
        if let Some(p) = cached {
            prepared.insert(entry.uid, p);
        }
    }

    if card.block > 0 {
        state.combatants[actor] = state.combatants[actor].gain_block(card.block);
        events.push(BattleEvent::BlockGained { side: actor, amount: card.block });
    }

    for special in &card.specials {
        match *special {
            CardSpecial::ApplyToken { target, token, stacks, magnitude } => {
                let side = match target {
                    EffectTarget::Actor => actor,
                    EffectTarget::Opponent => opponent,
                };
                state.combatants[side] = grant_token(&state.combatants[side], token, stacks, magnitude, rules.config);
                events.push(BattleEvent::TokenGranted { side, token, stacks });
            }
            CardSpecial::Heal(amount) => {
                let (healed, restored) = state.combatants[actor].heal(amount);
                state.combatants[actor] = healed;
                if restored > 0 {
                    events.push(BattleEvent::Healed { side: actor, amount: restored });
                }
            }
            _ => {}
        }
    }

    let mut ether = card.ether;
    if actor.is_player() {
        let ctx = EffectContext::new(TimingEvent::CardPlayed, &state.combatants.player, &state.combatants.enemy)
            .with_card(card)
            .with_turn(state.turn)
            .with_cards_played(state.cards_played.player);
        let result = rules.fire(&ctx);
        ether += result.ether_gain;
        let rest = EffectResult { ether_gain: 0, ..result };
        state.combatants.player = apply_effect_result(&state.combatants.player, &rest, Side::Player, events);

        if !entry.is_ghost {
            state.piles = state.piles.resolve_played(card);
        }
    }
    if ether > 0 {
        state.combatants[actor] = state.combatants[actor].gain_ether(ether);
        events.push(BattleEvent::EtherGained {
            side: actor,
            amount: ether,
            total: state.combatants[actor].ether_pts,
        });
    }

    if let Some(delta) = &card.next_turn {
        // Ghosts never re-dispatch one-shots, so the queue stays finite.
        let stripped;
        let delta = if entry.is_ghost && delta.has_one_shots() {
            stripped = delta.without_one_shots();
            &stripped
        } else {
            delta
        };
        let input = SpecialsInput {
            timeline: &state.timeline,
            index,
            actor,
            piles: &state.piles,
            cards: rules.cards,
        };
        let diff = process_all_next_turn_effects(&state.next_turn[actor], delta, input, &mut state.rng);
        if let Some(timeline) = diff.timeline {
            state.timeline = timeline;
        }
        if let Some(piles) = diff.piles {
            state.piles = piles;
        }
        state.next_turn[actor] = diff.next_turn;
        events.extend(diff.events);
    }
}

/// Damage that bypasses block; routed through the targeted unit for
/// multi-unit enemies. Returns the new combatant and the hp lost.
fn direct_damage(entity: &Combatant, amount: i64, events: &mut Vec<BattleEvent>) -> (Combatant, i64) {
    if entity.has_units() {
        let (next, died) = entity.damage_unit(amount);
        if let Some(index) = died {
            events.push(BattleEvent::UnitDefeated { index });
        }
        let lost = entity.hp - next.hp;
        (next, lost)
    } else {
        entity.lose_hp(amount)
    }
}

fn burn_tick(state: &mut PassState, config: &EngineConfig, events: &mut Vec<BattleEvent>) {
    for side in Side::both() {
        let stacks = state.combatants[side].tokens.stacks(TokenId::Burn);
        if stacks == 0 || state.combatants[side].is_dead() {
            continue;
        }
        let mut unit_events = Vec::new();
        let (next, lost) = direct_damage(&state.combatants[side], config.burn_damage * i64::from(stacks), &mut unit_events);
        state.combatants[side] = next;
        events.push(BattleEvent::Burn { side, damage: lost });
        events.extend(unit_events);
    }
}
