//! Turn driver.
//!
//! `Battle` holds what never changes during a battle (config, card pool,
//! installed abilities). Operations take a `&BattleState` and return a new
//! snapshot, so a caller can keep old snapshots for undo or replay.
//!
//! ## Turn flow
//!
//! ```text
//! select(cards) ──► respond(enemy plan) ──► [adjust]* ──► resolve
//!     ▲                                                     │
//!     └───────────── end turn + start turn ◄── continue ────┤
//!                                                           ▼
//!                                               post (victory / defeat)
//! ```

use im::Vector;
use tracing::{debug, info, trace};

use super::insight::{reveal, InsightView};
use super::setup::BattleSetup;
use super::state::BattleState;
use crate::cards::{CardDefinition, CardId, CardRegistry};
use crate::combat::{apply_effect_result, BattleEvent, Rules};
use crate::core::{
    BattleError, BattleOutcome, BattlePhase, EngineConfig, EtherPhase, OutcomeKind, Result, Side, Sides,
};
use crate::effects::{AbilityId, EffectRegistry, TimingEvent};
use crate::specials::CardPiles;
use crate::timeline::{
    detect_combo, run_pass, ComboKind, EntryUid, EtherCalculation, PassReport, PassResult, PassState, Timeline,
};
use crate::tokens::{add_token, decrease_durations, TokenId};

/// Everything `resolve` produced for one turn.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnReport {
    /// Snapshot after the turn: back in `select`, or in `post`.
    pub state: BattleState,
    pub result: PassResult,
    pub events: Vec<BattleEvent>,
    pub ether: Sides<EtherCalculation>,
    pub outcome: Option<BattleOutcome>,
}

/// Battle rules bound to one setup.
#[derive(Clone, Debug)]
pub struct Battle {
    config: EngineConfig,
    cards: CardRegistry,
    effects: EffectRegistry,
    abilities: Vec<AbilityId>,
}

impl Battle {
    /// Validate `setup`, install abilities, shuffle the deck and run the
    /// first turn start.
    ///
    /// ## Example
    ///
    /// ```
    /// use ether_battle::battle::{Battle, BattleSetup};
    /// use ether_battle::cards::{CardCategory, CardDefinition, CardId};
    /// use ether_battle::core::{BattlePhase, Combatant};
    ///
    /// let setup = BattleSetup::new(Combatant::new(50), Combatant::new(30))
    ///     .with_cards([CardDefinition::new(CardId::new(1), "Slash", CardCategory::Attack).with_damage(6)])
    ///     .with_deck([CardId::new(1); 10])
    ///     .with_seed(7);
    ///
    /// let (_battle, state, _events) = Battle::start(setup).unwrap();
    /// assert_eq!(state.phase, BattlePhase::Select);
    /// assert_eq!(state.pass.piles.hand.len(), 5);
    /// ```
    pub fn start(setup: BattleSetup) -> Result<(Self, BattleState, Vec<BattleEvent>)> {
        setup.validate()?;

        let mut effects = EffectRegistry::new();
        let abilities = setup.catalog.install(&setup.abilities, &mut effects);
        let battle = Self {
            cards: setup.registry(),
            config: setup.config,
            effects,
            abilities,
        };

        let mut pass = PassState::new(setup.player, setup.enemy, Timeline::new(), setup.seed)
            .with_modifiers(setup.modifiers);
        let deck: Vector<CardId> = setup.deck.into_iter().collect();
        let deck = if setup.shuffle_deck { pass.rng.shuffled(&deck) } else { deck };
        pass.piles = CardPiles::new(deck);

        let mut state = BattleState::new(pass, setup.insight);
        let mut events = Vec::new();
        battle.fire_player(&mut state, TimingEvent::BattleStart, &mut events);
        battle.start_turn(&mut state, &mut events);

        info!(
            seed = setup.seed,
            abilities = battle.abilities.len(),
            deck = state.pass.piles.deck.len() + state.pass.piles.hand.len(),
            "battle started"
        );
        Ok((battle, state, events))
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn cards(&self) -> &CardRegistry {
        &self.cards
    }

    /// Abilities that were installed at start.
    #[must_use]
    pub fn abilities(&self) -> &[AbilityId] {
        &self.abilities
    }

    #[must_use]
    pub fn rules(&self) -> Rules<'_> {
        Rules::new(&self.config, &self.cards, &self.effects, &self.abilities)
    }

    /// Commit the player's cards for this turn.
    ///
    /// Every card must be registered and in hand (one hand copy per
    /// listed card), and the plan must fit the turn's energy.
    pub fn select(&self, state: &BattleState, cards: &[CardId]) -> Result<BattleState> {
        ensure_phase(state, BattlePhase::Select)?;

        let mut piles = state.pass.piles.clone();
        let mut cost = 0;
        for &id in cards {
            let card = self.cards.get(id).ok_or(BattleError::UnknownCard(id))?;
            piles = piles.play_from_hand(id).ok_or(BattleError::CardNotInHand(id))?;
            cost += card.action_cost;
        }
        let available = state.pass.energy.player;
        if cost > available {
            return Err(BattleError::EnergyExceeded { cost, available });
        }

        debug!(cards = cards.len(), cost, available, "player plan selected");
        let mut next = state.clone();
        next.pass.piles = piles;
        next.player_plan = cards.to_vec();
        next.phase = BattlePhase::Respond;
        Ok(next)
    }

    /// Attach the enemy's plan and schedule the turn's timeline.
    pub fn respond(&self, state: &BattleState, enemy_plan: &[CardId]) -> Result<BattleState> {
        ensure_phase(state, BattlePhase::Respond)?;
        if let Some(&missing) = enemy_plan.iter().find(|id| !self.cards.contains(**id)) {
            return Err(BattleError::UnknownCard(missing));
        }

        let mut next = state.clone();
        next.pass.timeline = state.pass.timeline.scheduled(&state.player_plan, enemy_plan, &self.cards);
        next.pass.index = 0;
        next.enemy_plan = enemy_plan.to_vec();
        next.phase = BattlePhase::Resolve(EtherPhase::Idle);
        debug!(entries = next.pass.timeline.len(), "timeline scheduled");
        Ok(next)
    }

    /// Move a leisure or strain entry to `new_sp` before resolution.
    pub fn adjust(&self, state: &BattleState, uid: EntryUid, new_sp: i64) -> Result<BattleState> {
        ensure_phase(state, BattlePhase::Resolve(EtherPhase::Idle))?;
        let mut next = state.clone();
        next.pass.timeline = state.pass.timeline.reorder(uid, new_sp, &self.cards, &self.config)?;
        Ok(next)
    }

    /// Legal drag range for `uid`, if it can be moved at all.
    #[must_use]
    pub fn adjust_range(&self, state: &BattleState, uid: EntryUid) -> Option<(i64, i64)> {
        state.pass.timeline.reorder_range(uid, &self.cards, &self.config)
    }

    /// What the player can see of the enemy's plan.
    #[must_use]
    pub fn enemy_view(&self, state: &BattleState) -> InsightView {
        reveal(state.insight, &state.enemy_plan, &self.cards)
    }

    /// Run the pass on a copy of the snapshot. `state` is left as is.
    pub fn preview(&self, state: &BattleState) -> Result<PassReport> {
        ensure_phase(state, BattlePhase::Resolve(EtherPhase::Idle))?;
        Ok(run_pass(&state.pass, &self.rules()))
    }

    /// Resolve the turn: run the pass, score ether, then either start the
    /// next turn or end the battle.
    pub fn resolve(&self, state: &BattleState) -> Result<TurnReport> {
        ensure_phase(state, BattlePhase::Resolve(EtherPhase::Idle))?;

        let report = run_pass(&state.pass, &self.rules());
        let mut events = report.events;
        let mut next = state.clone();
        next.pass = report.state;

        let played: Vec<&CardDefinition> = next
            .pass
            .timeline
            .iter()
            .take(next.pass.index)
            .filter(|e| e.actor.is_player() && !e.is_ghost)
            .filter_map(|e| self.cards.get(e.card_id))
            .collect();
        let combo = detect_combo(played);

        let ether = Sides::new(
            EtherCalculation::new(report.ether.player, combo).finish(&next.combo_history, &self.config),
            EtherCalculation::new(report.ether.enemy, ComboKind::None).finish(&next.combo_history, &self.config),
        );
        next.combo_history = next.combo_history.recorded(combo);
        for (side, calc) in ether.iter() {
            next.ether_totals[side] += calc.total;
            events.push(BattleEvent::EtherScored {
                side,
                sum: calc.sum,
                combo: calc.combo,
                multiplier: calc.multiplier,
                total: calc.total,
            });
        }
        next.phase = BattlePhase::Resolve(EtherPhase::Result);
        trace!(player = ether.player.total, enemy = ether.enemy.total, ?combo, "ether scored");

        let outcome = match report.result {
            PassResult::Defeat => Some(self.finish(&mut next, OutcomeKind::Defeat, &mut events)),
            PassResult::EnemyDefeated => Some(self.finish(&mut next, OutcomeKind::Victory, &mut events)),
            PassResult::Continue => {
                self.end_turn(&mut next, &mut events);
                self.start_turn(&mut next, &mut events);
                None
            }
        };

        Ok(TurnReport {
            state: next,
            result: report.result,
            events,
            ether,
            outcome,
        })
    }

    fn fire_player(&self, state: &mut BattleState, event: TimingEvent, events: &mut Vec<BattleEvent>) -> i64 {
        let combatants = &state.pass.combatants;
        let result = self
            .rules()
            .fire_for(event, Side::Player, &combatants.player, &combatants.enemy, None, 0);
        state.pass.gold += result.gold_gain;
        state.pass.combatants.player = apply_effect_result(&combatants.player, &result, Side::Player, events);
        result.discount
    }

    fn finish(&self, state: &mut BattleState, kind: OutcomeKind, events: &mut Vec<BattleEvent>) -> BattleOutcome {
        self.fire_player(state, TimingEvent::BattleEnd, events);
        let outcome = BattleOutcome {
            kind,
            turns: state.pass.turn,
            player_hp: state.pass.combatants.player.hp,
            player_ether: state.ether_totals.player,
            enemy_ether: state.ether_totals.enemy,
            gold: state.pass.gold,
        };
        state.phase = BattlePhase::Post(kind);
        state.outcome = Some(outcome.clone());
        info!(?kind, turns = outcome.turns, gold = outcome.gold, "battle over");
        outcome
    }

    fn end_turn(&self, state: &mut BattleState, events: &mut Vec<BattleEvent>) {
        self.fire_player(state, TimingEvent::TurnEnd, events);

        for side in Side::both() {
            let (mut next, expired) = decrease_durations(&state.pass.combatants[side]);
            for token in expired {
                events.push(BattleEvent::TokenExpired { side, token });
            }
            next.block = 0;
            next.ether_pts = 0;
            state.pass.combatants[side] = next;
        }

        let pass = &mut state.pass;
        events.push(BattleEvent::TurnEnded { turn: pass.turn });
        debug!(turn = pass.turn, "turn ended");
        pass.piles = pass.piles.end_turn();
        pass.turn += 1;
        pass.cards_played = Sides::with_value(0);
        pass.enemy_defeated = false;
        pass.timeline = Timeline::continuing(&pass.timeline);
        pass.index = 0;
        state.player_plan.clear();
        state.enemy_plan.clear();
    }

    fn start_turn(&self, state: &mut BattleState, events: &mut Vec<BattleEvent>) {
        events.push(BattleEvent::TurnStarted { turn: state.pass.turn });

        for side in Side::both() {
            let pending = std::mem::take(&mut state.pass.next_turn[side]);
            state.pass.energy[side] = self.config.max_energy + pending.bonus_energy;

            if pending.bonus_block > 0 {
                state.pass.combatants[side] = state.pass.combatants[side].gain_block(pending.bonus_block);
                events.push(BattleEvent::BlockGained {
                    side,
                    amount: pending.bonus_block,
                });
            }
            if pending.guaranteed_crit {
                state.pass.combatants[side] = add_token(&state.pass.combatants[side], TokenId::Focus, 1);
                events.push(BattleEvent::TokenGranted {
                    side,
                    token: TokenId::Focus,
                    stacks: 1,
                });
            }
            if side.is_player() {
                let count = self.config.hand_size + pending.extra_draw as usize;
                let draw = state.pass.piles.draw(count, &mut state.pass.rng);
                if let Some(size) = draw.reshuffled {
                    events.push(BattleEvent::DeckReshuffled { size });
                }
                events.push(BattleEvent::CardsDrawn { cards: draw.drawn });
                state.pass.piles = draw.piles;
            }
        }

        let discount = self.fire_player(state, TimingEvent::TurnStart, events);
        state.pass.energy.player += discount.max(0);
        state.phase = BattlePhase::Select;
        debug!(turn = state.pass.turn, energy = state.pass.energy.player, "turn started");
    }
}

fn ensure_phase(state: &BattleState, expected: BattlePhase) -> Result<()> {
    if state.phase.is_over() {
        return Err(BattleError::BattleOver);
    }
    if state.phase != expected {
        return Err(BattleError::WrongPhase {
            expected: expected.name(),
            actual: state.phase,
        });
    }
    Ok(())
}
