//! Timeline executor and specials integration tests.

use ether_battle::cards::{CardCategory, CardDefinition, CardId, CardRegistry, CardSpecial};
use ether_battle::combat::{BattleEvent, Rules, SkipReason};
use ether_battle::core::{Combatant, EngineConfig, Side};
use ether_battle::effects::{AbilityId, EffectRegistry, EffectResult, Handler, TimingEvent};
use ether_battle::specials::{CardOrigin, CardPiles, NextTurnEffects};
use ether_battle::timeline::{run_pass, PassReport, PassResult, PassState, Timeline};
use ether_battle::tokens::{add_token, TokenId};

const SLASH: CardId = CardId::new(1);
const CLAW: CardId = CardId::new(2);
const ECHO: CardId = CardId::new(3);
const LOOP: CardId = CardId::new(4);
const GAMBLE: CardId = CardId::new(5);
const RALLY: CardId = CardId::new(6);
const TWIN: CardId = CardId::new(7);
const MIRROR: CardId = CardId::new(8);
const SURGE: CardId = CardId::new(9);

fn cards() -> CardRegistry {
    CardRegistry::from_cards([
        CardDefinition::new(SLASH, "Slash", CardCategory::Attack)
            .with_damage(6)
            .with_speed(2),
        CardDefinition::new(CLAW, "Claw", CardCategory::Attack)
            .with_damage(8)
            .with_speed(3),
        CardDefinition::new(ECHO, "Echo Strike", CardCategory::Attack)
            .with_damage(2)
            .with_speed(1)
            .with_next_turn(NextTurnEffects::new().with_bonus_card(SLASH)),
        CardDefinition::new(LOOP, "Loop", CardCategory::Skill)
            .with_speed(1)
            .with_next_turn(NextTurnEffects::new().with_repeat_my_timeline()),
        CardDefinition::new(GAMBLE, "Gamble", CardCategory::Attack)
            .with_damage(1)
            .with_hits(3)
            .with_special(CardSpecial::RandomBonus { max: 9 }),
        CardDefinition::new(RALLY, "Rally", CardCategory::Skill)
            .with_speed(1)
            .with_next_turn(
                NextTurnEffects::new()
                    .with_bonus_energy(2)
                    .with_emergency_draw(1)
                    .with_card_to_hand(SLASH),
            ),
        CardDefinition::new(TWIN, "Twin Cut", CardCategory::Attack)
            .with_damage(2)
            .with_speed(1)
            .with_next_turn(NextTurnEffects::new().with_repeat_my_timeline()),
        CardDefinition::new(MIRROR, "Mirror Strike", CardCategory::Attack)
            .with_damage(3)
            .with_speed(1)
            .with_next_turn(NextTurnEffects::new().with_bonus_card(MIRROR)),
        CardDefinition::new(SURGE, "Surge", CardCategory::Attack)
            .with_damage(1)
            .with_speed(1)
            .with_special(CardSpecial::EnergyScaling { per_energy: 2 }),
    ])
}

fn run(state: &PassState, cards: &CardRegistry) -> PassReport {
    let config = EngineConfig::default();
    let effects = EffectRegistry::new();
    let rules = Rules::new(&config, cards, &effects, &[]);
    run_pass(state, &rules)
}

fn resolved(report: &PassReport, actor: Side) -> usize {
    report
        .events
        .iter()
        .filter(|e| matches!(e, BattleEvent::CardResolved { actor: a, .. } if *a == actor))
        .count()
}

// =============================================================================
// Terminal states
// =============================================================================

#[test]
fn test_player_defeat_stops_before_later_entries() {
    let cards = cards();
    // E3 kills, P4 never runs
    let timeline = Timeline::from_plans(&[SLASH, SLASH], &[CLAW, CLAW], &cards);
    let state = PassState::new(Combatant::new(30).with_hp(5), Combatant::new(30), timeline, 1);

    let report = run(&state, &cards);

    assert_eq!(report.result, PassResult::Defeat);
    assert_eq!(report.state.combatants.player.hp, 0);
    assert_eq!(report.state.index, 2);
    assert_eq!(resolved(&report, Side::Player), 1);
    assert_eq!(resolved(&report, Side::Enemy), 1);
}

#[test]
fn test_enemy_defeat_fires_ability_once() {
    let cards = cards();
    let owner = AbilityId::new(1);
    let config = EngineConfig::default();
    let mut effects = EffectRegistry::new();
    effects.register(owner, TimingEvent::EnemyDefeated, Handler::Flat(EffectResult::gold(7)), 0);
    let active = [owner];
    let rules = Rules::new(&config, &cards, &effects, &active);

    let timeline = Timeline::from_plans(&[SLASH, SLASH, SLASH], &[CLAW], &cards);
    let state = PassState::new(Combatant::new(30), Combatant::new(30).with_hp(4), timeline, 1);

    let report = run_pass(&state, &rules);

    assert_eq!(report.result, PassResult::EnemyDefeated);
    assert_eq!(report.state.gold, 7);
    assert_eq!(resolved(&report, Side::Player), 3);
    assert!(report.events.contains(&BattleEvent::ActionSkipped {
        actor: Side::Enemy,
        card: CLAW,
        reason: SkipReason::EnemyDefeated,
    }));
    assert_eq!(report.state.combatants.player.hp, 30);
}

#[test]
fn test_resume_from_index() {
    let cards = cards();
    let timeline = Timeline::from_plans(&[SLASH, SLASH], &[], &cards);
    let mut state = PassState::new(Combatant::new(30), Combatant::new(30), timeline, 1);
    state.index = 1;

    let report = run(&state, &cards);

    assert_eq!(report.state.combatants.enemy.hp, 24);
}

// =============================================================================
// Ghosts and repeats
// =============================================================================

#[test]
fn test_bonus_card_runs_as_ghost_without_energy() {
    let cards = cards();
    let timeline = Timeline::from_plans(&[ECHO], &[], &cards);
    let state = PassState::new(Combatant::new(30), Combatant::new(30), timeline, 1).with_energy(3, 0);

    let report = run(&state, &cards);

    assert_eq!(report.state.combatants.enemy.hp, 22);
    assert_eq!(report.state.energy.player, 2);
    assert_eq!(report.state.cards_played.player, 2);
    assert!(report.events.contains(&BattleEvent::CardResolved {
        actor: Side::Player,
        card: SLASH,
        ghost: true,
    }));
    assert!(report.state.timeline.is_ordered());
}

#[test]
fn test_repeat_timeline_replays_remaining_cards() {
    let cards = cards();
    let timeline = Timeline::from_plans(&[LOOP, SLASH], &[], &cards);
    let state = PassState::new(Combatant::new(30), Combatant::new(30), timeline, 1);

    let report = run(&state, &cards);

    assert_eq!(report.state.combatants.enemy.hp, 18);
    assert_eq!(report.state.timeline.len(), 3);
    let copy = report.state.timeline.iter().find(|e| e.is_ghost).unwrap();
    assert_eq!(copy.card_id, SLASH);
    assert!(copy.origin.is_some());
    assert!(report.events.contains(&BattleEvent::TimelineRepeated {
        actor: Side::Player,
        copies: 1,
    }));
}

#[test]
fn test_repeated_copies_do_not_repeat_again() {
    let cards = cards();
    let timeline = Timeline::from_plans(&[TWIN, TWIN], &[], &cards);
    let state = PassState::new(Combatant::new(30), Combatant::new(30), timeline, 1);

    let report = run(&state, &cards);

    // the first Twin copies the second; the copy resolves without repeating
    assert_eq!(report.result, PassResult::Continue);
    assert_eq!(report.state.timeline.len(), 3);
    assert_eq!(report.state.index, 3);
    assert_eq!(resolved(&report, Side::Player), 3);
    assert_eq!(report.state.combatants.enemy.hp, 24);
    let repeats = report
        .events
        .iter()
        .filter(|e| matches!(e, BattleEvent::TimelineRepeated { .. }))
        .count();
    assert_eq!(repeats, 1);
}

#[test]
fn test_self_bonus_card_inserts_one_ghost() {
    let cards = cards();
    let timeline = Timeline::from_plans(&[MIRROR], &[], &cards);
    let state = PassState::new(Combatant::new(30), Combatant::new(30), timeline, 1);

    let report = run(&state, &cards);

    assert_eq!(report.state.timeline.len(), 2);
    assert_eq!(resolved(&report, Side::Player), 2);
    assert_eq!(report.state.combatants.enemy.hp, 24);
    let ghosts = report
        .events
        .iter()
        .filter(|e| matches!(e, BattleEvent::GhostInserted { .. }))
        .count();
    assert_eq!(ghosts, 1);
}

#[test]
fn test_deferred_and_hand_effects() {
    let cards = cards();
    let timeline = Timeline::from_plans(&[RALLY], &[], &cards);
    let piles = CardPiles::new([CLAW, CLAW]);
    let state = PassState::new(Combatant::new(30), Combatant::new(30), timeline, 1).with_piles(piles);

    let report = run(&state, &cards);

    assert_eq!(report.state.next_turn.player, NextTurnEffects::new().with_bonus_energy(2));
    let hand = &report.state.piles.hand;
    assert_eq!(hand.len(), 2);
    assert_eq!(hand[0].card_id, CLAW);
    assert_eq!(hand[1].origin, CardOrigin::Generated);
}

#[test]
fn test_multi_hit_rolls_bonus_once() {
    let cards = cards();
    let timeline = Timeline::from_plans(&[GAMBLE], &[], &cards);
    let state = PassState::new(Combatant::new(30), Combatant::new(100), timeline, 21);

    let report = run(&state, &cards);

    let bonuses = report
        .events
        .iter()
        .filter(|e| matches!(e, BattleEvent::PreAttackBonus { .. }))
        .count();
    assert!(bonuses <= 1);
    let lost = 100 - report.state.combatants.enemy.hp;
    assert_eq!(lost % 3, 0);
}

#[test]
fn test_energy_scaling_reads_actor_energy_after_cost() {
    let cards = cards();
    let timeline = Timeline::from_plans(&[SURGE], &[], &cards);
    let state = PassState::new(Combatant::new(30), Combatant::new(30), timeline, 1).with_energy(4, 9);

    let report = run(&state, &cards);

    // 1 + 2 * (4 - 1)
    assert_eq!(report.state.combatants.enemy.hp, 23);
    assert_eq!(report.state.energy.player, 3);
    assert_eq!(report.state.energy.enemy, 9);
}

// =============================================================================
// Tokens during the pass
// =============================================================================

#[test]
fn test_guard_pushes_attacker_timeline() {
    let cards = cards();
    let timeline = Timeline::from_plans(&[SLASH, SLASH], &[CLAW], &cards);
    let enemy = add_token(&Combatant::new(60), TokenId::Guard, 1);
    let state = PassState::new(Combatant::new(60), enemy, timeline, 1);

    let report = run(&state, &cards);

    let schedule: Vec<(Side, i64)> = report.state.timeline.iter().map(|e| (e.actor, e.sp)).collect();
    assert_eq!(schedule, vec![(Side::Player, 2), (Side::Enemy, 3), (Side::Player, 6)]);
    assert!(report.events.contains(&BattleEvent::TimelinePushed {
        actor: Side::Player,
        amount: 2,
    }));
}

#[test]
fn test_same_seed_same_pass() {
    let cards = cards();
    let timeline = Timeline::from_plans(&[GAMBLE, SLASH, GAMBLE], &[CLAW], &cards);
    let enemy = add_token(&Combatant::new(200), TokenId::Dodge, 3);
    let state = PassState::new(Combatant::new(60), enemy, timeline, 1234);

    let a = run(&state, &cards);
    let b = run(&state, &cards);

    assert_eq!(a, b);
}
