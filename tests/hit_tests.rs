//! Hit resolver integration tests.

use ether_battle::cards::{CardCategory, CardDefinition, CardId, CardRegistry, CardSpecial, CardTrait};
use ether_battle::combat::{resolve_hit, BattleEvent, HitContext, HitOutcome, PreparedAttack, Rules};
use ether_battle::core::{Combatant, EngineConfig, GameRng, Side};
use ether_battle::effects::{AbilityId, EffectRegistry, EffectResult, Handler, TimingEvent};
use ether_battle::tokens::{add_token, get_token_stacks, TokenId};

fn strike(damage: i64) -> CardDefinition {
    CardDefinition::new(CardId::new(1), "Strike", CardCategory::Attack).with_damage(damage)
}

fn hit(
    config: &EngineConfig,
    attacker: &Combatant,
    defender: &Combatant,
    card: &CardDefinition,
    ctx: HitContext,
) -> HitOutcome {
    let cards = CardRegistry::new();
    let effects = EffectRegistry::new();
    let rules = Rules::new(config, &cards, &effects, &[]);
    resolve_hit(attacker, defender, card, &ctx, &rules, &mut GameRng::new(11), None)
}

fn player_hit(attacker: &Combatant, defender: &Combatant, card: &CardDefinition) -> HitOutcome {
    hit(&EngineConfig::default(), attacker, defender, card, HitContext::new(Side::Player))
}

// =============================================================================
// Block and vulnerability
// =============================================================================

#[test]
fn test_crush_breaks_block_and_carries() {
    let card = strike(10).with_trait(CardTrait::Crush);
    let defender = Combatant::new(50).with_block(6);

    let outcome = player_hit(&Combatant::new(50), &defender, &card);

    assert_eq!(outcome.defender.block, 0);
    assert_eq!(outcome.defender.hp, 36);
    assert_eq!(outcome.damage_dealt, 14);
    assert!(outcome.events.contains(&BattleEvent::BlockBroken { side: Side::Enemy, absorbed: 6 }));
}

#[test]
fn test_vulnerability_scales_unblocked_damage() {
    let defender = Combatant::new(50).with_vuln_mult(1.5);

    let outcome = player_hit(&Combatant::new(50), &defender, &strike(10));

    assert_eq!(outcome.damage_dealt, 15);
    assert_eq!(outcome.defender.hp, 35);
}

#[test]
fn test_block_absorbs_without_hp_loss() {
    let defender = Combatant::new(50).with_block(12);

    let outcome = player_hit(&Combatant::new(50), &defender, &strike(7));

    assert_eq!(outcome.defender.hp, 50);
    assert_eq!(outcome.defender.block, 5);
    assert_eq!(outcome.damage_dealt, 0);
}

#[test]
fn test_ignore_block() {
    let card = strike(7).with_trait(CardTrait::IgnoreBlock);
    let defender = Combatant::new(50).with_block(12);

    let outcome = player_hit(&Combatant::new(50), &defender, &card);

    assert_eq!(outcome.defender.hp, 43);
    assert_eq!(outcome.defender.block, 12);
}

#[test]
fn test_anomaly_multiplies_vulnerability() {
    let defender = Combatant::new(50).with_vuln_mult(1.5);
    let ctx = HitContext::new(Side::Player).with_anomaly(2.0);

    let outcome = hit(&EngineConfig::default(), &Combatant::new(50), &defender, &strike(5), ctx);

    // 5 * 3.0
    assert_eq!(outcome.damage_dealt, 15);
}

#[test]
fn test_hp_clamped_at_zero() {
    let outcome = player_hit(&Combatant::new(50), &Combatant::new(50).with_hp(3), &strike(40));

    assert_eq!(outcome.defender.hp, 0);
    assert_eq!(outcome.damage_dealt, 3);
}

// =============================================================================
// Attacker modifiers
// =============================================================================

#[test]
fn test_sharpen_consumes_all_stacks() {
    let config = EngineConfig::default();
    let attacker = add_token(&Combatant::new(50), TokenId::Sharpen, 2);

    let outcome = player_hit(&attacker, &Combatant::new(50), &strike(4));

    assert_eq!(outcome.damage_dealt, 4 + 2 * config.sharpen_bonus);
    assert_eq!(get_token_stacks(&outcome.attacker, TokenId::Sharpen), 0);
}

#[test]
fn test_weak_floors_damage() {
    let attacker = add_token(&Combatant::new(50), TokenId::Weak, 1);

    let outcome = player_hit(&attacker, &Combatant::new(50), &strike(10));

    // 10 * 0.75
    assert_eq!(outcome.damage_dealt, 7);
    assert_eq!(get_token_stacks(&outcome.attacker, TokenId::Weak), 1);
}

#[test]
fn test_strength_overdrive_and_focus() {
    let attacker = Combatant::new(50).with_strength(2);
    let attacker = add_token(&attacker, TokenId::Overdrive, 2);
    let attacker = add_token(&attacker, TokenId::Focus, 1);

    let outcome = player_hit(&attacker, &Combatant::new(100), &strike(8));

    // (8 + 2) * 2 * 1.5
    assert_eq!(outcome.damage_dealt, 30);
    assert_eq!(get_token_stacks(&outcome.attacker, TokenId::Overdrive), 1);
    assert_eq!(get_token_stacks(&outcome.attacker, TokenId::Focus), 0);
    assert!(outcome
        .events
        .iter()
        .any(|e| matches!(e, BattleEvent::Attack { critical: true, damage: 30, .. })));
}

#[test]
fn test_fencing_and_style_bonuses() {
    let rapier = CardDefinition::new(CardId::new(2), "Rapier", CardCategory::Fencing).with_damage(3);
    let ctx = HitContext::new(Side::Player).with_bonuses(2, 1);

    let fencing = hit(&EngineConfig::default(), &Combatant::new(50), &Combatant::new(50), &rapier, ctx);
    let plain = hit(&EngineConfig::default(), &Combatant::new(50), &Combatant::new(50), &strike(3), ctx);

    assert_eq!(fencing.damage_dealt, 6);
    assert_eq!(plain.damage_dealt, 4);
}

#[test]
fn test_before_attack_ability() {
    let owner = AbilityId::new(4);
    let config = EngineConfig::default();
    let cards = CardRegistry::new();
    let mut effects = EffectRegistry::new();
    effects.register(owner, TimingEvent::BeforeAttack, Handler::Flat(EffectResult::damage_bonus(5)), 0);
    let active = [owner];
    let rules = Rules::new(&config, &cards, &effects, &active);

    let outcome = resolve_hit(
        &Combatant::new(50),
        &Combatant::new(50),
        &strike(5),
        &HitContext::new(Side::Player),
        &rules,
        &mut GameRng::new(1),
        None,
    );

    assert_eq!(outcome.damage_dealt, 10);
}

// =============================================================================
// Pre-attack specials
// =============================================================================

#[test]
fn test_cached_bonus_not_rerolled() {
    let card = strike(2).with_special(CardSpecial::RandomBonus { max: 50 });
    let config = EngineConfig::default();
    let cards = CardRegistry::new();
    let effects = EffectRegistry::new();
    let rules = Rules::new(&config, &cards, &effects, &[]);
    let ctx = HitContext::new(Side::Player);
    let mut rng = GameRng::new(9);

    let first = resolve_hit(&Combatant::new(50), &Combatant::new(200), &card, &ctx, &rules, &mut rng, None);
    let before = rng.clone();
    let second = resolve_hit(
        &Combatant::new(50),
        &Combatant::new(200),
        &card,
        &ctx,
        &rules,
        &mut rng,
        Some(first.prepared),
    );

    assert_eq!(first.damage_dealt, second.damage_dealt);
    assert_eq!(rng, before);
}

#[test]
fn test_execute_and_last_card() {
    let card = strike(4)
        .with_special(CardSpecial::ExecuteBelow { hp_percent: 30, bonus: 10 })
        .with_special(CardSpecial::LastCardBonus { bonus: 3 });
    let wounded = Combatant::new(100).with_hp(25);
    let ctx = HitContext::new(Side::Player).with_last_card(true);

    let outcome = hit(&EngineConfig::default(), &Combatant::new(50), &wounded, &card, ctx);

    assert_eq!(outcome.prepared, PreparedAttack { bonus: 13 });
    assert_eq!(outcome.damage_dealt, 17);
}

#[test]
fn test_energy_scaling() {
    let card = strike(1).with_special(CardSpecial::EnergyScaling { per_energy: 2 });
    let ctx = HitContext::new(Side::Player).with_energy(3);

    let outcome = hit(&EngineConfig::default(), &Combatant::new(50), &Combatant::new(50), &card, ctx);

    assert_eq!(outcome.damage_dealt, 7);
}

// =============================================================================
// Defender reactions
// =============================================================================

#[test]
fn test_dodge_stops_hit_and_counters() {
    let config = EngineConfig::default().with_dodge_chance(100);
    let defender = add_token(&Combatant::new(50), TokenId::Dodge, 1);
    let defender = add_token(&defender, TokenId::EvadeCounter, 3);

    let outcome = hit(&config, &Combatant::new(50), &defender, &strike(10), HitContext::new(Side::Player));

    assert!(outcome.dodged);
    assert_eq!(outcome.damage_dealt, 0);
    assert_eq!(outcome.defender.hp, 50);
    assert_eq!(outcome.attacker.hp, 47);
    assert_eq!(get_token_stacks(&outcome.defender, TokenId::Dodge), 0);
}

#[test]
fn test_failed_dodge_still_consumes_stack() {
    let config = EngineConfig::default().with_dodge_chance(0);
    let defender = add_token(&Combatant::new(50), TokenId::Dodge, 2);

    let outcome = hit(&config, &Combatant::new(50), &defender, &strike(10), HitContext::new(Side::Player));

    assert!(!outcome.dodged);
    assert_eq!(outcome.damage_dealt, 10);
    assert_eq!(get_token_stacks(&outcome.defender, TokenId::Dodge), 1);
}

#[test]
fn test_retaliation() {
    let config = EngineConfig::default();
    let defender = Combatant::new(50).with_counter(2);
    let defender = add_token(&defender, TokenId::Reflect, 1);
    let defender = add_token(&defender, TokenId::CounterShot, 1);

    let outcome = player_hit(&Combatant::new(50), &defender, &strike(10));

    // counter 2, reflect 50% of 10, counter shot
    assert_eq!(outcome.attacker.hp, 50 - 2 - 5 - config.counter_shot_damage);
    assert_eq!(get_token_stacks(&outcome.defender, TokenId::CounterShot), 0);
}

#[test]
fn test_no_retaliation_when_fully_blocked() {
    let defender = Combatant::new(50).with_counter(2).with_block(20);

    let outcome = player_hit(&Combatant::new(50), &defender, &strike(10));

    assert_eq!(outcome.attacker.hp, 50);
}

#[test]
fn test_guard_fires_even_when_blocked() {
    let config = EngineConfig::default();
    let defender = add_token(&Combatant::new(50).with_block(20), TokenId::Guard, 2);

    let outcome = player_hit(&Combatant::new(50), &defender, &strike(10));

    assert_eq!(outcome.defender.block, 10 + 2 * config.guard_block);
    assert_eq!(outcome.timeline_push, 2 * config.guard_push);
}

#[test]
fn test_player_damage_reduction() {
    let owner = AbilityId::new(6);
    let config = EngineConfig::default();
    let cards = CardRegistry::new();
    let mut effects = EffectRegistry::new();
    effects.register(owner, TimingEvent::BeforeDamageTaken, Handler::Flat(EffectResult::damage_reduction(3)), 0);
    let active = [owner];
    let rules = Rules::new(&config, &cards, &effects, &active);

    let outcome = resolve_hit(
        &Combatant::new(50),
        &Combatant::new(50),
        &strike(10),
        &HitContext::new(Side::Enemy),
        &rules,
        &mut GameRng::new(1),
        None,
    );

    assert_eq!(outcome.defender.hp, 43);
}
