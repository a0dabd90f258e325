//! Battle flow integration tests.
//!
//! Drive `CardBattle` through whole scenarios with deterministic
//! collaborators and check phases, turn records, fallbacks and the
//! end-of-battle hook.

mod common;

use card_battle::battle::{
    ActionOutcome, BattleAction, BattleBuilder, BattleOutcome, BattleSnapshot, Fallback, Phase,
    Rejection, TypeAdvantage,
};
use card_battle::cards::{BaseStats, BattleCard, CardTemplate, Element, Move, MoveId};
use card_battle::core::{BattleRng, Difficulty, Side};
use card_battle::rules::{BattleRules, DamageModel, DamageResult};

use common::{card, move_pool, scripted_rules, FixedDamage, FixedDeck, HookLog, ScriptedAi};

// =============================================================================
// Core Scenarios
// =============================================================================

/// One card each; a single 10-damage attack knocks out the AI's only card.
#[test]
fn test_one_card_victory_on_turn_one() {
    let log = HookLog::default();
    let mut battle = BattleBuilder::new(vec![card("hero", Element::Body, 100)])
        .difficulty(Difficulty::Easy)
        .rules(scripted_rules(10, vec![card("foe", Element::Body, 10)], vec![]))
        .seed(1)
        .on_battle_end(log.hook())
        .build()
        .unwrap();

    let outcome = battle.attack("strike");
    let turn = outcome.turn().unwrap();

    assert_eq!(turn.turn_number, 1);
    assert_eq!(turn.player_damage_dealt, 10);
    assert_eq!(turn.ai_damage_dealt, 0);
    assert!(turn.ai_card_ko);
    assert!(!turn.player_card_ko);

    assert_eq!(battle.phase(), Phase::Victory);
    assert_eq!(battle.outcome(), Some(BattleOutcome::Win));
    assert_eq!(battle.active_player_card().current_hp(), 100);

    let rewards = battle.rewards().unwrap();
    assert_eq!(rewards.base_xp, 100);
    assert!(rewards.perfect_bonus);
    assert!(rewards.speed_bonus);
    assert!(!rewards.type_bonus);
    assert_eq!(rewards.total_xp, 175);

    assert_eq!(log.count(), 1);
    assert_eq!(log.calls()[0].0, BattleOutcome::Win);
    assert_eq!(&log.calls()[0].1, rewards);
}

/// The player's active card goes down while the AI still stands: the battle
/// waits for a replacement.
#[test]
fn test_two_card_replacement_window() {
    let mut battle = BattleBuilder::new(vec![
        card("frail", Element::Body, 10),
        card("sturdy", Element::Mind, 50),
    ])
    .rules(scripted_rules(
        10,
        vec![card("x", Element::Soul, 100), card("y", Element::Soul, 100)],
        vec![],
    ))
    .seed(2)
    .build()
    .unwrap();

    let turn = battle.attack("strike").turn().cloned().unwrap();
    assert!(turn.player_card_ko);
    assert_eq!(battle.active_ai_card().current_hp(), 90);

    assert_eq!(battle.phase(), Phase::Battle);
    assert!(battle.can_switch());
    assert!(battle.needs_replacement());
    assert!(battle.active_player_card().is_knocked_out());

    // Attacks are refused until a replacement comes in
    assert_eq!(
        battle.attack("strike"),
        ActionOutcome::Rejected(Rejection::ReplacementRequired)
    );
    assert_eq!(battle.state().turn_number(), 2);
    assert_eq!(battle.state().turn_history().len(), 1);

    let turn = battle.switch_to_next().turn().cloned().unwrap();
    assert_eq!(turn.turn_number, 2);
    assert_eq!(turn.player_action, BattleAction::switch(1));
    assert_eq!(turn.player_damage_dealt, 0);
    assert_eq!(turn.ai_damage_dealt, 10);

    assert!(!battle.needs_replacement());
    assert_eq!(battle.state().active_index(Side::Player), 1);
    assert_eq!(battle.active_player_card().current_hp(), 40);
    assert!(!battle.can_switch());

    assert!(battle.attack("heavy").turn().is_some());
    assert_eq!(battle.state().turn_number(), 4);
}

/// Forfeiting on turn one ends the battle without recording a turn.
#[test]
fn test_forfeit_on_turn_one() {
    let log = HookLog::default();
    let mut battle = BattleBuilder::new(vec![card("hero", Element::Soul, 60)])
        .difficulty(Difficulty::Hard)
        .rules(scripted_rules(10, vec![card("foe", Element::Body, 60)], vec![]))
        .seed(3)
        .on_battle_end(log.hook())
        .build()
        .unwrap();

    assert_eq!(battle.forfeit(), ActionOutcome::Forfeited);

    assert_eq!(battle.phase(), Phase::Defeat);
    assert!(battle.state().turn_history().is_empty());
    assert_eq!(battle.state().turn_number(), 1);
    assert!(battle.last_turn_result().is_none());

    let rewards = battle.rewards().unwrap();
    assert_eq!(rewards.base_xp, 50);
    assert!(!rewards.perfect_bonus);
    assert!(!rewards.speed_bonus);
    assert_eq!(rewards.total_xp, 50);

    assert_eq!(log.calls(), vec![(BattleOutcome::Lose, rewards.clone())]);
}

// =============================================================================
// Terminal Guard Tests
// =============================================================================

/// After the battle ends, nothing changes and the hook never fires again.
#[test]
fn test_hook_fires_once() {
    let log = HookLog::default();
    let mut battle = BattleBuilder::new(vec![card("hero", Element::Body, 100)])
        .rules(scripted_rules(50, vec![card("foe", Element::Body, 50)], vec![]))
        .seed(4)
        .on_battle_end(log.hook())
        .build()
        .unwrap();

    battle.attack("strike");
    assert_eq!(battle.phase(), Phase::Victory);
    let finished = battle.state().clone();

    for outcome in [
        battle.attack("strike"),
        battle.switch_card(0),
        battle.switch_to_next(),
        battle.forfeit(),
    ] {
        assert_eq!(outcome, ActionOutcome::Rejected(Rejection::BattleOver));
    }

    assert_eq!(battle.state(), &finished);
    assert_eq!(battle.phase(), Phase::Victory);
    assert_eq!(log.count(), 1);
}

/// The player losing every card is a defeat.
#[test]
fn test_player_exhaustion_is_defeat() {
    let log = HookLog::default();
    let mut battle = BattleBuilder::new(vec![card("hero", Element::Body, 20)])
        .rules(scripted_rules(10, vec![card("foe", Element::Body, 100)], vec![]))
        .seed(5)
        .on_battle_end(log.hook())
        .build()
        .unwrap();

    battle.attack("strike");
    assert_eq!(battle.phase(), Phase::Battle);
    battle.attack("strike");

    assert_eq!(battle.phase(), Phase::Defeat);
    assert_eq!(battle.state().turn_number(), 3);
    assert!(!battle.needs_replacement());
    assert_eq!(log.count(), 1);
    assert_eq!(log.calls()[0].0, BattleOutcome::Lose);
}

// =============================================================================
// Rejection and Fallback Tests
// =============================================================================

/// Illegal switches change nothing, not even the RNG.
#[test]
fn test_illegal_switch_is_noop() {
    let mut battle = BattleBuilder::new(vec![
        card("a", Element::Body, 30),
        card("b", Element::Mind, 30),
    ])
    .seed(6)
    .build()
    .unwrap();
    let before = battle.snapshot();

    assert_eq!(
        battle.switch_card(0),
        ActionOutcome::Rejected(Rejection::IllegalSwitch(0))
    );
    assert_eq!(
        battle.switch_card(9),
        ActionOutcome::Rejected(Rejection::IllegalSwitch(9))
    );
    assert_eq!(battle.snapshot(), before);
}

/// Switching to a knocked-out card is refused.
#[test]
fn test_switch_to_knocked_out_card_rejected() {
    let mut battle = BattleBuilder::new(vec![
        card("a", Element::Body, 10),
        card("b", Element::Mind, 40),
        card("c", Element::Soul, 40),
    ])
    .rules(scripted_rules(10, vec![card("x", Element::Body, 200)], vec![]))
    .seed(7)
    .build()
    .unwrap();

    battle.attack("strike");
    assert!(battle.needs_replacement());

    // Card 0 is the downed active card
    assert_eq!(
        battle.switch_card(0),
        ActionOutcome::Rejected(Rejection::IllegalSwitch(0))
    );
    assert!(battle.switch_card(2).turn().is_some());
    assert_eq!(battle.state().active_index(Side::Player), 2);
}

/// A move id the active card does not know falls back to its first move.
#[test]
fn test_unknown_move_uses_first_move() {
    let mut battle = BattleBuilder::new(vec![card("hero", Element::Body, 100)])
        .rules(scripted_rules(7, vec![card("foe", Element::Body, 100)], vec![]))
        .seed(8)
        .build()
        .unwrap();

    let turn = battle.attack("does-not-exist").turn().cloned().unwrap();

    assert_eq!(turn.player_damage_dealt, 7);
    assert_eq!(
        turn.fallbacks.as_slice(),
        &[Fallback::UnknownMove {
            side: Side::Player,
            requested: MoveId::new("does-not-exist"),
        }]
    );
    assert_eq!(turn.player_action, BattleAction::attack("does-not-exist"));
}

/// An AI switch to an illegal target becomes an attack with its first move.
#[test]
fn test_illegal_ai_switch_falls_back() {
    let mut battle = BattleBuilder::new(vec![card("hero", Element::Body, 100)])
        .rules(scripted_rules(
            10,
            vec![card("foe", Element::Body, 100)],
            vec![BattleAction::switch(3)],
        ))
        .seed(9)
        .build()
        .unwrap();

    let turn = battle.attack("strike").turn().cloned().unwrap();

    assert_eq!(turn.ai_action, BattleAction::switch(3));
    assert_eq!(turn.ai_damage_dealt, 10);
    assert_eq!(
        turn.fallbacks.as_slice(),
        &[Fallback::IllegalAiAction(BattleAction::switch(3))]
    );
}

/// An AI forfeit is not honoured; the AI attacks instead.
#[test]
fn test_ai_forfeit_falls_back() {
    let mut battle = BattleBuilder::new(vec![card("hero", Element::Body, 100)])
        .rules(scripted_rules(
            10,
            vec![card("foe", Element::Body, 100)],
            vec![BattleAction::Forfeit],
        ))
        .seed(10)
        .build()
        .unwrap();

    let turn = battle.attack("strike").turn().cloned().unwrap();

    assert_eq!(battle.phase(), Phase::Battle);
    assert_eq!(turn.ai_damage_dealt, 10);
    assert_eq!(
        turn.fallbacks.as_slice(),
        &[Fallback::IllegalAiAction(BattleAction::Forfeit)]
    );
}

// =============================================================================
// AI Side Tests
// =============================================================================

/// A legal AI switch consumes the AI's turn.
#[test]
fn test_ai_switch_consumes_turn() {
    let mut battle = BattleBuilder::new(vec![card("hero", Element::Body, 100)])
        .rules(scripted_rules(
            10,
            vec![card("x", Element::Body, 100), card("y", Element::Mind, 100)],
            vec![BattleAction::switch(1)],
        ))
        .seed(11)
        .build()
        .unwrap();

    let turn = battle.attack("strike").turn().cloned().unwrap();

    assert_eq!(turn.ai_damage_dealt, 0);
    assert!(turn.fallbacks.is_empty());
    // The player's hit landed on the card that was active when the turn began
    assert_eq!(battle.state().ai_cards()[0].current_hp(), 90);
    assert_eq!(battle.state().active_index(Side::Ai), 1);
    assert_eq!(battle.active_ai_card().current_hp(), 100);
    assert!(turn.narration.contains("enters the battle"));
}

/// A knocked-out AI card never acts and is replaced in the same turn.
#[test]
fn test_ai_replacement_after_knockout() {
    let mut battle = BattleBuilder::new(vec![card("hero", Element::Body, 100)])
        .rules(scripted_rules(
            20,
            vec![card("x", Element::Body, 20), card("y", Element::Mind, 60)],
            vec![],
        ))
        .seed(12)
        .build()
        .unwrap();

    let turn = battle.attack("strike").turn().cloned().unwrap();

    assert!(turn.ai_card_ko);
    assert_eq!(turn.ai_damage_dealt, 0);
    assert_eq!(turn.ai_replacement, Some(1));
    assert_eq!(battle.phase(), Phase::Battle);
    assert_eq!(battle.active_ai_card().creature_name(), "y");
    assert_eq!(battle.active_player_card().current_hp(), 100);

    battle.attack("strike");
    battle.attack("strike");
    battle.attack("strike");
    assert_eq!(battle.phase(), Phase::Victory);
    assert_eq!(battle.state().turn_number(), 5);
    // y hit back on turns two and three, then fell on turn four
    assert_eq!(battle.active_player_card().current_hp(), 60);
}

/// Type advantage held by the player is recorded per turn.
#[test]
fn test_type_advantage_recorded() {
    let rules = BattleRules::standard()
        .with_damage(FixedDamage::new(5).with_multiplier(1.5))
        .with_ai(ScriptedAi::default())
        .with_deck(FixedDeck::new(vec![card("foe", Element::Body, 100)]));
    let mut battle = BattleBuilder::new(vec![card("hero", Element::Soul, 100)])
        .rules(rules)
        .seed(13)
        .build()
        .unwrap();

    for _ in 0..3 {
        let turn = battle.attack("strike").turn().cloned().unwrap();
        assert_eq!(turn.type_advantage, TypeAdvantage::Player);
    }
    assert_eq!(battle.state().player_advantage_turns(), 3);

    battle.forfeit();
    let rewards = battle.rewards().unwrap();
    assert!(rewards.type_bonus);
    assert_eq!(rewards.bonus_xp, 15);
}

/// A switch turn records no advantage, even when the AI's hit is resisted.
#[test]
fn test_switch_turn_has_no_type_advantage() {
    let rules = BattleRules::standard()
        .with_damage(FixedDamage::new(5).with_multiplier(0.75))
        .with_ai(ScriptedAi::default())
        .with_deck(FixedDeck::new(vec![card("foe", Element::Body, 100)]));
    let mut battle = BattleBuilder::new(vec![
        card("lead", Element::Soul, 100),
        card("bench", Element::Soul, 100),
    ])
    .rules(rules)
    .seed(14)
    .build()
    .unwrap();

    let turn = battle.switch_card(1).turn().cloned().unwrap();
    assert_eq!(turn.player_damage_dealt, 0);
    assert_eq!(turn.ai_damage_dealt, 5);
    assert_eq!(turn.type_advantage, TypeAdvantage::Neutral);

    battle.forfeit();
    let rewards = battle.rewards().unwrap();
    assert!(!rewards.type_bonus);
    assert_eq!(rewards.bonus_xp, 0);
}

/// A support move never counts as a type-advantage turn.
#[test]
fn test_support_move_has_no_type_advantage() {
    let hero = CardTemplate::new("hero", "Hero", Element::Soul, BaseStats::new(20, 20, 10, 100))
        .with_move(Move::support("brace", "Brace", Element::Soul));
    let rules = BattleRules::standard()
        .with_damage(FixedDamage::new(0).with_multiplier(1.5))
        .with_ai(ScriptedAi::default())
        .with_deck(FixedDeck::new(vec![card("foe", Element::Body, 100)]));
    let mut battle = BattleBuilder::new(vec![hero])
        .rules(rules)
        .seed(15)
        .build()
        .unwrap();

    let turn = battle.attack("brace").turn().cloned().unwrap();
    assert_eq!(turn.type_advantage, TypeAdvantage::Neutral);
    assert_eq!(battle.state().player_advantage_turns(), 0);
}

// =============================================================================
// Roster Setup
// =============================================================================

/// Max HP is always the same flat value, whatever the template says.
struct FlatHp(u32);

impl DamageModel for FlatHp {
    fn max_hp(&self, _template: &CardTemplate) -> u32 {
        self.0
    }

    fn calculate(
        &self,
        _attacker: &BattleCard,
        _defender: &BattleCard,
        _mv: &Move,
        _rng: &mut BattleRng,
    ) -> DamageResult {
        DamageResult::hit(1)
    }
}

/// Both rosters take their max HP from the configured damage model.
#[test]
fn test_both_rosters_use_damage_model_hp() {
    let battle = BattleBuilder::new(vec![
        card("hero", Element::Body, 200),
        card("sidekick", Element::Mind, 80),
    ])
    .difficulty(Difficulty::Medium)
    .move_pool(move_pool())
    .rules(BattleRules::standard().with_damage(FlatHp(10)))
    .seed(16)
    .build()
    .unwrap();

    let state = battle.state();
    assert_eq!(state.ai_cards().len(), 2);
    for side in Side::BOTH {
        for card in state.cards(side) {
            assert_eq!(card.max_hp(), 10);
            assert_eq!(card.current_hp(), 10);
        }
    }
}

/// A custom AI roster is also run through the damage model.
#[test]
fn test_custom_ai_roster_uses_damage_model_hp() {
    let rules = BattleRules::standard()
        .with_damage(FlatHp(25))
        .with_deck(FixedDeck::new(vec![card("giant", Element::Body, 900)]));
    let battle = BattleBuilder::new(vec![card("hero", Element::Body, 100)])
        .rules(rules)
        .seed(17)
        .build()
        .unwrap();

    assert_eq!(battle.active_ai_card().max_hp(), 25);
    assert_eq!(battle.active_player_card().max_hp(), 25);
}

/// The stock damage model grows AI HP with the mirrored evolution stage.
#[test]
fn test_stock_ai_hp_follows_evolution_stage() {
    let hero = card("hero", Element::Body, 100).with_evolution_stage(2);
    let battle = BattleBuilder::new(vec![hero])
        .difficulty(Difficulty::Legendary)
        .move_pool(move_pool())
        .seed(18)
        .build()
        .unwrap();

    // Legendary scales HP to 150, then two stages add 30%
    assert_eq!(battle.active_ai_card().max_hp(), 195);
    assert_eq!(battle.active_player_card().max_hp(), 130);
}

// =============================================================================
// Determinism Tests
// =============================================================================

fn standard_battle(seed: u64, difficulty: Difficulty) -> card_battle::battle::CardBattle {
    BattleBuilder::new(vec![
        card("a", Element::Body, 90),
        card("b", Element::Mind, 90),
        card("c", Element::Soul, 90),
    ])
    .difficulty(difficulty)
    .move_pool(move_pool())
    .seed(seed)
    .build()
    .unwrap()
}

/// Play until the battle ends, replacing downed cards as needed.
fn play_out(battle: &mut card_battle::battle::CardBattle, max_turns: usize) {
    for step in 0..max_turns {
        if battle.phase() != Phase::Battle {
            return;
        }
        if battle.needs_replacement() {
            battle.switch_to_next();
        } else if step % 2 == 0 {
            battle.attack("heavy");
        } else {
            battle.attack("strike");
        }
    }
}

/// Same seed and same actions produce the same battle.
#[test]
fn test_same_seed_replays_identically() {
    let mut first = standard_battle(99, Difficulty::Hard);
    let mut second = standard_battle(99, Difficulty::Hard);
    assert_eq!(first.state(), second.state());

    play_out(&mut first, 200);
    play_out(&mut second, 200);

    assert_eq!(first.state(), second.state());
    assert_eq!(first.rewards(), second.rewards());
    assert_eq!(first.snapshot(), second.snapshot());
}

/// Different seeds produce different battle ids.
#[test]
fn test_different_seeds_differ() {
    let first = standard_battle(1, Difficulty::Medium);
    let second = standard_battle(2, Difficulty::Medium);

    assert_ne!(first.battle_id(), second.battle_id());
}

/// Stock rules play every difficulty to a terminal phase.
#[test]
fn test_standard_rules_finish_every_difficulty() {
    for difficulty in Difficulty::ALL {
        for seed in 0..5 {
            let log = HookLog::default();
            let mut battle = standard_battle(seed, difficulty);
            battle.set_on_battle_end(log.hook());

            play_out(&mut battle, 500);

            assert!(battle.phase().is_terminal(), "{} seed {}", difficulty, seed);
            assert!(battle.state().check_invariants().is_ok());
            assert_eq!(log.count(), 1);
            assert_eq!(
                battle.state().turn_number() as usize,
                battle.state().turn_history().len() + 1
            );
        }
    }
}

// =============================================================================
// Snapshot Tests
// =============================================================================

/// A restored snapshot continues exactly like the original battle.
#[test]
fn test_snapshot_resume_matches_original() {
    let mut original = standard_battle(7, Difficulty::Legendary);
    original.attack("heavy");
    original.attack("strike");

    let bytes = original.snapshot().to_bytes().unwrap();
    let mut restored = BattleBuilder::restore(BattleSnapshot::from_bytes(&bytes).unwrap())
        .build()
        .unwrap();

    assert_eq!(restored.state(), original.state());
    assert_eq!(restored.battle_id(), original.battle_id());

    play_out(&mut original, 200);
    play_out(&mut restored, 200);

    assert_eq!(restored.state(), original.state());
    assert_eq!(restored.rewards(), original.rewards());
}

/// A finished battle restores as finished and rejects further actions.
#[test]
fn test_snapshot_of_finished_battle() {
    let mut battle = standard_battle(5, Difficulty::Easy);
    battle.forfeit();

    let log = HookLog::default();
    let mut restored = BattleBuilder::restore(battle.snapshot())
        .on_battle_end(log.hook())
        .build()
        .unwrap();

    assert_eq!(restored.phase(), Phase::Defeat);
    assert_eq!(restored.rewards(), battle.rewards());
    assert_eq!(
        restored.attack("strike"),
        ActionOutcome::Rejected(Rejection::BattleOver)
    );
    assert_eq!(log.count(), 0);
}

/// A tampered snapshot is refused.
#[test]
fn test_inconsistent_snapshot_rejected() {
    let mut battle = standard_battle(5, Difficulty::Easy);
    battle.attack("strike");

    let mut snapshot = battle.snapshot();
    snapshot.rewards = Some(Default::default());

    let err = BattleBuilder::restore(snapshot).build().unwrap_err();
    assert!(matches!(
        err,
        card_battle::core::BattleError::InconsistentState(_)
    ));
}

/// Settings that only shape a new battle leave a restored one untouched.
#[test]
fn test_restore_ignores_new_battle_settings() {
    let mut original = standard_battle(21, Difficulty::Hard);
    original.attack("strike");

    let mut restored = BattleBuilder::restore(original.snapshot())
        .difficulty(Difficulty::Easy)
        .move_pool(Default::default())
        .seed(99)
        .battle_id("elsewhere")
        .build()
        .unwrap();

    assert_eq!(restored.state().difficulty(), Difficulty::Hard);
    assert_eq!(restored.battle_id(), original.battle_id());
    assert_eq!(restored.attack("heavy"), original.attack("heavy"));
    assert_eq!(restored.snapshot(), original.snapshot());
}
