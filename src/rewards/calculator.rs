//! Reward arithmetic.

use crate::battle::{BattleOutcome, BattleState};
use crate::core::{RewardConfig, Side};

use super::BattleRewards;

fn scale(value: u32, multiplier: f64) -> u32 {
    (value as f64 * multiplier).floor().max(0.0) as u32
}

/// Compute the rewards for a finished battle.
///
/// - `base_xp`: win or loss XP times the difficulty multiplier
/// - perfect: a win with no player card knocked out
/// - speed: a win whose last resolved turn is within the threshold
/// - type: flat XP per turn the player held type advantage, on any outcome
///
/// Bonuses stack.
///
/// ```
/// use card_battle::battle::BattleOutcome;
/// use card_battle::core::RewardConfig;
/// # use card_battle::battle::BattleBuilder;
/// # use card_battle::cards::{BaseStats, CardTemplate, Element, Move};
/// # let card = CardTemplate::new("c", "C", Element::Body, BaseStats::new(10, 10, 10, 50))
/// #     .with_move(Move::attack("hit", "Hit", Element::Body, 10));
/// # let battle = BattleBuilder::new(vec![card]).seed(1).build().unwrap();
/// use card_battle::rewards::calculate_rewards;
///
/// let rewards = calculate_rewards(battle.state(), BattleOutcome::Lose, &RewardConfig::default());
/// assert_eq!(rewards.base_xp, 37);
/// assert!(!rewards.perfect_bonus);
/// ```
#[must_use]
pub fn calculate_rewards(
    state: &BattleState,
    outcome: BattleOutcome,
    config: &RewardConfig,
) -> BattleRewards {
    let won = outcome.is_win();
    let multiplier = config.difficulty_multiplier(state.difficulty());
    let raw = if won {
        config.base_win_xp
    } else {
        config.base_lose_xp
    };
    let base_xp = scale(raw, multiplier);

    let mut bonus_xp: u32 = 0;

    let perfect_bonus = won && state.living_count(Side::Player) == state.player_cards().len();
    if perfect_bonus {
        bonus_xp = bonus_xp.saturating_add(scale(base_xp, config.perfect_multiplier - 1.0));
    }

    let final_turn = state.turn_number().saturating_sub(1);
    let speed_bonus = won && final_turn <= config.speed_bonus_turns;
    if speed_bonus {
        bonus_xp = bonus_xp.saturating_add(scale(base_xp, config.speed_multiplier - 1.0));
    }

    let advantage_turns = state.player_advantage_turns() as u32;
    let type_bonus = advantage_turns > 0;
    bonus_xp = bonus_xp.saturating_add(advantage_turns.saturating_mul(config.type_advantage_bonus));

    BattleRewards {
        base_xp,
        bonus_xp,
        total_xp: base_xp.saturating_add(bonus_xp),
        perfect_bonus,
        speed_bonus,
        type_bonus,
    }
}
