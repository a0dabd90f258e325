//! End-of-battle rewards.
//!
//! `calculate_rewards` is a pure function of the final battle state, the
//! outcome and a `RewardConfig`. The engine calls it exactly once per
//! battle, on entering a terminal phase.

mod calculator;

pub use calculator::calculate_rewards;

use serde::{Deserialize, Serialize};

/// XP awarded at the end of a battle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleRewards {
    /// Outcome XP scaled by difficulty.
    pub base_xp: u32,
    /// Sum of every bonus earned.
    pub bonus_xp: u32,
    /// `base_xp + bonus_xp`.
    pub total_xp: u32,
    /// Won without losing a card.
    pub perfect_bonus: bool,
    /// Won within the speed threshold.
    pub speed_bonus: bool,
    /// Held type advantage at least once.
    pub type_bonus: bool,
}
