//! Battle configuration types.
//!
//! Hosts configure a battle at construction by providing:
//! - `Difficulty`: which AI tier the player faces
//! - `DifficultyTable`: a per-difficulty value (multipliers, AI tuning)
//! - `RewardConfig`: the XP table the reward calculator scores against
//!
//! All configuration is plain data with serde derives, so hosts can ship it
//! alongside their own settings files.

use serde::{Deserialize, Serialize};

/// AI difficulty tier, chosen by the player before a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Learning the ropes.
    Easy,
    /// A balanced challenge.
    #[default]
    Medium,
    /// For experienced battlers.
    Hard,
    /// Only the strongest survive.
    Legendary,
}

impl Difficulty {
    /// Every tier, easiest first.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Legendary,
    ];
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Legendary => "legendary",
        };
        f.write_str(label)
    }
}

/// One value per difficulty tier.
///
/// Backed by named fields rather than a map, so a missing tier is a
/// compile error instead of a runtime lookup miss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable<T> {
    pub easy: T,
    pub medium: T,
    pub hard: T,
    pub legendary: T,
}

impl<T> DifficultyTable<T> {
    /// Create a table from a factory function.
    pub fn from_fn(factory: impl Fn(Difficulty) -> T) -> Self {
        Self {
            easy: factory(Difficulty::Easy),
            medium: factory(Difficulty::Medium),
            hard: factory(Difficulty::Hard),
            legendary: factory(Difficulty::Legendary),
        }
    }

    /// Get the value for a tier.
    #[must_use]
    pub fn get(&self, difficulty: Difficulty) -> &T {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
            Difficulty::Legendary => &self.legendary,
        }
    }

    /// Get a mutable reference to the value for a tier.
    pub fn get_mut(&mut self, difficulty: Difficulty) -> &mut T {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
            Difficulty::Legendary => &mut self.legendary,
        }
    }
}

/// XP table used by the reward calculator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// XP for a win before multipliers.
    pub base_win_xp: u32,

    /// XP for a loss (including forfeits) before multipliers.
    pub base_lose_xp: u32,

    /// Multiplier applied to the base XP per difficulty.
    pub difficulty_multipliers: DifficultyTable<f64>,

    /// Perfect clear (no player card knocked out) multiplier.
    /// The bonus is `base_xp × (perfect_multiplier − 1)`.
    pub perfect_multiplier: f64,

    /// Speed clear multiplier. The bonus is `base_xp × (speed_multiplier − 1)`.
    pub speed_multiplier: f64,

    /// A win whose last resolved turn is at or below this number earns the
    /// speed bonus.
    pub speed_bonus_turns: u32,

    /// Flat XP per turn in which the player held type advantage.
    pub type_advantage_bonus: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            base_win_xp: 100,
            base_lose_xp: 25,
            difficulty_multipliers: DifficultyTable {
                easy: 1.0,
                medium: 1.5,
                hard: 2.0,
                legendary: 3.0,
            },
            perfect_multiplier: 1.5,
            speed_multiplier: 1.25,
            speed_bonus_turns: 5,
            type_advantage_bonus: 5,
        }
    }
}

impl RewardConfig {
    /// Set the base XP for wins and losses.
    #[must_use]
    pub fn with_base_xp(mut self, win: u32, lose: u32) -> Self {
        self.base_win_xp = win;
        self.base_lose_xp = lose;
        self
    }

    /// Set the multiplier for one difficulty tier.
    #[must_use]
    pub fn with_difficulty_multiplier(mut self, difficulty: Difficulty, multiplier: f64) -> Self {
        *self.difficulty_multipliers.get_mut(difficulty) = multiplier;
        self
    }

    /// Set the perfect-clear multiplier.
    #[must_use]
    pub fn with_perfect_multiplier(mut self, multiplier: f64) -> Self {
        self.perfect_multiplier = multiplier;
        self
    }

    /// Set the speed-clear multiplier and turn threshold.
    #[must_use]
    pub fn with_speed_bonus(mut self, multiplier: f64, turns: u32) -> Self {
        self.speed_multiplier = multiplier;
        self.speed_bonus_turns = turns;
        self
    }

    /// Set the flat XP per type-advantage turn.
    #[must_use]
    pub fn with_type_advantage_bonus(mut self, bonus: u32) -> Self {
        self.type_advantage_bonus = bonus;
        self
    }

    /// Multiplier for a tier.
    #[must_use]
    pub fn difficulty_multiplier(&self, difficulty: Difficulty) -> f64 {
        *self.difficulty_multipliers.get(difficulty)
    }
}
