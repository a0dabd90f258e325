//! Stock AI policy.
//!
//! Each difficulty tier has an `AiConfig`. Every turn the AI first decides
//! whether it plays optimally (`optimal_play_chance`); if not it makes a
//! random but legal play. Optimal play switches away from a type
//! disadvantage some of the time and otherwise picks the move with the
//! highest expected damage.

use serde::{Deserialize, Serialize};

use crate::battle::BattleAction;
use crate::cards::{BattleCard, Move};
use crate::core::{BattleRng, Difficulty, DifficultyTable};

use super::damage::StandardDamage;
use super::{AiContext, AiPolicy};

/// Chance a suboptimal play is an attack rather than a switch.
const RANDOM_ATTACK_CHANCE: f64 = 0.8;

/// Chance an optimal play abandons a disadvantaged matchup.
const DISADVANTAGE_SWITCH_CHANCE: f64 = 0.7;

/// Tuning for one difficulty tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Probability the AI plays its best line on a given turn.
    pub optimal_play_chance: f64,

    /// Whether the AI builds counter-element decks and switches on matchups.
    pub uses_type_advantage: bool,

    /// Multiplier applied to mirrored stats when building the AI deck.
    pub stat_multiplier: f64,
}

impl AiConfig {
    /// Stock tuning for a tier.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (optimal_play_chance, uses_type_advantage, stat_multiplier) = match difficulty {
            Difficulty::Easy => (0.3, false, 0.8),
            Difficulty::Medium => (0.6, true, 1.0),
            Difficulty::Hard => (0.85, true, 1.2),
            Difficulty::Legendary => (0.95, true, 1.5),
        };
        Self {
            optimal_play_chance,
            uses_type_advantage,
            stat_multiplier,
        }
    }

    /// Stock tuning for every tier.
    #[must_use]
    pub fn table() -> DifficultyTable<AiConfig> {
        DifficultyTable::from_fn(AiConfig::for_difficulty)
    }

    /// Set the optimal-play chance.
    #[must_use]
    pub fn with_optimal_play_chance(mut self, chance: f64) -> Self {
        self.optimal_play_chance = chance;
        self
    }

    /// Set the stat multiplier.
    #[must_use]
    pub fn with_stat_multiplier(mut self, multiplier: f64) -> Self {
        self.stat_multiplier = multiplier;
        self
    }
}

/// Difficulty-tuned AI.
#[derive(Clone, Debug)]
pub struct StandardAi {
    configs: DifficultyTable<AiConfig>,
    estimator: StandardDamage,
}

impl Default for StandardAi {
    fn default() -> Self {
        Self::new(AiConfig::table())
    }
}

impl StandardAi {
    /// Create an AI with custom per-tier tuning.
    #[must_use]
    pub fn new(configs: DifficultyTable<AiConfig>) -> Self {
        Self {
            configs,
            estimator: StandardDamage,
        }
    }

    /// Best replacement for the active card: a living card with type
    /// advantage over the player's active card, else the healthiest.
    fn best_switch(&self, context: &AiContext<'_>) -> Option<usize> {
        let opponent = context.active_player_card().element();
        let candidates: Vec<(usize, &BattleCard)> = context.switch_targets().collect();

        if let Some((index, _)) = candidates
            .iter()
            .find(|(_, card)| card.element().has_advantage_over(opponent))
        {
            return Some(*index);
        }

        // max_by would keep the last of equal cards; keep the first
        let mut best: Option<(usize, f64)> = None;
        for (index, card) in candidates {
            let fraction = card.hp_fraction();
            if best.map_or(true, |(_, top)| fraction > top) {
                best = Some((index, fraction));
            }
        }
        best.map(|(index, _)| index)
    }

    fn random_action(&self, context: &AiContext<'_>, rng: &mut BattleRng) -> BattleAction {
        let card = context.active_ai_card();
        let attacks = rng.gen_bool(RANDOM_ATTACK_CHANCE);

        if attacks || context.switch_targets().next().is_none() {
            if let Some(mv) = rng.choose(card.moves()) {
                return BattleAction::Attack {
                    move_id: mv.id.clone(),
                };
            }
        }

        match self.best_switch(context) {
            Some(index) => BattleAction::switch(index),
            None => self.best_attack(card, context.active_player_card()),
        }
    }

    fn optimal_action(
        &self,
        context: &AiContext<'_>,
        config: &AiConfig,
        rng: &mut BattleRng,
    ) -> BattleAction {
        let card = context.active_ai_card();
        let opponent = context.active_player_card();

        if config.uses_type_advantage {
            let current = card.element().multiplier_against(opponent.element());
            if current < 1.0 {
                let better = context
                    .switch_targets()
                    .find(|(_, c)| c.element().multiplier_against(opponent.element()) > current)
                    .map(|(index, _)| index);

                if let Some(index) = better {
                    if rng.gen_bool(DISADVANTAGE_SWITCH_CHANCE) {
                        return BattleAction::switch(index);
                    }
                }
            }
        }

        self.best_attack(card, opponent)
    }

    fn best_attack(&self, attacker: &BattleCard, defender: &BattleCard) -> BattleAction {
        let mut best: Option<(&Move, u32)> = None;
        for mv in attacker.moves() {
            let score = self.estimator.expected_damage(attacker, defender, mv);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((mv, score));
            }
        }

        match best {
            Some((mv, _)) => BattleAction::Attack {
                move_id: mv.id.clone(),
            },
            // A card without moves cannot battle; the engine rejects such rosters
            None => BattleAction::Forfeit,
        }
    }
}

impl AiPolicy for StandardAi {
    fn choose_action(&self, context: &AiContext<'_>, rng: &mut BattleRng) -> BattleAction {
        if context.active_ai_card().is_knocked_out() {
            return match self.best_switch(context) {
                Some(index) => BattleAction::switch(index),
                None => BattleAction::Forfeit,
            };
        }

        let config = self.configs.get(context.difficulty);
        if !rng.gen_bool(config.optimal_play_chance) {
            return self.random_action(context, rng);
        }

        self.optimal_action(context, config, rng)
    }
}
