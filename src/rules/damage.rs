//! Stock damage model.

use crate::cards::{BattleCard, CardTemplate, Move};
use crate::core::BattleRng;

use super::{DamageModel, DamageResult};

/// Chance that a landed hit is critical.
pub const CRITICAL_CHANCE: f64 = 1.0 / 16.0;

/// Damage multiplier for a critical hit.
pub const CRITICAL_MULTIPLIER: f64 = 1.5;

/// HP growth per evolution stage.
const HP_PER_STAGE: f64 = 0.15;

/// Scales `power × attack / defense` down to per-hit damage.
const DAMAGE_SCALE: f64 = 0.5;

/// Element-triangle damage with accuracy and critical rolls.
///
/// `damage = floor(power × attack / defense × 0.5 × type multiplier)`, at
/// least 1 on a landed attack, then ×1.5 on a critical. Support moves deal
/// nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardDamage;

impl StandardDamage {
    /// Deterministic damage before accuracy and critical rolls.
    ///
    /// Also used by the AI to rank its moves.
    #[must_use]
    pub fn expected_damage(&self, attacker: &BattleCard, defender: &BattleCard, mv: &Move) -> u32 {
        if !mv.is_attack() {
            return 0;
        }
        let attack = attacker.stats().attack.max(1) as f64;
        let defense = defender.stats().defense.max(1) as f64;
        let multiplier = mv.element.multiplier_against(defender.element());
        let raw = mv.power as f64 * attack / defense * DAMAGE_SCALE * multiplier;
        (raw.floor() as u32).max(1)
    }
}

impl DamageModel for StandardDamage {
    fn max_hp(&self, template: &CardTemplate) -> u32 {
        let growth = 1.0 + template.evolution_stage as f64 * HP_PER_STAGE;
        ((template.stats.hp as f64 * growth).floor() as u32).max(1)
    }

    fn calculate(
        &self,
        attacker: &BattleCard,
        defender: &BattleCard,
        mv: &Move,
        rng: &mut BattleRng,
    ) -> DamageResult {
        if !mv.is_attack() {
            return DamageResult::hit(0);
        }

        let type_multiplier = mv.element.multiplier_against(defender.element());

        if !rng.roll_percent(mv.accuracy) {
            return DamageResult::miss(type_multiplier);
        }

        let base = self.expected_damage(attacker, defender, mv);
        let is_critical = rng.gen_bool(CRITICAL_CHANCE);
        let damage = if is_critical {
            (base as f64 * CRITICAL_MULTIPLIER).floor() as u32
        } else {
            base
        };

        DamageResult {
            damage,
            is_critical,
            type_multiplier,
            missed: false,
        }
    }
}
