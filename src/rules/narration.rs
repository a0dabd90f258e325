//! Stock narrator.

use crate::cards::{BattleCard, Move};

use super::{DamageResult, Narrator};

/// Plain one-line descriptions.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardNarrator;

impl Narrator for StandardNarrator {
    fn describe_attack(
        &self,
        attacker: &BattleCard,
        defender: &BattleCard,
        mv: &Move,
        result: &DamageResult,
    ) -> String {
        if result.missed {
            return format!("{} used {}, but it missed!", attacker.creature_name(), mv.name);
        }
        if !mv.is_attack() {
            return format!("{} used {}.", attacker.creature_name(), mv.name);
        }

        let mut line = format!(
            "{} used {} on {} for {} damage!",
            attacker.creature_name(),
            mv.name,
            defender.creature_name(),
            result.damage
        );
        if result.is_critical {
            line.push_str(" A critical hit!");
        }
        if result.type_multiplier > 1.0 {
            line.push_str(" It's super effective!");
        } else if result.type_multiplier < 1.0 {
            line.push_str(" It's not very effective...");
        }
        line
    }
}
