//! Stock AI deck generator.
//!
//! Mirrors the player's roster one card at a time. On tiers that play the
//! type triangle, each AI card takes the element that counters its
//! opposite number; otherwise elements rotate body, mind, soul. Stats are
//! the mirrored card's stats scaled by the tier's stat multiplier. Max HP
//! is left to the engine, which runs every AI template through the
//! configured `DamageModel` like the player's.

use crate::cards::{BattleCard, CardTemplate, Element, MovePool, MoveSet};
use crate::core::{BattleRng, Difficulty, DifficultyTable};

use super::ai::AiConfig;
use super::DeckGenerator;

const MAX_STAGE: u8 = 5;

const BODY_NAMES: &[&str] = &["Ironclad Guardian", "Steel Sentinel", "Bronze Titan"];
const MIND_NAMES: &[&str] = &["Mystic Oracle", "Thought Weaver", "Psionic Echo"];
const SOUL_NAMES: &[&str] = &["Spirit Wisp", "Ethereal Shade", "Astral Phoenix"];

fn names_for(element: Element) -> &'static [&'static str] {
    match element {
        Element::Body => BODY_NAMES,
        Element::Mind => MIND_NAMES,
        Element::Soul => SOUL_NAMES,
    }
}

/// Builds an AI roster that mirrors the player's.
#[derive(Clone, Debug)]
pub struct MirrorDeck {
    configs: DifficultyTable<AiConfig>,
}

impl Default for MirrorDeck {
    fn default() -> Self {
        Self::new(AiConfig::table())
    }
}

impl MirrorDeck {
    #[must_use]
    pub fn new(configs: DifficultyTable<AiConfig>) -> Self {
        Self { configs }
    }

    fn moves_for(element: Element, pool: &MovePool, reference: &BattleCard) -> MoveSet {
        let mut moves = MoveSet::new();
        if let Some(mv) = pool.first_attack_of(element).or_else(|| pool.first()) {
            moves.push(mv.clone());
        } else {
            moves.extend(reference.moves().iter().cloned());
        }
        moves
    }
}

impl DeckGenerator for MirrorDeck {
    fn generate(
        &self,
        player_cards: &[BattleCard],
        difficulty: Difficulty,
        move_pool: &MovePool,
        rng: &mut BattleRng,
    ) -> Vec<BattleCard> {
        let config = self.configs.get(difficulty);

        player_cards
            .iter()
            .enumerate()
            .map(|(index, reference)| {
                let element = if config.uses_type_advantage {
                    reference.element().countered_by()
                } else {
                    Element::ALL[index % Element::ALL.len()]
                };

                let stats = reference.stats().scaled(config.stat_multiplier);
                let stage = reference.template.evolution_stage.min(MAX_STAGE);
                let name = rng
                    .choose(names_for(element))
                    .copied()
                    .unwrap_or("Wild Adversary");

                let mut template = CardTemplate::new(
                    format!("ai-{}-{}", element, index),
                    name,
                    element,
                    stats,
                )
                .with_species("AI Adversary")
                .with_evolution_stage(stage);
                template.moves = Self::moves_for(element, move_pool, reference);

                BattleCard::new(template, stats.hp)
            })
            .collect()
    }
}
