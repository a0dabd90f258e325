//! Shared fixtures for integration tests.
//!
//! Deterministic collaborators so scenarios can assert exact HP values:
//! - `FixedDamage`: every attack deals the same damage
//! - `ScriptedAi`: plays a fixed list of actions, one per turn
//! - `FixedDeck`: returns a prepared AI roster

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use card_battle::battle::{BattleAction, BattleOutcome};
use card_battle::cards::{BaseStats, BattleCard, CardTemplate, Element, Move, MovePool};
use card_battle::core::{BattleRng, Difficulty};
use card_battle::rewards::BattleRewards;
use card_battle::rules::{AiContext, AiPolicy, BattleRules, DamageModel, DamageResult, DeckGenerator};

// =============================================================================
// Collaborators
// =============================================================================

/// Every attack deals `damage` with the given multiplier; max HP is the
/// template's HP stat.
#[derive(Clone, Copy, Debug)]
pub struct FixedDamage {
    pub damage: u32,
    pub type_multiplier: f64,
    pub critical: bool,
}

impl FixedDamage {
    pub fn new(damage: u32) -> Self {
        Self {
            damage,
            type_multiplier: 1.0,
            critical: false,
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.type_multiplier = multiplier;
        self
    }
}

impl DamageModel for FixedDamage {
    fn max_hp(&self, template: &CardTemplate) -> u32 {
        template.stats.hp
    }

    fn calculate(
        &self,
        _attacker: &BattleCard,
        _defender: &BattleCard,
        _mv: &Move,
        _rng: &mut BattleRng,
    ) -> DamageResult {
        DamageResult {
            damage: self.damage,
            is_critical: self.critical,
            type_multiplier: self.type_multiplier,
            missed: false,
        }
    }
}

/// Plays `script[turn - 1]`, then attacks with its first move.
///
/// When its active card is down it switches to the first living card.
#[derive(Clone, Debug, Default)]
pub struct ScriptedAi {
    pub script: Vec<BattleAction>,
}

impl ScriptedAi {
    pub fn new(script: Vec<BattleAction>) -> Self {
        Self { script }
    }
}

impl AiPolicy for ScriptedAi {
    fn choose_action(&self, context: &AiContext<'_>, _rng: &mut BattleRng) -> BattleAction {
        if context.active_ai_card().is_knocked_out() {
            return match context.switch_targets().next() {
                Some((index, _)) => BattleAction::switch(index),
                None => BattleAction::Forfeit,
            };
        }

        let turn = context.turn_number as usize;
        if let Some(action) = self.script.get(turn.saturating_sub(1)) {
            return action.clone();
        }
        let first = &context.active_ai_card().moves()[0];
        BattleAction::Attack {
            move_id: first.id.clone(),
        }
    }
}

/// Returns the prepared roster as is.
#[derive(Clone, Debug, Default)]
pub struct FixedDeck {
    pub cards: Vec<CardTemplate>,
}

impl FixedDeck {
    pub fn new(cards: Vec<CardTemplate>) -> Self {
        Self { cards }
    }
}

impl DeckGenerator for FixedDeck {
    fn generate(
        &self,
        _player_cards: &[BattleCard],
        _difficulty: Difficulty,
        _move_pool: &MovePool,
        _rng: &mut BattleRng,
    ) -> Vec<BattleCard> {
        self.cards
            .iter()
            .map(|template| BattleCard::new(template.clone(), template.stats.hp))
            .collect()
    }
}

// =============================================================================
// Builders
// =============================================================================

/// A card with two attack moves, `strike` and `heavy`.
pub fn card(id: &str, element: Element, hp: u32) -> CardTemplate {
    CardTemplate::new(id, id, element, BaseStats::new(20, 20, 10, hp))
        .with_move(Move::attack("strike", "Strike", element, 30))
        .with_move(Move::attack("heavy", "Heavy Blow", element, 50))
}

/// Fixed damage, scripted AI and a fixed AI roster.
pub fn scripted_rules(damage: u32, ai_roster: Vec<CardTemplate>, script: Vec<BattleAction>) -> BattleRules {
    BattleRules::standard()
        .with_damage(FixedDamage::new(damage))
        .with_ai(ScriptedAi::new(script))
        .with_deck(FixedDeck::new(ai_roster))
}

/// A small move pool covering every element.
pub fn move_pool() -> MovePool {
    [
        Move::attack("slam", "Slam", Element::Body, 40),
        Move::attack("pierce", "Mind Pierce", Element::Mind, 40),
        Move::attack("wisp", "Soul Wisp", Element::Soul, 40),
        Move::support("brace", "Brace", Element::Body),
    ]
    .into_iter()
    .collect()
}

/// Records every hook call.
#[derive(Clone, Debug, Default)]
pub struct HookLog(pub Rc<RefCell<Vec<(BattleOutcome, BattleRewards)>>>);

impl HookLog {
    pub fn hook(&self) -> impl FnMut(BattleOutcome, &BattleRewards) + 'static {
        let calls = Rc::clone(&self.0);
        move |outcome, rewards| calls.borrow_mut().push((outcome, rewards.clone()))
    }

    pub fn calls(&self) -> Vec<(BattleOutcome, BattleRewards)> {
        self.0.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.0.borrow().len()
    }
}
