//! Collaborator seams for the battle engine.
//!
//! The state machine orchestrates whatever these collaborators return; it
//! never does damage arithmetic, AI decision making or deck construction
//! itself. Each concern is a trait so hosts (and tests) can swap it:
//!
//! - `DamageModel`: max HP at roster setup, per-attack damage
//! - `AiPolicy`: the AI's action each turn and its replacement picks
//! - `DeckGenerator`: the AI roster, built once at construction
//! - `Narrator`: flavour text for attacks and switches
//!
//! `BattleRules` bundles one of each. `BattleRules::standard()` wires up the
//! stock implementations.
//!
//! ## Contracts
//!
//! - `max_hp` returns a positive value.
//! - `calculate` returns a non-negative damage and a positive type
//!   multiplier (`> 1` favours the attacker's side, `< 1` the defender's).
//! - `choose_action` returns exactly one action; the engine sanitises
//!   anything illegal with a named fallback rather than failing.
//! - All collaborators are synchronous and draw chance only from the
//!   `BattleRng` they are handed.

mod ai;
mod damage;
mod deck;
mod narration;

pub use ai::{AiConfig, StandardAi};
pub use damage::{StandardDamage, CRITICAL_CHANCE, CRITICAL_MULTIPLIER};
pub use deck::MirrorDeck;
pub use narration::StandardNarrator;

use crate::cards::{BattleCard, CardTemplate, Move, MovePool};
use crate::core::{BattleRng, Difficulty};

/// Outcome of one damage calculation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageResult {
    /// HP to subtract from the defender.
    pub damage: u32,
    /// Whether the hit was critical.
    pub is_critical: bool,
    /// Type multiplier of the matchup.
    pub type_multiplier: f64,
    /// Whether the attack missed outright.
    pub missed: bool,
}

impl DamageResult {
    /// A plain hit with no critical and a neutral matchup.
    #[must_use]
    pub fn hit(damage: u32) -> Self {
        Self {
            damage,
            is_critical: false,
            type_multiplier: 1.0,
            missed: false,
        }
    }

    /// A miss.
    #[must_use]
    pub fn miss(type_multiplier: f64) -> Self {
        Self {
            damage: 0,
            is_critical: false,
            type_multiplier,
            missed: true,
        }
    }
}

/// Read-only view of a battle handed to the AI each turn.
#[derive(Clone, Copy, Debug)]
pub struct AiContext<'a> {
    pub ai_cards: &'a [BattleCard],
    pub player_cards: &'a [BattleCard],
    pub active_ai_index: usize,
    pub active_player_index: usize,
    pub turn_number: u32,
    pub difficulty: Difficulty,
}

impl<'a> AiContext<'a> {
    /// The AI's active card.
    #[must_use]
    pub fn active_ai_card(&self) -> &'a BattleCard {
        &self.ai_cards[self.active_ai_index]
    }

    /// The player's active card.
    #[must_use]
    pub fn active_player_card(&self) -> &'a BattleCard {
        &self.player_cards[self.active_player_index]
    }

    /// AI roster indices that are legal switch targets.
    pub fn switch_targets(&self) -> impl Iterator<Item = (usize, &'a BattleCard)> + '_ {
        let active = self.active_ai_index;
        self.ai_cards
            .iter()
            .enumerate()
            .filter(move |(i, card)| *i != active && !card.is_knocked_out())
    }
}

/// Stat arithmetic: HP at setup, damage per attack.
pub trait DamageModel: Send + Sync {
    /// Max HP for a card entering battle. Must be positive.
    fn max_hp(&self, template: &CardTemplate) -> u32;

    /// Damage `attacker` deals to `defender` with `mv`.
    fn calculate(
        &self,
        attacker: &BattleCard,
        defender: &BattleCard,
        mv: &Move,
        rng: &mut BattleRng,
    ) -> DamageResult;
}

/// AI move selection.
pub trait AiPolicy: Send + Sync {
    /// Choose the AI's action for this turn.
    ///
    /// Also called when the AI's active card has just been knocked out; a
    /// `Switch` answer then names the replacement.
    fn choose_action(&self, context: &AiContext<'_>, rng: &mut BattleRng) -> crate::battle::BattleAction;
}

/// AI roster construction.
pub trait DeckGenerator: Send + Sync {
    /// Build the AI roster against the player's initialised roster.
    ///
    /// Only the returned templates are kept: the engine derives each AI
    /// card's max HP from the battle's `DamageModel`.
    fn generate(
        &self,
        player_cards: &[BattleCard],
        difficulty: Difficulty,
        move_pool: &MovePool,
        rng: &mut BattleRng,
    ) -> Vec<BattleCard>;
}

/// Flavour text.
pub trait Narrator: Send + Sync {
    /// Describe an attack and its result.
    fn describe_attack(
        &self,
        attacker: &BattleCard,
        defender: &BattleCard,
        mv: &Move,
        result: &DamageResult,
    ) -> String;

    /// Describe a card entering the battle.
    fn describe_switch(&self, card: &BattleCard) -> String {
        format!("{} enters the battle!", card.creature_name())
    }
}

/// The full set of collaborators a battle consults.
pub struct BattleRules {
    damage: Box<dyn DamageModel>,
    ai: Box<dyn AiPolicy>,
    deck: Box<dyn DeckGenerator>,
    narrator: Box<dyn Narrator>,
}

impl BattleRules {
    /// Stock damage model, AI, deck generator and narrator.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            damage: Box::new(StandardDamage),
            ai: Box::new(StandardAi::default()),
            deck: Box::new(MirrorDeck::default()),
            narrator: Box::new(StandardNarrator),
        }
    }

    /// Set a custom damage model.
    #[must_use]
    pub fn with_damage<D: DamageModel + 'static>(mut self, damage: D) -> Self {
        self.damage = Box::new(damage);
        self
    }

    /// Set a custom AI policy.
    #[must_use]
    pub fn with_ai<A: AiPolicy + 'static>(mut self, ai: A) -> Self {
        self.ai = Box::new(ai);
        self
    }

    /// Set a custom deck generator.
    #[must_use]
    pub fn with_deck<G: DeckGenerator + 'static>(mut self, deck: G) -> Self {
        self.deck = Box::new(deck);
        self
    }

    /// Set a custom narrator.
    #[must_use]
    pub fn with_narrator<N: Narrator + 'static>(mut self, narrator: N) -> Self {
        self.narrator = Box::new(narrator);
        self
    }

    #[must_use]
    pub fn damage(&self) -> &dyn DamageModel {
        self.damage.as_ref()
    }

    #[must_use]
    pub fn ai(&self) -> &dyn AiPolicy {
        self.ai.as_ref()
    }

    #[must_use]
    pub fn deck(&self) -> &dyn DeckGenerator {
        self.deck.as_ref()
    }

    #[must_use]
    pub fn narrator(&self) -> &dyn Narrator {
        self.narrator.as_ref()
    }
}

impl Default for BattleRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for BattleRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleRules").finish_non_exhaustive()
    }
}
