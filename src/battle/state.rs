//! Battle state.
//!
//! ## BattleState
//!
//! Everything a battle is at one instant:
//! - Phase and turn counter
//! - Both rosters and their active indices
//! - Append-only turn history
//! - Running per-side damage totals
//! - Battle id and difficulty
//!
//! The state is a value. `resolve_turn` takes one state and produces the
//! next; nothing outside this crate can mutate a state in place. The turn
//! history is an `im::Vector`, so cloning a state for a transition shares
//! the history instead of copying it.
//!
//! ## Invariants
//!
//! `check_invariants` reports every violated invariant:
//! - each active index is in range and is the only card flagged active
//! - `0 <= current_hp <= max_hp` and `max_hp > 0`
//! - `is_knocked_out == (current_hp == 0)`
//! - `turn_number == turn_history.len() + 1`
//! - the AI's active card is never knocked out while the battle runs
//! - the phase agrees with roster exhaustion

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::BattleCard;
use crate::core::{Difficulty, Side, SideMap};
use crate::rules::AiContext;

use super::action::{BattleOutcome, TurnResult, TypeAdvantage};

/// Battle lifecycle phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// The battle is running.
    #[default]
    Battle,
    /// The AI roster is exhausted. Terminal.
    Victory,
    /// The player roster is exhausted or the player forfeited. Terminal.
    Defeat,
}

impl Phase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != Phase::Battle
    }

    /// Outcome for a terminal phase.
    #[must_use]
    pub fn outcome(self) -> Option<BattleOutcome> {
        match self {
            Phase::Battle => None,
            Phase::Victory => Some(BattleOutcome::Win),
            Phase::Defeat => Some(BattleOutcome::Lose),
        }
    }
}

impl From<BattleOutcome> for Phase {
    fn from(outcome: BattleOutcome) -> Self {
        match outcome {
            BattleOutcome::Win => Phase::Victory,
            BattleOutcome::Lose => Phase::Defeat,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Battle => write!(f, "battle"),
            Phase::Victory => write!(f, "victory"),
            Phase::Defeat => write!(f, "defeat"),
        }
    }
}

/// Unique identifier of a battle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleId(pub String);

impl BattleId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id derived from a random word.
    #[must_use]
    pub fn from_random(word: u64) -> Self {
        Self(format!("battle-{:016x}", word))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BattleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A violated battle invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A roster is empty.
    EmptyRoster(Side),
    /// The active index points past the roster.
    ActiveOutOfRange { side: Side, index: usize },
    /// A card's `is_active` flag disagrees with the active index.
    ActiveFlagMismatch { side: Side, index: usize },
    /// `max_hp` is zero.
    ZeroMaxHp { side: Side, index: usize },
    /// `current_hp` exceeds `max_hp`.
    HpAboveMax { side: Side, index: usize },
    /// `is_knocked_out` disagrees with `current_hp == 0`.
    KnockoutMismatch { side: Side, index: usize },
    /// The AI's active card is down while the battle runs.
    AiActiveKnockedOut,
    /// The turn counter does not match the history length.
    TurnCounter { turn_number: u32, history_len: usize },
    /// The phase disagrees with which rosters are exhausted.
    PhaseMismatch(Phase),
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantViolation::EmptyRoster(side) => write!(f, "{} roster is empty", side),
            InvariantViolation::ActiveOutOfRange { side, index } => {
                write!(f, "{} active index {} is out of range", side, index)
            }
            InvariantViolation::ActiveFlagMismatch { side, index } => {
                write!(f, "{} card {} has the wrong active flag", side, index)
            }
            InvariantViolation::ZeroMaxHp { side, index } => {
                write!(f, "{} card {} has zero max HP", side, index)
            }
            InvariantViolation::HpAboveMax { side, index } => {
                write!(f, "{} card {} has more HP than its max", side, index)
            }
            InvariantViolation::KnockoutMismatch { side, index } => {
                write!(f, "{} card {} knockout flag disagrees with its HP", side, index)
            }
            InvariantViolation::AiActiveKnockedOut => {
                write!(f, "ai active card is knocked out during battle")
            }
            InvariantViolation::TurnCounter {
                turn_number,
                history_len,
            } => write!(
                f,
                "turn number {} does not follow {} recorded turns",
                turn_number, history_len
            ),
            InvariantViolation::PhaseMismatch(phase) => {
                write!(f, "phase {} disagrees with roster exhaustion", phase)
            }
        }
    }
}

/// Complete state of one battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    // === Identity ===
    battle_id: BattleId,
    difficulty: Difficulty,

    // === Progression ===
    pub(crate) phase: Phase,
    /// Number of the next turn to resolve (starts at 1).
    pub(crate) turn_number: u32,

    // === Rosters ===
    pub(crate) rosters: SideMap<Vec<BattleCard>>,
    pub(crate) active: SideMap<usize>,

    // === Records ===
    pub(crate) turn_history: Vector<TurnResult>,
    pub(crate) damage_dealt: SideMap<u32>,
}

impl BattleState {
    /// Fresh state: both rosters reset, first card of each active.
    pub(crate) fn new(
        battle_id: BattleId,
        difficulty: Difficulty,
        mut player_cards: Vec<BattleCard>,
        mut ai_cards: Vec<BattleCard>,
    ) -> Self {
        for roster in [&mut player_cards, &mut ai_cards] {
            for (index, card) in roster.iter_mut().enumerate() {
                card.reset_for_battle(index == 0);
            }
        }

        Self {
            battle_id,
            difficulty,
            phase: Phase::Battle,
            turn_number: 1,
            rosters: SideMap::new(player_cards, ai_cards),
            active: SideMap::with_value(0),
            turn_history: Vector::new(),
            damage_dealt: SideMap::with_value(0),
        }
    }

    // === Identity ===

    #[must_use]
    pub fn battle_id(&self) -> &BattleId {
        &self.battle_id
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    // === Progression ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of the next turn to resolve.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.phase.outcome()
    }

    // === Rosters ===

    /// A side's roster, in its fixed order.
    #[must_use]
    pub fn cards(&self, side: Side) -> &[BattleCard] {
        &self.rosters[side]
    }

    #[must_use]
    pub fn player_cards(&self) -> &[BattleCard] {
        self.cards(Side::Player)
    }

    #[must_use]
    pub fn ai_cards(&self) -> &[BattleCard] {
        self.cards(Side::Ai)
    }

    #[must_use]
    pub fn active_index(&self, side: Side) -> usize {
        self.active[side]
    }

    #[must_use]
    pub fn active_card(&self, side: Side) -> &BattleCard {
        &self.rosters[side][self.active[side]]
    }

    /// Whether `index` is a legal switch target for `side`.
    #[must_use]
    pub fn can_switch_to(&self, side: Side, index: usize) -> bool {
        index != self.active[side]
            && self.rosters[side]
                .get(index)
                .map_or(false, |card| !card.is_knocked_out())
    }

    /// Whether `side` has any legal switch target.
    #[must_use]
    pub fn can_switch(&self, side: Side) -> bool {
        self.next_switch_target(side).is_some()
    }

    /// First legal switch target for `side`, in roster order.
    #[must_use]
    pub fn next_switch_target(&self, side: Side) -> Option<usize> {
        (0..self.rosters[side].len()).find(|&index| self.can_switch_to(side, index))
    }

    /// Cards of `side` still standing.
    #[must_use]
    pub fn living_count(&self, side: Side) -> usize {
        self.rosters[side]
            .iter()
            .filter(|card| !card.is_knocked_out())
            .count()
    }

    /// Every card of `side` is knocked out.
    #[must_use]
    pub fn is_exhausted(&self, side: Side) -> bool {
        self.living_count(side) == 0
    }

    /// The player's active card is down and a replacement must be switched in.
    #[must_use]
    pub fn needs_replacement(&self) -> bool {
        self.phase == Phase::Battle && self.active_card(Side::Player).is_knocked_out()
    }

    // === Records ===

    /// Every resolved turn, oldest first.
    #[must_use]
    pub fn turn_history(&self) -> &Vector<TurnResult> {
        &self.turn_history
    }

    #[must_use]
    pub fn last_turn(&self) -> Option<&TurnResult> {
        self.turn_history.last()
    }

    /// Total damage `side` has dealt this battle.
    #[must_use]
    pub fn damage_dealt(&self, side: Side) -> u32 {
        self.damage_dealt[side]
    }

    /// Turns in which the player held type advantage.
    #[must_use]
    pub fn player_advantage_turns(&self) -> usize {
        self.turn_history
            .iter()
            .filter(|turn| turn.type_advantage == TypeAdvantage::Player)
            .count()
    }

    /// View handed to the AI collaborator.
    #[must_use]
    pub fn ai_context(&self) -> AiContext<'_> {
        AiContext {
            ai_cards: self.ai_cards(),
            player_cards: self.player_cards(),
            active_ai_index: self.active[Side::Ai],
            active_player_index: self.active[Side::Player],
            turn_number: self.turn_number,
            difficulty: self.difficulty,
        }
    }

    // === Mutation (crate only) ===

    pub(crate) fn active_card_mut(&mut self, side: Side) -> &mut BattleCard {
        let index = self.active[side];
        &mut self.rosters[side][index]
    }

    /// Move the active marker of `side` to `index`.
    pub(crate) fn set_active(&mut self, side: Side, index: usize) {
        let previous = self.active[side];
        self.rosters[side][previous].is_active = false;
        self.rosters[side][index].is_active = true;
        self.active[side] = index;
    }

    // === Invariants ===

    /// Check every battle invariant.
    ///
    /// Returns all violations found, not just the first.
    pub fn check_invariants(&self) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        for side in Side::BOTH {
            let roster = &self.rosters[side];
            let active = self.active[side];

            if roster.is_empty() {
                violations.push(InvariantViolation::EmptyRoster(side));
                continue;
            }
            if active >= roster.len() {
                violations.push(InvariantViolation::ActiveOutOfRange { side, index: active });
            }

            for (index, card) in roster.iter().enumerate() {
                if card.is_active() != (index == active) {
                    violations.push(InvariantViolation::ActiveFlagMismatch { side, index });
                }
                if card.max_hp() == 0 {
                    violations.push(InvariantViolation::ZeroMaxHp { side, index });
                }
                if card.current_hp() > card.max_hp() {
                    violations.push(InvariantViolation::HpAboveMax { side, index });
                }
                if card.is_knocked_out() != (card.current_hp() == 0) {
                    violations.push(InvariantViolation::KnockoutMismatch { side, index });
                }
            }
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        if self.turn_number as usize != self.turn_history.len() + 1 {
            violations.push(InvariantViolation::TurnCounter {
                turn_number: self.turn_number,
                history_len: self.turn_history.len(),
            });
        }

        let player_out = self.is_exhausted(Side::Player);
        let ai_out = self.is_exhausted(Side::Ai);
        let phase_ok = match self.phase {
            Phase::Battle => !player_out && !ai_out,
            Phase::Victory => ai_out && !player_out,
            // Forfeit ends the battle with both rosters standing
            Phase::Defeat => true,
        };
        if !phase_ok {
            violations.push(InvariantViolation::PhaseMismatch(self.phase));
        }

        if self.phase == Phase::Battle && self.active_card(Side::Ai).is_knocked_out() {
            violations.push(InvariantViolation::AiActiveKnockedOut);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}
