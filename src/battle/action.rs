//! Actions, turn records and intake outcomes.
//!
//! A `BattleAction` is what a side wants to do this turn. A `TurnResult` is
//! the immutable record of what actually happened once both sides' actions
//! were resolved. `ActionOutcome` tells the caller whether a submission was
//! resolved, ended the battle, or was rejected without touching state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::MoveId;
use crate::core::Side;

/// One side's choice for a turn.
///
/// ```
/// use card_battle::battle::BattleAction;
///
/// let attack = BattleAction::attack("slam");
/// let switch = BattleAction::switch(2);
///
/// assert!(attack.is_attack());
/// assert_eq!(switch, BattleAction::Switch { to_index: 2 });
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleAction {
    /// Use a move of the active card.
    Attack { move_id: MoveId },
    /// Bring in another card from the roster.
    Switch { to_index: usize },
    /// Concede the battle.
    Forfeit,
}

impl BattleAction {
    /// Attack with the given move.
    #[must_use]
    pub fn attack(move_id: impl Into<String>) -> Self {
        BattleAction::Attack {
            move_id: MoveId::new(move_id),
        }
    }

    /// Switch to the given roster index.
    #[must_use]
    pub fn switch(to_index: usize) -> Self {
        BattleAction::Switch { to_index }
    }

    #[must_use]
    pub fn is_attack(&self) -> bool {
        matches!(self, BattleAction::Attack { .. })
    }

    #[must_use]
    pub fn is_switch(&self) -> bool {
        matches!(self, BattleAction::Switch { .. })
    }
}

/// Which side held type advantage in a turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeAdvantage {
    Player,
    Ai,
    #[default]
    Neutral,
}

impl TypeAdvantage {
    /// Advantage implied by an attack from `attacker` with `type_multiplier`.
    #[must_use]
    pub fn from_attack(attacker: Side, type_multiplier: f64) -> Self {
        let favoured = if type_multiplier > 1.0 {
            attacker
        } else if type_multiplier < 1.0 {
            attacker.opponent()
        } else {
            return TypeAdvantage::Neutral;
        };
        match favoured {
            Side::Player => TypeAdvantage::Player,
            Side::Ai => TypeAdvantage::Ai,
        }
    }
}

/// A named substitution the engine made for a stale or illegal input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fallback {
    /// The requested move is not on the active card; its first move was used.
    UnknownMove { side: Side, requested: MoveId },
    /// The AI returned an action it cannot take; it attacked with its first move.
    IllegalAiAction(BattleAction),
}

/// Fallbacks applied in one turn. At most one per side in practice.
pub type FallbackList = SmallVec<[Fallback; 2]>;

/// Immutable record of one resolved turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    /// Turn number this record resolved (starts at 1).
    pub turn_number: u32,

    /// The action the player submitted.
    pub player_action: BattleAction,

    /// The action the AI collaborator derived.
    pub ai_action: BattleAction,

    /// Damage the player's attack dealt (0 when the player switched).
    pub player_damage_dealt: u32,

    /// Damage the AI's attack dealt (0 when it switched or could not act).
    pub ai_damage_dealt: u32,

    /// The player's active card was knocked out this turn.
    pub player_card_ko: bool,

    /// The AI's active card was knocked out this turn.
    pub ai_card_ko: bool,

    /// Side favoured by the matchup of the player's attack. Neutral when the
    /// player switched or used a support move.
    pub type_advantage: TypeAdvantage,

    /// A critical hit landed this turn.
    pub critical_hit: bool,

    /// Flavour text for the turn.
    pub narration: String,

    /// Fallback policies applied while resolving the turn.
    pub fallbacks: FallbackList,

    /// Roster index the AI brought in after its active card went down.
    pub ai_replacement: Option<usize>,
}

/// Why a submitted action left the battle untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The battle already ended.
    BattleOver,
    /// Another turn is being resolved.
    TurnInProgress,
    /// The switch target is out of range, already active, or knocked out.
    IllegalSwitch(usize),
    /// The player's active card is knocked out; only a switch is accepted.
    ReplacementRequired,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::BattleOver => write!(f, "battle is over"),
            Rejection::TurnInProgress => write!(f, "a turn is already being resolved"),
            Rejection::IllegalSwitch(index) => write!(f, "cannot switch to card {}", index),
            Rejection::ReplacementRequired => {
                write!(f, "active card is knocked out, switch in a replacement")
            }
        }
    }
}

/// How a battle ended, from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleOutcome {
    Win,
    Lose,
}

impl BattleOutcome {
    #[must_use]
    pub fn is_win(self) -> bool {
        self == BattleOutcome::Win
    }
}

/// Result of submitting one action.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    /// A turn was resolved.
    Resolved(TurnResult),
    /// The player forfeited; the battle is over.
    Forfeited,
    /// Nothing changed.
    Rejected(Rejection),
}

impl ActionOutcome {
    /// The turn record, if a turn was resolved.
    #[must_use]
    pub fn turn(&self) -> Option<&TurnResult> {
        match self {
            ActionOutcome::Resolved(turn) => Some(turn),
            _ => None,
        }
    }

    /// The rejection reason, if the action was refused.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            ActionOutcome::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, ActionOutcome::Rejected(_))
    }
}
