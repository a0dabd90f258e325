//! Error types.
//!
//! Gameplay never errors: stale or illegal inputs are absorbed by named
//! fallback policies or reported as `Rejection` values. `BattleError` only
//! covers the two places a battle can fail to exist: construction from bad
//! rosters and decoding a corrupted snapshot.

use std::fmt;

use super::side::Side;

/// Errors raised while building or restoring a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// A roster has no cards.
    EmptyRoster(Side),
    /// A card has no moves to fall back on.
    NoMoves { side: Side, index: usize },
    /// A card's max HP was computed as zero.
    ZeroMaxHp { side: Side, index: usize },
    /// A snapshot could not be encoded or decoded.
    Snapshot(String),
    /// A restored snapshot violates a battle invariant.
    InconsistentState(String),
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleError::EmptyRoster(side) => write!(f, "The {} roster has no cards", side),
            BattleError::NoMoves { side, index } => {
                write!(f, "Card {} in the {} roster has no moves", index, side)
            }
            BattleError::ZeroMaxHp { side, index } => {
                write!(f, "Card {} in the {} roster has zero max HP", index, side)
            }
            BattleError::Snapshot(details) => write!(f, "Snapshot codec error: {}", details),
            BattleError::InconsistentState(details) => {
                write!(f, "Inconsistent battle state: {}", details)
            }
        }
    }
}

impl std::error::Error for BattleError {}

impl From<bincode::Error> for BattleError {
    fn from(err: bincode::Error) -> Self {
        BattleError::Snapshot(err.to_string())
    }
}

/// Type alias for Results using `BattleError`.
pub type BattleResult<T> = Result<T, BattleError>;
