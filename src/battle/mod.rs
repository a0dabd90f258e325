//! The battle state machine.
//!
//! ## Layers
//!
//! - `BattleState`: a value describing the battle at one instant
//! - `resolve_turn`: the pure transition from one state to the next
//! - `CardBattle`: owns the current state, commits transitions, pays out
//!   rewards once and fires the end-of-battle hook
//! - `SharedBattle`: a cloneable handle that rejects re-entrant calls
//! - `BattleSnapshot`: bincode capture for save and resume

mod action;
mod engine;
mod resolver;
mod shared;
mod snapshot;
mod state;

pub use action::{
    ActionOutcome, BattleAction, BattleOutcome, Fallback, FallbackList, Rejection, TurnResult,
    TypeAdvantage,
};
pub use engine::{BattleBuilder, BattleEndHook, CardBattle};
pub use resolver::{resolve_turn, Transition};
pub use shared::SharedBattle;
pub use snapshot::BattleSnapshot;
pub use state::{BattleId, BattleState, InvariantViolation, Phase};
