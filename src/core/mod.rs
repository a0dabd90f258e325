//! Core battle types: sides, RNG, configuration, errors.
//!
//! These are the leaf building blocks shared by the card model, the
//! collaborator rules and the battle state machine.

pub mod config;
pub mod error;
pub mod rng;
pub mod side;

pub use config::{Difficulty, DifficultyTable, RewardConfig};
pub use error::{BattleError, BattleResult};
pub use rng::{BattleRng, BattleRngState};
pub use side::{Side, SideMap};
