//! Battle snapshots.
//!
//! A snapshot is everything a `CardBattle` owns except its collaborators
//! and hook: the state, the RNG position and any rewards already paid out.
//! Restoring one with the same rules continues the battle exactly where
//! it stopped, down to the next random roll.
//!
//! Snapshots encode with `bincode`; the RNG stores its ChaCha word position
//! so the encoded size does not grow with the number of rolls.

use serde::{Deserialize, Serialize};

use crate::core::{BattleResult, BattleRngState};
use crate::rewards::BattleRewards;

use super::state::{BattleId, BattleState};

/// Serializable capture of a running or finished battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub state: BattleState,
    pub rng: BattleRngState,
    /// Present exactly when the battle is over.
    pub rewards: Option<BattleRewards>,
}

impl BattleSnapshot {
    #[must_use]
    pub fn battle_id(&self) -> &BattleId {
        self.state.battle_id()
    }

    /// Encode to bytes.
    ///
    /// # Errors
    ///
    /// `BattleError::Snapshot` if encoding fails.
    pub fn to_bytes(&self) -> BattleResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bytes produced by `to_bytes`.
    ///
    /// Decoding does not check battle invariants; `BattleBuilder::restore`
    /// does that when the battle is rebuilt.
    ///
    /// # Errors
    ///
    /// `BattleError::Snapshot` for truncated or corrupted input.
    pub fn from_bytes(bytes: &[u8]) -> BattleResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
