//! Deterministic random number generation for battles.
//!
//! Every source of chance in a battle (AI deck names, AI decisions, hit
//! and critical rolls, the battle id) draws from one injected `BattleRng`,
//! so a seed plus the player's action sequence replays a battle exactly.
//!
//! The stream position is captured as a `BattleRngState` in O(1), which is
//! what snapshots store.
//!
//! ```
//! use card_battle::core::BattleRng;
//!
//! let mut rng = BattleRng::new(42);
//! let mut replay = BattleRng::new(42);
//!
//! assert_eq!(rng.next_u64(), replay.next_u64());
//! assert_eq!(rng.roll_percent(50), replay.roll_percent(50));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG injected into every collaborator call.
///
/// ChaCha8 keeps the stream reproducible across platforms.
#[derive(Clone, Debug)]
pub struct BattleRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl BattleRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// True with the given probability, clamped to `0.0..=1.0`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// True with `percent` in 100. Draws nothing at 100 or above.
    pub fn roll_percent(&mut self, percent: u8) -> bool {
        if percent >= 100 {
            return true;
        }
        self.inner.gen_range(0..100u8) < percent
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.gen()
    }

    /// Pick one element of `slice`, or `None` if it is empty.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }

    /// Capture the stream position.
    #[must_use]
    pub fn state(&self) -> BattleRngState {
        BattleRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Resume a stream from a captured position.
    #[must_use]
    pub fn from_state(state: &BattleRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRngState {
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter).
    pub word_pos: u128,
}
