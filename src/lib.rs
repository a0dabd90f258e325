//! # card-battle
//!
//! A turn-based card battle engine: one player roster against an AI roster,
//! resolved one turn at a time until either side runs out of cards.
//!
//! ## Design Principles
//!
//! 1. **Pure transitions**: `resolve_turn` maps `(state, action)` to the next
//!    state and a turn record. `CardBattle` is the thin stateful wrapper that
//!    commits transitions, pays out rewards and fires the end hook once.
//!
//! 2. **Injected collaborators**: damage arithmetic, AI decisions, AI deck
//!    construction and narration sit behind traits bundled in `BattleRules`.
//!    The state machine never does stat math itself.
//!
//! 3. **Injected randomness**: every roll draws from one seeded `BattleRng`,
//!    so a seed plus the player's actions replays a battle exactly.
//!
//! 4. **Rejections are values**: gameplay never errors or panics. Stale
//!    inputs fall back to named policies; illegal ones come back as
//!    `Rejection`s with the battle untouched.
//!
//! ## Modules
//!
//! - `core`: sides, RNG, difficulty and reward configuration, errors
//! - `cards`: elements, moves, card templates and battle cards
//! - `rules`: collaborator traits and their stock implementations
//! - `battle`: state, turn resolution, engine, shared handle, snapshots
//! - `rewards`: end-of-battle XP
//!
//! ## Example
//!
//! ```
//! use card_battle::{BattleBuilder, BaseStats, CardTemplate, Difficulty, Element, Move, Phase};
//!
//! let roster = vec![
//!     CardTemplate::new("fox", "Ember Fox", Element::Soul, BaseStats::new(30, 20, 25, 60))
//!         .with_move(Move::attack("flare", "Flare", Element::Soul, 40)),
//!     CardTemplate::new("golem", "Clay Golem", Element::Body, BaseStats::new(25, 35, 10, 80))
//!         .with_move(Move::attack("slam", "Slam", Element::Body, 35)),
//! ];
//!
//! let mut battle = BattleBuilder::new(roster)
//!     .difficulty(Difficulty::Medium)
//!     .seed(2024)
//!     .build()
//!     .unwrap();
//!
//! while battle.phase() == Phase::Battle {
//!     if battle.needs_replacement() {
//!         battle.switch_to_next();
//!     } else {
//!         let move_id = battle.active_player_card().moves()[0].id.clone();
//!         battle.attack(move_id.as_str());
//!     }
//! }
//!
//! assert!(battle.rewards().is_some());
//! ```

pub mod battle;
pub mod cards;
pub mod core;
pub mod rewards;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    BattleError, BattleResult, BattleRng, BattleRngState, Difficulty, DifficultyTable,
    RewardConfig, Side, SideMap,
};

pub use crate::cards::{
    BaseStats, BattleCard, CardId, CardTemplate, Element, Move, MoveId, MoveKind, MovePool,
};

pub use crate::rules::{
    AiConfig, AiContext, AiPolicy, BattleRules, DamageModel, DamageResult, DeckGenerator,
    MirrorDeck, Narrator, StandardAi, StandardDamage, StandardNarrator,
};

pub use crate::battle::{
    resolve_turn, ActionOutcome, BattleAction, BattleBuilder, BattleId, BattleOutcome,
    BattleSnapshot, BattleState, CardBattle, Fallback, Phase, Rejection, SharedBattle,
    Transition, TurnResult, TypeAdvantage,
};

pub use crate::rewards::{calculate_rewards, BattleRewards};
