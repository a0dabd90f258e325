//! The stateful battle engine.
//!
//! `CardBattle` owns one battle: its current `BattleState`, its RNG, its
//! collaborators and the end-of-battle hook. Each intake call runs the pure
//! `resolve_turn` on a copy of the RNG and commits the new state and RNG
//! together only once the transition succeeded, so a rejected action
//! leaves no trace.
//!
//! ## Construction
//!
//! ```
//! use card_battle::battle::BattleBuilder;
//! use card_battle::cards::{BaseStats, CardTemplate, Element, Move};
//! use card_battle::core::Difficulty;
//!
//! let ember = CardTemplate::new("ember", "Ember Fox", Element::Soul, BaseStats::new(30, 20, 25, 60))
//!     .with_move(Move::attack("flare", "Flare", Element::Soul, 40));
//!
//! let mut battle = BattleBuilder::new(vec![ember])
//!     .difficulty(Difficulty::Easy)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let outcome = battle.attack("flare");
//! assert_eq!(outcome.turn().map(|t| t.turn_number), Some(1));
//! assert_eq!(battle.state().turn_number(), 2);
//! ```
//!
//! ## Lifecycle
//!
//! - `phase` starts at `battle` and leaves it exactly once
//! - rewards are computed and the hook fires exactly once, on that exit
//! - every intake after the exit is rejected with `BattleOver`

use log::{debug, info, warn};

use crate::cards::{BattleCard, CardTemplate, MoveId, MovePool};
use crate::core::{BattleError, BattleResult, BattleRng, Difficulty, RewardConfig, Side};
use crate::rewards::{calculate_rewards, BattleRewards};
use crate::rules::BattleRules;

use super::action::{ActionOutcome, BattleAction, BattleOutcome, Rejection, TurnResult};
use super::resolver::{resolve_turn, Transition};
use super::snapshot::BattleSnapshot;
use super::state::{BattleId, BattleState, Phase};

/// Callback fired once when a battle ends.
pub type BattleEndHook = Box<dyn FnMut(BattleOutcome, &BattleRewards)>;

/// Where a builder gets its battle from.
enum Source {
    Roster(Vec<CardTemplate>),
    Snapshot(Box<BattleSnapshot>),
}

/// Configures and creates a `CardBattle`.
pub struct BattleBuilder {
    source: Source,
    difficulty: Option<Difficulty>,
    move_pool: Option<MovePool>,
    rules: BattleRules,
    reward_config: RewardConfig,
    seed: Option<u64>,
    battle_id: Option<BattleId>,
    on_battle_end: Option<BattleEndHook>,
}

impl BattleBuilder {
    /// Start a new battle for the player's roster.
    #[must_use]
    pub fn new(roster: Vec<CardTemplate>) -> Self {
        Self::with_source(Source::Roster(roster))
    }

    /// Resume a battle from a snapshot.
    ///
    /// Rosters, difficulty, battle id and RNG position come from the
    /// snapshot; rules, reward config and hook come from the builder.
    /// `difficulty`, `move_pool`, `seed` and `battle_id` only shape new
    /// battles and are ignored here with a warning.
    #[must_use]
    pub fn restore(snapshot: BattleSnapshot) -> Self {
        Self::with_source(Source::Snapshot(Box::new(snapshot)))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            difficulty: None,
            move_pool: None,
            rules: BattleRules::standard(),
            reward_config: RewardConfig::default(),
            seed: None,
            battle_id: None,
            on_battle_end: None,
        }
    }

    /// AI tier for a new battle. Defaults to medium; ignored by `restore`.
    #[must_use]
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Moves the AI deck generator may draw from. Ignored by `restore`,
    /// whose AI roster already exists.
    #[must_use]
    pub fn move_pool(mut self, move_pool: MovePool) -> Self {
        self.move_pool = Some(move_pool);
        self
    }

    #[must_use]
    pub fn rules(mut self, rules: BattleRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn reward_config(mut self, reward_config: RewardConfig) -> Self {
        self.reward_config = reward_config;
        self
    }

    /// Seed for every source of chance in the battle.
    ///
    /// Without a seed the battle draws one from the thread RNG. Ignored by
    /// `restore`, which resumes the saved stream.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the generated battle id. Ignored by `restore`.
    #[must_use]
    pub fn battle_id(mut self, battle_id: impl Into<String>) -> Self {
        self.battle_id = Some(BattleId::new(battle_id));
        self
    }

    /// Callback fired once when the battle ends.
    #[must_use]
    pub fn on_battle_end(mut self, hook: impl FnMut(BattleOutcome, &BattleRewards) + 'static) -> Self {
        self.on_battle_end = Some(Box::new(hook));
        self
    }

    /// Create the battle.
    ///
    /// # Errors
    ///
    /// - `EmptyRoster` if either roster has no cards
    /// - `NoMoves` / `ZeroMaxHp` for unusable cards on either side
    /// - `InconsistentState` for a snapshot that breaks a battle invariant
    pub fn build(self) -> BattleResult<CardBattle> {
        let BattleBuilder {
            source,
            difficulty,
            move_pool,
            rules,
            reward_config,
            seed,
            battle_id,
            on_battle_end,
        } = self;

        let (state, rng, rewards) = match source {
            Source::Roster(roster) => {
                let difficulty = difficulty.unwrap_or_default();
                let move_pool = move_pool.unwrap_or_default();
                let seed = seed.unwrap_or_else(rand::random);
                let mut rng = BattleRng::new(seed);
                let state = new_state(roster, difficulty, &move_pool, &rules, &mut rng, battle_id)?;
                info!(
                    "Battle {} started at {} difficulty: {} vs {} cards (seed {})",
                    state.battle_id(),
                    difficulty,
                    state.player_cards().len(),
                    state.ai_cards().len(),
                    seed
                );
                (state, rng, None)
            }
            Source::Snapshot(snapshot) => {
                let BattleSnapshot { state, rng, rewards } = *snapshot;
                let ignored: Vec<&str> = [
                    ("difficulty", difficulty.is_some()),
                    ("move_pool", move_pool.is_some()),
                    ("seed", seed.is_some()),
                    ("battle_id", battle_id.is_some()),
                ]
                .into_iter()
                .filter_map(|(name, set)| set.then_some(name))
                .collect();
                if !ignored.is_empty() {
                    warn!(
                        "Battle {}: restore ignores {}",
                        state.battle_id(),
                        ignored.join(", ")
                    );
                }
                state.check_invariants().map_err(|violations| {
                    let details: Vec<String> = violations.iter().map(ToString::to_string).collect();
                    BattleError::InconsistentState(details.join("; "))
                })?;
                if state.is_over() != rewards.is_some() {
                    return Err(BattleError::InconsistentState(
                        "rewards must be present exactly when the battle is over".to_string(),
                    ));
                }
                info!(
                    "Battle {} restored at turn {} ({})",
                    state.battle_id(),
                    state.turn_number(),
                    state.phase()
                );
                (state, BattleRng::from_state(&rng), rewards)
            }
        };

        Ok(CardBattle {
            state,
            rules,
            rng,
            reward_config,
            rewards,
            processing: false,
            on_battle_end,
        })
    }
}

/// Initialise both rosters and the starting state.
fn new_state(
    roster: Vec<CardTemplate>,
    difficulty: Difficulty,
    move_pool: &MovePool,
    rules: &BattleRules,
    rng: &mut BattleRng,
    battle_id: Option<BattleId>,
) -> BattleResult<BattleState> {
    let player_cards = init_roster(Side::Player, roster, rules)?;

    // Always drawn so an id override does not shift the stream
    let generated_id = BattleId::from_random(rng.next_u64());
    let battle_id = battle_id.unwrap_or(generated_id);

    let generated = rules.deck().generate(&player_cards, difficulty, move_pool, rng);
    let ai_cards = init_roster(
        Side::Ai,
        generated.into_iter().map(|card| card.template).collect(),
        rules,
    )?;

    Ok(BattleState::new(battle_id, difficulty, player_cards, ai_cards))
}

/// Build battle cards for one side, with max HP from the damage model.
fn init_roster(
    side: Side,
    templates: Vec<CardTemplate>,
    rules: &BattleRules,
) -> BattleResult<Vec<BattleCard>> {
    if templates.is_empty() {
        return Err(BattleError::EmptyRoster(side));
    }

    let mut cards = Vec::with_capacity(templates.len());
    for (index, template) in templates.into_iter().enumerate() {
        if template.moves.is_empty() {
            return Err(BattleError::NoMoves { side, index });
        }
        let max_hp = rules.damage().max_hp(&template);
        if max_hp == 0 {
            return Err(BattleError::ZeroMaxHp { side, index });
        }
        cards.push(BattleCard::new(template, max_hp));
    }
    Ok(cards)
}

/// One turn-based battle between the player and the AI.
pub struct CardBattle {
    state: BattleState,
    rules: BattleRules,
    rng: BattleRng,
    reward_config: RewardConfig,
    rewards: Option<BattleRewards>,
    processing: bool,
    on_battle_end: Option<BattleEndHook>,
}

impl CardBattle {
    // === Intake ===

    /// Submit the player's action for this turn.
    pub fn submit_action(&mut self, action: BattleAction) -> ActionOutcome {
        if self.processing {
            return self.reject(Rejection::TurnInProgress);
        }
        if self.state.is_over() {
            return self.reject(Rejection::BattleOver);
        }

        self.processing = true;
        let mut rng = self.rng.clone();
        let outcome = match resolve_turn(&self.state, &action, &self.rules, &mut rng) {
            Ok(transition) => self.commit(transition, rng),
            Err(rejection) => self.reject(rejection),
        };
        self.processing = false;
        outcome
    }

    /// Attack with a move of the player's active card.
    ///
    /// An id the card does not know falls back to its first move.
    pub fn attack(&mut self, move_id: impl Into<String>) -> ActionOutcome {
        self.submit_action(BattleAction::Attack {
            move_id: MoveId::new(move_id),
        })
    }

    /// Switch the player's active card.
    pub fn switch_card(&mut self, index: usize) -> ActionOutcome {
        self.submit_action(BattleAction::switch(index))
    }

    /// Switch to the first card that can come in.
    pub fn switch_to_next(&mut self) -> ActionOutcome {
        match self.state.next_switch_target(Side::Player) {
            Some(index) => self.switch_card(index),
            None if self.state.is_over() => self.reject(Rejection::BattleOver),
            None => {
                let active = self.state.active_index(Side::Player);
                self.reject(Rejection::IllegalSwitch(active))
            }
        }
    }

    /// Concede. Ends the battle as a loss without resolving a turn.
    pub fn forfeit(&mut self) -> ActionOutcome {
        self.submit_action(BattleAction::Forfeit)
    }

    fn reject(&self, rejection: Rejection) -> ActionOutcome {
        debug!("Battle {}: rejected action ({})", self.state.battle_id(), rejection);
        ActionOutcome::Rejected(rejection)
    }

    fn commit(&mut self, transition: Transition, rng: BattleRng) -> ActionOutcome {
        let Transition {
            state,
            turn,
            outcome,
        } = transition;

        debug_assert!(
            state.check_invariants().is_ok(),
            "battle invariant broken: {:?}",
            state.check_invariants()
        );

        self.state = state;
        self.rng = rng;

        if let Some(turn) = &turn {
            debug!(
                "Battle {}: turn {} resolved, dealt {} / took {}",
                self.state.battle_id(),
                turn.turn_number,
                turn.player_damage_dealt,
                turn.ai_damage_dealt
            );
            for fallback in &turn.fallbacks {
                warn!(
                    "Battle {}: turn {} used fallback {:?}",
                    self.state.battle_id(),
                    turn.turn_number,
                    fallback
                );
            }
        }

        if let Some(outcome) = outcome {
            self.finish(outcome);
        }

        match turn {
            Some(turn) => ActionOutcome::Resolved(turn),
            None => ActionOutcome::Forfeited,
        }
    }

    /// Compute rewards and fire the hook. Runs at most once per battle.
    fn finish(&mut self, outcome: BattleOutcome) {
        if self.rewards.is_some() {
            return;
        }

        let rewards = calculate_rewards(&self.state, outcome, &self.reward_config);
        info!(
            "Battle {} ended in {:?} after {} turns: {} XP",
            self.state.battle_id(),
            outcome,
            self.state.turn_history().len(),
            rewards.total_xp
        );

        let rewards = self.rewards.insert(rewards);
        if let Some(hook) = self.on_battle_end.as_mut() {
            hook(outcome, &*rewards);
        }
    }

    // === Queries ===

    #[must_use]
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    #[must_use]
    pub fn battle_id(&self) -> &BattleId {
        self.state.battle_id()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub fn active_player_card(&self) -> &BattleCard {
        self.state.active_card(Side::Player)
    }

    #[must_use]
    pub fn active_ai_card(&self) -> &BattleCard {
        self.state.active_card(Side::Ai)
    }

    #[must_use]
    pub fn last_turn_result(&self) -> Option<&TurnResult> {
        self.state.last_turn()
    }

    /// Whether the player has a card to switch to.
    #[must_use]
    pub fn can_switch(&self) -> bool {
        self.state.can_switch(Side::Player)
    }

    /// Whether the player's active card is down and must be replaced.
    #[must_use]
    pub fn needs_replacement(&self) -> bool {
        self.state.needs_replacement()
    }

    /// True while a turn (including the end-of-battle hook) is resolving.
    #[must_use]
    pub fn is_processing_turn(&self) -> bool {
        self.processing
    }

    /// Rewards, once the battle has ended.
    #[must_use]
    pub fn rewards(&self) -> Option<&BattleRewards> {
        self.rewards.as_ref()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.state.outcome()
    }

    #[must_use]
    pub fn reward_config(&self) -> &RewardConfig {
        &self.reward_config
    }

    /// Replace the end-of-battle hook.
    ///
    /// Has no effect on a battle that already ended.
    pub fn set_on_battle_end(&mut self, hook: impl FnMut(BattleOutcome, &BattleRewards) + 'static) {
        self.on_battle_end = Some(Box::new(hook));
    }

    /// Capture everything needed to resume this battle.
    #[must_use]
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            state: self.state.clone(),
            rng: self.rng.state(),
            rewards: self.rewards.clone(),
        }
    }
}

impl std::fmt::Debug for CardBattle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardBattle")
            .field("battle_id", self.state.battle_id())
            .field("phase", &self.state.phase())
            .field("turn_number", &self.state.turn_number())
            .field("processing", &self.processing)
            .finish_non_exhaustive()
    }
}
