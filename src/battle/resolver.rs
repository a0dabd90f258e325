//! Turn resolution.
//!
//! `resolve_turn` is the pure transition `(state, action) -> next state`.
//! It never mutates its input: the caller decides whether to commit the
//! returned `Transition`.
//!
//! ## Order within a turn
//!
//! 1. The AI action is derived from the state as the player sees it.
//! 2. The player's action resolves.
//! 3. The AI's action resolves if its active card is still standing.
//! 4. A knocked-out AI active card is replaced from its bench.
//! 5. The turn is recorded and the counter advances.
//! 6. Exhausted rosters end the battle; player exhaustion wins ties.

use smallvec::SmallVec;

use crate::cards::{Move, MoveId};
use crate::core::{BattleRng, Side};
use crate::rules::{BattleRules, DamageResult};

use super::action::{
    BattleAction, BattleOutcome, Fallback, FallbackList, Rejection, TurnResult, TypeAdvantage,
};
use super::state::{BattleState, Phase};

/// What a side will actually do once its request has been checked.
#[derive(Clone, Debug)]
enum Plan {
    Attack(Move),
    Switch(usize),
    /// The card has no moves to use. Unreachable for validated rosters.
    Idle,
}

/// Result of applying one action to a state.
#[derive(Clone, Debug)]
pub struct Transition {
    /// The state after the action.
    pub state: BattleState,
    /// The turn record, unless the action ended the battle without a turn.
    pub turn: Option<TurnResult>,
    /// Set when this transition entered a terminal phase.
    pub outcome: Option<BattleOutcome>,
}

/// Apply the player's `action` to `state`.
///
/// Rejections leave nothing changed and consume no randomness. Every other
/// input resolves: stale move ids and illegal AI answers are replaced by
/// named fallbacks recorded on the turn.
pub fn resolve_turn(
    state: &BattleState,
    action: &BattleAction,
    rules: &BattleRules,
    rng: &mut BattleRng,
) -> Result<Transition, Rejection> {
    if state.is_over() {
        return Err(Rejection::BattleOver);
    }

    match action {
        BattleAction::Forfeit => return Ok(forfeit(state)),
        BattleAction::Switch { to_index } => {
            if !state.can_switch_to(Side::Player, *to_index) {
                return Err(Rejection::IllegalSwitch(*to_index));
            }
        }
        BattleAction::Attack { .. } => {
            if state.needs_replacement() {
                return Err(Rejection::ReplacementRequired);
            }
        }
    }

    let mut turn = TurnRecorder::new(state.turn_number());

    let ai_action = rules.ai().choose_action(&state.ai_context(), rng);
    let ai_plan = plan_ai(state, &ai_action, &mut turn.fallbacks);
    let player_plan = plan_player(state, action, &mut turn.fallbacks);

    let mut next = state.clone();

    turn.act(&mut next, Side::Player, player_plan, rules, rng);

    if !next.active_card(Side::Ai).is_knocked_out() {
        turn.act(&mut next, Side::Ai, ai_plan, rules, rng);
    }

    let battle_continues = !next.is_exhausted(Side::Player) && !next.is_exhausted(Side::Ai);
    if battle_continues && next.active_card(Side::Ai).is_knocked_out() {
        turn.replace_ai(&mut next, rules, rng);
    }

    let record = turn.finish(action.clone(), ai_action);
    next.damage_dealt[Side::Player] =
        next.damage_dealt[Side::Player].saturating_add(record.player_damage_dealt);
    next.damage_dealt[Side::Ai] = next.damage_dealt[Side::Ai].saturating_add(record.ai_damage_dealt);
    next.turn_history.push_back(record.clone());
    next.turn_number += 1;

    let outcome = if next.is_exhausted(Side::Player) {
        Some(BattleOutcome::Lose)
    } else if next.is_exhausted(Side::Ai) {
        Some(BattleOutcome::Win)
    } else {
        None
    };
    if let Some(outcome) = outcome {
        next.phase = Phase::from(outcome);
    }

    Ok(Transition {
        state: next,
        turn: Some(record),
        outcome,
    })
}

fn forfeit(state: &BattleState) -> Transition {
    let mut next = state.clone();
    next.phase = Phase::Defeat;
    Transition {
        state: next,
        turn: None,
        outcome: Some(BattleOutcome::Lose),
    }
}

/// The move to use for `requested` on `side`'s active card.
fn pick_move(
    state: &BattleState,
    side: Side,
    requested: &MoveId,
    fallbacks: &mut FallbackList,
) -> Plan {
    let card = state.active_card(side);
    if let Some(mv) = card.find_move(requested) {
        return Plan::Attack(mv.clone());
    }
    fallbacks.push(Fallback::UnknownMove {
        side,
        requested: requested.clone(),
    });
    first_move_plan(state, side)
}

fn first_move_plan(state: &BattleState, side: Side) -> Plan {
    match state.active_card(side).first_move() {
        Some(mv) => Plan::Attack(mv.clone()),
        None => Plan::Idle,
    }
}

fn plan_player(state: &BattleState, action: &BattleAction, fallbacks: &mut FallbackList) -> Plan {
    match action {
        BattleAction::Attack { move_id } => pick_move(state, Side::Player, move_id, fallbacks),
        BattleAction::Switch { to_index } => Plan::Switch(*to_index),
        // Forfeit never reaches planning
        BattleAction::Forfeit => Plan::Idle,
    }
}

fn plan_ai(state: &BattleState, action: &BattleAction, fallbacks: &mut FallbackList) -> Plan {
    match action {
        BattleAction::Attack { move_id } => pick_move(state, Side::Ai, move_id, fallbacks),
        BattleAction::Switch { to_index } if state.can_switch_to(Side::Ai, *to_index) => {
            Plan::Switch(*to_index)
        }
        BattleAction::Switch { .. } | BattleAction::Forfeit => {
            fallbacks.push(Fallback::IllegalAiAction(action.clone()));
            first_move_plan(state, Side::Ai)
        }
    }
}

/// Accumulates the fields of a `TurnResult` while a turn resolves.
struct TurnRecorder {
    turn_number: u32,
    damage: [u32; 2],
    knocked_out: [bool; 2],
    type_advantage: TypeAdvantage,
    critical_hit: bool,
    narration: SmallVec<[String; 3]>,
    fallbacks: FallbackList,
    ai_replacement: Option<usize>,
}

impl TurnRecorder {
    fn new(turn_number: u32) -> Self {
        Self {
            turn_number,
            damage: [0; 2],
            knocked_out: [false; 2],
            type_advantage: TypeAdvantage::Neutral,
            critical_hit: false,
            narration: SmallVec::new(),
            fallbacks: FallbackList::new(),
            ai_replacement: None,
        }
    }

    fn act(
        &mut self,
        state: &mut BattleState,
        side: Side,
        plan: Plan,
        rules: &BattleRules,
        rng: &mut BattleRng,
    ) {
        match plan {
            Plan::Attack(mv) => self.strike(state, side, &mv, rules, rng),
            Plan::Switch(index) => {
                state.set_active(side, index);
                self.narration
                    .push(rules.narrator().describe_switch(state.active_card(side)));
            }
            Plan::Idle => {}
        }
    }

    fn strike(
        &mut self,
        state: &mut BattleState,
        side: Side,
        mv: &Move,
        rules: &BattleRules,
        rng: &mut BattleRng,
    ) {
        let defender_side = side.opponent();
        let attacker = state.active_card(side);
        let defender = state.active_card(defender_side);

        let result: DamageResult = rules.damage().calculate(attacker, defender, mv, rng);
        self.narration
            .push(rules.narrator().describe_attack(attacker, defender, mv, &result));

        let knocked_out = state.active_card_mut(defender_side).apply_damage(result.damage);

        self.damage[side.index()] = result.damage;
        self.knocked_out[defender_side.index()] |= knocked_out;
        self.critical_hit |= result.is_critical;
        // Only the player's attack sets the matchup; switch turns stay neutral
        if side == Side::Player && mv.is_attack() {
            self.type_advantage = TypeAdvantage::from_attack(side, result.type_multiplier);
        }
    }

    /// Bring in a new AI card after its active card went down.
    fn replace_ai(&mut self, state: &mut BattleState, rules: &BattleRules, rng: &mut BattleRng) {
        let answer = rules.ai().choose_action(&state.ai_context(), rng);
        let index = match answer {
            BattleAction::Switch { to_index } if state.can_switch_to(Side::Ai, to_index) => {
                Some(to_index)
            }
            other => {
                self.fallbacks.push(Fallback::IllegalAiAction(other));
                state.next_switch_target(Side::Ai)
            }
        };

        if let Some(index) = index {
            state.set_active(Side::Ai, index);
            self.narration
                .push(rules.narrator().describe_switch(state.active_card(Side::Ai)));
            self.ai_replacement = Some(index);
        }
    }

    fn finish(self, player_action: BattleAction, ai_action: BattleAction) -> TurnResult {
        TurnResult {
            turn_number: self.turn_number,
            player_action,
            ai_action,
            player_damage_dealt: self.damage[Side::Player.index()],
            ai_damage_dealt: self.damage[Side::Ai.index()],
            player_card_ko: self.knocked_out[Side::Player.index()],
            ai_card_ko: self.knocked_out[Side::Ai.index()],
            type_advantage: self.type_advantage,
            critical_hit: self.critical_hit,
            narration: self.narration.join(" "),
            fallbacks: self.fallbacks,
            ai_replacement: self.ai_replacement,
        }
    }
}
