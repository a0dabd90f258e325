//! Shared battle handle for callback-driven hosts.
//!
//! UI layers often hand the same battle to several callbacks (buttons,
//! timers, the end-of-battle hook). `SharedBattle` is a cloneable
//! `Rc<RefCell<CardBattle>>` whose intake never panics on re-entry: a call
//! that arrives while another is resolving, for example from inside the
//! hook, is rejected with `Rejection::TurnInProgress` and dropped.

use std::cell::RefCell;
use std::rc::Rc;

use super::action::{ActionOutcome, BattleAction, Rejection};
use super::engine::CardBattle;

/// Cloneable, re-entrancy-safe handle to one battle.
#[derive(Clone)]
pub struct SharedBattle(Rc<RefCell<CardBattle>>);

impl SharedBattle {
    #[must_use]
    pub fn new(battle: CardBattle) -> Self {
        Self(Rc::new(RefCell::new(battle)))
    }

    /// Submit an action, or reject it if a turn is already resolving.
    pub fn submit_action(&self, action: BattleAction) -> ActionOutcome {
        match self.0.try_borrow_mut() {
            Ok(mut battle) => battle.submit_action(action),
            Err(_) => {
                log::debug!("Re-entrant action dropped while a turn resolves");
                ActionOutcome::Rejected(Rejection::TurnInProgress)
            }
        }
    }

    pub fn attack(&self, move_id: impl Into<String>) -> ActionOutcome {
        self.submit_action(BattleAction::attack(move_id))
    }

    pub fn switch_card(&self, index: usize) -> ActionOutcome {
        self.submit_action(BattleAction::switch(index))
    }

    pub fn switch_to_next(&self) -> ActionOutcome {
        match self.0.try_borrow_mut() {
            Ok(mut battle) => battle.switch_to_next(),
            Err(_) => ActionOutcome::Rejected(Rejection::TurnInProgress),
        }
    }

    pub fn forfeit(&self) -> ActionOutcome {
        self.submit_action(BattleAction::Forfeit)
    }

    /// True while any intake call is resolving.
    #[must_use]
    pub fn is_processing_turn(&self) -> bool {
        self.0
            .try_borrow()
            .map_or(true, |battle| battle.is_processing_turn())
    }

    /// Read the battle. Returns `None` while a turn is resolving.
    pub fn with_battle<R>(&self, f: impl FnOnce(&CardBattle) -> R) -> Option<R> {
        self.0.try_borrow().ok().map(|battle| f(&*battle))
    }

    /// Mutate the battle. Returns `None` while a turn is resolving.
    pub fn with_battle_mut<R>(&self, f: impl FnOnce(&mut CardBattle) -> R) -> Option<R> {
        self.0.try_borrow_mut().ok().map(|mut battle| f(&mut *battle))
    }
}

impl From<CardBattle> for SharedBattle {
    fn from(battle: CardBattle) -> Self {
        Self::new(battle)
    }
}

impl std::fmt::Debug for SharedBattle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.try_borrow() {
            Ok(battle) => f.debug_tuple("SharedBattle").field(&*battle).finish(),
            Err(_) => f.write_str("SharedBattle(<resolving>)"),
        }
    }
}
