//! Moves and the move pool.
//!
//! A `Move` is immutable for the whole battle. Cards carry their own move
//! lists; the `MovePool` is the catalogue the AI deck generator draws from.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::element::Element;

/// Identifier a player uses to select an attack.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveId(pub String);

impl MoveId {
    /// Create a new move ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MoveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MoveId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// What a move does when used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    /// Deals damage scaled by power.
    Attack,
    /// Non-damaging; reserved for status mechanics.
    Support,
}

/// A named action a card can perform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub id: MoveId,
    pub name: String,
    pub element: Element,
    pub kind: MoveKind,
    /// Base power fed to the damage model.
    pub power: u32,
    /// Hit chance in percent (100 never misses).
    pub accuracy: u8,
}

impl Move {
    /// Create an attack move that never misses.
    #[must_use]
    pub fn attack(id: impl Into<String>, name: impl Into<String>, element: Element, power: u32) -> Self {
        Self {
            id: MoveId::new(id),
            name: name.into(),
            element,
            kind: MoveKind::Attack,
            power,
            accuracy: 100,
        }
    }

    /// Create a non-damaging support move.
    #[must_use]
    pub fn support(id: impl Into<String>, name: impl Into<String>, element: Element) -> Self {
        Self {
            id: MoveId::new(id),
            name: name.into(),
            element,
            kind: MoveKind::Support,
            power: 0,
            accuracy: 100,
        }
    }

    /// Set the hit chance in percent.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: u8) -> Self {
        self.accuracy = accuracy.min(100);
        self
    }

    /// Whether this move deals damage.
    #[must_use]
    pub fn is_attack(&self) -> bool {
        self.kind == MoveKind::Attack
    }
}

/// Catalogue of moves available for AI deck construction.
///
/// Keeps insertion order (so "first move" is stable) plus an id index.
#[derive(Clone, Debug, Default)]
pub struct MovePool {
    moves: Vec<Move>,
    by_id: FxHashMap<MoveId, usize>,
}

impl MovePool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a move. A later move with the same id replaces the earlier one.
    pub fn register(&mut self, mv: Move) {
        if let Some(&index) = self.by_id.get(&mv.id) {
            self.moves[index] = mv;
        } else {
            self.by_id.insert(mv.id.clone(), self.moves.len());
            self.moves.push(mv);
        }
    }

    /// Look up a move by id.
    #[must_use]
    pub fn get(&self, id: &MoveId) -> Option<&Move> {
        self.by_id.get(id).map(|&index| &self.moves[index])
    }

    /// All moves in registration order.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// First registered move.
    #[must_use]
    pub fn first(&self) -> Option<&Move> {
        self.moves.first()
    }

    /// Moves of a given element.
    pub fn by_element(&self, element: Element) -> impl Iterator<Item = &Move> {
        self.moves.iter().filter(move |m| m.element == element)
    }

    /// First attack move of an element, if any.
    #[must_use]
    pub fn first_attack_of(&self, element: Element) -> Option<&Move> {
        self.by_element(element).find(|m| m.is_attack())
    }

    /// Number of moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl FromIterator<Move> for MovePool {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut pool = MovePool::new();
        for mv in iter {
            pool.register(mv);
        }
        pool
    }
}
