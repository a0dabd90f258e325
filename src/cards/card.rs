//! Card templates and battle cards.
//!
//! `CardTemplate` holds what a card *is*: name, element, stats, moves. A
//! `BattleCard` wraps a template with the live battle fields the engine
//! owns exclusively (HP, status, activity flags). Callers only ever see
//! battle cards through shared references.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::element::Element;
use super::moves::{Move, MoveId};

/// Move list for a card. Cards carry one to four moves, so this stays inline.
pub type MoveSet = SmallVec<[Move; 4]>;

/// Identifier of a card template.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Base stats, opaque to the engine and passed through to the damage model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseStats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub hp: u32,
}

impl BaseStats {
    /// Create a stat block.
    #[must_use]
    pub const fn new(attack: u32, defense: u32, speed: u32, hp: u32) -> Self {
        Self {
            attack,
            defense,
            speed,
            hp,
        }
    }

    /// Scale every stat by `multiplier`, flooring.
    #[must_use]
    pub fn scaled(self, multiplier: f64) -> Self {
        let scale = |value: u32| (value as f64 * multiplier).floor().max(0.0) as u32;
        Self {
            attack: scale(self.attack),
            defense: scale(self.defense),
            speed: scale(self.speed),
            hp: scale(self.hp),
        }
    }
}

/// Static definition of a creature card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub id: CardId,
    pub creature_name: String,
    pub species: String,
    pub element: Element,
    /// Evolution stage; later stages get more HP.
    pub evolution_stage: u8,
    pub stats: BaseStats,
    /// Ordered moves. Must be non-empty for the card to battle.
    pub moves: MoveSet,
}

impl CardTemplate {
    /// Create a template with no moves.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        creature_name: impl Into<String>,
        element: Element,
        stats: BaseStats,
    ) -> Self {
        Self {
            id: CardId::new(id),
            creature_name: creature_name.into(),
            species: String::new(),
            element,
            evolution_stage: 0,
            stats,
            moves: MoveSet::new(),
        }
    }

    /// Set the species label.
    #[must_use]
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = species.into();
        self
    }

    /// Set the evolution stage.
    #[must_use]
    pub fn with_evolution_stage(mut self, stage: u8) -> Self {
        self.evolution_stage = stage;
        self
    }

    /// Append a move.
    #[must_use]
    pub fn with_move(mut self, mv: Move) -> Self {
        self.moves.push(mv);
        self
    }
}

/// Reserved for future status mechanics; always empty today.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    pub turns_remaining: u8,
}

/// A card taking part in a battle.
///
/// ## Invariants
///
/// - `0 <= current_hp <= max_hp`, and `max_hp > 0`
/// - `is_knocked_out == (current_hp == 0)`, and once set it stays set
/// - `current_hp` never increases
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleCard {
    /// The card's static definition.
    pub template: CardTemplate,
    pub(crate) max_hp: u32,
    pub(crate) current_hp: u32,
    pub(crate) status_effects: Vec<StatusEffect>,
    pub(crate) is_active: bool,
    pub(crate) is_knocked_out: bool,
}

impl BattleCard {
    /// Create a battle card at full HP, inactive.
    #[must_use]
    pub fn new(template: CardTemplate, max_hp: u32) -> Self {
        Self {
            template,
            max_hp,
            current_hp: max_hp,
            status_effects: Vec::new(),
            is_active: false,
            is_knocked_out: max_hp == 0,
        }
    }

    #[must_use]
    pub fn creature_name(&self) -> &str {
        &self.template.creature_name
    }

    #[must_use]
    pub fn element(&self) -> Element {
        self.template.element
    }

    #[must_use]
    pub fn stats(&self) -> &BaseStats {
        &self.template.stats
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.template.moves
    }

    #[must_use]
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    #[must_use]
    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    #[must_use]
    pub fn status_effects(&self) -> &[StatusEffect] {
        &self.status_effects
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn is_knocked_out(&self) -> bool {
        self.is_knocked_out
    }

    /// Remaining HP as a fraction of max HP.
    #[must_use]
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.max_hp as f64
    }

    /// Find one of this card's moves by id.
    #[must_use]
    pub fn find_move(&self, id: &MoveId) -> Option<&Move> {
        self.template.moves.iter().find(|m| &m.id == id)
    }

    /// The card's first move, used by every fallback policy.
    #[must_use]
    pub fn first_move(&self) -> Option<&Move> {
        self.template.moves.first()
    }

    /// Subtract damage, clamping at zero.
    ///
    /// Returns true if this hit knocked the card out.
    pub(crate) fn apply_damage(&mut self, damage: u32) -> bool {
        if self.is_knocked_out {
            return false;
        }
        self.current_hp = self.current_hp.saturating_sub(damage);
        if self.current_hp == 0 {
            self.is_knocked_out = true;
            return true;
        }
        false
    }

    /// Reset live fields to the start-of-battle state.
    pub(crate) fn reset_for_battle(&mut self, active: bool) {
        self.current_hp = self.max_hp;
        self.status_effects.clear();
        self.is_active = active;
        self.is_knocked_out = self.max_hp == 0;
    }
}
