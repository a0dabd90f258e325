//! Card model: elements, moves, templates and battle cards.
//!
//! - `Element`: the body/mind/soul type triangle
//! - `Move` / `MovePool`: named actions and the catalogue the AI draws from
//! - `CardTemplate`: static card definition
//! - `BattleCard`: a template plus engine-owned live state

mod card;
mod element;
mod moves;

pub use card::{BaseStats, BattleCard, CardId, CardTemplate, MoveSet, StatusEffect};
pub use element::{Element, ADVANTAGE_MULTIPLIER, DISADVANTAGE_MULTIPLIER};
pub use moves::{Move, MoveId, MoveKind, MovePool};
