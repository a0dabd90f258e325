//! Card elements and the type triangle.
//!
//! Soul beats Body, Body beats Mind, Mind beats Soul. An attack into the
//! element it beats deals `ADVANTAGE_MULTIPLIER` damage; into the element
//! that beats it, `DISADVANTAGE_MULTIPLIER`.

use serde::{Deserialize, Serialize};

/// Damage multiplier when the attacking element beats the defender's.
pub const ADVANTAGE_MULTIPLIER: f64 = 1.5;

/// Damage multiplier when the defender's element beats the attacker's.
pub const DISADVANTAGE_MULTIPLIER: f64 = 0.75;

/// A card's (or move's) element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Body,
    Mind,
    Soul,
}

impl Element {
    /// All elements in rotation order.
    pub const ALL: [Element; 3] = [Element::Body, Element::Mind, Element::Soul];

    /// The element this one beats.
    #[must_use]
    pub const fn beats(self) -> Element {
        match self {
            Element::Soul => Element::Body,
            Element::Body => Element::Mind,
            Element::Mind => Element::Soul,
        }
    }

    /// The element that beats this one.
    #[must_use]
    pub const fn countered_by(self) -> Element {
        match self {
            Element::Body => Element::Soul,
            Element::Mind => Element::Body,
            Element::Soul => Element::Mind,
        }
    }

    /// Type multiplier for an attack of this element into `defender`.
    #[must_use]
    pub fn multiplier_against(self, defender: Element) -> f64 {
        if self.beats() == defender {
            ADVANTAGE_MULTIPLIER
        } else if defender.beats() == self {
            DISADVANTAGE_MULTIPLIER
        } else {
            1.0
        }
    }

    /// Whether this element has advantage over `defender`.
    #[must_use]
    pub fn has_advantage_over(self, defender: Element) -> bool {
        self.beats() == defender
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Element::Body => "body",
            Element::Mind => "mind",
            Element::Soul => "soul",
        };
        f.write_str(label)
    }
}
