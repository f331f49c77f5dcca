//! Elemental Modifier Table.
//!
//! Seven elements form a cycle in which each element beats the next one:
//! Water > Fire > Earth > Wind > Lightning > Light > Dark > Water.
//! Neutral neither beats nor loses to anything.

use super::status::StatusKind;
use crate::core::constants::{ELEMENT_DAMAGE_BONUS, ELEMENT_DAMAGE_PENALTY};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Water,
    Fire,
    Earth,
    Wind,
    Lightning,
    Light,
    Dark,
    Neutral,
}

const CYCLE: [Element; 7] = [
    Element::Water,
    Element::Fire,
    Element::Earth,
    Element::Wind,
    Element::Lightning,
    Element::Light,
    Element::Dark,
];

impl Element {
    pub fn all() -> [Element; 8] {
        [
            Element::Water,
            Element::Fire,
            Element::Earth,
            Element::Wind,
            Element::Lightning,
            Element::Light,
            Element::Dark,
            Element::Neutral,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Element::Water => "Water",
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Wind => "Wind",
            Element::Lightning => "Lightning",
            Element::Light => "Light",
            Element::Dark => "Dark",
            Element::Neutral => "Neutral",
        }
    }

    fn cycle_index(&self) -> Option<usize> {
        CYCLE.iter().position(|e| e == self)
    }

    /// True when `self` has the advantage over `other`.
    pub fn beats(&self, other: Element) -> bool {
        match (self.cycle_index(), other.cycle_index()) {
            (Some(a), Some(b)) => (a + 1) % CYCLE.len() == b,
            _ => false,
        }
    }

    /// Status a hit of this element may inflict.
    pub fn inflicts(&self) -> Option<StatusKind> {
        match self {
            Element::Fire => Some(StatusKind::Burn),
            Element::Water => Some(StatusKind::Frozen),
            Element::Earth => Some(StatusKind::Poisoned),
            Element::Lightning => Some(StatusKind::Confused),
            Element::Dark => Some(StatusKind::Feared),
            Element::Wind | Element::Light | Element::Neutral => None,
        }
    }
}

impl FromStr for Element {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::all()
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown element: {s}"))
    }
}

/// Damage multiplier for an `attacker` hit landing on a `defender`.
///
/// Directional: `modifier(a, b)` and `modifier(b, a)` differ whenever one
/// element beats the other.
pub fn elemental_modifier(attacker: Element, defender: Element) -> f64 {
    if attacker.beats(defender) {
        1.0 + ELEMENT_DAMAGE_BONUS
    } else if defender.beats(attacker) {
        1.0 - ELEMENT_DAMAGE_PENALTY
    } else {
        1.0
    }
}
