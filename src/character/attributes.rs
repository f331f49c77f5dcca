use crate::core::constants::BASE_ATTRIBUTE_VALUE;
use serde::{Deserialize, Serialize};

/// Base attributes of an entrant, as supplied by the character record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    pub strength: u32,
    pub agility: u32,
    pub intelligence: u32,
    pub vitality: u32,
    pub luck: u32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

impl Attributes {
    pub fn new() -> Self {
        Self::uniform(BASE_ATTRIBUTE_VALUE)
    }

    pub fn uniform(value: u32) -> Self {
        Self {
            strength: value,
            agility: value,
            intelligence: value,
            vitality: value,
            luck: value,
        }
    }
}
