use crate::combat::element::Element;
use crate::combat::types::MonsterType;
use crate::core::constants::MAX_DURABILITY;
use crate::core::ids::ItemId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Helmet,
    Armor,
    Gloves,
    Boots,
    Accessory,
}

impl EquipmentSlot {
    pub fn all() -> [EquipmentSlot; 6] {
        [
            EquipmentSlot::Weapon,
            EquipmentSlot::Helmet,
            EquipmentSlot::Armor,
            EquipmentSlot::Gloves,
            EquipmentSlot::Boots,
            EquipmentSlot::Accessory,
        ]
    }
}

/// Drop tier. Ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemGrade {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Epic = 3,
    Legendary = 4,
    Immortal = 5,
}

impl ItemGrade {
    pub fn all() -> [ItemGrade; 6] {
        [
            ItemGrade::Common,
            ItemGrade::Uncommon,
            ItemGrade::Rare,
            ItemGrade::Epic,
            ItemGrade::Legendary,
            ItemGrade::Immortal,
        ]
    }

    /// Returns the display name for this grade.
    pub fn name(&self) -> &'static str {
        match self {
            ItemGrade::Common => "Common",
            ItemGrade::Uncommon => "Uncommon",
            ItemGrade::Rare => "Rare",
            ItemGrade::Epic => "Epic",
            ItemGrade::Legendary => "Legendary",
            ItemGrade::Immortal => "Immortal",
        }
    }
}

/// Equipped item summary as read from the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub id: ItemId,
    pub slot: EquipmentSlot,
    /// In `[0, MAX_DURABILITY]`
    pub durability: f64,
    pub element: Element,
    pub stat_contribution: f64,
    pub broken: bool,
}

impl EquippedItem {
    pub fn new(slot: EquipmentSlot, stat_contribution: f64) -> Self {
        Self {
            id: ItemId::new(),
            slot,
            durability: MAX_DURABILITY,
            element: Element::Neutral,
            stat_contribution,
            broken: false,
        }
    }

    pub fn with_durability(mut self, durability: f64) -> Self {
        self.durability = durability.clamp(0.0, MAX_DURABILITY);
        self.broken = self.durability <= 0.0;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    /// Broken items refuse to contribute stats until fully repaired.
    pub fn is_usable(&self) -> bool {
        !self.broken
    }

    pub fn effective_contribution(&self) -> f64 {
        if self.is_usable() {
            self.stat_contribution
        } else {
            0.0
        }
    }

    pub fn missing_durability(&self) -> f64 {
        (MAX_DURABILITY - self.durability).max(0.0)
    }
}

/// An item grade awarded from a defeated monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDrop {
    pub grade: ItemGrade,
    pub source: MonsterType,
}
