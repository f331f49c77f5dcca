//! Stat Resolver: base attributes + job + level + equipment -> combat figures.

use super::attributes::Attributes;
use super::job::JobClass;
use crate::core::constants::*;
use crate::items::types::EquippedItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Scalar used by every damage formula.
    pub combat_power: f64,
    pub attack: f64,
    pub defense: f64,
    pub magic_attack: f64,
    pub magic_defense: f64,
}

impl DerivedStats {
    /// Derived stats with no equipment.
    pub fn from_attributes(attrs: &Attributes, job: JobClass, level: u32) -> Self {
        Self::calculate(attrs, job, level, &[])
    }

    /// Resolves combat figures.
    ///
    /// Weighted attribute sum, then the job's multiplier record, then the
    /// flat contribution of every usable equipped item, then level scaling.
    pub fn calculate(
        attrs: &Attributes,
        job: JobClass,
        level: u32,
        equipment: &[EquippedItem],
    ) -> Self {
        let scaling = level_scaling(level);
        let equipment_bonus: f64 = equipment.iter().map(|i| i.effective_contribution()).sum();

        let aggregate = power_aggregate(attrs, job) + equipment_bonus;

        let str = attrs.strength as f64;
        let agi = attrs.agility as f64;
        let int = attrs.intelligence as f64;
        let vit = attrs.vitality as f64;

        Self {
            combat_power: aggregate * scaling,
            attack: (str * 2.0 + agi * 0.5 + equipment_bonus) * scaling,
            defense: (vit * 1.5 + agi * 0.5) * scaling,
            magic_attack: int * 2.0 * scaling,
            magic_defense: (int + vit) * scaling,
        }
    }
}

/// `1 + level * 0.1`
pub fn level_scaling(level: u32) -> f64 {
    1.0 + level as f64 * LEVEL_SCALING_PER_LEVEL
}

/// Weighted attribute sum with the job multipliers applied, before equipment
/// and level scaling.
pub fn power_aggregate(attrs: &Attributes, job: JobClass) -> f64 {
    let str = attrs.strength as f64;
    let agi = attrs.agility as f64;
    let int = attrs.intelligence as f64;
    let luk = attrs.luck as f64;

    let weighted = str * POWER_WEIGHT_STRENGTH
        + agi * POWER_WEIGHT_AGILITY
        + int * POWER_WEIGHT_INTELLIGENCE
        + luk * POWER_WEIGHT_LUCK;

    let m = job.multipliers();
    match m.aggregate {
        Some(mult) => weighted * mult,
        None => {
            weighted
                + str * (m.strength - 1.0)
                + agi * (m.agility - 1.0)
                + int * (m.intelligence - 1.0)
                + luk * (m.luck - 1.0)
        }
    }
}
