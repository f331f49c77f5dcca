//! Drop tables and tier rolls.
//!
//! Every tier of a monster's table is an independent trial: one defeated boss
//! can yield a Rare, an Epic and a Legendary in the same roll.

use super::types::{ItemDrop, ItemGrade};
use crate::combat::types::MonsterType;
use crate::core::config::EngineConfig;
use rand::Rng;

const NORMAL_TABLE: [(ItemGrade, f64); 3] = [
    (ItemGrade::Common, 0.50),
    (ItemGrade::Uncommon, 0.25),
    (ItemGrade::Rare, 0.10),
];

const ELITE_TABLE: [(ItemGrade, f64); 3] = [
    (ItemGrade::Uncommon, 0.30),
    (ItemGrade::Rare, 0.15),
    (ItemGrade::Epic, 0.07),
];

const BOSS_TABLE: [(ItemGrade, f64); 3] = [
    (ItemGrade::Rare, 0.25),
    (ItemGrade::Epic, 0.10),
    (ItemGrade::Legendary, 0.025),
];

const MONARCH_TABLE: [(ItemGrade, f64); 3] = [
    (ItemGrade::Epic, 0.20),
    (ItemGrade::Legendary, 0.05),
    (ItemGrade::Immortal, 0.005),
];

/// Base drop rate per grade tier for a monster type.
pub fn drop_table(monster_type: MonsterType) -> &'static [(ItemGrade, f64)] {
    match monster_type {
        MonsterType::Normal => &NORMAL_TABLE,
        MonsterType::Elite => &ELITE_TABLE,
        MonsterType::Boss => &BOSS_TABLE,
        MonsterType::Monarch => &MONARCH_TABLE,
    }
}

/// Drop-rate bonus from aggregate party luck, capped.
pub fn luck_bonus(aggregate_luck: u64, config: &EngineConfig) -> f64 {
    (aggregate_luck as f64 * config.luck_bonus_per_point).min(config.luck_bonus_cap)
}

/// `base * (1 + luck_bonus) * drop_multiplier`, clamped to a probability.
pub fn adjusted_rate(base: f64, luck_bonus: f64, drop_multiplier: f64) -> f64 {
    (base * (1.0 + luck_bonus) * drop_multiplier).clamp(0.0, 1.0)
}

/// Rolls every tier of one defeated monster's table.
pub fn roll_drops(
    monster_type: MonsterType,
    luck_bonus: f64,
    drop_multiplier: f64,
    rng: &mut impl Rng,
) -> Vec<ItemDrop> {
    drop_table(monster_type)
        .iter()
        .filter(|(_, base)| rng.gen::<f64>() < adjusted_rate(*base, luck_bonus, drop_multiplier))
        .map(|(grade, _)| ItemDrop {
            grade: *grade,
            source: monster_type,
        })
        .collect()
}
