//! Monster Generator.

use super::grade::GradeConfig;
use crate::combat::element::Element;
use crate::combat::status::StatusSet;
use crate::combat::types::{MonsterState, MonsterType};
use crate::core::constants::MONSTER_POWER_PER_LEVEL;
use rand::Rng;

/// Rolls a gate element from the seven cycle elements and Neutral.
pub fn roll_gate_element(rng: &mut impl Rng) -> Element {
    let all = Element::all();
    all[rng.gen_range(0..all.len())]
}

/// Builds the monster roster for one gate.
///
/// Count is the grade's rolled count plus one per extra party member. A
/// rolled boss that fails the grade's boss chance stays a boss but fights
/// at base multipliers. Every monster shares the gate element, and health
/// and power are scaled by `difficulty`.
pub fn generate_monsters(
    grade: &GradeConfig,
    party_size: usize,
    element: Element,
    difficulty: f64,
    rng: &mut impl Rng,
) -> Vec<MonsterState> {
    let (min_count, max_count) = grade.monster_count;
    let count = rng.gen_range(min_count..=max_count) + party_size.saturating_sub(1);

    (0..count)
        .map(|i| {
            let (monster_type, full_strength) = roll_monster_type(grade, rng);
            let level = rng.gen_range(grade.level_range.0..=grade.level_range.1);
            let mut monster = if full_strength {
                build_monster(i, monster_type, level, element)
            } else {
                assemble(i, monster_type, level, element, 1.0, 1.0)
            };
            scale_monster(&mut monster, difficulty);
            monster
        })
        .collect()
}

/// Rolled type, and whether it gets its type's stat multipliers.
fn roll_monster_type(grade: &GradeConfig, rng: &mut impl Rng) -> (MonsterType, bool) {
    let rolled = grade.monster_types[rng.gen_range(0..grade.monster_types.len())];
    if rolled == MonsterType::Boss {
        (rolled, rng.gen::<f64>() < grade.boss_chance)
    } else {
        (rolled, true)
    }
}

pub fn build_monster(
    index: usize,
    monster_type: MonsterType,
    level: u32,
    element: Element,
) -> MonsterState {
    assemble(
        index,
        monster_type,
        level,
        element,
        monster_type.health_multiplier(),
        monster_type.damage_multiplier(),
    )
}

fn assemble(
    index: usize,
    monster_type: MonsterType,
    level: u32,
    element: Element,
    health_multiplier: f64,
    damage_multiplier: f64,
) -> MonsterState {
    let base = level as f64 * MONSTER_POWER_PER_LEVEL * monster_type.power();
    let health = base * health_multiplier;
    MonsterState {
        name: format!("{} {} #{}", element.name(), monster_type.name(), index + 1),
        monster_type,
        level,
        element,
        health,
        max_health: health,
        power: base * damage_multiplier,
        statuses: StatusSet::new(),
    }
}

fn scale_monster(monster: &mut MonsterState, difficulty: f64) {
    monster.health *= difficulty;
    monster.max_health *= difficulty;
    monster.power *= difficulty;
}
