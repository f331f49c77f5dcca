//! Gate grades and the static grade table.

use crate::combat::types::MonsterType::{self, Boss, Elite, Monarch, Normal};
use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GateGrade {
    E,
    D,
    C,
    B,
    A,
    S,
    SS,
    SSS,
}

/// Monster and reward ranges for one grade. All ranges are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeConfig {
    pub grade: GateGrade,
    pub level_range: (u32, u32),
    pub currency_range: (u64, u64),
    pub experience_range: (u64, u64),
    pub monster_count: (usize, usize),
    pub monster_types: &'static [MonsterType],
    /// Chance a rolled boss fights at full boss strength
    pub boss_chance: f64,
}

impl GradeConfig {
    pub fn min_level(&self) -> u32 {
        self.level_range.0
    }
}

impl GateGrade {
    pub fn all() -> [GateGrade; 8] {
        [
            GateGrade::E,
            GateGrade::D,
            GateGrade::C,
            GateGrade::B,
            GateGrade::A,
            GateGrade::S,
            GateGrade::SS,
            GateGrade::SSS,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            GateGrade::E => "E",
            GateGrade::D => "D",
            GateGrade::C => "C",
            GateGrade::B => "B",
            GateGrade::A => "A",
            GateGrade::S => "S",
            GateGrade::SS => "SS",
            GateGrade::SSS => "SSS",
        }
    }

    pub fn config(&self) -> GradeConfig {
        let grade = *self;
        match self {
            GateGrade::E => GradeConfig {
                grade,
                level_range: (1, 10),
                currency_range: (10, 50),
                experience_range: (100, 500),
                monster_count: (2, 5),
                monster_types: &[Normal],
                boss_chance: 0.0,
            },
            GateGrade::D => GradeConfig {
                grade,
                level_range: (10, 20),
                currency_range: (40, 100),
                experience_range: (400, 1_000),
                monster_count: (3, 6),
                monster_types: &[Normal, Elite],
                boss_chance: 0.1,
            },
            GateGrade::C => GradeConfig {
                grade,
                level_range: (20, 35),
                currency_range: (80, 200),
                experience_range: (900, 2_500),
                monster_count: (4, 7),
                monster_types: &[Normal, Elite],
                boss_chance: 0.2,
            },
            GateGrade::B => GradeConfig {
                grade,
                level_range: (35, 50),
                currency_range: (150, 400),
                experience_range: (2_000, 5_000),
                monster_count: (5, 8),
                monster_types: &[Normal, Elite, Boss],
                boss_chance: 0.3,
            },
            GateGrade::A => GradeConfig {
                grade,
                level_range: (50, 70),
                currency_range: (300, 800),
                experience_range: (4_500, 9_000),
                monster_count: (6, 9),
                monster_types: &[Elite, Boss],
                boss_chance: 0.4,
            },
            GateGrade::S => GradeConfig {
                grade,
                level_range: (70, 90),
                currency_range: (600, 1_500),
                experience_range: (8_000, 16_000),
                monster_count: (7, 10),
                monster_types: &[Elite, Boss, Monarch],
                boss_chance: 0.5,
            },
            GateGrade::SS => GradeConfig {
                grade,
                level_range: (90, 120),
                currency_range: (1_000, 3_000),
                experience_range: (15_000, 30_000),
                monster_count: (8, 12),
                monster_types: &[Boss, Monarch],
                boss_chance: 0.6,
            },
            GateGrade::SSS => GradeConfig {
                grade,
                level_range: (120, 999),
                currency_range: (2_000, 6_000),
                experience_range: (30_000, 90_000),
                monster_count: (10, 15),
                monster_types: &[Monarch],
                boss_chance: 1.0,
            },
        }
    }
}

impl fmt::Display for GateGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateGrade {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        GateGrade::all()
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownGrade(s.to_string()))
    }
}
