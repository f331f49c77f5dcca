//! Simulation configuration.

use crate::character::job::JobClass;
use crate::core::config::EngineConfig;
use crate::gate::grade::GateGrade;

/// Configuration for a batch of simulated gates.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of gates to resolve
    pub runs: u32,

    /// Base seed; run `n` uses `seed + n`. None = entropy.
    pub seed: Option<u64>,

    pub grade: GateGrade,

    /// 1 = solo, otherwise a party of this many
    pub party_size: usize,

    /// Entrant level (None = the grade's minimum level)
    pub level: Option<u32>,

    pub job: JobClass,

    /// Replace the last party slot with a Healer
    pub include_healer: bool,

    /// Value of every base attribute
    pub attribute_value: u32,

    /// Stat contribution of each of the two starter items (weapon, armor)
    pub gear_contribution: f64,

    pub engine: EngineConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            runs: 500,
            seed: None,
            grade: GateGrade::E,
            party_size: 1,
            level: None,
            job: JobClass::Fighter,
            include_healer: false,
            attribute_value: 20,
            gear_contribution: 10.0,
            engine: EngineConfig::default(),
        }
    }
}

impl SimConfig {
    /// Quick config for one grade with a fixed seed.
    pub fn grade_balance_test(grade: GateGrade, party_size: usize) -> Self {
        Self {
            runs: 100,
            seed: Some(42),
            grade,
            party_size,
            include_healer: party_size > 1,
            ..Default::default()
        }
    }

    pub fn entrant_level(&self) -> u32 {
        self.level.unwrap_or_else(|| self.grade.config().min_level())
    }

    pub fn is_solo(&self) -> bool {
        self.party_size <= 1
    }
}
