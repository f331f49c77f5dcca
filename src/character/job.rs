//! Job classes and their fixed multiplier records.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobClass {
    Fighter,
    Mage,
    Assassin,
    Archer,
    Healer,
    /// Monarch tier: one multiplier applied to the whole aggregate.
    ShadowMonarch,
}

/// Per-class stat multipliers.
///
/// Per-attribute entries add `attribute * (mult - 1)` to the power aggregate.
/// `aggregate` replaces them for monarch-tier classes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobMultipliers {
    pub strength: f64,
    pub agility: f64,
    pub intelligence: f64,
    pub luck: f64,
    pub aggregate: Option<f64>,
}

impl JobMultipliers {
    const NEUTRAL: JobMultipliers = JobMultipliers {
        strength: 1.0,
        agility: 1.0,
        intelligence: 1.0,
        luck: 1.0,
        aggregate: None,
    };
}

impl JobClass {
    pub fn all() -> [JobClass; 6] {
        [
            JobClass::Fighter,
            JobClass::Mage,
            JobClass::Assassin,
            JobClass::Archer,
            JobClass::Healer,
            JobClass::ShadowMonarch,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            JobClass::Fighter => "Fighter",
            JobClass::Mage => "Mage",
            JobClass::Assassin => "Assassin",
            JobClass::Archer => "Archer",
            JobClass::Healer => "Healer",
            JobClass::ShadowMonarch => "Shadow Monarch",
        }
    }

    pub fn multipliers(&self) -> JobMultipliers {
        match self {
            JobClass::Fighter => JobMultipliers {
                strength: 1.3,
                ..JobMultipliers::NEUTRAL
            },
            JobClass::Mage => JobMultipliers {
                intelligence: 1.3,
                ..JobMultipliers::NEUTRAL
            },
            JobClass::Assassin => JobMultipliers {
                agility: 1.3,
                luck: 1.2,
                ..JobMultipliers::NEUTRAL
            },
            JobClass::Archer => JobMultipliers {
                agility: 1.2,
                luck: 1.3,
                ..JobMultipliers::NEUTRAL
            },
            JobClass::Healer => JobMultipliers {
                intelligence: 1.2,
                ..JobMultipliers::NEUTRAL
            },
            JobClass::ShadowMonarch => JobMultipliers {
                aggregate: Some(2.0),
                ..JobMultipliers::NEUTRAL
            },
        }
    }

    /// Whether this class takes the healer action each round.
    pub fn is_healer(&self) -> bool {
        matches!(self, JobClass::Healer)
    }

    pub fn is_monarch_tier(&self) -> bool {
        self.multipliers().aggregate.is_some()
    }
}

impl FromStr for JobClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace([' ', '_', '-'], "").as_str() {
            "fighter" => Ok(JobClass::Fighter),
            "mage" => Ok(JobClass::Mage),
            "assassin" => Ok(JobClass::Assassin),
            "archer" => Ok(JobClass::Archer),
            "healer" => Ok(JobClass::Healer),
            "shadowmonarch" => Ok(JobClass::ShadowMonarch),
            other => Err(format!("unknown job class: {other}")),
        }
    }
}
