//! Request and outcome records for the gate entry point.

use super::grade::GateGrade;
use crate::character::attributes::Attributes;
use crate::character::job::JobClass;
use crate::combat::element::Element;
use crate::combat::types::{AbortReason, Outcome};
use crate::core::constants::*;
use crate::core::ids::{EntrantId, SessionId};
use crate::items::durability::DurabilityChange;
use crate::rewards::behavior::BehaviorProfile;
use crate::rewards::calculator::{Reward, RewardPool};
use serde::{Deserialize, Serialize};

/// Snapshot of one combatant entering a gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
    pub level: u32,
    pub job: JobClass,
    pub element: Element,
    pub attributes: Attributes,
    pub health: f64,
    pub max_health: f64,
    pub mana: f64,
    pub max_mana: f64,
    #[serde(default)]
    pub behavior: Option<BehaviorProfile>,
}

impl Entrant {
    /// Fresh entrant at full health and mana derived from attributes.
    pub fn new(name: &str, level: u32, job: JobClass, attributes: Attributes) -> Self {
        let max_health = BASE_HEALTH + attributes.vitality as f64 * HEALTH_PER_VITALITY;
        let max_mana = BASE_MANA + attributes.intelligence as f64 * MANA_PER_INTELLIGENCE;
        Self {
            id: EntrantId::new(),
            name: name.to_string(),
            level,
            job,
            element: Element::Neutral,
            attributes,
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            behavior: None,
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    /// Overrides both current and maximum health.
    pub fn with_health(mut self, health: f64) -> Self {
        self.health = health;
        self.max_health = health;
        self
    }

    pub fn with_mana(mut self, mana: f64) -> Self {
        self.mana = mana;
        self.max_mana = mana;
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorProfile) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Reason the snapshot cannot enter combat, if any.
    pub fn snapshot_problem(&self) -> Option<String> {
        let finite = [self.health, self.max_health, self.mana, self.max_mana]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            Some("non-finite pool".to_string())
        } else if self.max_health <= 0.0 {
            Some(format!("max health {} must be positive", self.max_health))
        } else if self.health < 0.0 || self.health > self.max_health {
            Some(format!("health {} outside 0..={}", self.health, self.max_health))
        } else if self.max_mana < 0.0 || self.mana < 0.0 || self.mana > self.max_mana {
            Some(format!("mana {} outside 0..={}", self.mana, self.max_mana))
        } else {
            None
        }
    }
}

/// Input to `resolve_gate_instance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRequest {
    pub grade: GateGrade,
    pub entrants: Vec<Entrant>,
    /// False means solo: exactly one entrant.
    pub party_mode: bool,
    /// Fixes the session's random stream.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Fixes the gate element instead of rolling it.
    #[serde(default)]
    pub element: Option<Element>,
}

impl GateRequest {
    pub fn solo(grade: GateGrade, entrant: Entrant) -> Self {
        Self {
            grade,
            entrants: vec![entrant],
            party_mode: false,
            seed: None,
            element: None,
        }
    }

    pub fn party(grade: GateGrade, entrants: Vec<Entrant>) -> Self {
        Self {
            grade,
            entrants,
            party_mode: true,
            seed: None,
            element: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrantResult {
    pub entrant_id: EntrantId,
    pub survived: bool,
    pub damage_taken: f64,
    pub resource_used: f64,
    pub equipment_durability_delta: Vec<DurabilityChange>,
    pub reward: Reward,
}

/// Everything the caller learns about a resolved gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub session_id: SessionId,
    pub grade: GateGrade,
    pub outcome: Outcome,
    pub abort_reason: Option<AbortReason>,
    pub per_entrant_result: Vec<EntrantResult>,
    /// Raw totals before distribution; `None` unless the gate was won
    #[serde(default)]
    pub reward_pool: Option<RewardPool>,
    pub rounds_elapsed: u32,
    pub duration_seconds: f64,
    /// Unix timestamp of resolution
    pub completed_at: i64,
    /// Set when any durability or reward write did not go through. The
    /// result above is still authoritative and can be re-persisted.
    pub write_back_failed: bool,
    pub write_back_errors: Vec<String>,
}

impl GateOutcome {
    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }

    pub fn result_for(&self, entrant: EntrantId) -> Option<&EntrantResult> {
        self.per_entrant_result
            .iter()
            .find(|r| r.entrant_id == entrant)
    }

    pub fn total_currency(&self) -> u64 {
        self.per_entrant_result
            .iter()
            .map(|r| r.reward.currency)
            .sum()
    }
}
