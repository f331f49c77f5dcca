//! Engine configuration.
//!
//! Static balance tables (grades, drop tables, job multipliers) are compiled in.
//! Everything here can be tuned per deployment and loaded from JSON.

use super::constants::*;
use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Tunable combat, wear and reward rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === SESSION ===
    /// Hard ceiling on rounds. Reaching it without a result is a Loss.
    pub round_cap: u32,

    /// Simulated seconds per round, used for elapsed time and wear.
    pub seconds_per_round: f64,

    // === DAMAGE ===
    /// Lower bound of the per-hit variance roll
    pub variance_min: f64,

    /// Upper bound of the per-hit variance roll
    pub variance_max: f64,

    /// Outgoing damage multiplier in solo mode
    pub solo_damage_multiplier: f64,

    /// Incoming damage divisor in solo mode
    pub solo_defense_multiplier: f64,

    /// Reward multiplier in solo mode
    pub solo_reward_multiplier: f64,

    // === RESOURCES ===
    /// Mana drawn per living combatant per round for skill usage
    pub skill_mana_cost: f64,

    /// Health restored by one healer action
    pub heal_amount: f64,

    /// Mana paid by one healer action
    pub heal_mana_cost: f64,

    // === STATUS EFFECTS ===
    /// Whether hits may inflict status effects. Disable for pure damage races.
    pub status_procs_enabled: bool,

    // === DURABILITY ===
    pub durability_loss_per_damage: f64,
    pub durability_loss_per_mana: f64,
    pub durability_loss_per_minute: f64,

    /// Currency charged per durability point restored
    pub repair_cost_per_point: f64,

    // === LOOT ===
    /// Drop-rate bonus per point of aggregate party luck
    pub luck_bonus_per_point: f64,

    /// Ceiling on the luck drop-rate bonus
    pub luck_bonus_cap: f64,

    // === PARTY ===
    pub max_party_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_cap: ROUND_CAP,
            seconds_per_round: SECONDS_PER_ROUND,

            variance_min: DAMAGE_VARIANCE_MIN,
            variance_max: DAMAGE_VARIANCE_MAX,
            solo_damage_multiplier: SOLO_DAMAGE_MULTIPLIER,
            solo_defense_multiplier: SOLO_DEFENSE_MULTIPLIER,
            solo_reward_multiplier: SOLO_REWARD_MULTIPLIER,

            skill_mana_cost: SKILL_MANA_COST,
            heal_amount: HEAL_AMOUNT,
            heal_mana_cost: HEAL_MANA_COST,

            status_procs_enabled: true,

            durability_loss_per_damage: DURABILITY_LOSS_PER_DAMAGE,
            durability_loss_per_mana: DURABILITY_LOSS_PER_MANA,
            durability_loss_per_minute: DURABILITY_LOSS_PER_MINUTE,
            repair_cost_per_point: REPAIR_COST_PER_POINT,

            luck_bonus_per_point: LUCK_BONUS_PER_POINT,
            luck_bonus_cap: LUCK_BONUS_CAP,

            max_party_size: MAX_PARTY_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_cap == 0 {
            return Err(ConfigError::Invalid("round_cap must be at least 1".into()));
        }

        if self.seconds_per_round <= 0.0 {
            return Err(ConfigError::Invalid(
                "seconds_per_round must be positive".into(),
            ));
        }

        if self.variance_min <= 0.0 || self.variance_min > self.variance_max {
            return Err(ConfigError::Invalid(format!(
                "variance band ({}, {}) must be positive and ordered",
                self.variance_min, self.variance_max
            )));
        }

        // Solo mode is compensation, never a penalty
        if self.solo_damage_multiplier < 1.0
            || self.solo_defense_multiplier < 1.0
            || self.solo_reward_multiplier < 1.0
        {
            return Err(ConfigError::Invalid(
                "solo multipliers must be >= 1.0".into(),
            ));
        }

        if self.skill_mana_cost < 0.0 || self.heal_mana_cost < 0.0 || self.heal_amount < 0.0 {
            return Err(ConfigError::Invalid(
                "resource costs and heal amount must be non-negative".into(),
            ));
        }

        if self.durability_loss_per_damage < 0.0
            || self.durability_loss_per_mana < 0.0
            || self.durability_loss_per_minute < 0.0
        {
            return Err(ConfigError::Invalid(
                "durability loss rates must be non-negative".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.luck_bonus_cap) {
            return Err(ConfigError::Invalid(format!(
                "luck_bonus_cap ({}) must be within [0, 1]",
                self.luck_bonus_cap
            )));
        }

        if self.max_party_size < 2 {
            return Err(ConfigError::Invalid(
                "max_party_size must allow at least 2 members".into(),
            ));
        }

        Ok(())
    }

    /// Minutes of gate time represented by `rounds` rounds.
    pub fn minutes_for_rounds(&self, rounds: u32) -> f64 {
        rounds as f64 * self.seconds_per_round / 60.0
    }
}
