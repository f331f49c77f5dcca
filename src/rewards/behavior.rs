//! Behaviour-driven reward, drop and difficulty adjustments.
//!
//! A profile is optional per entrant and summarises past play supplied by the
//! caller. Every figure is a fraction in `[0, 1]`.

use crate::core::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BehaviorProfile {
    /// Share of past gates cleared
    pub success_rate: f64,
    /// Share of activity spent in parties
    pub party_play_share: f64,
    /// Preference for collecting (gacha, crafting)
    pub collection_preference: f64,
    /// Appetite for high-risk activities
    #[serde(default)]
    pub risk_tolerance: f64,
}

impl BehaviorProfile {
    pub fn new(success_rate: f64, party_play_share: f64, collection_preference: f64) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
            party_play_share: party_play_share.clamp(0.0, 1.0),
            collection_preference: collection_preference.clamp(0.0, 1.0),
            risk_tolerance: 0.0,
        }
    }

    pub fn with_risk_tolerance(mut self, risk_tolerance: f64) -> Self {
        self.risk_tolerance = risk_tolerance.clamp(0.0, 1.0);
        self
    }

    /// Multiplier on monster health and power for gates this entrant enters.
    pub fn difficulty_modifier(&self) -> f64 {
        let mut modifier = 1.0;
        if self.success_rate > BEHAVIOR_DIFFICULTY_THRESHOLD {
            modifier += BEHAVIOR_SUCCESS_DIFFICULTY;
        }
        if self.risk_tolerance > BEHAVIOR_DIFFICULTY_THRESHOLD {
            modifier += BEHAVIOR_RISK_DIFFICULTY;
        }
        modifier
    }

    /// Multiplier on this entrant's currency and experience.
    pub fn reward_multiplier(&self) -> f64 {
        let mut multiplier = 1.0;
        if self.success_rate > BEHAVIOR_SUCCESS_THRESHOLD {
            multiplier += BEHAVIOR_SUCCESS_BONUS;
        }
        if self.party_play_share > BEHAVIOR_PARTY_THRESHOLD {
            multiplier += BEHAVIOR_PARTY_BONUS;
        }
        multiplier
    }
}

/// Drop-rate multiplier from the party's average collection preference.
/// Entrants without a profile are not counted.
pub fn drop_multiplier<'a>(profiles: impl IntoIterator<Item = &'a BehaviorProfile>) -> f64 {
    let (sum, count) = profiles
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), p| {
            (sum + p.collection_preference.clamp(0.0, 1.0), count + 1)
        });
    if count == 0 {
        return 1.0;
    }
    1.0 + (sum / count as f64) * BEHAVIOR_COLLECTION_DROP_BONUS
}

/// Gate difficulty for a party: the highest individual modifier, or 1.0
/// when nobody supplied a profile.
pub fn gate_difficulty<'a>(profiles: impl IntoIterator<Item = &'a BehaviorProfile>) -> f64 {
    profiles
        .into_iter()
        .map(BehaviorProfile::difficulty_modifier)
        .fold(1.0, f64::max)
}
