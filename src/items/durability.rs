//! Durability Tracker: post-session wear and repair.

use super::types::EquippedItem;
use crate::core::config::EngineConfig;
use crate::core::constants::MAX_DURABILITY;
use crate::core::error::DurabilityError;
use crate::core::ids::ItemId;
use serde::{Deserialize, Serialize};

/// Before/after durability of one item for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurabilityChange {
    pub item_id: ItemId,
    pub before: f64,
    pub after: f64,
    pub broken: bool,
}

impl DurabilityChange {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Durability lost by every equipped item of one combatant.
///
/// `damage_taken * rate_damage + mana_used * rate_mana + minutes * rate_time`
pub fn durability_loss(
    damage_taken: f64,
    mana_used: f64,
    minutes_elapsed: f64,
    config: &EngineConfig,
) -> f64 {
    let loss = damage_taken.max(0.0) * config.durability_loss_per_damage
        + mana_used.max(0.0) * config.durability_loss_per_mana
        + minutes_elapsed.max(0.0) * config.durability_loss_per_minute;
    loss.max(0.0)
}

/// Applies `loss` to `item`, clamping to `[0, MAX_DURABILITY]`.
/// Reaching zero marks the item broken.
pub fn apply_wear(item: &mut EquippedItem, loss: f64) -> DurabilityChange {
    let before = item.durability;
    item.durability = (before - loss.max(0.0)).clamp(0.0, MAX_DURABILITY);
    if item.durability <= 0.0 {
        item.broken = true;
    }
    DurabilityChange {
        item_id: item.id,
        before,
        after: item.durability,
        broken: item.broken,
    }
}

pub fn repair_cost(points: f64, config: &EngineConfig) -> f64 {
    points.max(0.0) * config.repair_cost_per_point
}

/// Restores up to `amount` durability and returns the currency cost.
///
/// A broken item only accepts a repair that brings it back to full; anything
/// less is rejected and the item is left as it was.
pub fn repair(
    item: &mut EquippedItem,
    amount: f64,
    config: &EngineConfig,
) -> Result<f64, DurabilityError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DurabilityError::InvalidAmount(amount));
    }
    let missing = item.missing_durability();
    if missing <= 0.0 {
        return Err(DurabilityError::NothingToRepair);
    }
    if item.broken && amount < missing {
        return Err(DurabilityError::PartialRepairOfBroken { requested: amount });
    }

    let restored = amount.min(missing);
    item.durability = (item.durability + restored).min(MAX_DURABILITY);
    if item.durability >= MAX_DURABILITY {
        item.broken = false;
    }
    Ok(repair_cost(restored, config))
}

/// Restores the item to full durability.
pub fn full_repair(item: &mut EquippedItem, config: &EngineConfig) -> Result<f64, DurabilityError> {
    let missing = item.missing_durability();
    repair(item, missing, config)
}
