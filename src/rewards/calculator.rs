//! Loot & Reward Calculator.
//!
//! Rolls a raw reward pool for a won gate, then splits it into per-entrant
//! shares. Party scaling applies to each member's own share, never to the
//! pooled total. Losses and aborts pay nothing.

use super::behavior::{drop_multiplier, BehaviorProfile};
use super::party::party_scaling;
use crate::combat::types::{CombatResult, Outcome, PartyMode};
use crate::core::config::EngineConfig;
use crate::core::ids::EntrantId;
use crate::gate::grade::GradeConfig;
use crate::items::drops::{luck_bonus, roll_drops};
use crate::items::types::ItemDrop;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Currency, experience and items granted to one entrant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub currency: u64,
    pub experience: u64,
    pub items: Vec<ItemDrop>,
}

impl Reward {
    pub fn is_empty(&self) -> bool {
        self.currency == 0 && self.experience == 0 && self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardShare {
    pub entrant_id: EntrantId,
    pub reward: Reward,
}

/// Raw totals before distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardPool {
    /// Base currency each member's share is scaled from
    pub currency: u64,
    pub experience: u64,
    pub drops: Vec<ItemDrop>,
}

/// Rewards for one finished session: the raw pool (wins only) and its split.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardResolution {
    pub pool: Option<RewardPool>,
    pub shares: Vec<RewardShare>,
}

/// Rolls base currency and experience from the grade's ranges, and drop
/// tiers for every defeated monster.
pub fn roll_pool(
    result: &CombatResult,
    grade: &GradeConfig,
    drop_rate_multiplier: f64,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> RewardPool {
    let (cur_lo, cur_hi) = grade.currency_range;
    let (exp_lo, exp_hi) = grade.experience_range;
    let currency = rng.gen_range(cur_lo..=cur_hi);
    let experience = rng.gen_range(exp_lo..=exp_hi);

    let bonus = luck_bonus(result.aggregate_luck(), config);
    let drops = result
        .defeated_monsters
        .iter()
        .flat_map(|m| roll_drops(*m, bonus, drop_rate_multiplier, rng))
        .collect();

    RewardPool {
        currency,
        experience,
        drops,
    }
}

/// Splits `pool` into one share per combatant in `result`.
///
/// Survivors of a win get `base * party_scaling * solo_bonus * behaviour`;
/// everyone else gets nothing. Each drop goes whole to one uniformly chosen
/// survivor.
pub fn distribute(
    pool: &RewardPool,
    result: &CombatResult,
    mode: PartyMode,
    behaviors: &HashMap<EntrantId, BehaviorProfile>,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Vec<RewardShare> {
    let mut shares = empty_shares(result);
    if result.outcome != Outcome::Win {
        return shares;
    }

    let survivors: Vec<usize> = result
        .combatants
        .iter()
        .enumerate()
        .filter(|(_, c)| c.survived)
        .map(|(i, _)| i)
        .collect();
    if survivors.is_empty() {
        return shares;
    }

    let mut per_member = party_scaling(result.combatants.len());
    if mode.is_solo() {
        per_member *= config.solo_reward_multiplier;
    }

    for &i in &survivors {
        let share = &mut shares[i];
        let personal = behaviors
            .get(&share.entrant_id)
            .map(|b| b.reward_multiplier())
            .unwrap_or(1.0);
        share.reward.currency = (pool.currency as f64 * per_member * personal).round() as u64;
        share.reward.experience = (pool.experience as f64 * per_member * personal).round() as u64;
    }

    for &drop in &pool.drops {
        let winner = survivors[rng.gen_range(0..survivors.len())];
        shares[winner].reward.items.push(drop);
    }

    shares
}

/// Full reward resolution for a finished session.
pub fn calculate_rewards(
    result: &CombatResult,
    grade: &GradeConfig,
    mode: PartyMode,
    behaviors: &HashMap<EntrantId, BehaviorProfile>,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> RewardResolution {
    if result.outcome != Outcome::Win {
        debug!(outcome = ?result.outcome, "No rewards for unsuccessful gate");
        return RewardResolution {
            pool: None,
            shares: empty_shares(result),
        };
    }

    let multiplier = drop_multiplier(behaviors.values());
    let pool = roll_pool(result, grade, multiplier, config, rng);
    debug!(
        currency = pool.currency,
        experience = pool.experience,
        drops = pool.drops.len(),
        "Reward pool rolled"
    );
    let shares = distribute(&pool, result, mode, behaviors, config, rng);
    RewardResolution {
        pool: Some(pool),
        shares,
    }
}

fn empty_shares(result: &CombatResult) -> Vec<RewardShare> {
    result
        .combatants
        .iter()
        .map(|c| RewardShare {
            entrant_id: c.entrant_id,
            reward: Reward::default(),
        })
        .collect()
}
