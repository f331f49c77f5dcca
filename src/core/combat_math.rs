//! Shared combat math functions for sessions and the simulator.
//!
//! These pure functions calculate combat figures without side effects.

use rand::Rng;

/// Roll a uniform variance multiplier in `[min, max]`.
pub fn roll_variance(min: f64, max: f64, rng: &mut impl Rng) -> f64 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Apply damage to health, clamping at 0.
///
/// # Returns
/// Health remaining after damage
pub fn apply_damage(current_health: f64, damage: f64) -> f64 {
    (current_health - damage.max(0.0)).max(0.0)
}

/// Restore health (or mana), clamping at `max`.
pub fn restore(current: f64, amount: f64, max: f64) -> f64 {
    (current + amount.max(0.0)).min(max)
}

/// Check if an entity is still alive.
pub fn is_alive(current_health: f64) -> bool {
    current_health > 0.0
}

/// Base (pre-variance) damage each living player-side combatant receives
/// from the monster group in one round.
///
/// Solo: the aggregate is split evenly across the roster.
/// Party: the aggregate is split across roster size × living members.
///
/// # Arguments
/// * `aggregate_power` - Sum of living monster power this round
/// * `monster_count` - Roster size at session start
/// * `living_players` - Player-side combatants still standing
/// * `solo` - Whether the session is in solo mode
pub fn retaliation_share(
    aggregate_power: f64,
    monster_count: usize,
    living_players: usize,
    solo: bool,
) -> f64 {
    if monster_count == 0 || living_players == 0 {
        return 0.0;
    }
    if solo {
        aggregate_power / monster_count as f64
    } else {
        aggregate_power / (monster_count * living_players) as f64
    }
}

/// Fraction of max health remaining (0.0 when max is 0).
pub fn health_fraction(current: f64, max: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        current / max
    }
}
