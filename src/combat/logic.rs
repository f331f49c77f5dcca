//! Round resolution.
//!
//! `play_round` is a pure transition: it reads a `Battle` and returns the next
//! one plus a log of what happened. Phase order within a round is fixed:
//! status ticks, defeat check, player attacks, monster retaliation, mana draw,
//! healing.

use super::element::elemental_modifier;
use super::status::{resists, roll_infliction, roll_proc_kind, CureAction, StatusKind};
use super::types::{Battle, CombatantState, MonsterState, RoundLog, StatusEvent, StatusTarget};
use crate::core::combat_math::{
    apply_damage, health_fraction, restore, retaliation_share, roll_variance,
};
use crate::core::config::EngineConfig;
use crate::core::constants::{CONFUSED_MISS_CHANCE, ELEMENT_PROC_CHANCE, FEARED_DAMAGE_MULTIPLIER};
use rand::Rng;
use std::cmp::Ordering;
use tracing::debug;

/// Result of one round: the next battle state and its log entry.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub next: Battle,
    pub log: RoundLog,
}

pub fn play_round(battle: &Battle, config: &EngineConfig, rng: &mut impl Rng) -> RoundOutcome {
    let mut next = battle.clone();
    next.round += 1;
    let mut log = RoundLog {
        round: next.round,
        ..Default::default()
    };

    tick_statuses(&mut next, &mut log);
    if next.monsters_defeated() || next.players_defeated() {
        return RoundOutcome { next, log };
    }

    player_attacks(&mut next, config, rng, &mut log);

    if !next.monsters_defeated() {
        monster_retaliation(&mut next, config, rng, &mut log);
    }

    draw_mana(&mut next, config, &mut log);
    healer_actions(&mut next, config, &mut log);

    debug!(
        round = log.round,
        dealt = log.damage_dealt,
        received = log.damage_received,
        misses = log.misses,
        "Round resolved"
    );

    RoundOutcome { next, log }
}

fn tick_statuses(battle: &mut Battle, log: &mut RoundLog) {
    for player in battle.players.iter_mut().filter(|p| p.is_alive()) {
        let owed = player.statuses.tick();
        let lost = take_damage(player, owed);
        log.tick_damage_to_players += lost;
    }

    for monster in battle.monsters.iter_mut().filter(|m| m.is_alive()) {
        let owed = monster.statuses.tick();
        let before = monster.health;
        monster.health = apply_damage(before, owed);
        log.tick_damage_to_monsters += before - monster.health;
        if !monster.is_alive() {
            log.monsters_slain.push(monster.monster_type);
        }
    }
}

fn player_attacks(battle: &mut Battle, config: &EngineConfig, rng: &mut impl Rng, log: &mut RoundLog) {
    let solo = battle.mode.is_solo();

    for i in 0..battle.players.len() {
        let Some(target) = battle.front_monster() else {
            break;
        };

        let attacker = &battle.players[i];
        if !attacker.can_act() {
            continue;
        }
        let power = attacker.power();
        let element = attacker.element;
        let confused = attacker.statuses.has(StatusKind::Confused);
        let feared = attacker.statuses.has(StatusKind::Feared);

        if confused && rng.gen::<f64>() < CONFUSED_MISS_CHANCE {
            log.misses += 1;
            continue;
        }

        let mut damage = power
            * roll_variance(config.variance_min, config.variance_max, rng)
            * elemental_modifier(element, battle.monsters[target].element);
        if solo {
            damage *= config.solo_damage_multiplier;
        }
        if feared {
            damage *= FEARED_DAMAGE_MULTIPLIER;
        }

        let landed = strike_monsters(&mut battle.monsters, damage, log);
        log.damage_dealt += landed;

        if !config.status_procs_enabled || !battle.monsters[target].is_alive() {
            continue;
        }
        // Monsters have no luck stat and never resist
        if let Some(kind) = element
            .inflicts()
            .and_then(|k| roll_infliction(ELEMENT_PROC_CHANCE, k, 0, rng))
        {
            battle.monsters[target].statuses.apply(kind, battle.round);
            log.statuses_applied.push(StatusEvent {
                target: StatusTarget::Monster(target),
                kind,
            });
        }
    }
}

/// Lands `damage` on the front-most living monster, carrying overflow to the
/// next one.
///
/// # Returns
/// Damage actually absorbed by monsters
fn strike_monsters(monsters: &mut [MonsterState], damage: f64, log: &mut RoundLog) -> f64 {
    let mut remaining = damage;
    let mut landed = 0.0;
    for monster in monsters.iter_mut().filter(|m| m.is_alive()) {
        if remaining <= 0.0 {
            break;
        }
        let absorbed = remaining.min(monster.health);
        monster.health = apply_damage(monster.health, absorbed);
        remaining -= absorbed;
        landed += absorbed;
        if !monster.is_alive() {
            log.monsters_slain.push(monster.monster_type);
        }
    }
    landed
}

fn monster_retaliation(
    battle: &mut Battle,
    config: &EngineConfig,
    rng: &mut impl Rng,
    log: &mut RoundLog,
) {
    let solo = battle.mode.is_solo();
    let mut aggregate = 0.0;
    for monster in &battle.monsters {
        let power = monster.effective_power();
        if power <= 0.0 {
            continue;
        }
        if monster.statuses.has(StatusKind::Confused) && rng.gen::<f64>() < CONFUSED_MISS_CHANCE {
            log.misses += 1;
            continue;
        }
        aggregate += power;
    }
    let share = retaliation_share(aggregate, battle.roster_size, battle.living_players(), solo);
    if share <= 0.0 {
        return;
    }

    // Inflicted effects are attributed to the monster in front
    let proc_chance = match battle.front_monster() {
        Some(i) if config.status_procs_enabled => battle.monsters[i].monster_type.status_proc_chance(),
        _ => 0.0,
    };
    let round = battle.round;

    for (i, player) in battle.players.iter_mut().enumerate() {
        if !player.is_alive() {
            continue;
        }

        let mut hit = share * roll_variance(config.variance_min, config.variance_max, rng);
        if solo {
            hit /= config.solo_defense_multiplier;
        }
        log.damage_received += take_damage(player, hit);

        if player.is_alive() && proc_chance > 0.0 && rng.gen::<f64>() < proc_chance {
            let kind = roll_proc_kind(rng);
            if !resists(player.luck, rng) {
                player.statuses.apply(kind, round);
                log.statuses_applied.push(StatusEvent {
                    target: StatusTarget::Player(i),
                    kind,
                });
            }
        }
    }
}

/// Fixed skill cost per acting combatant. Unaffordable costs are skipped.
fn draw_mana(battle: &mut Battle, config: &EngineConfig, log: &mut RoundLog) {
    let cost = config.skill_mana_cost;
    for player in battle.players.iter_mut().filter(|p| p.can_act()) {
        if player.mana >= cost {
            player.mana -= cost;
            player.mana_used += cost;
            log.mana_spent += cost;
        }
    }
}

fn healer_actions(battle: &mut Battle, config: &EngineConfig, log: &mut RoundLog) {
    let cost = config.heal_mana_cost;

    for h in 0..battle.players.len() {
        let healer = &battle.players[h];
        if !healer.is_healer() || !healer.can_act() || healer.mana < cost {
            continue;
        }
        let Some(target) = most_damaged_ally(&battle.players) else {
            continue;
        };

        let patient = &mut battle.players[target];
        let before = patient.health;
        patient.health = restore(before, config.heal_amount, patient.max_health);
        patient.statuses.cure_with_action(CureAction::Regenerate);
        log.heals.push((target, patient.health - before));

        let healer = &mut battle.players[h];
        healer.mana -= cost;
        healer.mana_used += cost;
        log.mana_spent += cost;
    }
}

/// Living, non-incapacitated ally with the lowest health fraction.
/// Ties go to the lowest index.
pub fn most_damaged_ally(players: &[CombatantState]) -> Option<usize> {
    players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_alive() && !p.statuses.incapacitated())
        .filter(|(_, p)| p.health < p.max_health || p.statuses.has(StatusKind::Dismembered))
        .min_by(|(_, a), (_, b)| {
            health_fraction(a.health, a.max_health)
                .partial_cmp(&health_fraction(b.health, b.max_health))
                .unwrap_or(Ordering::Equal)
        })
        .map(|(i, _)| i)
}

/// Applies damage to a player and records the health actually lost.
fn take_damage(player: &mut CombatantState, amount: f64) -> f64 {
    let before = player.health;
    player.health = apply_damage(before, amount);
    let lost = before - player.health;
    player.damage_taken += lost;
    lost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::derived_stats::DerivedStats;
    use crate::character::job::JobClass;
    use crate::combat::element::Element;
    use crate::combat::status::StatusSet;
    use crate::combat::types::{MonsterType, PartyMode};
    use crate::core::ids::EntrantId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player(job: JobClass, power: f64, health: f64, mana: f64) -> CombatantState {
        CombatantState {
            entrant_id: EntrantId::new(),
            name: job.name().to_string(),
            job,
            element: Element::Neutral,
            level: 1,
            luck: 0,
            health,
            max_health: health.max(100.0),
            mana,
            max_mana: mana.max(100.0),
            stats: DerivedStats {
                combat_power: power,
                attack: power,
                defense: 0.0,
                magic_attack: 0.0,
                magic_defense: 0.0,
            },
            statuses: StatusSet::new(),
            damage_taken: 0.0,
            mana_used: 0.0,
        }
    }

    fn monster(power: f64, health: f64) -> MonsterState {
        MonsterState {
            name: "Goblin".to_string(),
            monster_type: MonsterType::Normal,
            level: 1,
            element: Element::Neutral,
            health,
            max_health: health,
            power,
            statuses: StatusSet::new(),
        }
    }

    fn quiet_config() -> EngineConfig {
        EngineConfig {
            status_procs_enabled: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_play_round_leaves_input_untouched() {
        let battle = Battle::new(
            PartyMode::Solo,
            vec![player(JobClass::Fighter, 100.0, 500.0, 100.0)],
            vec![monster(80.0, 1_000.0)],
        );
        let snapshot = battle.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = play_round(&battle, &quiet_config(), &mut rng);

        assert_eq!(battle, snapshot);
        assert_eq!(outcome.next.round, 1);
        assert!(outcome.next.monsters[0].health < 1_000.0);
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let battle = Battle::new(
            PartyMode::Party,
            vec![
                player(JobClass::Fighter, 100.0, 500.0, 100.0),
                player(JobClass::Healer, 60.0, 500.0, 200.0),
            ],
            vec![monster(120.0, 2_000.0), monster(120.0, 2_000.0)],
        );
        let config = EngineConfig::default();
        let a = play_round(&battle, &config, &mut ChaCha8Rng::seed_from_u64(9));
        let b = play_round(&battle, &config, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a.next, b.next);
        assert_eq!(a.log, b.log);
    }

    #[test]
    fn test_solo_deals_more_and_takes_less_than_party() {
        let make = |mode| {
            Battle::new(
                mode,
                vec![player(JobClass::Fighter, 100.0, 10_000.0, 100.0)],
                vec![monster(300.0, 1e9)],
            )
        };
        let config = quiet_config();

        let solo = play_round(&make(PartyMode::Solo), &config, &mut ChaCha8Rng::seed_from_u64(5));
        let party = play_round(&make(PartyMode::Party), &config, &mut ChaCha8Rng::seed_from_u64(5));

        let dealt_ratio = solo.log.damage_dealt / party.log.damage_dealt;
        let taken_ratio = party.log.damage_received / solo.log.damage_received;
        assert!((dealt_ratio - 1.5).abs() < 1e-9, "dealt ratio {dealt_ratio}");
        assert!((taken_ratio - 1.3).abs() < 1e-9, "taken ratio {taken_ratio}");
    }

    #[test]
    fn test_ticks_resolve_before_actions() {
        let mut doomed = player(JobClass::Fighter, 100.0, 500.0, 100.0);
        doomed.statuses.apply(StatusKind::Decapitated, 0);
        let battle = Battle::new(PartyMode::Solo, vec![doomed], vec![monster(10.0, 1_000.0)]);

        let outcome = play_round(&battle, &quiet_config(), &mut ChaCha8Rng::seed_from_u64(2));

        assert!(!outcome.next.players[0].is_alive());
        assert_eq!(outcome.log.damage_dealt, 0.0);
        assert_eq!(outcome.next.monsters[0].health, 1_000.0);
        // Health lost is bounded by health held
        assert_eq!(outcome.next.players[0].damage_taken, 500.0);
    }

    #[test]
    fn test_overflow_carries_to_next_monster() {
        let mut monsters = vec![monster(1.0, 30.0), monster(1.0, 30.0), monster(1.0, 30.0)];
        let mut log = RoundLog::default();

        let landed = strike_monsters(&mut monsters, 45.0, &mut log);

        assert_eq!(landed, 45.0);
        assert_eq!(monsters[0].health, 0.0);
        assert_eq!(monsters[1].health, 15.0);
        assert_eq!(monsters[2].health, 30.0);
        assert_eq!(log.monsters_slain.len(), 1);
    }

    #[test]
    fn test_frozen_player_does_not_attack() {
        let mut frozen = player(JobClass::Fighter, 100.0, 500.0, 100.0);
        frozen.statuses.apply(StatusKind::Frozen, 0);
        let battle = Battle::new(PartyMode::Solo, vec![frozen], vec![monster(10.0, 1_000.0)]);

        let outcome = play_round(&battle, &quiet_config(), &mut ChaCha8Rng::seed_from_u64(4));

        assert_eq!(outcome.log.damage_dealt, 0.0);
        // Frozen skips the skill draw too
        assert_eq!(outcome.next.players[0].mana, 100.0);
    }

    #[test]
    fn test_unaffordable_mana_is_skipped() {
        let battle = Battle::new(
            PartyMode::Solo,
            vec![player(JobClass::Fighter, 10.0, 500.0, 15.0)],
            vec![monster(1.0, 1e9)],
        );
        let outcome = play_round(&battle, &quiet_config(), &mut ChaCha8Rng::seed_from_u64(4));
        assert_eq!(outcome.next.players[0].mana, 15.0);
        assert_eq!(outcome.log.mana_spent, 0.0);
    }

    #[test]
    fn test_most_damaged_ally_prefers_lowest_fraction_then_index() {
        let mut players = vec![
            player(JobClass::Fighter, 1.0, 100.0, 0.0),
            player(JobClass::Fighter, 1.0, 100.0, 0.0),
            player(JobClass::Fighter, 1.0, 100.0, 0.0),
        ];
        assert_eq!(most_damaged_ally(&players), None);

        players[1].health = 40.0;
        players[2].health = 40.0;
        assert_eq!(most_damaged_ally(&players), Some(1));

        players[2].health = 20.0;
        assert_eq!(most_damaged_ally(&players), Some(2));

        players[2].health = 0.0;
        assert_eq!(most_damaged_ally(&players), Some(1));
    }

    #[test]
    fn test_healer_restores_and_regenerates() {
        let mut wounded = player(JobClass::Fighter, 1.0, 100.0, 0.0);
        wounded.health = 10.0;
        wounded.statuses.apply(StatusKind::Dismembered, 0);
        let healer = player(JobClass::Healer, 1.0, 100.0, 200.0);
        let mut battle = Battle::new(PartyMode::Party, vec![wounded, healer], vec![]);
        let mut log = RoundLog::default();

        healer_actions(&mut battle, &EngineConfig::default(), &mut log);

        assert_eq!(battle.players[0].health, 100.0);
        assert!(!battle.players[0].statuses.has(StatusKind::Dismembered));
        assert_eq!(battle.players[1].mana, 150.0);
        assert_eq!(log.heals, vec![(0, 90.0)]);
    }

    #[test]
    fn test_frozen_monsters_do_not_retaliate() {
        let mut iced = monster(500.0, 1e9);
        iced.statuses.apply(StatusKind::Frozen, 0);
        let battle = Battle::new(
            PartyMode::Solo,
            vec![player(JobClass::Fighter, 1.0, 500.0, 0.0)],
            vec![iced],
        );
        let outcome = play_round(&battle, &quiet_config(), &mut ChaCha8Rng::seed_from_u64(8));
        assert_eq!(outcome.log.damage_received, 0.0);
    }

    #[test]
    fn test_confused_monster_sometimes_holds_back() {
        let config = quiet_config();
        let mut held_back = 0;
        for seed in 0..200 {
            let mut dazed = monster(500.0, 1e9);
            dazed.statuses.apply(StatusKind::Confused, 0);
            let battle = Battle::new(
                PartyMode::Solo,
                vec![player(JobClass::Fighter, 1.0, 1e9, 0.0)],
                vec![dazed],
            );

            let outcome = play_round(&battle, &config, &mut ChaCha8Rng::seed_from_u64(seed));

            if outcome.log.damage_received == 0.0 {
                assert_eq!(outcome.log.misses, 1);
                held_back += 1;
            } else {
                assert_eq!(outcome.log.misses, 0);
            }
        }
        // 25 % of 200 rounds
        assert!((20..=80).contains(&held_back), "held back {held_back} times");
    }
}
