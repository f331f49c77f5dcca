use super::element::Element;
use super::status::{StatusKind, StatusSet};
use crate::character::derived_stats::DerivedStats;
use crate::character::job::JobClass;
use crate::core::combat_math::is_alive;
use crate::core::constants::FEARED_DAMAGE_MULTIPLIER;
use crate::core::ids::EntrantId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MonsterType {
    Normal,
    Elite,
    Boss,
    Monarch,
}

impl MonsterType {
    pub fn all() -> [MonsterType; 4] {
        [
            MonsterType::Normal,
            MonsterType::Elite,
            MonsterType::Boss,
            MonsterType::Monarch,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MonsterType::Normal => "Normal",
            MonsterType::Elite => "Elite",
            MonsterType::Boss => "Boss",
            MonsterType::Monarch => "Monarch",
        }
    }

    /// Base power weight of the type.
    pub fn power(&self) -> f64 {
        match self {
            MonsterType::Normal => 1.0,
            MonsterType::Elite => 2.0,
            MonsterType::Boss => 5.0,
            MonsterType::Monarch => 10.0,
        }
    }

    pub fn health_multiplier(&self) -> f64 {
        match self {
            MonsterType::Normal => 1.0,
            MonsterType::Elite => 1.5,
            MonsterType::Boss => 3.0,
            MonsterType::Monarch => 5.0,
        }
    }

    pub fn damage_multiplier(&self) -> f64 {
        match self {
            MonsterType::Normal => 1.0,
            MonsterType::Elite => 1.5,
            MonsterType::Boss => 2.0,
            MonsterType::Monarch => 3.0,
        }
    }

    /// Chance that one of this type's hits inflicts a status effect.
    pub fn status_proc_chance(&self) -> f64 {
        match self {
            MonsterType::Normal => 0.05,
            MonsterType::Elite => 0.10,
            MonsterType::Boss => 0.15,
            MonsterType::Monarch => 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyMode {
    Solo,
    Party,
}

impl PartyMode {
    pub fn from_flag(party_mode: bool) -> Self {
        if party_mode {
            PartyMode::Party
        } else {
            PartyMode::Solo
        }
    }

    pub fn is_solo(&self) -> bool {
        matches!(self, PartyMode::Solo)
    }
}

/// Player-side combatant for the lifetime of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatantState {
    pub entrant_id: EntrantId,
    pub name: String,
    pub job: JobClass,
    pub element: Element,
    pub level: u32,
    pub luck: u32,
    pub health: f64,
    pub max_health: f64,
    pub mana: f64,
    pub max_mana: f64,
    pub stats: DerivedStats,
    pub statuses: StatusSet,
    /// Health actually lost over the session
    pub damage_taken: f64,
    pub mana_used: f64,
}

impl CombatantState {
    pub fn power(&self) -> f64 {
        self.stats.combat_power
    }

    pub fn is_alive(&self) -> bool {
        is_alive(self.health)
    }

    /// Dead, or held by an incapacitating effect.
    pub fn is_down(&self) -> bool {
        !self.is_alive() || self.statuses.incapacitated()
    }

    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.statuses.blocks_actions()
    }

    pub fn is_healer(&self) -> bool {
        self.job.is_healer()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonsterState {
    pub name: String,
    pub monster_type: MonsterType,
    pub level: u32,
    pub element: Element,
    pub health: f64,
    pub max_health: f64,
    pub power: f64,
    pub statuses: StatusSet,
}

impl MonsterState {
    pub fn is_alive(&self) -> bool {
        is_alive(self.health)
    }

    /// Power this monster contributes to the group's retaliation.
    /// Confusion is rolled per round in retaliation, not here.
    pub fn effective_power(&self) -> f64 {
        if !self.is_alive() || self.statuses.blocks_actions() {
            0.0
        } else if self.statuses.has(StatusKind::Feared) {
            self.power * FEARED_DAMAGE_MULTIPLIER
        } else {
            self.power
        }
    }
}

/// Full battle state. Rounds produce a new `Battle` rather than mutating one.
#[derive(Debug, Clone, PartialEq)]
pub struct Battle {
    pub round: u32,
    pub mode: PartyMode,
    pub players: Vec<CombatantState>,
    pub monsters: Vec<MonsterState>,
    /// Monster count at session start; divides retaliation.
    pub roster_size: usize,
}

impl Battle {
    pub fn new(mode: PartyMode, players: Vec<CombatantState>, monsters: Vec<MonsterState>) -> Self {
        let roster_size = monsters.len();
        Self {
            round: 0,
            mode,
            players,
            monsters,
            roster_size,
        }
    }

    pub fn monsters_defeated(&self) -> bool {
        self.monsters.iter().all(|m| !m.is_alive())
    }

    pub fn players_defeated(&self) -> bool {
        self.players.iter().all(|p| p.is_down())
    }

    pub fn living_players(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    /// Index of the monster currently absorbing player damage.
    pub fn front_monster(&self) -> Option<usize> {
        self.monsters.iter().position(|m| m.is_alive())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusTarget {
    Player(usize),
    Monster(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEvent {
    pub target: StatusTarget,
    pub kind: StatusKind,
}

/// What happened in one round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundLog {
    pub round: u32,
    pub tick_damage_to_players: f64,
    pub tick_damage_to_monsters: f64,
    pub damage_dealt: f64,
    pub damage_received: f64,
    pub misses: u32,
    pub mana_spent: f64,
    /// (player index, health restored)
    pub heals: Vec<(usize, f64)>,
    pub statuses_applied: Vec<StatusEvent>,
    pub monsters_slain: Vec<MonsterType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// Cancelled from outside, e.g. a player disconnect
    External,
    InvariantViolation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSummary {
    pub entrant_id: EntrantId,
    pub survived: bool,
    pub damage_taken: f64,
    pub mana_used: f64,
    pub luck: u32,
}

/// Immutable record of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub outcome: Outcome,
    pub abort_reason: Option<AbortReason>,
    pub combatants: Vec<CombatantSummary>,
    /// Reward basis: every monster slain, in kill order
    pub defeated_monsters: Vec<MonsterType>,
    pub rounds: u32,
    pub duration_seconds: f64,
}

impl CombatResult {
    pub fn survivors(&self) -> Vec<EntrantId> {
        self.combatants
            .iter()
            .filter(|c| c.survived)
            .map(|c| c.entrant_id)
            .collect()
    }

    pub fn defeated(&self) -> Vec<EntrantId> {
        self.combatants
            .iter()
            .filter(|c| !c.survived)
            .map(|c| c.entrant_id)
            .collect()
    }

    /// Summed as `u64`; individual luck values may be near `u32::MAX`.
    pub fn aggregate_luck(&self) -> u64 {
        self.combatants.iter().map(|c| u64::from(c.luck)).sum()
    }
}
