// Session pacing
pub const ROUND_CAP: u32 = 100;
pub const SECONDS_PER_ROUND: f64 = 6.0;

// Damage variance band applied to every hit
pub const DAMAGE_VARIANCE_MIN: f64 = 0.8;
pub const DAMAGE_VARIANCE_MAX: f64 = 1.2;

// Solo compensation (relative to party combat)
pub const SOLO_DAMAGE_MULTIPLIER: f64 = 1.5;
pub const SOLO_DEFENSE_MULTIPLIER: f64 = 1.3;
pub const SOLO_REWARD_MULTIPLIER: f64 = 2.0;

// Per-round resource usage
pub const SKILL_MANA_COST: f64 = 20.0;
pub const HEAL_AMOUNT: f64 = 100.0;
pub const HEAL_MANA_COST: f64 = 50.0;

// Stat resolver weights
pub const POWER_WEIGHT_STRENGTH: f64 = 1.5;
pub const POWER_WEIGHT_AGILITY: f64 = 1.2;
pub const POWER_WEIGHT_INTELLIGENCE: f64 = 1.3;
pub const POWER_WEIGHT_LUCK: f64 = 0.5;
pub const LEVEL_SCALING_PER_LEVEL: f64 = 0.1;

// Character attributes
pub const BASE_ATTRIBUTE_VALUE: u32 = 10;

// Elemental modifiers
pub const ELEMENT_DAMAGE_BONUS: f64 = 0.5;
pub const ELEMENT_DAMAGE_PENALTY: f64 = 0.25;

// Status effects
pub const CONFUSED_MISS_CHANCE: f64 = 0.25;
pub const FEARED_DAMAGE_MULTIPLIER: f64 = 0.5;
pub const RESIST_CHANCE_PER_LUCK: f64 = 0.005;
pub const RESIST_CHANCE_CAP: f64 = 0.5;
pub const ELEMENT_PROC_CHANCE: f64 = 0.10;

// Durability
pub const MAX_DURABILITY: f64 = 100.0;
pub const DURABILITY_LOSS_PER_DAMAGE: f64 = 0.01;
pub const DURABILITY_LOSS_PER_MANA: f64 = 0.005;
pub const DURABILITY_LOSS_PER_MINUTE: f64 = 0.1;
pub const REPAIR_COST_PER_POINT: f64 = 10.0;

// Luck scaling on drop tables
pub const LUCK_BONUS_PER_POINT: f64 = 0.001;
pub const LUCK_BONUS_CAP: f64 = 0.20;

// Entrant pools: 100 + vitality * 10 health, 50 + intelligence * 5 mana
pub const BASE_HEALTH: f64 = 100.0;
pub const HEALTH_PER_VITALITY: f64 = 10.0;
pub const BASE_MANA: f64 = 50.0;
pub const MANA_PER_INTELLIGENCE: f64 = 5.0;

// Party limits
pub const MAX_PARTY_SIZE: usize = 10;

// Monster scaling: base = level * MONSTER_POWER_PER_LEVEL * type power
pub const MONSTER_POWER_PER_LEVEL: f64 = 10.0;

// Behaviour-driven bonuses
pub const BEHAVIOR_SUCCESS_THRESHOLD: f64 = 0.6;
pub const BEHAVIOR_SUCCESS_BONUS: f64 = 0.10;
pub const BEHAVIOR_PARTY_THRESHOLD: f64 = 0.5;
pub const BEHAVIOR_PARTY_BONUS: f64 = 0.05;
pub const BEHAVIOR_COLLECTION_DROP_BONUS: f64 = 0.10;
pub const BEHAVIOR_DIFFICULTY_THRESHOLD: f64 = 0.7;
pub const BEHAVIOR_SUCCESS_DIFFICULTY: f64 = 0.2;
pub const BEHAVIOR_RISK_DIFFICULTY: f64 = 0.1;
