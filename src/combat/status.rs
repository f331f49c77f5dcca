//! Status Effect Engine.
//!
//! Each applied effect moves through Applied -> Ticking -> (Expired | Cured).
//! Templates are fixed; an applied instance is a copy carrying its remaining
//! duration and the round it was applied in.

use crate::core::constants::{RESIST_CHANCE_CAP, RESIST_CHANCE_PER_LUCK};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Duration marker for effects that only an explicit cure removes.
pub const PERMANENT: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusKind {
    Burn,
    Poisoned,
    Frozen,
    Feared,
    Confused,
    Dismembered,
    Decapitated,
    Shadow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CureAction {
    Cure,
    Regenerate,
    Arise,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusTemplate {
    pub kind: StatusKind,
    /// Rounds, or `PERMANENT`
    pub duration: i32,
    pub damage_per_tick: f64,
    pub cure_item: Option<&'static str>,
    pub cure_action: Option<CureAction>,
}

const CHILL_ANTIDOTE: &str = "Chill Antidote";
const CLEANSING_ANTIDOTE: &str = "Cleansing Antidote";
const FLAME_ANTIDOTE: &str = "Flame Antidote";
const SHILAJIT_ANTIDOTE: &str = "Shilajit Antidote";
const ADVANCED_RESURRECTION_POTION: &str = "Advanced Resurrection Potion";

/// Relative weights for the kind a monster hit inflicts.
pub const PROC_WEIGHTS: [(StatusKind, f64); 7] = [
    (StatusKind::Burn, 0.15),
    (StatusKind::Poisoned, 0.15),
    (StatusKind::Frozen, 0.15),
    (StatusKind::Feared, 0.10),
    (StatusKind::Confused, 0.10),
    (StatusKind::Dismembered, 0.05),
    (StatusKind::Decapitated, 0.02),
];

impl StatusKind {
    pub fn all() -> [StatusKind; 8] {
        [
            StatusKind::Burn,
            StatusKind::Poisoned,
            StatusKind::Frozen,
            StatusKind::Feared,
            StatusKind::Confused,
            StatusKind::Dismembered,
            StatusKind::Decapitated,
            StatusKind::Shadow,
        ]
    }

    pub fn template(&self) -> StatusTemplate {
        let (duration, damage_per_tick, cure_item, cure_action) = match self {
            StatusKind::Burn => (5, 10.0, Some(CHILL_ANTIDOTE), Some(CureAction::Cure)),
            StatusKind::Poisoned => (8, 5.0, Some(CLEANSING_ANTIDOTE), Some(CureAction::Cure)),
            StatusKind::Frozen => (3, 8.0, Some(FLAME_ANTIDOTE), Some(CureAction::Cure)),
            StatusKind::Feared => (4, 3.0, Some(SHILAJIT_ANTIDOTE), None),
            StatusKind::Confused => (4, 3.0, Some(SHILAJIT_ANTIDOTE), None),
            StatusKind::Dismembered => (PERMANENT, 15.0, None, Some(CureAction::Regenerate)),
            StatusKind::Decapitated => (
                PERMANENT,
                999_999.0,
                Some(ADVANCED_RESURRECTION_POTION),
                Some(CureAction::Arise),
            ),
            StatusKind::Shadow => (PERMANENT, 0.0, Some(ADVANCED_RESURRECTION_POTION), None),
        };
        StatusTemplate {
            kind: *self,
            duration,
            damage_per_tick,
            cure_item,
            cure_action,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.template().duration == PERMANENT
    }

    /// The afflicted combatant skips attacking and healing.
    pub fn blocks_actions(&self) -> bool {
        matches!(
            self,
            StatusKind::Frozen | StatusKind::Decapitated | StatusKind::Shadow
        )
    }

    /// The afflicted combatant counts as down for loss detection.
    pub fn incapacitates(&self) -> bool {
        matches!(self, StatusKind::Decapitated | StatusKind::Shadow)
    }

    /// Kinds removed by using `item`.
    pub fn cured_by_item(item: &str) -> Vec<StatusKind> {
        StatusKind::all()
            .into_iter()
            .filter(|k| k.template().cure_item == Some(item))
            .collect()
    }

    /// Kinds removed by performing `action`.
    pub fn cured_by_action(action: CureAction) -> Vec<StatusKind> {
        StatusKind::all()
            .into_iter()
            .filter(|k| k.template().cure_action == Some(action))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveStatus {
    pub kind: StatusKind,
    pub remaining: i32,
    pub damage_per_tick: f64,
    pub applied_round: u32,
}

impl ActiveStatus {
    pub fn from_template(template: &StatusTemplate, round: u32) -> Self {
        Self {
            kind: template.kind,
            remaining: template.duration,
            damage_per_tick: template.damage_per_tick,
            applied_round: round,
        }
    }
}

/// Active effects on one combatant, at most one instance per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSet {
    effects: BTreeMap<StatusKind, ActiveStatus>,
}

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `kind`, replacing any active instance of the same kind.
    pub fn apply(&mut self, kind: StatusKind, round: u32) {
        self.effects
            .insert(kind, ActiveStatus::from_template(&kind.template(), round));
    }

    /// Runs one tick: sums damage of every active effect, then decrements
    /// finite durations and drops effects that reach zero.
    ///
    /// # Returns
    /// Total damage owed by the afflicted combatant this tick
    pub fn tick(&mut self) -> f64 {
        let mut damage = 0.0;
        for effect in self.effects.values_mut() {
            damage += effect.damage_per_tick;
            if effect.remaining != PERMANENT {
                effect.remaining -= 1;
            }
        }
        self.effects
            .retain(|_, e| e.remaining == PERMANENT || e.remaining > 0);
        damage
    }

    /// Removes `kind` regardless of remaining duration.
    pub fn cure(&mut self, kind: StatusKind) -> bool {
        self.effects.remove(&kind).is_some()
    }

    pub fn cure_with_item(&mut self, item: &str) -> Vec<StatusKind> {
        StatusKind::cured_by_item(item)
            .into_iter()
            .filter(|k| self.cure(*k))
            .collect()
    }

    pub fn cure_with_action(&mut self, action: CureAction) -> Vec<StatusKind> {
        StatusKind::cured_by_action(action)
            .into_iter()
            .filter(|k| self.cure(*k))
            .collect()
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.contains_key(&kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&ActiveStatus> {
        self.effects.get(&kind)
    }

    pub fn blocks_actions(&self) -> bool {
        self.effects.keys().any(|k| k.blocks_actions())
    }

    pub fn incapacitated(&self) -> bool {
        self.effects.keys().any(|k| k.incapacitates())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveStatus> {
        self.effects.values()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Chance that a combatant with `luck` shrugs off an inflicted effect.
pub fn resist_chance(luck: u32) -> f64 {
    (luck as f64 * RESIST_CHANCE_PER_LUCK).min(RESIST_CHANCE_CAP)
}

/// Picks an effect kind from `PROC_WEIGHTS`.
pub fn roll_proc_kind(rng: &mut impl Rng) -> StatusKind {
    let total: f64 = PROC_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen::<f64>() * total;
    for (kind, weight) in PROC_WEIGHTS {
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    PROC_WEIGHTS[PROC_WEIGHTS.len() - 1].0
}

/// Rolls the target's resistance against an inflicted effect.
pub fn resists(luck: u32, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < resist_chance(luck)
}

/// Rolls whether a hit inflicts `kind` and, if so, whether the target
/// resists it.
pub fn roll_infliction(
    chance: f64,
    kind: StatusKind,
    target_luck: u32,
    rng: &mut impl Rng,
) -> Option<StatusKind> {
    if rng.gen::<f64>() >= chance || resists(target_luck, rng) {
        return None;
    }
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_burn_expires_after_its_duration() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::Burn, 1);
        for _ in 0..5 {
            assert!(set.has(StatusKind::Burn));
            assert_eq!(set.tick(), 10.0);
        }
        assert!(!set.has(StatusKind::Burn));
        assert_eq!(set.tick(), 0.0);
    }

    #[test]
    fn test_permanent_effect_survives_a_thousand_ticks() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::Dismembered, 0);
        set.apply(StatusKind::Shadow, 0);
        for _ in 0..1000 {
            set.tick();
        }
        assert!(set.has(StatusKind::Dismembered));
        assert!(set.has(StatusKind::Shadow));
        assert_eq!(set.get(StatusKind::Dismembered).map(|e| e.remaining), Some(PERMANENT));

        assert!(set.cure(StatusKind::Dismembered));
        assert!(!set.has(StatusKind::Dismembered));
    }

    #[test]
    fn test_reapply_replaces_instead_of_stacking() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::Poisoned, 1);
        set.tick();
        set.tick();
        assert_eq!(set.get(StatusKind::Poisoned).map(|e| e.remaining), Some(6));

        set.apply(StatusKind::Poisoned, 3);
        assert_eq!(set.len(), 1);
        let poison = set.get(StatusKind::Poisoned).copied();
        assert_eq!(poison.map(|e| e.remaining), Some(8));
        assert_eq!(poison.map(|e| e.applied_round), Some(3));
        // One instance means one tick of damage
        assert_eq!(set.tick(), 5.0);
    }

    #[test]
    fn test_shilajit_cures_fear_and_confusion() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::Feared, 0);
        set.apply(StatusKind::Confused, 0);
        set.apply(StatusKind::Burn, 0);

        let cured = set.cure_with_item("Shilajit Antidote");
        assert_eq!(cured, vec![StatusKind::Feared, StatusKind::Confused]);
        assert!(set.has(StatusKind::Burn));
    }

    #[test]
    fn test_cure_actions() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::Decapitated, 0);
        set.apply(StatusKind::Dismembered, 0);
        assert_eq!(set.cure_with_action(CureAction::Arise), vec![StatusKind::Decapitated]);
        assert_eq!(
            set.cure_with_action(CureAction::Regenerate),
            vec![StatusKind::Dismembered]
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_blocking_and_incapacitation() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::Frozen, 0);
        assert!(set.blocks_actions());
        assert!(!set.incapacitated());

        set.apply(StatusKind::Shadow, 0);
        assert!(set.incapacitated());
    }

    #[test]
    fn test_only_three_kinds_are_permanent() {
        let permanent: Vec<_> = StatusKind::all()
            .into_iter()
            .filter(|k| k.is_permanent())
            .collect();
        assert_eq!(
            permanent,
            vec![StatusKind::Dismembered, StatusKind::Decapitated, StatusKind::Shadow]
        );
    }

    #[test]
    fn test_resist_chance_caps() {
        assert_eq!(resist_chance(0), 0.0);
        assert!((resist_chance(40) - 0.2).abs() < 1e-9);
        assert_eq!(resist_chance(10_000), RESIST_CHANCE_CAP);
    }

    #[test]
    fn test_roll_infliction_respects_zero_and_full_chance() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..100 {
            assert_eq!(roll_infliction(0.0, StatusKind::Burn, 0, &mut rng), None);
            assert_eq!(
                roll_infliction(1.0, StatusKind::Burn, 0, &mut rng),
                Some(StatusKind::Burn)
            );
        }
    }

    #[test]
    fn test_proc_kind_distribution_favors_common_effects() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut burns = 0;
        let mut decapitations = 0;
        for _ in 0..10_000 {
            match roll_proc_kind(&mut rng) {
                StatusKind::Burn => burns += 1,
                StatusKind::Decapitated => decapitations += 1,
                _ => {}
            }
        }
        // Expected ~1829 burns vs ~244 decapitations
        assert!(burns > decapitations * 3, "burns {burns}, decapitations {decapitations}");
    }
}
