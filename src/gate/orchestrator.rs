//! Gate Orchestrator: owns every live session and the single entry point.
//!
//! Sessions are keyed by id in an explicit registry. A session is opened
//! (validated, equipped, populated), then run to a terminal state on the
//! caller's thread or a blocking tokio task. Wear and rewards are written
//! back through the collaborator once the result is fixed.

use super::collaborator::GateCollaborator;
use super::generation::{generate_monsters, roll_gate_element};
use super::grade::GradeConfig;
use super::types::{EntrantResult, GateOutcome, GateRequest};
use crate::character::derived_stats::DerivedStats;
use crate::combat::session::CombatSession;
use crate::combat::status::StatusSet;
use crate::combat::types::{Battle, CombatantState, PartyMode};
use crate::core::config::EngineConfig;
use crate::core::constants::MAX_DURABILITY;
use crate::core::error::{ConfigError, GateError, Result, ValidationError};
use crate::core::ids::{EntrantId, SessionId};
use crate::items::durability::{apply_wear, durability_loss, DurabilityChange};
use crate::items::types::EquippedItem;
use crate::rewards::behavior::{gate_difficulty, BehaviorProfile};
use crate::rewards::calculator::{calculate_rewards, Reward};
use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn};

/// A session that has been opened but not yet run.
struct PendingSession {
    session: CombatSession,
    grade: GradeConfig,
    mode: PartyMode,
    /// Equipment per entrant, in roster order
    equipment: Vec<(EntrantId, Vec<EquippedItem>)>,
    behaviors: HashMap<EntrantId, BehaviorProfile>,
}

struct SessionHandle {
    abort: Arc<AtomicBool>,
    /// Taken by the runner; `None` while the session is running.
    pending: Option<PendingSession>,
}

pub struct GateOrchestrator {
    config: EngineConfig,
    collaborator: Arc<dyn GateCollaborator>,
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
}

impl GateOrchestrator {
    pub fn new(collaborator: Arc<dyn GateCollaborator>) -> Self {
        Self {
            config: EngineConfig::default(),
            collaborator,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_config(
        config: EngineConfig,
        collaborator: Arc<dyn GateCollaborator>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            collaborator,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<SessionId, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a session and resolves it to a terminal outcome.
    pub fn resolve_gate_instance(&self, req: GateRequest) -> Result<GateOutcome> {
        let session_id = self.open_session(req)?;
        self.run_session(session_id)
    }

    /// Resolves a gate on tokio's blocking pool.
    pub fn spawn_gate_instance(self: &Arc<Self>, req: GateRequest) -> JoinHandle<Result<GateOutcome>> {
        let this = Arc::clone(self);
        tokio::task::spawn_blocking(move || this.resolve_gate_instance(req))
    }

    /// Runs an already opened session on tokio's blocking pool.
    pub fn spawn_session(self: &Arc<Self>, session_id: SessionId) -> JoinHandle<Result<GateOutcome>> {
        let this = Arc::clone(self);
        tokio::task::spawn_blocking(move || this.run_session(session_id))
    }

    /// Validates the request, reads equipment, rolls the monster roster and
    /// registers the session. Nothing is registered if any step fails.
    pub fn open_session(&self, req: GateRequest) -> Result<SessionId> {
        validate_request(&req, &self.config)?;
        if req.entrants.iter().all(|e| e.health <= 0.0) {
            return Err(GateError::Starvation);
        }

        let grade = req.grade.config();
        let mode = PartyMode::from_flag(req.party_mode);

        let mut players = Vec::with_capacity(req.entrants.len());
        let mut equipment = Vec::with_capacity(req.entrants.len());
        for entrant in &req.entrants {
            let items = self.collaborator.get_equipped_items(entrant.id)?;
            if let Some(bad) = items
                .iter()
                .find(|i| i.durability.is_nan() || i.durability > MAX_DURABILITY)
            {
                return Err(ValidationError::InvalidSnapshot {
                    entrant: entrant.id,
                    reason: format!(
                        "item {} durability {} outside 0..={}",
                        bad.id, bad.durability, MAX_DURABILITY
                    ),
                }
                .into());
            }
            if let Some(broken) = items.iter().find(|i| !i.is_usable() || i.durability <= 0.0) {
                return Err(ValidationError::BrokenEquipment {
                    entrant: entrant.id,
                    item: broken.id,
                }
                .into());
            }

            let stats = DerivedStats::calculate(&entrant.attributes, entrant.job, entrant.level, &items);
            players.push(CombatantState {
                entrant_id: entrant.id,
                name: entrant.name.clone(),
                job: entrant.job,
                element: entrant.element,
                level: entrant.level,
                luck: entrant.attributes.luck,
                health: entrant.health,
                max_health: entrant.max_health,
                mana: entrant.mana,
                max_mana: entrant.max_mana,
                stats,
                statuses: StatusSet::new(),
                damage_taken: 0.0,
                mana_used: 0.0,
            });
            equipment.push((entrant.id, items));
        }

        let mut rng = match req.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let behaviors: HashMap<EntrantId, BehaviorProfile> = req
            .entrants
            .iter()
            .filter_map(|e| e.behavior.map(|b| (e.id, b)))
            .collect();
        let difficulty = gate_difficulty(behaviors.values());

        let element = req.element.unwrap_or_else(|| roll_gate_element(&mut rng));
        let monsters = generate_monsters(&grade, req.entrants.len(), element, difficulty, &mut rng);

        let mut session = CombatSession::new(Battle::new(mode, players, monsters), self.config.clone(), rng);
        session.start()?;

        let session_id = SessionId::new();
        info!(
            %session_id,
            grade = %req.grade,
            entrants = req.entrants.len(),
            monsters = session.battle().monsters.len(),
            element = element.name(),
            difficulty,
            "Gate session opened"
        );

        self.registry().insert(
            session_id,
            SessionHandle {
                abort: Arc::new(AtomicBool::new(false)),
                pending: Some(PendingSession {
                    session,
                    grade,
                    mode,
                    equipment,
                    behaviors,
                }),
            },
        );
        Ok(session_id)
    }

    /// Flags a registered session for abort. It resolves as `Aborted` before
    /// its next round. Returns false for an unknown id.
    pub fn abort(&self, session_id: SessionId) -> bool {
        match self.registry().get(&session_id) {
            Some(handle) => {
                handle.abort.store(true, Ordering::SeqCst);
                info!(%session_id, "Gate session abort requested");
                true
            }
            None => false,
        }
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        self.registry().keys().copied().collect()
    }

    /// Drives an opened session to its end and writes the results back.
    pub fn run_session(&self, session_id: SessionId) -> Result<GateOutcome> {
        let (abort, pending) = {
            let mut registry = self.registry();
            let handle = registry
                .get_mut(&session_id)
                .ok_or(GateError::SessionNotFound(session_id))?;
            let pending = handle
                .pending
                .take()
                .ok_or(GateError::SessionNotFound(session_id))?;
            (Arc::clone(&handle.abort), pending)
        };

        let span = info_span!("gate_session", %session_id, grade = %pending.grade.grade);
        let _enter = span.enter();

        let outcome = self.resolve(session_id, pending, &abort);
        self.registry().remove(&session_id);
        Ok(outcome)
    }

    fn resolve(&self, session_id: SessionId, pending: PendingSession, abort: &AtomicBool) -> GateOutcome {
        let PendingSession {
            mut session,
            grade,
            mode,
            mut equipment,
            behaviors,
        } = pending;

        let result = session.run_to_completion(abort);
        let minutes = self.config.minutes_for_rounds(result.rounds);

        // Wear applies to every outcome, aborts included.
        let wear: Vec<Vec<DurabilityChange>> = result
            .combatants
            .iter()
            .zip(equipment.iter_mut())
            .map(|(summary, (_, items))| {
                let loss = durability_loss(summary.damage_taken, summary.mana_used, minutes, &self.config);
                items.iter_mut().map(|item| apply_wear(item, loss)).collect()
            })
            .collect();

        let rewards = calculate_rewards(&result, &grade, mode, &behaviors, &self.config, session.rng_mut());

        let mut per_entrant_result = Vec::with_capacity(result.combatants.len());
        let mut write_back_errors = Vec::new();
        for ((summary, deltas), share) in result.combatants.iter().zip(wear).zip(rewards.shares) {
            write_back_errors.extend(self.write_back(summary.entrant_id, &deltas, &share.reward));
            per_entrant_result.push(EntrantResult {
                entrant_id: summary.entrant_id,
                survived: summary.survived,
                damage_taken: summary.damage_taken,
                resource_used: summary.mana_used,
                equipment_durability_delta: deltas,
                reward: share.reward,
            });
        }

        for error in &write_back_errors {
            warn!(%session_id, error = %error, "Write-back failed");
        }

        info!(
            outcome = ?result.outcome,
            rounds = result.rounds,
            write_back_failed = !write_back_errors.is_empty(),
            "Gate session resolved"
        );

        GateOutcome {
            session_id,
            grade: grade.grade,
            outcome: result.outcome,
            abort_reason: result.abort_reason,
            per_entrant_result,
            reward_pool: rewards.pool,
            rounds_elapsed: result.rounds,
            duration_seconds: result.duration_seconds,
            completed_at: Utc::now().timestamp(),
            write_back_failed: !write_back_errors.is_empty(),
            write_back_errors,
        }
    }

    /// Persists one entrant's wear and reward. Returns the failures.
    fn write_back(&self, entrant: EntrantId, deltas: &[DurabilityChange], reward: &Reward) -> Vec<String> {
        let mut errors = Vec::new();
        for change in deltas.iter().filter(|c| c.changed()) {
            if let Err(e) = self
                .collaborator
                .persist_durability_update(entrant, change.item_id, change.after)
            {
                errors.push(e.to_string());
            }
        }
        if !reward.is_empty() {
            debug!(%entrant, currency = reward.currency, items = reward.items.len(), "Granting reward");
            if let Err(e) = self.collaborator.persist_reward_grant(
                entrant,
                reward.currency,
                reward.experience,
                &reward.items,
            ) {
                errors.push(e.to_string());
            }
        }
        errors
    }
}

/// Structural checks on a request, in order: empty roster, party size,
/// mode consistency, duplicates, snapshot sanity, level requirement.
pub fn validate_request(req: &GateRequest, config: &EngineConfig) -> std::result::Result<(), ValidationError> {
    let count = req.entrants.len();
    if count == 0 {
        return Err(ValidationError::NoEntrants);
    }
    if count > config.max_party_size {
        return Err(ValidationError::PartyTooLarge {
            count,
            max: config.max_party_size,
        });
    }
    let consistent = if req.party_mode { count >= 2 } else { count == 1 };
    if !consistent {
        return Err(ValidationError::PartySizeMismatch {
            party_mode: req.party_mode,
            count,
        });
    }

    let mut seen = HashSet::with_capacity(count);
    for entrant in &req.entrants {
        if !seen.insert(entrant.id) {
            return Err(ValidationError::DuplicateEntrant(entrant.id));
        }
    }

    for entrant in &req.entrants {
        if let Some(reason) = entrant.snapshot_problem() {
            return Err(ValidationError::InvalidSnapshot {
                entrant: entrant.id,
                reason,
            });
        }
    }

    let required = req.grade.config().min_level();
    if let Some(low) = req.entrants.iter().find(|e| e.level < required) {
        return Err(ValidationError::LevelTooLow {
            entrant: low.id,
            level: low.level,
            required,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::Attributes;
    use crate::character::job::JobClass;
    use crate::combat::element::Element;
    use crate::combat::session::SessionState;
    use crate::combat::types::{AbortReason, Outcome};
    use crate::gate::collaborator::InMemoryLedger;
    use crate::gate::grade::GateGrade;
    use crate::gate::types::Entrant;
    use crate::items::types::EquipmentSlot;

    fn orchestrator() -> (Arc<InMemoryLedger>, GateOrchestrator) {
        let ledger = Arc::new(InMemoryLedger::new());
        let orch = GateOrchestrator::new(ledger.clone());
        (ledger, orch)
    }

    fn hunter(level: u32) -> Entrant {
        Entrant::new("Hunter", level, JobClass::Fighter, Attributes::uniform(40))
    }

    #[test]
    fn test_validation_order() {
        let config = EngineConfig::default();

        let empty = GateRequest::party(GateGrade::E, vec![]);
        assert_eq!(validate_request(&empty, &config), Err(ValidationError::NoEntrants));

        let crowd = GateRequest::party(GateGrade::E, (0..11).map(|_| hunter(5)).collect());
        assert_eq!(
            validate_request(&crowd, &config),
            Err(ValidationError::PartyTooLarge { count: 11, max: 10 })
        );

        let mut solo_pair = GateRequest::party(GateGrade::E, vec![hunter(5), hunter(5)]);
        solo_pair.party_mode = false;
        assert_eq!(
            validate_request(&solo_pair, &config),
            Err(ValidationError::PartySizeMismatch {
                party_mode: false,
                count: 2
            })
        );

        let lone_party = GateRequest::party(GateGrade::E, vec![hunter(5)]);
        assert!(matches!(
            validate_request(&lone_party, &config),
            Err(ValidationError::PartySizeMismatch { party_mode: true, .. })
        ));

        let twin = hunter(5);
        let dupes = GateRequest::party(GateGrade::E, vec![twin.clone(), twin.clone()]);
        assert_eq!(
            validate_request(&dupes, &config),
            Err(ValidationError::DuplicateEntrant(twin.id))
        );

        let novice = hunter(3);
        let too_low = GateRequest::solo(GateGrade::C, novice.clone());
        assert_eq!(
            validate_request(&too_low, &config),
            Err(ValidationError::LevelTooLow {
                entrant: novice.id,
                level: 3,
                required: 20
            })
        );
    }

    #[test]
    fn test_rejected_request_registers_nothing() {
        let (_, orch) = orchestrator();
        let result = orch.open_session(GateRequest::party(GateGrade::E, vec![]));
        assert!(matches!(result, Err(GateError::Validation(ValidationError::NoEntrants))));
        assert!(orch.active_sessions().is_empty());
    }

    #[test]
    fn test_starvation() {
        let (_, orch) = orchestrator();
        let mut fallen = hunter(5);
        fallen.health = 0.0;
        let result = orch.open_session(GateRequest::solo(GateGrade::E, fallen));
        assert!(matches!(result, Err(GateError::Starvation)));
        assert!(orch.active_sessions().is_empty());
    }

    #[test]
    fn test_broken_equipment_rejected() {
        let (ledger, orch) = orchestrator();
        let entrant = hunter(5);
        let sword = EquippedItem::new(EquipmentSlot::Weapon, 10.0).with_durability(0.0);
        let sword_id = sword.id;
        ledger.equip(entrant.id, sword);

        let result = orch.open_session(GateRequest::solo(GateGrade::E, entrant.clone()));
        match result {
            Err(GateError::Validation(ValidationError::BrokenEquipment { entrant: e, item })) => {
                assert_eq!(e, entrant.id);
                assert_eq!(item, sword_id);
            }
            other => panic!("expected broken equipment, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_item_durability_rejected() {
        for durability in [150.0, f64::NAN] {
            let (ledger, orch) = orchestrator();
            let entrant = hunter(5);
            let mut helm = EquippedItem::new(EquipmentSlot::Helmet, 3.0);
            helm.durability = durability;
            ledger.equip(entrant.id, helm);

            let result = orch.open_session(GateRequest::solo(GateGrade::E, entrant.clone()));
            match result {
                Err(GateError::Validation(ValidationError::InvalidSnapshot { entrant: e, reason })) => {
                    assert_eq!(e, entrant.id);
                    assert!(reason.contains("durability"), "{reason}");
                }
                other => panic!("durability {durability}: expected invalid snapshot, got {other:?}"),
            }
            assert!(orch.active_sessions().is_empty());
        }
    }

    #[test]
    fn test_collaborator_read_failure_surfaces() {
        let (ledger, orch) = orchestrator();
        ledger.set_fail_reads(true);
        let result = orch.open_session(GateRequest::solo(GateGrade::E, hunter(5)));
        assert!(matches!(result, Err(GateError::Collaborator(_))));
    }

    #[test]
    fn test_open_then_abort_then_run() {
        let (ledger, orch) = orchestrator();
        let entrant = hunter(5);
        ledger.equip(entrant.id, EquippedItem::new(EquipmentSlot::Armor, 5.0));

        let id = orch
            .open_session(GateRequest::solo(GateGrade::E, entrant.clone()).with_seed(1))
            .unwrap();
        assert_eq!(orch.active_sessions(), vec![id]);
        assert!(orch.abort(id));

        let outcome = orch.run_session(id).unwrap();
        assert_eq!(outcome.outcome, Outcome::Aborted);
        assert_eq!(outcome.abort_reason, Some(AbortReason::External));
        assert_eq!(outcome.rounds_elapsed, 0);
        assert_eq!(outcome.total_currency(), 0);
        assert!(orch.active_sessions().is_empty());
        assert_eq!(ledger.account(entrant.id).currency, 0);

        assert!(!orch.abort(id));
        assert!(matches!(orch.run_session(id), Err(GateError::SessionNotFound(_))));
    }

    #[test]
    fn test_abort_mid_session_wears_equipment_and_pays_nothing() {
        let ledger = Arc::new(InMemoryLedger::new());
        let config = EngineConfig {
            status_procs_enabled: false,
            ..EngineConfig::default()
        };
        let orch = GateOrchestrator::with_config(config, ledger.clone()).unwrap();
        // Too weak to kill a B-grade monster in three rounds, too tough to fall
        let tank = Entrant::new("Tank", 35, JobClass::Fighter, Attributes::uniform(0)).with_health(1e9);
        ledger.equip(tank.id, EquippedItem::new(EquipmentSlot::Armor, 5.0));

        let id = orch
            .open_session(GateRequest::solo(GateGrade::B, tank.clone()).with_seed(17))
            .unwrap();
        {
            let mut registry = orch.registry();
            let pending = registry.get_mut(&id).and_then(|h| h.pending.as_mut()).unwrap();
            for _ in 0..3 {
                assert_eq!(pending.session.step().unwrap(), SessionState::Active);
            }
        }
        assert!(orch.abort(id));

        let outcome = orch.run_session(id).unwrap();

        assert_eq!(outcome.outcome, Outcome::Aborted);
        assert_eq!(outcome.abort_reason, Some(AbortReason::External));
        assert_eq!(outcome.rounds_elapsed, 3);
        assert!(outcome.reward_pool.is_none());

        let mine = outcome.result_for(tank.id).unwrap();
        assert!(mine.damage_taken > 0.0);
        assert!(mine.reward.is_empty());
        let delta = &mine.equipment_durability_delta[0];
        assert!(delta.after < delta.before, "{delta:?}");
        assert_eq!(ledger.equipment(tank.id)[0].durability, delta.after);
        assert_eq!(ledger.account(tank.id).currency, 0);
        assert_eq!(ledger.account(tank.id).experience, 0);
    }

    #[test]
    fn test_behavior_profile_raises_gate_difficulty() {
        let (_, orch) = orchestrator();
        let roster = |entrant: Entrant| {
            let id = orch
                .open_session(GateRequest::solo(GateGrade::B, entrant).with_seed(31))
                .unwrap();
            let registry = orch.registry();
            let monsters = registry[&id].pending.as_ref().unwrap().session.battle().monsters.clone();
            monsters
        };

        let plain = roster(hunter(40));
        let daring = roster(
            hunter(40).with_behavior(BehaviorProfile::new(0.9, 0.0, 0.0).with_risk_tolerance(0.8)),
        );

        assert_eq!(plain.len(), daring.len());
        for (p, d) in plain.iter().zip(&daring) {
            assert_eq!(p.monster_type, d.monster_type);
            assert!((d.max_health - p.max_health * 1.3).abs() < 1e-6);
            assert!((d.power - p.power * 1.3).abs() < 1e-6);
        }
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let entrant = hunter(8);
        let run = || {
            let (_, orch) = orchestrator();
            orch.resolve_gate_instance(
                GateRequest::solo(GateGrade::E, entrant.clone())
                    .with_seed(99)
                    .with_element(Element::Fire),
            )
            .unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.rounds_elapsed, b.rounds_elapsed);
        assert_eq!(a.per_entrant_result, b.per_entrant_result);
    }

    #[test]
    fn test_win_grants_and_wears_equipment() {
        let (ledger, orch) = orchestrator();
        let entrant = Entrant::new("Strong", 10, JobClass::ShadowMonarch, Attributes::uniform(200));
        ledger.equip(entrant.id, EquippedItem::new(EquipmentSlot::Weapon, 50.0));

        let outcome = orch
            .resolve_gate_instance(GateRequest::solo(GateGrade::E, entrant.clone()).with_seed(5))
            .unwrap();

        assert_eq!(outcome.outcome, Outcome::Win);
        assert!(!outcome.write_back_failed);
        let mine = outcome.result_for(entrant.id).unwrap();
        assert!(mine.survived);
        assert!(mine.reward.currency >= 20, "solo bonus doubles at least the grade minimum");
        let pool = outcome.reward_pool.as_ref().unwrap();
        assert_eq!(mine.reward.currency, pool.currency * 2);
        assert_eq!(mine.reward.items.len(), pool.drops.len());

        let account = ledger.account(entrant.id);
        assert_eq!(account.currency, mine.reward.currency);
        assert_eq!(account.experience, mine.reward.experience);

        let stored = &ledger.equipment(entrant.id)[0];
        assert_eq!(stored.durability, mine.equipment_durability_delta[0].after);
        assert!(stored.durability < 100.0);
    }

    #[test]
    fn test_write_back_failure_keeps_result() {
        let (ledger, orch) = orchestrator();
        let entrant = Entrant::new("Strong", 10, JobClass::ShadowMonarch, Attributes::uniform(200));
        ledger.equip(entrant.id, EquippedItem::new(EquipmentSlot::Weapon, 50.0));
        ledger.set_fail_writes(true);

        let outcome = orch
            .resolve_gate_instance(GateRequest::solo(GateGrade::E, entrant.clone()).with_seed(5))
            .unwrap();

        assert_eq!(outcome.outcome, Outcome::Win);
        assert!(outcome.write_back_failed);
        assert!(!outcome.write_back_errors.is_empty());
        assert!(outcome.per_entrant_result[0].reward.currency > 0);
        assert_eq!(ledger.account(entrant.id).currency, 0);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let ledger = Arc::new(InMemoryLedger::new());
        let config = EngineConfig {
            round_cap: 0,
            ..EngineConfig::default()
        };
        assert!(GateOrchestrator::with_config(config, ledger).is_err());
    }
}
