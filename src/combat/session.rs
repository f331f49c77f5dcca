//! Combat Session state machine.
//!
//! Initializing -> Active -> Resolved(Win | Loss | Aborted). The terminal state
//! never changes once reached.

use super::logic::{play_round, RoundOutcome};
use super::types::{
    AbortReason, Battle, CombatResult, CombatantSummary, MonsterType, Outcome, RoundLog,
};
use crate::core::config::EngineConfig;
use crate::core::error::{GateError, SessionInvariantError};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Initializing,
    Active,
    Resolved(Outcome),
}

pub struct CombatSession {
    state: SessionState,
    battle: Battle,
    config: EngineConfig,
    rng: ChaCha8Rng,
    history: Vec<RoundLog>,
    abort_reason: Option<AbortReason>,
    defeated_monsters: Vec<MonsterType>,
}

impl CombatSession {
    pub fn new(battle: Battle, config: EngineConfig, rng: ChaCha8Rng) -> Self {
        Self {
            state: SessionState::Initializing,
            battle,
            config,
            rng,
            history: Vec::new(),
            abort_reason: None,
            defeated_monsters: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn history(&self) -> &[RoundLog] {
        &self.history
    }

    /// The session's random stream, shared with reward rolls after resolution.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, SessionState::Resolved(_))
    }

    /// Moves the session to Active. Rejects a roster with nobody standing.
    pub fn start(&mut self) -> Result<(), GateError> {
        if self.state != SessionState::Initializing {
            return Ok(());
        }
        if self.battle.players.is_empty() || self.battle.players_defeated() {
            return Err(GateError::Starvation);
        }
        self.state = SessionState::Active;
        info!(
            players = self.battle.players.len(),
            monsters = self.battle.monsters.len(),
            solo = self.battle.mode.is_solo(),
            "Combat session started"
        );
        Ok(())
    }

    /// Plays one round.
    ///
    /// A broken invariant after the round resolves the session as `Aborted`
    /// rather than returning an error; errors only signal a call in the
    /// wrong state.
    pub fn step(&mut self) -> Result<SessionState, SessionInvariantError> {
        match self.state {
            SessionState::Initializing => return Err(SessionInvariantError::NotStarted),
            SessionState::Resolved(_) => return Err(SessionInvariantError::AlreadyResolved),
            SessionState::Active => {}
        }

        let RoundOutcome { next, log } = play_round(&self.battle, &self.config, &mut self.rng);
        self.defeated_monsters.extend(log.monsters_slain.iter().copied());
        self.battle = next;
        self.history.push(log);

        if let Err(violation) = check_invariants(&self.battle, self.config.round_cap) {
            error!(round = self.battle.round, %violation, "Session invariant violated");
            self.resolve(Outcome::Aborted, Some(AbortReason::InvariantViolation));
        } else if let Some(outcome) = self.terminal_outcome() {
            self.resolve(outcome, None);
        }

        Ok(self.state)
    }

    /// Aborts an unresolved session. Returns false if it was already resolved.
    pub fn abort(&mut self, reason: AbortReason) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.resolve(Outcome::Aborted, Some(reason));
        true
    }

    /// Drives the session to a terminal state, polling `abort` between rounds.
    pub fn run_to_completion(&mut self, abort: &AtomicBool) -> CombatResult {
        let outcome = loop {
            if let SessionState::Resolved(outcome) = self.state {
                break outcome;
            }
            if abort.load(Ordering::SeqCst) {
                self.abort(AbortReason::External);
                continue;
            }
            if let Err(violation) = self.step() {
                error!(%violation, "Session could not advance");
                self.resolve(Outcome::Aborted, Some(AbortReason::InvariantViolation));
            }
        };
        self.summarize(outcome)
    }

    /// The result record, once resolved.
    pub fn result(&self) -> Option<CombatResult> {
        match self.state {
            SessionState::Resolved(outcome) => Some(self.summarize(outcome)),
            _ => None,
        }
    }

    fn terminal_outcome(&self) -> Option<Outcome> {
        if self.battle.players_defeated() {
            Some(Outcome::Loss)
        } else if self.battle.monsters_defeated() {
            Some(Outcome::Win)
        } else if self.battle.round >= self.config.round_cap {
            Some(Outcome::Loss)
        } else {
            None
        }
    }

    fn resolve(&mut self, outcome: Outcome, reason: Option<AbortReason>) {
        self.state = SessionState::Resolved(outcome);
        self.abort_reason = reason;
        info!(
            ?outcome,
            ?reason,
            rounds = self.battle.round,
            "Combat session resolved"
        );
    }

    fn summarize(&self, outcome: Outcome) -> CombatResult {
        let combatants = self
            .battle
            .players
            .iter()
            .map(|p| CombatantSummary {
                entrant_id: p.entrant_id,
                survived: !p.is_down(),
                damage_taken: p.damage_taken,
                mana_used: p.mana_used,
                luck: p.luck,
            })
            .collect();

        CombatResult {
            outcome,
            abort_reason: self.abort_reason,
            combatants,
            defeated_monsters: self.defeated_monsters.clone(),
            rounds: self.battle.round,
            duration_seconds: self.battle.round as f64 * self.config.seconds_per_round,
        }
    }
}

/// Checks the state a round left behind.
pub fn check_invariants(battle: &Battle, round_cap: u32) -> Result<(), SessionInvariantError> {
    if battle.round > round_cap {
        return Err(SessionInvariantError::RoundCapExceeded {
            round: battle.round,
            cap: round_cap,
        });
    }

    for p in &battle.players {
        if !in_range(p.health, p.max_health) {
            return Err(SessionInvariantError::InvalidHealth {
                combatant: p.name.clone(),
                health: p.health,
                max: p.max_health,
            });
        }
        if !in_range(p.mana, p.max_mana) {
            return Err(SessionInvariantError::InvalidMana {
                combatant: p.name.clone(),
                mana: p.mana,
                max: p.max_mana,
            });
        }
    }

    for m in &battle.monsters {
        if !in_range(m.health, m.max_health) {
            return Err(SessionInvariantError::InvalidHealth {
                combatant: m.name.clone(),
                health: m.health,
                max: m.max_health,
            });
        }
    }

    Ok(())
}

fn in_range(value: f64, max: f64) -> bool {
    value.is_finite() && value >= 0.0 && value <= max
}
