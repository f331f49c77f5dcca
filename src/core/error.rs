use crate::core::ids::{EntrantId, ItemId, SessionId};
use thiserror::Error;

/// Errors surfaced by the gate entry point.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("No living entrants at session start")]
    Starvation,

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Request rejected before any session state exists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Entrant list is empty")]
    NoEntrants,

    #[error("Party of {count} exceeds the maximum of {max}")]
    PartyTooLarge { count: usize, max: usize },

    #[error("Party mode {party_mode} is inconsistent with {count} entrant(s)")]
    PartySizeMismatch { party_mode: bool, count: usize },

    #[error("Unknown gate grade: {0}")]
    UnknownGrade(String),

    #[error("Duplicate entrant: {0}")]
    DuplicateEntrant(EntrantId),

    #[error("Entrant {entrant} is level {level}, gate requires {required}")]
    LevelTooLow {
        entrant: EntrantId,
        level: u32,
        required: u32,
    },

    #[error("Entrant {entrant} has broken equipment ({item})")]
    BrokenEquipment { entrant: EntrantId, item: ItemId },

    #[error("Entrant {entrant} has an invalid snapshot: {reason}")]
    InvalidSnapshot { entrant: EntrantId, reason: String },
}

/// A broken internal invariant observed while a session was running.
/// Always fatal to the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionInvariantError {
    #[error("Round {round} exceeds the cap of {cap} without a terminal state")]
    RoundCapExceeded { round: u32, cap: u32 },

    #[error("{combatant} has invalid health {health} (max {max})")]
    InvalidHealth {
        combatant: String,
        health: f64,
        max: f64,
    },

    #[error("{combatant} has invalid mana {mana} (max {max})")]
    InvalidMana {
        combatant: String,
        mana: f64,
        max: f64,
    },

    #[error("Session has not been started")]
    NotStarted,

    #[error("Session already resolved")]
    AlreadyResolved,
}

/// Failure of an external read/write contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("Failed to read equipment for {entrant}: {reason}")]
    ReadFailed { entrant: EntrantId, reason: String },

    #[error("Failed to persist durability of {item} for {entrant}: {reason}")]
    DurabilityWriteFailed {
        entrant: EntrantId,
        item: ItemId,
        reason: String,
    },

    #[error("Failed to persist reward grant for {entrant}: {reason}")]
    RewardWriteFailed { entrant: EntrantId, reason: String },
}

/// Rejected equipment operation. The item is left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DurabilityError {
    #[error("Broken equipment must be fully repaired (requested {requested})")]
    PartialRepairOfBroken { requested: f64 },

    #[error("Equipment is already at full durability")]
    NothingToRepair,

    #[error("Invalid repair amount: {0}")]
    InvalidAmount(f64),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts_into_gate_error() {
        let err: GateError = ValidationError::NoEntrants.into();
        assert!(matches!(err, GateError::Validation(ValidationError::NoEntrants)));
        assert_eq!(err.to_string(), "Validation error: Entrant list is empty");
    }

    #[test]
    fn test_collaborator_error_message_names_entrant() {
        let entrant = EntrantId::new();
        let err = CollaboratorError::RewardWriteFailed {
            entrant,
            reason: "ledger offline".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains(&entrant.to_string()));
        assert!(message.contains("ledger offline"));
    }
}
