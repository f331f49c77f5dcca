//! Gatehunt - Gate Combat & Loot Resolution Library
//!
//! Resolves a timed dungeon gate for one hunter or a party: monster
//! generation, round-based combat with elements and status effects,
//! equipment wear, and loot distribution. Persistence lives behind the
//! `GateCollaborator` trait.

// Allow dead code in library - some helpers are only used by the binary and tests
#![allow(dead_code)]

pub mod character;
pub mod combat;
pub mod core;
pub mod gate;
pub mod items;
pub mod rewards;
pub mod simulator;

pub use crate::combat::types::{AbortReason, Outcome, PartyMode};
pub use crate::core::config::EngineConfig;
pub use crate::core::error::{GateError, Result};
pub use crate::gate::collaborator::{GateCollaborator, InMemoryLedger};
pub use crate::gate::grade::GateGrade;
pub use crate::gate::orchestrator::GateOrchestrator;
pub use crate::gate::types::{Entrant, EntrantResult, GateOutcome, GateRequest};
