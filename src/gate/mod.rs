//! Gate lifecycle: grades, monster generation, the collaborator contract,
//! and the orchestrator that owns live sessions.

#![allow(unused_imports)]

pub mod collaborator;
pub mod generation;
pub mod grade;
pub mod orchestrator;
pub mod types;

pub use collaborator::{GateCollaborator, InMemoryLedger, LedgerAccount};
pub use generation::*;
pub use grade::*;
pub use orchestrator::*;
pub use types::*;
