//! Gate balance simulator for Monte Carlo analysis.
//!
//! Resolves many seeded gates through the same `GateOrchestrator` the
//! application uses and aggregates:
//! - Win rate and gate length per grade
//! - Currency and experience per member
//! - Drops by item grade
//! - Equipment wear

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{build_party, run_simulation};
