//! Engine-wide constants, configuration, identifiers and errors.

#![allow(unused_imports)]

pub mod combat_math;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;

pub use config::EngineConfig;
pub use constants::*;
pub use error::*;
pub use ids::*;
