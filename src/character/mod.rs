//! Entrant attributes, job classes, and the stat resolver.

#![allow(unused_imports)]

pub mod attributes;
pub mod derived_stats;
pub mod job;

pub use attributes::*;
pub use derived_stats::*;
pub use job::*;
