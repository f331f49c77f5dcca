//! Reward resolution: party scaling, behaviour bonuses, and share distribution.

#![allow(unused_imports)]

pub mod behavior;
pub mod calculator;
pub mod party;

pub use behavior::*;
pub use calculator::*;
pub use party::*;
