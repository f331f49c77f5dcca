//! Equipment records, durability wear, and loot tables.

#![allow(unused_imports)]

pub mod drops;
pub mod durability;
pub mod types;

pub use drops::*;
pub use durability::*;
pub use types::*;
