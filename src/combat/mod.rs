//! Combat: elements, status effects, round resolution and the session state machine.

#![allow(unused_imports)]

pub mod element;
pub mod logic;
pub mod session;
pub mod status;
pub mod types;

pub use element::*;
pub use logic::*;
pub use session::*;
pub use status::*;
pub use types::*;
