//! Session model and the pure game state machine.

pub mod commands;
pub mod context;
pub mod events;
pub mod machine;
pub mod progress;
