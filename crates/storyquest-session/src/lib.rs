//! Storyquest — Session context.
//!
//! Responsible for the session inputs, chapter progress and history, the
//! game state machine that sequences a five-chapter playthrough, and the
//! async controller that reconciles chapter responses with session state.

pub mod application;
pub mod domain;
