//! Storyquest — Narrative context.
//!
//! Owns the chapter record, the single place where loosely typed service
//! responses are validated and defaulted, and the orchestrator that turns
//! session inputs into chapter requests.

pub mod application;
pub mod domain;
