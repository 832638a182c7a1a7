//! Storyquest Core — shared domain abstractions.
//!
//! This crate defines the error taxonomy, the clock, command and event
//! traits, and the contract of the remote chapter generation service. It
//! contains no transport code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod service;
