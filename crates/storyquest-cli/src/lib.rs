//! Storyquest terminal front end.
//!
//! Wires the session controller to the HTTP chapter service and renders the
//! playthrough on a terminal.

pub mod app;
pub mod args;
pub mod error;
pub mod terminal;
