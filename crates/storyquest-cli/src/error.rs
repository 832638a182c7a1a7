//! Storyquest CLI error types.

use storyquest_client::ConfigError;
use storyquest_core::error::QuestError;
use thiserror::Error;

/// Startup and runtime errors for the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable or flag is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The chapter service client could not be set up.
    #[error("{0}")]
    Quest(#[from] QuestError),
}
