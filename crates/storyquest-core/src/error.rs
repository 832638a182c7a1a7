//! Error taxonomy shared by every Storyquest crate.

use thiserror::Error;

/// Errors surfaced to the user by the orchestrator and the state machine.
///
/// Every variant is recoverable: the session is left in a state from which
/// the same action can be attempted again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    /// Required input is missing or a choice is not on offer. Nothing was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// The action is not legal in the current session phase.
    #[error("cannot {action} while the session is {phase}")]
    InvalidTransition {
        /// The rejected action.
        action: &'static str,
        /// Name of the phase the session was in.
        phase: &'static str,
    },

    /// A chapter request is already pending for this session.
    #[error("a chapter request is already in flight")]
    RequestInFlight,

    /// The request never produced a usable response: unreachable host,
    /// timeout, or a non-success HTTP status.
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status, when the server answered at all.
        status: Option<u16>,
        /// Human-readable description, taken from the response body when possible.
        message: String,
    },

    /// The service answered but reported failure, or its envelope was unusable.
    #[error("service error: {0}")]
    Service(String),
}

impl QuestError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::RequestInFlight => "request_in_flight",
            Self::Transport { .. } => "transport_error",
            Self::Service(_) => "service_error",
        }
    }

    /// Returns `true` when re-invoking the same action may succeed without
    /// any change of input.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Service(_))
    }
}
