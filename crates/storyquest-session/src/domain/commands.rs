//! Commands for the Session context.

use storyquest_core::command::Command;
use uuid::Uuid;

/// Command to start a session from the given inputs.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Study material.
    pub content: String,
    /// Player interests.
    pub interests: String,
}

impl Command for StartSession {
    fn command_type(&self) -> &'static str {
        "session.start"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to pick one of the choices offered by the displayed chapter.
#[derive(Debug, Clone)]
pub struct ChooseChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Identifier of the chosen option.
    pub choice_id: String,
}

impl Command for ChooseChoice {
    fn command_type(&self) -> &'static str {
        "session.choose"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to discard the current session.
#[derive(Debug, Clone)]
pub struct NewSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for NewSession {
    fn command_type(&self) -> &'static str {
        "session.new"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
