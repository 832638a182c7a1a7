//! User intents addressed to the game state machine.

use uuid::Uuid;

/// Implemented by every user intent the state machine accepts.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name of the intent, used as a tracing field.
    fn command_type(&self) -> &'static str;

    /// Correlation ID carried into the events and requests the command causes.
    fn correlation_id(&self) -> Uuid;
}
