//! Time source for session event timestamps.

use chrono::{DateTime, Utc};

/// Supplies timestamps to the state machine so transitions stay deterministic
/// under test.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used by the terminal front end.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
