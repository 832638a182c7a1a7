//! Test clock — deterministic `Clock` implementation for tests.

use chrono::{DateTime, Utc};
use storyquest_core::clock::Clock;

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(crate::fixtures::fixed_now())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
