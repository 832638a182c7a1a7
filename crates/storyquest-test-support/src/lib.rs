//! Shared test doubles and fixtures for the Storyquest narrative client.

mod clock;
mod fixtures;
mod ingestion;
mod service;

pub use clock::FixedClock;
pub use fixtures::{chapter_json, failure_envelope, fixed_now, success_envelope};
pub use ingestion::StubIngestion;
pub use service::{FailingChapterService, GatedChapterService, RecordedRequest, ScriptedChapterService};
