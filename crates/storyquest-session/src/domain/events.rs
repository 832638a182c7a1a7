//! Domain events for the Session context.

use serde::{Deserialize, Serialize};
use storyquest_core::event::{DomainEvent, EventMetadata};

/// Emitted when a session is (re)started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStarted {
    /// Player interests.
    pub interests: String,
    /// Length of the study material in bytes.
    pub content_len: usize,
}

/// Emitted when a requested chapter has been stored for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterLoaded {
    /// Number reported for the chapter.
    pub chapter_number: u32,
    /// Chapter title.
    pub title: String,
    /// Number of choices on offer.
    pub choice_count: usize,
}

/// Emitted when a choice is appended to the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRecorded {
    /// The chapter the choice was made in.
    pub chapter_number: u32,
    /// The chosen option.
    pub choice_id: String,
}

/// Emitted when a choice is removed again because its follow-up chapter
/// never arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRolledBack {
    /// The chapter the choice was made in.
    pub chapter_number: u32,
    /// The withdrawn option.
    pub choice_id: String,
}

/// Emitted when a chapter request fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFailed {
    /// The chapter that was requested.
    pub chapter_number: u32,
    /// Machine-readable error code.
    pub error_code: String,
    /// Error description.
    pub message: String,
}

/// Emitted when the final chapter's choice has been made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCompleted {
    /// Number of chapters played.
    pub chapters_completed: u32,
}

/// Emitted when the session is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReset {
    /// Generation of the discarded session.
    pub previous_generation: u64,
}

/// Event payload variants for the Session context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// A session has started.
    SessionStarted(SessionStarted),
    /// A chapter is ready to render.
    ChapterLoaded(ChapterLoaded),
    /// A choice was recorded.
    ChoiceRecorded(ChoiceRecorded),
    /// A choice was withdrawn.
    ChoiceRolledBack(ChoiceRolledBack),
    /// A chapter request failed.
    RequestFailed(RequestFailed),
    /// The session reached its end.
    SessionCompleted(SessionCompleted),
    /// The session was discarded.
    SessionReset(SessionReset),
}

impl SessionEventKind {
    /// The event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted(_) => "session.started",
            Self::ChapterLoaded(_) => "session.chapter_loaded",
            Self::ChoiceRecorded(_) => "session.choice_recorded",
            Self::ChoiceRolledBack(_) => "session.choice_rolled_back",
            Self::RequestFailed(_) => "session.request_failed",
            Self::SessionCompleted(_) => "session.completed",
            Self::SessionReset(_) => "session.reset",
        }
    }
}

/// Domain event envelope for the Session context.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: SessionEventKind,
}

impl DomainEvent for SessionEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
