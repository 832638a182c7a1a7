//! Contract of the remote chapter generation service.
//!
//! The service is an opaque request/response API. These types mirror its
//! JSON bodies; the traits are the seams the orchestrator and the upload
//! flow depend on, so transports can be swapped in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::QuestError;

/// Body of a `start-game` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartGameRequest {
    /// Study material the story teaches.
    pub content: String,
    /// Player interests the story is themed around.
    pub interests: String,
}

/// Body of a `continue-game` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinueGameRequest {
    /// Study material the story teaches.
    pub content: String,
    /// Player interests the story is themed around.
    pub interests: String,
    /// The chapter being requested.
    pub chapter_num: u32,
    /// The previous choice, formatted as `"<id>: <text>"`.
    pub choice: String,
}

/// Envelope returned by `start-game` and `continue-game`.
///
/// `game` is kept loosely typed: field-level validation belongs to the
/// narrative normalizer, not to envelope decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameEnvelope {
    /// Whether the service considers the call successful.
    #[serde(default)]
    pub success: bool,
    /// The generated chapter, if any.
    #[serde(default)]
    pub game: Option<serde_json::Value>,
    /// Service-supplied failure message.
    #[serde(default)]
    pub error: Option<String>,
}

/// A source document to be turned into study text by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDocument {
    /// File name reported to the service and shown to the user.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Envelope returned by `upload`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEnvelope {
    /// Whether text extraction succeeded.
    #[serde(default)]
    pub success: bool,
    /// Extracted text that becomes the session content.
    #[serde(default)]
    pub preview: Option<String>,
    /// Length of the full extracted text.
    #[serde(default)]
    pub content_length: Option<u64>,
    /// Service-supplied failure message.
    #[serde(default)]
    pub error: Option<String>,
}

/// Chapter generation endpoints.
#[async_trait]
pub trait ChapterService: Send + Sync {
    /// Requests the first chapter of a session.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::Transport` when no usable response was received,
    /// and `QuestError::Service` when the envelope cannot be decoded.
    async fn start_game(&self, request: &StartGameRequest) -> Result<GameEnvelope, QuestError>;

    /// Requests a follow-up chapter.
    ///
    /// # Errors
    ///
    /// Same as [`ChapterService::start_game`].
    async fn continue_game(
        &self,
        request: &ContinueGameRequest,
    ) -> Result<GameEnvelope, QuestError>;
}

/// Source ingestion endpoint (document in, extracted text out).
#[async_trait]
pub trait SourceIngestion: Send + Sync {
    /// Uploads a document for text extraction.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::Transport` when no usable response was received,
    /// and `QuestError::Service` when the envelope cannot be decoded.
    async fn upload(&self, document: &UploadDocument) -> Result<UploadEnvelope, QuestError>;
}
