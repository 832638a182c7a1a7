//! Chapter Request Orchestrator.
//!
//! Translates session inputs into requests against the chapter service and
//! converts envelopes into validated chapters or typed failures. It never
//! touches session state.

use storyquest_core::error::QuestError;
use storyquest_core::service::{
    ChapterService, ContinueGameRequest, GameEnvelope, StartGameRequest,
};
use tracing::{info, instrument};

use crate::domain::chapter::{Chapter, ChoiceRecord};
use crate::domain::normalize::normalize_chapter;

/// Number of the chapter a session opens with.
pub const FIRST_CHAPTER: u32 = 1;

/// Builds the `start-game` body. Identical inputs always give identical bodies.
#[must_use]
pub fn start_request(content: &str, interests: &str) -> StartGameRequest {
    StartGameRequest {
        content: content.to_owned(),
        interests: interests.to_owned(),
    }
}

/// Builds the `continue-game` body for `next_chapter_number`, following `choice`.
#[must_use]
pub fn continue_request(
    content: &str,
    interests: &str,
    next_chapter_number: u32,
    choice: &ChoiceRecord,
) -> ContinueGameRequest {
    ContinueGameRequest {
        content: content.to_owned(),
        interests: interests.to_owned(),
        chapter_num: next_chapter_number,
        choice: choice.request_label(),
    }
}

/// Requests the opening chapter.
///
/// # Errors
///
/// Returns `QuestError::Transport` if the request fails, and
/// `QuestError::Service` if the service reports failure or sends no chapter.
#[instrument(skip(content, service), fields(content_len = content.len()))]
pub async fn start_session(
    content: &str,
    interests: &str,
    service: &dyn ChapterService,
) -> Result<Chapter, QuestError> {
    let request = start_request(content, interests);
    let envelope = service.start_game(&request).await?;
    let chapter = interpret_envelope(envelope, FIRST_CHAPTER)?;

    info!(
        chapter_number = chapter.chapter_number,
        choices = chapter.choices.len(),
        "opening chapter received"
    );
    Ok(chapter)
}

/// Requests chapter `next_chapter_number`, continuing from `choice`.
///
/// # Errors
///
/// Same as [`start_session`].
#[instrument(skip(content, interests, service), fields(choice_id = %choice.id))]
pub async fn continue_session(
    content: &str,
    interests: &str,
    next_chapter_number: u32,
    choice: &ChoiceRecord,
    service: &dyn ChapterService,
) -> Result<Chapter, QuestError> {
    let request = continue_request(content, interests, next_chapter_number, choice);
    let envelope = service.continue_game(&request).await?;
    let chapter = interpret_envelope(envelope, next_chapter_number)?;

    info!(
        chapter_number = chapter.chapter_number,
        choices = chapter.choices.len(),
        "follow-up chapter received"
    );
    Ok(chapter)
}

/// Checks the envelope and normalizes its chapter.
///
/// # Errors
///
/// Returns `QuestError::Service` carrying the service message when `success`
/// is false, or when a successful envelope has no usable chapter.
pub fn interpret_envelope(
    envelope: GameEnvelope,
    fallback_number: u32,
) -> Result<Chapter, QuestError> {
    if !envelope.success {
        return Err(QuestError::Service(
            envelope.error.unwrap_or_else(|| "Unknown error".to_owned()),
        ));
    }

    let Some(game) = envelope.game else {
        return Err(QuestError::Service(
            envelope
                .error
                .unwrap_or_else(|| "response contained no chapter".to_owned()),
        ));
    };

    normalize_chapter(&game, fallback_number)
}
