//! Async controller driving the state machine against the chapter service.
//!
//! The session lock is only held while a transition runs, never across a
//! request, so the user can reset a session while a chapter is on its way.
//! Each request is tracked by an [`InFlightGuard`] that releases the
//! pending slot even when the request future is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use storyquest_core::clock::Clock;
use storyquest_core::command::Command;
use storyquest_core::error::QuestError;
use storyquest_core::service::ChapterService;
use storyquest_narrative::application::orchestrator;
use storyquest_narrative::domain::chapter::Chapter;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::commands::{ChooseChoice, NewSession, StartSession};
use crate::domain::events::SessionEvent;
use crate::domain::machine::{
    ChapterRequest, ChapterTicket, ChapterView, ChoiceStep, GamePhase, SessionSummary,
    StepOutcome, StorySession,
};
use crate::domain::progress::HistoryEntry;

/// Read-only copy of the session state for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Current phase.
    pub phase: GamePhase,
    /// Current generation token.
    pub generation: u64,
    /// Whether a chapter request is in flight.
    pub busy: bool,
    /// Whether a start would be accepted.
    pub accepts_start: bool,
    /// The displayed chapter.
    pub chapter: Option<ChapterView>,
    /// Choices made so far.
    pub history: Vec<HistoryEntry>,
    /// Present once the session is completed.
    pub summary: Option<SessionSummary>,
}

/// Owns the session and sequences user actions with chapter requests.
#[derive(Clone)]
pub struct GameController {
    session: Arc<Mutex<StorySession>>,
    service: Arc<dyn ChapterService>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl GameController {
    /// Creates a controller with an idle session.
    #[must_use]
    pub fn new(service: Arc<dyn ChapterService>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session: Arc::new(Mutex::new(StorySession::new())),
            service,
            clock,
        }
    }

    /// Starts a session and loads its opening chapter.
    ///
    /// # Errors
    ///
    /// Returns the validation or transition error that prevented the start,
    /// or the request error. After a request error the start can simply be
    /// repeated.
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn start(&self, content: &str, interests: &str) -> Result<StepOutcome, QuestError> {
        let command = StartSession {
            correlation_id: Uuid::new_v4(),
            content: content.to_owned(),
            interests: interests.to_owned(),
        };
        info!(
            command = command.command_type(),
            correlation_id = %command.correlation_id,
            "handling start command"
        );

        let ticket = self.lock().begin_start(&command, self.clock.as_ref())?;
        self.dispatch(ticket).await
    }

    /// Picks a choice from the displayed chapter and loads the next one, or
    /// completes the session after the last chapter.
    ///
    /// # Errors
    ///
    /// Returns the validation or transition error that rejected the choice,
    /// or the request error. After a request error the choice has been
    /// withdrawn and any choice of the displayed chapter may be picked.
    #[instrument(skip(self))]
    pub async fn choose(&self, choice_id: &str) -> Result<StepOutcome, QuestError> {
        let command = ChooseChoice {
            correlation_id: Uuid::new_v4(),
            choice_id: choice_id.to_owned(),
        };
        info!(
            command = command.command_type(),
            correlation_id = %command.correlation_id,
            "handling choose command"
        );

        let step = self.lock().choose(&command, self.clock.as_ref())?;
        match step {
            ChoiceStep::Completed(summary) => Ok(StepOutcome::Completed(summary)),
            ChoiceStep::Request(ticket) => self.dispatch(ticket).await,
        }
    }

    /// Discards the session. Responses to requests issued before the reset
    /// are ignored when they arrive.
    pub fn new_session(&self) {
        let command = NewSession {
            correlation_id: Uuid::new_v4(),
        };
        info!(
            command = command.command_type(),
            correlation_id = %command.correlation_id,
            "handling new session command"
        );
        self.lock().reset(&command, self.clock.as_ref());
    }

    /// Copies the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.lock();
        SessionSnapshot {
            phase: session.phase(),
            generation: session.generation(),
            busy: session.is_busy(),
            accepts_start: session.accepts_start(),
            chapter: session.chapter().cloned().map(ChapterView::new),
            history: session.progress().history().to_vec(),
            summary: session.summary(),
        }
    }

    /// Drains the events recorded since the last call.
    #[must_use]
    pub fn take_events(&self) -> Vec<SessionEvent> {
        self.lock().take_uncommitted_events()
    }

    async fn dispatch(&self, ticket: ChapterTicket) -> Result<StepOutcome, QuestError> {
        let guard = InFlightGuard {
            session: Arc::clone(&self.session),
            clock: Arc::clone(&self.clock),
            ticket: Some(ticket.clone()),
        };

        let result = match &ticket.request {
            ChapterRequest::Start { content, interests } => {
                orchestrator::start_session(content, interests, self.service.as_ref()).await
            }
            ChapterRequest::Continue {
                content,
                interests,
                chapter_number,
                choice,
            } => {
                orchestrator::continue_session(
                    content,
                    interests,
                    *chapter_number,
                    choice,
                    self.service.as_ref(),
                )
                .await
            }
        };

        guard.complete(result)
    }

    fn lock(&self) -> MutexGuard<'_, StorySession> {
        lock_session(&self.session)
    }
}

fn lock_session(session: &Mutex<StorySession>) -> MutexGuard<'_, StorySession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds a ticket for the lifetime of its request. Completing the guard
/// applies the result; dropping it first abandons the ticket.
struct InFlightGuard {
    session: Arc<Mutex<StorySession>>,
    clock: Arc<dyn Clock>,
    ticket: Option<ChapterTicket>,
}

impl InFlightGuard {
    fn complete(mut self, result: Result<Chapter, QuestError>) -> Result<StepOutcome, QuestError> {
        let Some(ticket) = self.ticket.take() else {
            return Ok(StepOutcome::Discarded);
        };
        lock_session(&self.session).complete(&ticket, result, self.clock.as_ref())
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            lock_session(&self.session).abandon(&ticket, self.clock.as_ref());
        }
    }
}
