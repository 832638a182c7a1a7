//! The game state machine.
//!
//! `Idle --start--> Active(1) --choose--> Active(n + 1) ... --choose--> Completed`,
//! and `newSession` returns to `Idle` from anywhere. Transitions are pure:
//! a transition that needs a chapter returns a [`ChapterTicket`] describing
//! the request, and the caller reports the outcome back through
//! [`StorySession::complete`]. Tickets are bound to a session generation so
//! a response that outlives a reset is discarded.

use serde::Serialize;
use storyquest_core::clock::Clock;
use storyquest_core::error::QuestError;
use storyquest_core::event::EventMetadata;
use storyquest_narrative::domain::chapter::{Chapter, ChoiceRecord};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::commands::{ChooseChoice, NewSession, StartSession};
use super::context::SessionContext;
use super::events::{
    ChapterLoaded, ChoiceRecorded, ChoiceRolledBack, RequestFailed, SessionCompleted,
    SessionEvent, SessionEventKind, SessionReset, SessionStarted,
};
use super::progress::{HistoryEntry, SESSION_LENGTH, SessionProgress};

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// No session inputs captured.
    Idle,
    /// Playing (or requesting) the given chapter, 1 through 5.
    Active {
        /// The current chapter.
        chapter: u32,
    },
    /// All chapters played.
    Completed,
}

impl GamePhase {
    /// Lowercase name used in messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active { .. } => "active",
            Self::Completed => "completed",
        }
    }
}

/// The chapter request a transition asks the caller to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterRequest {
    /// Request the opening chapter.
    Start {
        /// Study material.
        content: String,
        /// Player interests.
        interests: String,
    },
    /// Request a follow-up chapter.
    Continue {
        /// Study material.
        content: String,
        /// Player interests.
        interests: String,
        /// The chapter being requested.
        chapter_number: u32,
        /// The choice that led here.
        choice: ChoiceRecord,
    },
}

impl ChapterRequest {
    /// The chapter this request asks for.
    #[must_use]
    pub fn chapter_number(&self) -> u32 {
        match self {
            Self::Start { .. } => 1,
            Self::Continue { chapter_number, .. } => *chapter_number,
        }
    }
}

/// An in-flight chapter request, bound to the session generation it was
/// issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterTicket {
    /// Session generation at issue time.
    pub generation: u64,
    /// Correlation ID of the command that issued the ticket.
    pub correlation_id: Uuid,
    /// What to request.
    pub request: ChapterRequest,
}

/// A chapter ready for the presentation sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterView {
    /// The normalized chapter.
    pub chapter: Chapter,
    /// `chapter_number / 5`, capped at 1.0.
    pub progress: f64,
}

impl ChapterView {
    /// Wraps a chapter with its progress fraction.
    #[must_use]
    pub fn new(chapter: Chapter) -> Self {
        let progress = (f64::from(chapter.chapter_number) / f64::from(SESSION_LENGTH)).min(1.0);
        Self { chapter, progress }
    }
}

/// End-of-session summary handed to the presentation sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Number of chapters played.
    pub chapters_completed: u32,
    /// Interests the session was themed around.
    pub interests: String,
}

/// Result of a choice.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceStep {
    /// The next chapter must be requested.
    Request(ChapterTicket),
    /// The session is over; nothing is requested.
    Completed(SessionSummary),
}

/// Result of a user action once any request it needed has finished.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A new chapter is displayed.
    Chapter(ChapterView),
    /// The session ended.
    Completed(SessionSummary),
    /// The response belonged to a discarded session and was ignored.
    Discarded,
}

/// Session state owned by the state machine.
#[derive(Debug, Default)]
pub struct StorySession {
    generation: u64,
    context: Option<SessionContext>,
    progress: SessionProgress,
    completed: bool,
    chapter: Option<Chapter>,
    pending: Option<ChapterTicket>,
    last_sequence: u64,
    uncommitted_events: Vec<SessionEvent>,
}

impl StorySession {
    /// Creates an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        match (&self.context, self.completed) {
            (None, _) => GamePhase::Idle,
            (Some(_), true) => GamePhase::Completed,
            (Some(_), false) => GamePhase::Active {
                chapter: self.progress.current_chapter(),
            },
        }
    }

    /// Generation token; bumped by every reset.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Session inputs, once started.
    #[must_use]
    pub fn context(&self) -> Option<&SessionContext> {
        self.context.as_ref()
    }

    /// Chapter counter and history.
    #[must_use]
    pub fn progress(&self) -> &SessionProgress {
        &self.progress
    }

    /// The chapter currently displayed, if any.
    #[must_use]
    pub fn chapter(&self) -> Option<&Chapter> {
        self.chapter.as_ref()
    }

    /// The request in flight, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&ChapterTicket> {
        self.pending.as_ref()
    }

    /// Returns `true` while a chapter request is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Start is accepted when idle, or when the opening chapter has not
    /// arrived yet (a retry after a failed start).
    #[must_use]
    pub fn accepts_start(&self) -> bool {
        !self.is_busy()
            && match self.phase() {
                GamePhase::Idle => true,
                GamePhase::Active { chapter } => chapter == 1 && self.chapter.is_none(),
                GamePhase::Completed => false,
            }
    }

    /// Summary of a completed session.
    #[must_use]
    pub fn summary(&self) -> Option<SessionSummary> {
        if !self.completed {
            return None;
        }
        self.context.as_ref().map(|context| SessionSummary {
            chapters_completed: self.progress.chapters_completed(),
            interests: context.interests().to_owned(),
        })
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[SessionEvent] {
        &self.uncommitted_events
    }

    /// Removes and returns the recorded events.
    pub fn take_uncommitted_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    /// `Idle --start--> Active(1)`: captures the inputs, clears the history
    /// and issues the opening chapter request.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::RequestInFlight` while a request is pending,
    /// `QuestError::InvalidTransition` once the session is under way, and
    /// `QuestError::Validation` if an input is blank. None of these change
    /// any state.
    pub fn begin_start(
        &mut self,
        command: &StartSession,
        clock: &dyn Clock,
    ) -> Result<ChapterTicket, QuestError> {
        if self.is_busy() {
            return Err(QuestError::RequestInFlight);
        }
        if !self.accepts_start() {
            return Err(self.invalid("start"));
        }
        let context = SessionContext::new(&command.content, &command.interests)?;

        let request = ChapterRequest::Start {
            content: context.content().to_owned(),
            interests: context.interests().to_owned(),
        };
        let started = SessionStarted {
            interests: context.interests().to_owned(),
            content_len: context.content().len(),
        };
        self.context = Some(context);
        self.progress = SessionProgress::new();
        self.chapter = None;
        self.completed = false;
        self.record(
            command.correlation_id,
            SessionEventKind::SessionStarted(started),
            clock,
        );

        info!(generation = self.generation, "session started");
        Ok(self.issue(command.correlation_id, request))
    }

    /// `Active(n) --choose--> Active(n + 1) | Completed`: records the choice
    /// and either issues the next chapter request or, past the last chapter,
    /// completes the session without any request.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::RequestInFlight` while a request is pending,
    /// `QuestError::InvalidTransition` when no chapter is displayed, and
    /// `QuestError::Validation` if the displayed chapter does not offer the
    /// choice. None of these change any state.
    pub fn choose(
        &mut self,
        command: &ChooseChoice,
        clock: &dyn Clock,
    ) -> Result<ChoiceStep, QuestError> {
        if self.is_busy() {
            return Err(QuestError::RequestInFlight);
        }
        if self.completed {
            return Err(self.invalid("choose"));
        }
        let (Some(context), Some(chapter)) = (&self.context, &self.chapter) else {
            return Err(self.invalid("choose"));
        };
        let Some(choice) = chapter.choice(&command.choice_id).cloned() else {
            return Err(QuestError::Validation(format!(
                "choice {:?} is not offered by chapter {}",
                command.choice_id, chapter.chapter_number
            )));
        };
        let content = context.content().to_owned();
        let interests = context.interests().to_owned();

        let chosen_in = self.progress.current_chapter();
        let next_chapter = self.progress.record_choice(choice.clone());
        self.record(
            command.correlation_id,
            SessionEventKind::ChoiceRecorded(ChoiceRecorded {
                chapter_number: chosen_in,
                choice_id: choice.id.clone(),
            }),
            clock,
        );

        if self.progress.is_past_final_chapter() {
            self.completed = true;
            self.chapter = None;
            let chapters_completed = self.progress.chapters_completed();
            self.record(
                command.correlation_id,
                SessionEventKind::SessionCompleted(SessionCompleted { chapters_completed }),
                clock,
            );
            info!(chapters_completed, "session completed");
            return Ok(ChoiceStep::Completed(SessionSummary {
                chapters_completed,
                interests,
            }));
        }

        let request = ChapterRequest::Continue {
            content,
            interests,
            chapter_number: next_chapter,
            choice,
        };
        Ok(ChoiceStep::Request(
            self.issue(command.correlation_id, request),
        ))
    }

    /// Applies the outcome of a ticket's request.
    ///
    /// A ticket from an earlier generation, or one that is no longer pending,
    /// is discarded without touching any state. A failed continuation rolls
    /// its choice back so the previous chapter can be chosen from again.
    ///
    /// # Errors
    ///
    /// Returns the request's error, after the state has been made retryable.
    pub fn complete(
        &mut self,
        ticket: &ChapterTicket,
        result: Result<Chapter, QuestError>,
        clock: &dyn Clock,
    ) -> Result<StepOutcome, QuestError> {
        if !self.is_pending(ticket) {
            debug!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding stale chapter response"
            );
            return Ok(StepOutcome::Discarded);
        }
        self.pending = None;

        match result {
            Ok(chapter) => {
                self.record(
                    ticket.correlation_id,
                    SessionEventKind::ChapterLoaded(ChapterLoaded {
                        chapter_number: chapter.chapter_number,
                        title: chapter.title.clone(),
                        choice_count: chapter.choices.len(),
                    }),
                    clock,
                );
                let view = ChapterView::new(chapter.clone());
                self.chapter = Some(chapter);
                Ok(StepOutcome::Chapter(view))
            }
            Err(error) => {
                warn!(code = error.code(), %error, "chapter request failed");
                self.record(
                    ticket.correlation_id,
                    SessionEventKind::RequestFailed(RequestFailed {
                        chapter_number: ticket.request.chapter_number(),
                        error_code: error.code().to_owned(),
                        message: error.to_string(),
                    }),
                    clock,
                );
                self.rollback(ticket, clock);
                Err(error)
            }
        }
    }

    /// Releases a ticket whose request was dropped before finishing.
    pub fn abandon(&mut self, ticket: &ChapterTicket, clock: &dyn Clock) {
        if !self.is_pending(ticket) {
            return;
        }
        warn!(
            chapter_number = ticket.request.chapter_number(),
            "chapter request abandoned before completion"
        );
        self.pending = None;
        self.rollback(ticket, clock);
    }

    /// `* --newSession--> Idle`: discards everything and invalidates all
    /// outstanding tickets.
    pub fn reset(&mut self, command: &NewSession, clock: &dyn Clock) {
        let previous_generation = self.generation;
        self.generation += 1;
        self.context = None;
        self.progress = SessionProgress::new();
        self.completed = false;
        self.chapter = None;
        self.pending = None;
        self.record(
            command.correlation_id,
            SessionEventKind::SessionReset(SessionReset {
                previous_generation,
            }),
            clock,
        );
        info!(generation = self.generation, "session reset");
    }

    fn is_pending(&self, ticket: &ChapterTicket) -> bool {
        ticket.generation == self.generation
            && self
                .pending
                .as_ref()
                .is_some_and(|pending| pending.correlation_id == ticket.correlation_id)
    }

    fn issue(&mut self, correlation_id: Uuid, request: ChapterRequest) -> ChapterTicket {
        let ticket = ChapterTicket {
            generation: self.generation,
            correlation_id,
            request,
        };
        self.pending = Some(ticket.clone());
        ticket
    }

    fn rollback(&mut self, ticket: &ChapterTicket, clock: &dyn Clock) {
        if !matches!(ticket.request, ChapterRequest::Continue { .. }) {
            return;
        }
        if let Some(HistoryEntry {
            chapter_number,
            choice,
        }) = self.progress.rollback_last()
        {
            self.record(
                ticket.correlation_id,
                SessionEventKind::ChoiceRolledBack(ChoiceRolledBack {
                    chapter_number,
                    choice_id: choice.id,
                }),
                clock,
            );
        }
    }

    fn invalid(&self, action: &'static str) -> QuestError {
        QuestError::InvalidTransition {
            action,
            phase: self.phase().name(),
        }
    }

    fn record(&mut self, correlation_id: Uuid, kind: SessionEventKind, clock: &dyn Clock) {
        self.last_sequence += 1;
        self.uncommitted_events.push(SessionEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                generation: self.generation,
                sequence_number: self.last_sequence,
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        });
    }
}
