//! Presentation sink contract and the affordance adapter.
//!
//! The state machine knows nothing about controls. This module maps session
//! state onto which controls a front end should enable, and controller
//! results onto sink calls.

use storyquest_core::error::QuestError;
use tracing::debug;

use crate::application::controller::SessionSnapshot;
use crate::domain::context::ContentSource;
use crate::domain::machine::{ChapterView, SessionSummary, StepOutcome};

/// Renders chapters, summaries and alerts. Implemented by front ends.
pub trait PresentationSink {
    /// Shows a chapter and its progress fraction.
    fn render_chapter(&mut self, view: &ChapterView);

    /// Shows the end-of-session summary.
    fn render_summary(&mut self, summary: &SessionSummary);

    /// Surfaces a recoverable error to the user.
    fn render_alert(&mut self, error: &QuestError);

    /// Enables or disables controls.
    fn update_affordances(&mut self, affordances: &Affordances);
}

/// Which controls are usable right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Affordances {
    /// The start control.
    pub start_enabled: bool,
    /// The choice controls of the displayed chapter.
    pub choices_enabled: bool,
    /// The typed-text input.
    pub text_input_enabled: bool,
    /// The document upload control.
    pub upload_enabled: bool,
    /// A loading indicator should be shown.
    pub busy: bool,
}

impl Affordances {
    /// Derives the control state from the session, the content source and
    /// the interests typed so far.
    #[must_use]
    pub fn derive(snapshot: &SessionSnapshot, source: &ContentSource, interests: &str) -> Self {
        let idle_controls = !snapshot.busy;
        Self {
            start_enabled: idle_controls
                && snapshot.accepts_start
                && source.is_ready()
                && !interests.trim().is_empty(),
            choices_enabled: idle_controls
                && snapshot.summary.is_none()
                && snapshot
                    .chapter
                    .as_ref()
                    .is_some_and(|view| view.chapter.has_choices()),
            text_input_enabled: idle_controls && source.text_input_enabled(),
            upload_enabled: idle_controls && source.upload_enabled(),
            busy: snapshot.busy,
        }
    }
}

/// Hands a controller result to the sink.
pub fn present(sink: &mut dyn PresentationSink, result: &Result<StepOutcome, QuestError>) {
    match result {
        Ok(StepOutcome::Chapter(view)) => sink.render_chapter(view),
        Ok(StepOutcome::Completed(summary)) => sink.render_summary(summary),
        Ok(StepOutcome::Discarded) => debug!("nothing to present for a discarded response"),
        Err(error) => sink.render_alert(error),
    }
}
