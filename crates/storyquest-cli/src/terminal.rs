//! Line-oriented terminal presentation.

use std::io::{self, Write};

use storyquest_core::error::QuestError;
use storyquest_session::application::presentation::{Affordances, PresentationSink};
use storyquest_session::domain::machine::{ChapterView, SessionSummary};
use tracing::warn;

const PROGRESS_CELLS: usize = 10;

/// Writes chapters, summaries and alerts to `out`.
#[derive(Debug)]
pub struct TerminalSink<W: Write> {
    out: W,
    affordances: Affordances,
}

impl<W: Write> TerminalSink<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            affordances: Affordances::default(),
        }
    }

    /// The most recent control state.
    #[must_use]
    pub fn affordances(&self) -> Affordances {
        self.affordances
    }

    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Writes `text` without a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns the underlying write error.
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Writes `text` on its own line.
    ///
    /// # Errors
    ///
    /// Returns the underlying write error.
    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Prompt listing the commands the current controls allow.
    #[must_use]
    pub fn command_hint(&self) -> String {
        if self.affordances.choices_enabled {
            "\nEnter a choice, 'new' for a new quest or 'quit': ".to_owned()
        } else {
            "\nEnter 'new' for a new quest or 'quit': ".to_owned()
        }
    }

    fn write_block(&mut self, block: impl FnOnce(&mut W) -> io::Result<()>) {
        if let Err(e) = block(&mut self.out).and_then(|()| self.out.flush()) {
            warn!(error = %e, "failed to write to terminal");
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn progress_bar(fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = (fraction * PROGRESS_CELLS as f64).round() as usize;
    let percent = (fraction * 100.0).round() as u32;
    format!(
        "[{}{}] {percent}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_CELLS - filled)
    )
}

impl<W: Write> PresentationSink for TerminalSink<W> {
    fn render_chapter(&mut self, view: &ChapterView) {
        let chapter = &view.chapter;
        self.write_block(|out| {
            writeln!(out)?;
            writeln!(out, "Chapter {}: {}", chapter.chapter_number, chapter.title)?;
            writeln!(out, "{}", progress_bar(view.progress))?;
            writeln!(out)?;
            writeln!(out, "{}", chapter.narrative)?;
            writeln!(out)?;
            writeln!(out, "Concept: {}", chapter.concept_explained)?;
            if chapter.has_choices() {
                writeln!(out)?;
                writeln!(out, "What do you do?")?;
                for choice in &chapter.choices {
                    writeln!(out, "  {}) {}", choice.id, choice.text)?;
                    if !choice.hint.is_empty() {
                        writeln!(out, "     hint: {}", choice.hint)?;
                    }
                }
            } else {
                writeln!(out)?;
                writeln!(out, "The story offers no choices here.")?;
            }
            Ok(())
        });
    }

    fn render_summary(&mut self, summary: &SessionSummary) {
        self.write_block(|out| {
            writeln!(out)?;
            writeln!(out, "Quest Complete!")?;
            writeln!(out, "{}", progress_bar(1.0))?;
            writeln!(
                out,
                "Congratulations! You've completed your learning adventure through {} chapters.",
                summary.chapters_completed
            )?;
            writeln!(
                out,
                "You've explored complex concepts through the lens of {}.",
                summary.interests
            )
        });
    }

    fn render_alert(&mut self, error: &QuestError) {
        self.write_block(|out| writeln!(out, "Error: {error}"));
    }

    fn update_affordances(&mut self, affordances: &Affordances) {
        let was_busy = self.affordances.busy;
        self.affordances = *affordances;
        if affordances.busy && !was_busy {
            self.write_block(|out| writeln!(out, "Generating your story..."));
        }
    }
}
