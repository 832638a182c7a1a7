//! Interactive playthrough loop.
//!
//! Gathers the study content and interests, starts a session, then feeds
//! typed choices to the controller until the player quits. Every controller
//! result goes through the presentation adapter, and the session events it
//! produced are logged.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use storyquest_core::error::QuestError;
use storyquest_core::event::DomainEvent;
use storyquest_core::service::{SourceIngestion, UploadDocument};
use storyquest_session::application::controller::GameController;
use storyquest_session::application::ingestion::ingest_document;
use storyquest_session::application::presentation::{Affordances, PresentationSink, present};
use storyquest_session::domain::context::ContentSource;
use storyquest_session::domain::machine::StepOutcome;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{info, warn};

use crate::error::AppError;
use crate::terminal::TerminalSink;

/// Inputs supplied on the command line for the first session.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Study content typed inline.
    pub text: Option<String>,
    /// Document to extract the study content from.
    pub file: Option<PathBuf>,
    /// Interests to theme the story around.
    pub interests: Option<String>,
}

enum Flow {
    NewSession,
    Quit,
}

/// The terminal front end.
pub struct App<W: Write> {
    controller: GameController,
    ingestion: Arc<dyn SourceIngestion>,
    source: ContentSource,
    interests: String,
    sink: TerminalSink<W>,
}

impl<W: Write> App<W> {
    #[must_use]
    pub fn new(
        controller: GameController,
        ingestion: Arc<dyn SourceIngestion>,
        sink: TerminalSink<W>,
    ) -> Self {
        Self {
            controller,
            ingestion,
            source: ContentSource::new(),
            interests: String::new(),
            sink,
        }
    }

    #[must_use]
    pub fn sink(&self) -> &TerminalSink<W> {
        &self.sink
    }

    #[must_use]
    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    /// Runs sessions until the player quits or `input` ends.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the terminal cannot be read or written.
    /// Service failures are shown to the player and never end the loop.
    pub async fn run<R>(&mut self, input: R, launch: LaunchOptions) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut launch = launch;
        loop {
            if !self.prepare(&mut lines, std::mem::take(&mut launch)).await? {
                return Ok(());
            }
            if !self.begin(&mut lines).await? {
                return Ok(());
            }
            match self.play(&mut lines).await? {
                Flow::NewSession => self.reset(),
                Flow::Quit => return Ok(()),
            }
        }
    }

    /// Collects content and interests. Returns `false` if input ended first.
    async fn prepare<R>(
        &mut self,
        lines: &mut Lines<R>,
        launch: LaunchOptions,
    ) -> Result<bool, AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        self.sink
            .notice("Welcome to Storyquest! Learn anything through a five-chapter adventure.")?;

        if let Some(path) = launch.file {
            self.upload(&path).await?;
        } else if let Some(text) = launch.text {
            self.source.set_from_text(&text);
        }

        while !self.source.is_ready() {
            self.sink.prompt(
                "\nPaste your study content, or 'file <path>' to upload a PDF. \
                 Finish with an empty line:\n",
            )?;
            let Some(first) = lines.next_line().await? else {
                return Ok(false);
            };
            if let Some(path) = first.trim().strip_prefix("file ") {
                self.upload(Path::new(path.trim())).await?;
                continue;
            }
            let mut text = first;
            while let Some(line) = lines.next_line().await? {
                if line.trim().is_empty() {
                    break;
                }
                text.push('\n');
                text.push_str(&line);
            }
            self.source.set_from_text(&text);
        }

        self.interests = launch.interests.unwrap_or_default();
        while self.interests.trim().is_empty() {
            self.sink.prompt("What are you interested in? ")?;
            let Some(line) = lines.next_line().await? else {
                return Ok(false);
            };
            self.interests = line;
        }

        self.refresh_affordances();
        Ok(true)
    }

    async fn upload(&mut self, path: &Path) -> Result<(), AppError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read document");
                self.sink
                    .notice(&format!("Could not read {}: {e}", path.display()))?;
                return Ok(());
            }
        };
        let document = UploadDocument {
            file_name: path.file_name().map_or_else(
                || path.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            ),
            bytes,
        };

        self.sink.update_affordances(&Affordances {
            busy: true,
            ..Affordances::default()
        });
        match ingest_document(&document, self.ingestion.as_ref(), &mut self.source).await {
            Ok(receipt) => self.sink.notice(&receipt.label)?,
            Err(e) => {
                warn!(code = e.code(), error = %e, "document ingestion failed");
                self.sink.render_alert(&e);
            }
        }
        self.refresh_affordances();
        Ok(())
    }

    /// Requests the first chapter, offering a retry on failure. Returns
    /// `false` if the player gives up or input ends.
    async fn begin<R>(&mut self, lines: &mut Lines<R>) -> Result<bool, AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        loop {
            self.sink.update_affordances(&Affordances {
                busy: true,
                ..Affordances::default()
            });
            let result = self
                .controller
                .start(self.source.content(), &self.interests)
                .await;
            self.after_step(&result);
            if result.is_ok() {
                return Ok(true);
            }

            self.sink.prompt("Try again? [Y/n] ")?;
            let Some(answer) = lines.next_line().await? else {
                return Ok(false);
            };
            if answer.trim().eq_ignore_ascii_case("n") {
                return Ok(false);
            }
        }
    }

    async fn play<R>(&mut self, lines: &mut Lines<R>) -> Result<Flow, AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        loop {
            let hint = self.sink.command_hint();
            self.sink.prompt(&hint)?;
            let Some(line) = lines.next_line().await? else {
                return Ok(Flow::Quit);
            };
            let input = line.trim();
            match input.to_ascii_lowercase().as_str() {
                "" => continue,
                "quit" | "exit" => return Ok(Flow::Quit),
                "new" => return Ok(Flow::NewSession),
                _ => {}
            }

            let choice_id = self.resolve_choice(input);
            if self.sink.affordances().choices_enabled {
                self.sink.update_affordances(&Affordances {
                    busy: true,
                    ..Affordances::default()
                });
            }
            let result = self.controller.choose(&choice_id).await;
            self.after_step(&result);
        }
    }

    /// Matches typed input against the displayed choice ids, ignoring case.
    fn resolve_choice(&self, input: &str) -> String {
        self.controller
            .snapshot()
            .chapter
            .and_then(|view| {
                view.chapter
                    .choices
                    .into_iter()
                    .find(|choice| choice.id.eq_ignore_ascii_case(input))
                    .map(|choice| choice.id)
            })
            .unwrap_or_else(|| input.to_owned())
    }

    fn reset(&mut self) {
        self.controller.new_session();
        self.source.clear();
        self.interests.clear();
        self.log_events();
        self.refresh_affordances();
    }

    fn after_step(&mut self, result: &Result<StepOutcome, QuestError>) {
        if let Err(e) = result {
            warn!(code = e.code(), error = %e, "session step failed");
        }
        present(&mut self.sink, result);
        self.log_events();
        self.refresh_affordances();
    }

    fn refresh_affordances(&mut self) {
        let snapshot = self.controller.snapshot();
        let affordances = Affordances::derive(&snapshot, &self.source, &self.interests);
        self.sink.update_affordances(&affordances);
    }

    fn log_events(&self) {
        for event in self.controller.take_events() {
            let metadata = event.metadata();
            info!(
                event_type = event.event_type(),
                generation = metadata.generation,
                sequence_number = metadata.sequence_number,
                correlation_id = %metadata.correlation_id,
                payload = %event.to_payload(),
                "session event"
            );
        }
    }
}
