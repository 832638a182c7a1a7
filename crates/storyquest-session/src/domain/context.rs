//! Session inputs and the content acquisition adapter.

use storyquest_core::error::QuestError;

/// The inputs a session is generated from. Fixed once the session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    content: String,
    interests: String,
}

impl SessionContext {
    /// Validates and captures the session inputs. Interests are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::Validation` if either input is blank.
    pub fn new(content: &str, interests: &str) -> Result<Self, QuestError> {
        let interests = interests.trim();
        if content.trim().is_empty() || interests.is_empty() {
            return Err(QuestError::Validation(
                "Please provide both content and your interests!".to_owned(),
            ));
        }
        Ok(Self {
            content: content.to_owned(),
            interests: interests.to_owned(),
        })
    }

    /// Study material the story teaches.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Interests the story is themed around.
    #[must_use]
    pub fn interests(&self) -> &str {
        &self.interests
    }
}

/// Where the current content came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOrigin {
    /// Text typed or pasted by the user.
    Typed,
    /// Text extracted from an uploaded document.
    Extracted {
        /// Human-readable description of the document.
        label: String,
    },
}

/// Normalizes the two input modes into a single content string.
///
/// Every setter replaces whatever was there before. The two modes exclude
/// each other only at the affordance level: while typed text is active the
/// upload control is disabled, and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSource {
    content: String,
    origin: Option<ContentOrigin>,
}

impl ContentSource {
    /// Creates an empty, not-ready source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the content with typed text. Blank text empties the source.
    pub fn set_from_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.clear();
            return;
        }
        self.content = text.to_owned();
        self.origin = Some(ContentOrigin::Typed);
    }

    /// Replaces the content with text extracted from a document.
    pub fn set_from_extracted_source(&mut self, text: &str, source_label: &str) {
        if text.is_empty() {
            self.clear();
            return;
        }
        self.content = text.to_owned();
        self.origin = Some(ContentOrigin::Extracted {
            label: source_label.to_owned(),
        });
    }

    /// Empties the source and re-enables both input modes.
    pub fn clear(&mut self) {
        self.content.clear();
        self.origin = None;
    }

    /// Returns `true` once there is content to start a session with.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.content.is_empty()
    }

    /// The current content, possibly empty.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Where the current content came from, if anywhere.
    #[must_use]
    pub fn origin(&self) -> Option<&ContentOrigin> {
        self.origin.as_ref()
    }

    /// Typing is disabled while extracted content is active.
    #[must_use]
    pub fn text_input_enabled(&self) -> bool {
        !matches!(self.origin, Some(ContentOrigin::Extracted { .. }))
    }

    /// Uploading is disabled while typed content is active.
    #[must_use]
    pub fn upload_enabled(&self) -> bool {
        !matches!(self.origin, Some(ContentOrigin::Typed))
    }
}
