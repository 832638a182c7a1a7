//! Chapter counter and choice history.

use serde::Serialize;
use storyquest_narrative::domain::chapter::ChoiceRecord;

/// Number of chapters in a session.
pub const SESSION_LENGTH: u32 = 5;

/// A choice made at the end of a chapter. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// The chapter the choice was made in.
    pub chapter_number: u32,
    /// The choice as offered by the service.
    pub choice: ChoiceRecord,
}

/// Progress through a session.
///
/// `history.len() == current_chapter - 1` after every transition; a
/// `current_chapter` of `SESSION_LENGTH + 1` marks a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    current_chapter: u32,
    history: Vec<HistoryEntry>,
}

impl Default for SessionProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProgress {
    /// Progress at the start of chapter 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_chapter: 1,
            history: Vec::new(),
        }
    }

    /// The chapter being played (or requested).
    #[must_use]
    pub fn current_chapter(&self) -> u32 {
        self.current_chapter
    }

    /// Choices made so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Number of chapters the player has finished.
    #[must_use]
    pub fn chapters_completed(&self) -> u32 {
        self.current_chapter - 1
    }

    /// Returns `true` once the last chapter's choice has been made.
    #[must_use]
    pub fn is_past_final_chapter(&self) -> bool {
        self.current_chapter > SESSION_LENGTH
    }

    /// Checks the history/counter invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        usize::try_from(self.chapters_completed()).is_ok_and(|done| done == self.history.len())
    }

    /// Records `choice` against the current chapter and advances the counter.
    /// Returns the new current chapter.
    pub(crate) fn record_choice(&mut self, choice: ChoiceRecord) -> u32 {
        self.history.push(HistoryEntry {
            chapter_number: self.current_chapter,
            choice,
        });
        self.current_chapter += 1;
        self.current_chapter
    }

    /// Undoes the most recent [`SessionProgress::record_choice`].
    pub(crate) fn rollback_last(&mut self) -> Option<HistoryEntry> {
        let entry = self.history.pop()?;
        self.current_chapter = entry.chapter_number;
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(id: &str) -> ChoiceRecord {
        ChoiceRecord {
            id: id.to_owned(),
            text: format!("option {id}"),
            hint: String::new(),
        }
    }

    #[test]
    fn test_new_progress_starts_at_chapter_one() {
        let progress = SessionProgress::new();

        assert_eq!(progress.current_chapter(), 1);
        assert!(progress.history().is_empty());
        assert!(progress.is_consistent());
    }

    #[test]
    fn test_record_choice_keeps_invariant() {
        let mut progress = SessionProgress::new();

        for expected in 2..=6 {
            assert_eq!(progress.record_choice(choice("A")), expected);
            assert!(progress.is_consistent());
        }

        assert!(progress.is_past_final_chapter());
        assert_eq!(progress.chapters_completed(), 5);
        assert_eq!(progress.history()[4].chapter_number, 5);
    }

    #[test]
    fn test_rollback_restores_previous_chapter() {
        // Arrange
        let mut progress = SessionProgress::new();
        progress.record_choice(choice("A"));
        progress.record_choice(choice("B"));

        // Act
        let undone = progress.rollback_last().unwrap();

        // Assert
        assert_eq!(undone.chapter_number, 2);
        assert_eq!(undone.choice.id, "B");
        assert_eq!(progress.current_chapter(), 2);
        assert!(progress.is_consistent());
    }

    #[test]
    fn test_rollback_on_empty_history_is_a_no_op() {
        let mut progress = SessionProgress::new();

        assert!(progress.rollback_last().is_none());
        assert_eq!(progress.current_chapter(), 1);
    }
}
