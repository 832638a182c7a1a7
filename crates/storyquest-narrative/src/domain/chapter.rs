//! Chapter and choice records.

use serde::{Deserialize, Serialize};

/// Title shown when the service omits one.
pub const DEFAULT_TITLE: &str = "Chapter";
/// Narrative shown when the service omits one.
pub const DEFAULT_NARRATIVE: &str = "Loading story...";
/// Concept label shown when the service omits one.
pub const DEFAULT_CONCEPT: &str = "Loading...";
/// Choice identifier used when a choice carries none.
pub const DEFAULT_CHOICE_ID: &str = "A";
/// Choice text used when a choice carries none.
pub const DEFAULT_CHOICE_TEXT: &str = "Continue";
/// Choice hint used when a choice carries none.
pub const DEFAULT_CHOICE_HINT: &str = "Continue the story";

/// One option offered to the player at the end of a chapter.
///
/// The identifiers are opaque: they are echoed back to the service in the
/// next request and never interpreted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    /// Short identifier, e.g. `"A"`.
    pub id: String,
    /// What the player does.
    pub text: String,
    /// What the choice leads towards.
    pub hint: String,
}

impl ChoiceRecord {
    /// The form in which a choice is sent back to the service: `"<id>: <text>"`.
    #[must_use]
    pub fn request_label(&self) -> String {
        format!("{}: {}", self.id, self.text)
    }
}

/// A normalized chapter: every field present, defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Position of the chapter within the session, starting at 1.
    pub chapter_number: u32,
    /// Chapter title.
    pub title: String,
    /// Story text.
    pub narrative: String,
    /// The concept this chapter teaches.
    pub concept_explained: String,
    /// Choices to advance the story; empty for a terminal chapter.
    pub choices: Vec<ChoiceRecord>,
}

impl Chapter {
    /// Looks up an offered choice by identifier. The first match wins when the
    /// service repeats an identifier.
    #[must_use]
    pub fn choice(&self, id: &str) -> Option<&ChoiceRecord> {
        self.choices.iter().find(|choice| choice.id == id)
    }

    /// Returns `true` when the chapter offers at least one choice.
    #[must_use]
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(id: &str, text: &str) -> ChoiceRecord {
        ChoiceRecord {
            id: id.to_owned(),
            text: text.to_owned(),
            hint: String::new(),
        }
    }

    #[test]
    fn test_request_label_joins_id_and_text() {
        assert_eq!(choice("A", "Go left").request_label(), "A: Go left");
    }

    #[test]
    fn test_choice_lookup_returns_first_match() {
        let chapter = Chapter {
            chapter_number: 1,
            title: "Launch".into(),
            narrative: String::new(),
            concept_explained: String::new(),
            choices: vec![choice("A", "first"), choice("A", "second"), choice("B", "third")],
        };

        assert_eq!(chapter.choice("A").map(|c| c.text.as_str()), Some("first"));
        assert_eq!(chapter.choice("B").map(|c| c.text.as_str()), Some("third"));
        assert!(chapter.choice("C").is_none());
        assert!(chapter.has_choices());
    }
}
