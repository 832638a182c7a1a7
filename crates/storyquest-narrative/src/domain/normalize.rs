//! Parse-and-validate step for chapter payloads.
//!
//! The service promises nothing about individual fields. Every optional field
//! is defaulted here, independently of the others, so rendering code only
//! ever sees a complete [`Chapter`]. Only a payload that is not a JSON object
//! at all is rejected.

use serde_json::{Map, Value};
use storyquest_core::error::QuestError;
use tracing::{debug, warn};

use super::chapter::{
    Chapter, ChoiceRecord, DEFAULT_CHOICE_HINT, DEFAULT_CHOICE_ID, DEFAULT_CHOICE_TEXT,
    DEFAULT_CONCEPT, DEFAULT_NARRATIVE, DEFAULT_TITLE,
};

/// Normalizes a raw chapter payload.
///
/// `fallback_number` is used when `chapter_number` is absent, zero or not a
/// positive integer.
///
/// # Errors
///
/// Returns `QuestError::Service` if `game` is not a JSON object.
pub fn normalize_chapter(game: &Value, fallback_number: u32) -> Result<Chapter, QuestError> {
    let Some(object) = game.as_object() else {
        return Err(QuestError::Service(format!(
            "chapter payload must be an object, got {}",
            kind_of(game)
        )));
    };

    Ok(Chapter {
        chapter_number: chapter_number(object, fallback_number),
        title: text_field(object, "title").unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
        narrative: text_field(object, "narrative").unwrap_or_else(|| DEFAULT_NARRATIVE.to_owned()),
        concept_explained: text_field(object, "concept_explained")
            .unwrap_or_else(|| DEFAULT_CONCEPT.to_owned()),
        choices: choices(object),
    })
}

fn chapter_number(object: &Map<String, Value>, fallback: u32) -> u32 {
    let parsed = match object.get("chapter_number") {
        None | Some(Value::Null) => return fallback,
        Some(Value::Number(number)) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(text)) => text.trim().parse::<u32>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(0) => fallback,
        Some(number) => number,
        None => {
            warn!(field = "chapter_number", fallback, "malformed chapter field, using default");
            fallback
        }
    }
}

/// Empty strings count as absent.
fn text_field(object: &Map<String, Value>, key: &'static str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        None | Some(Value::Null | Value::String(_)) => {
            debug!(field = key, "chapter field absent, using default");
            None
        }
        Some(other) => {
            warn!(field = key, found = kind_of(other), "malformed chapter field, using default");
            None
        }
    }
}

fn choices(object: &Map<String, Value>) -> Vec<ChoiceRecord> {
    match object.get("choices") {
        Some(Value::Array(items)) => items.iter().filter_map(choice_record).collect(),
        None | Some(Value::Null) => {
            debug!("chapter carries no choices");
            Vec::new()
        }
        Some(other) => {
            warn!(field = "choices", found = kind_of(other), "choices is not a list, treating as none");
            Vec::new()
        }
    }
}

fn choice_record(item: &Value) -> Option<ChoiceRecord> {
    let Some(object) = item.as_object() else {
        warn!(found = kind_of(item), "skipping choice that is not an object");
        return None;
    };

    Some(ChoiceRecord {
        id: text_field(object, "id").unwrap_or_else(|| DEFAULT_CHOICE_ID.to_owned()),
        text: text_field(object, "text").unwrap_or_else(|| DEFAULT_CHOICE_TEXT.to_owned()),
        hint: text_field(object, "hint").unwrap_or_else(|| DEFAULT_CHOICE_HINT.to_owned()),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complete_payload_is_taken_verbatim() {
        // Arrange
        let game = json!({
            "chapter_number": 3,
            "title": "Escape Velocity",
            "narrative": "The engines roar.",
            "concept_explained": "Kinetic energy",
            "choices": [{ "id": "B", "text": "Burn harder", "hint": "More fuel" }],
        });

        // Act
        let chapter = normalize_chapter(&game, 1).unwrap();

        // Assert
        assert_eq!(chapter.chapter_number, 3);
        assert_eq!(chapter.title, "Escape Velocity");
        assert_eq!(chapter.narrative, "The engines roar.");
        assert_eq!(chapter.concept_explained, "Kinetic energy");
        assert_eq!(chapter.choices.len(), 1);
        assert_eq!(chapter.choices[0].request_label(), "B: Burn harder");
        assert_eq!(chapter.choices[0].hint, "More fuel");
    }

    #[test]
    fn test_missing_title_defaults_to_chapter() {
        let chapter = normalize_chapter(&json!({ "chapter_number": 1 }), 1).unwrap();

        assert_eq!(chapter.title, "Chapter");
        assert_eq!(chapter.narrative, "Loading story...");
        assert_eq!(chapter.concept_explained, "Loading...");
    }

    #[test]
    fn test_empty_object_defaults_every_field() {
        let chapter = normalize_chapter(&json!({}), 4).unwrap();

        assert_eq!(chapter.chapter_number, 4);
        assert_eq!(chapter.title, DEFAULT_TITLE);
        assert!(chapter.choices.is_empty());
    }

    #[test]
    fn test_falsy_values_are_defaulted() {
        let game = json!({ "chapter_number": 0, "title": "", "narrative": null });

        let chapter = normalize_chapter(&game, 2).unwrap();

        assert_eq!(chapter.chapter_number, 2);
        assert_eq!(chapter.title, DEFAULT_TITLE);
        assert_eq!(chapter.narrative, DEFAULT_NARRATIVE);
    }

    #[test]
    fn test_wrongly_typed_fields_are_defaulted() {
        let game = json!({ "chapter_number": -3, "title": 42, "concept_explained": ["x"] });

        let chapter = normalize_chapter(&game, 1).unwrap();

        assert_eq!(chapter.chapter_number, 1);
        assert_eq!(chapter.title, DEFAULT_TITLE);
        assert_eq!(chapter.concept_explained, DEFAULT_CONCEPT);
    }

    #[test]
    fn test_numeric_string_chapter_number_is_accepted() {
        let chapter = normalize_chapter(&json!({ "chapter_number": "2" }), 1).unwrap();

        assert_eq!(chapter.chapter_number, 2);
    }

    #[test]
    fn test_empty_choices_is_a_valid_choiceless_chapter() {
        let chapter = normalize_chapter(&json!({ "title": "The End", "choices": [] }), 5).unwrap();

        assert!(!chapter.has_choices());
        assert_eq!(chapter.title, "The End");
    }

    #[test]
    fn test_choices_that_are_not_a_list_yield_no_choices() {
        let chapter = normalize_chapter(&json!({ "choices": "A or B" }), 1).unwrap();

        assert!(chapter.choices.is_empty());
    }

    #[test]
    fn test_choice_fields_default_independently() {
        let game = json!({ "choices": [{ "text": "Go left" }, {}, "not a choice"] });

        let chapter = normalize_chapter(&game, 1).unwrap();

        assert_eq!(chapter.choices.len(), 2);
        assert_eq!(chapter.choices[0].id, "A");
        assert_eq!(chapter.choices[0].text, "Go left");
        assert_eq!(chapter.choices[0].hint, "Continue the story");
        assert_eq!(chapter.choices[1].text, "Continue");
    }

    #[test]
    fn test_non_object_payload_is_a_service_error() {
        let result = normalize_chapter(&json!("chapter one"), 1);

        match result {
            Err(QuestError::Service(message)) => assert!(message.contains("string")),
            other => panic!("expected Service error, got {other:?}"),
        }
    }
}
