//! Wire fixtures shaped like chapter service responses.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use storyquest_core::service::GameEnvelope;

/// Timestamp shared by tests that compare event metadata.
///
/// # Panics
///
/// Never in practice; the literal date is valid.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// Builds a fully populated chapter payload with the given `(id, text)` choices.
#[must_use]
pub fn chapter_json(chapter_number: u32, title: &str, choices: &[(&str, &str)]) -> Value {
    let choices: Vec<Value> = choices
        .iter()
        .map(|(id, text)| json!({ "id": id, "text": text, "hint": format!("hint for {id}") }))
        .collect();
    json!({
        "chapter_number": chapter_number,
        "title": title,
        "narrative": format!("Narrative of chapter {chapter_number}."),
        "concept_explained": "Orbital mechanics",
        "choices": choices,
    })
}

/// Wraps a chapter payload in a successful envelope.
#[must_use]
pub fn success_envelope(game: Value) -> GameEnvelope {
    GameEnvelope {
        success: true,
        game: Some(game),
        error: None,
    }
}

/// An envelope the service returns when generation failed.
#[must_use]
pub fn failure_envelope(message: &str) -> GameEnvelope {
    GameEnvelope {
        success: false,
        game: None,
        error: Some(message.to_owned()),
    }
}
