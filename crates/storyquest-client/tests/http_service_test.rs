//! Exercises `HttpChapterService` against a local mock of the chapter service.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use storyquest_client::{ClientConfig, HttpChapterService};
use storyquest_core::error::QuestError;
use storyquest_core::service::{
    ChapterService, ContinueGameRequest, SourceIngestion, StartGameRequest, UploadDocument,
};

#[derive(Clone, Default)]
struct MockState {
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl MockState {
    fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

fn chapter(number: u64) -> Value {
    json!({
        "chapter_number": number,
        "title": format!("Chapter {number}"),
        "narrative": "The probe drifts past the moon.",
        "concept_explained": "Gravity assists",
        "choices": [{ "id": "A", "text": "Slingshot", "hint": "uses momentum" }]
    })
}

async fn handle_start_game(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.bodies.lock().unwrap().push(body.clone());
    match body["interests"].as_str() {
        Some("reject") => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Content and interests required" })),
        )
            .into_response(),
        Some("crash") => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        Some("garbled") => (StatusCode::OK, "<html>not json</html>").into_response(),
        _ => Json(json!({ "success": true, "game": chapter(1) })).into_response(),
    }
}

async fn handle_continue_game(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.bodies.lock().unwrap().push(body.clone());
    let number = body["chapter_num"].as_u64().unwrap_or_default();
    Json(json!({ "success": true, "game": chapter(number) }))
}

async fn handle_upload(mut multipart: Multipart) -> Json<Value> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("pdf") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field.bytes().await.unwrap_or_default();
        let preview = format!("{file_name} {content_type} {}", bytes.len());
        return Json(json!({
            "success": true,
            "content_length": preview.len(),
            "preview": preview,
        }));
    }
    Json(json!({ "success": false, "error": "No PDF file provided" }))
}

async fn spawn_mock_service()
-> std::io::Result<Option<(String, MockState, tokio::task::JoinHandle<()>)>> {
    let state = MockState::default();
    let app = Router::new()
        .route("/api/start-game", post(handle_start_game))
        .route("/api/continue-game", post(handle_continue_game))
        .route("/api/upload", post(handle_upload))
        .with_state(state.clone());
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            eprintln!("skipping http client tests: local socket bind is not permitted");
            return Ok(None);
        }
        Err(err) => return Err(err),
    };
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    wait_for_listener(addr).await;

    Ok(Some((format!("http://{addr}"), state, handle)))
}

async fn wait_for_listener(addr: std::net::SocketAddr) {
    for _ in 0..20 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

fn service_for(base_url: &str) -> HttpChapterService {
    let config = ClientConfig::default()
        .with_base_url(base_url)
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    HttpChapterService::new(config).unwrap()
}

fn start_request(interests: &str) -> StartGameRequest {
    StartGameRequest {
        content: "Orbital mechanics notes".into(),
        interests: interests.into(),
    }
}

#[tokio::test]
async fn test_start_game_posts_json_and_decodes_envelope() {
    let Some((base_url, state, _server)) = spawn_mock_service().await.unwrap() else {
        return;
    };
    let service = service_for(&base_url);

    let envelope = service.start_game(&start_request("space")).await.unwrap();

    assert!(envelope.success);
    assert_eq!(envelope.game.unwrap()["title"], "Chapter 1");
    assert_eq!(
        state.bodies(),
        vec![json!({ "content": "Orbital mechanics notes", "interests": "space" })]
    );
}

#[tokio::test]
async fn test_continue_game_sends_chapter_number_and_choice() {
    let Some((base_url, state, _server)) = spawn_mock_service().await.unwrap() else {
        return;
    };
    let service = service_for(&base_url);
    let request = ContinueGameRequest {
        content: "Orbital mechanics notes".into(),
        interests: "space".into(),
        chapter_num: 3,
        choice: "A: Slingshot".into(),
    };

    let envelope = service.continue_game(&request).await.unwrap();

    assert_eq!(envelope.game.unwrap()["chapter_number"], 3);
    let bodies = state.bodies();
    assert_eq!(bodies[0]["chapter_num"], 3);
    assert_eq!(bodies[0]["choice"], "A: Slingshot");
}

#[tokio::test]
async fn test_error_status_carries_service_message() {
    let Some((base_url, _state, _server)) = spawn_mock_service().await.unwrap() else {
        return;
    };
    let service = service_for(&base_url);

    let result = service.start_game(&start_request("reject")).await;

    assert_eq!(
        result,
        Err(QuestError::Transport {
            status: Some(400),
            message: "Content and interests required".into(),
        })
    );
}

#[tokio::test]
async fn test_error_status_without_json_body_falls_back_to_status_text() {
    let Some((base_url, _state, _server)) = spawn_mock_service().await.unwrap() else {
        return;
    };
    let service = service_for(&base_url);

    let result = service.start_game(&start_request("crash")).await;

    match result {
        Err(QuestError::Transport { status, message }) => {
            assert_eq!(status, Some(500));
            assert!(message.contains("500"));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_undecodable_success_body_is_service_error() {
    let Some((base_url, _state, _server)) = spawn_mock_service().await.unwrap() else {
        return;
    };
    let service = service_for(&base_url);

    let result = service.start_game(&start_request("garbled")).await;

    assert!(matches!(
        result,
        Err(QuestError::Service(message)) if message.starts_with("malformed response envelope")
    ));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error_without_status() {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => return,
        Err(err) => panic!("bind failed: {err}"),
    };
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let service = service_for(&format!("http://{addr}"));

    let result = service.start_game(&start_request("space")).await;

    assert!(matches!(
        result,
        Err(QuestError::Transport { status: None, .. })
    ));
}

#[tokio::test]
async fn test_upload_sends_pdf_multipart_field() {
    let Some((base_url, _state, _server)) = spawn_mock_service().await.unwrap() else {
        return;
    };
    let service = service_for(&base_url);
    let document = UploadDocument {
        file_name: "notes.pdf".into(),
        bytes: b"%PDF-1.4 fake".to_vec(),
    };

    let envelope = service.upload(&document).await.unwrap();

    assert!(envelope.success);
    assert_eq!(
        envelope.preview.as_deref(),
        Some("notes.pdf application/pdf 13")
    );
    assert_eq!(envelope.content_length, Some(28));
}
