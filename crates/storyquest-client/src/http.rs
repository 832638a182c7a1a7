//! `reqwest` implementation of the chapter service and ingestion seams.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use storyquest_core::error::QuestError;
use storyquest_core::service::{
    ChapterService, ContinueGameRequest, GameEnvelope, SourceIngestion, StartGameRequest,
    UploadDocument, UploadEnvelope,
};
use tracing::{debug, instrument};

use crate::config::ClientConfig;

/// Error body the service sends with non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Talks to the chapter service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChapterService {
    client: Client,
    config: ClientConfig,
}

impl HttpChapterService {
    /// Builds a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::Transport` if the TLS backend cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self, QuestError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(transport)?;
        Ok(Self { client, config })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, QuestError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(endpoint);
        debug!(%url, "sending chapter request");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        read_envelope(response).await
    }
}

#[async_trait]
impl ChapterService for HttpChapterService {
    #[instrument(skip(self, request), fields(interests = %request.interests))]
    async fn start_game(&self, request: &StartGameRequest) -> Result<GameEnvelope, QuestError> {
        self.post_json("start-game", request).await
    }

    #[instrument(skip(self, request), fields(chapter_num = request.chapter_num))]
    async fn continue_game(
        &self,
        request: &ContinueGameRequest,
    ) -> Result<GameEnvelope, QuestError> {
        self.post_json("continue-game", request).await
    }
}

#[async_trait]
impl SourceIngestion for HttpChapterService {
    #[instrument(skip(self, document), fields(file_name = %document.file_name, size = document.bytes.len()))]
    async fn upload(&self, document: &UploadDocument) -> Result<UploadEnvelope, QuestError> {
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str("application/pdf")
            .map_err(transport)?;
        let form = Form::new().part("pdf", part);

        let response = self
            .client
            .post(self.config.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        read_envelope(response).await
    }
}

/// Decodes a response body. Non-success statuses become transport errors
/// carrying the body's `error` message when there is one; an undecodable
/// success body is a service error.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, QuestError> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport)?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| status.to_string());
        return Err(QuestError::Transport {
            status: Some(status.as_u16()),
            message,
        });
    }

    serde_json::from_slice(&body)
        .map_err(|e| QuestError::Service(format!("malformed response envelope: {e}")))
}

fn transport(err: reqwest::Error) -> QuestError {
    QuestError::Transport {
        status: err.status().map(|status| status.as_u16()),
        message: err.to_string(),
    }
}
