//! Test services — mock `ChapterService` implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use storyquest_core::error::QuestError;
use storyquest_core::service::{
    ChapterService, ContinueGameRequest, GameEnvelope, StartGameRequest,
};
use tokio::sync::{Notify, Semaphore};

/// A request observed by a test service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    /// A `start-game` call.
    Start(StartGameRequest),
    /// A `continue-game` call.
    Continue(ContinueGameRequest),
}

/// A chapter service that replays a queue of scripted results and records
/// every request it receives. Once the script is exhausted every call fails
/// with a transport error.
#[derive(Debug, Default)]
pub struct ScriptedChapterService {
    script: Mutex<VecDeque<Result<GameEnvelope, QuestError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedChapterService {
    /// Create a service that answers calls with `script`, in order.
    #[must_use]
    pub fn new(script: Vec<Result<GameEnvelope, QuestError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Appends another scripted result.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push(&self, result: Result<GameEnvelope, QuestError>) {
        self.script.lock().unwrap().push_back(result);
    }

    /// Returns a snapshot of all requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    fn answer(&self, request: RecordedRequest) -> Result<GameEnvelope, QuestError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(QuestError::Transport {
                    status: None,
                    message: "no scripted response".into(),
                })
            })
    }
}

#[async_trait]
impl ChapterService for ScriptedChapterService {
    async fn start_game(&self, request: &StartGameRequest) -> Result<GameEnvelope, QuestError> {
        self.answer(RecordedRequest::Start(request.clone()))
    }

    async fn continue_game(
        &self,
        request: &ContinueGameRequest,
    ) -> Result<GameEnvelope, QuestError> {
        self.answer(RecordedRequest::Continue(request.clone()))
    }
}

/// A chapter service whose every call fails as if the host were unreachable.
#[derive(Debug)]
pub struct FailingChapterService;

#[async_trait]
impl ChapterService for FailingChapterService {
    async fn start_game(&self, _request: &StartGameRequest) -> Result<GameEnvelope, QuestError> {
        Err(QuestError::Transport {
            status: None,
            message: "connection refused".into(),
        })
    }

    async fn continue_game(
        &self,
        _request: &ContinueGameRequest,
    ) -> Result<GameEnvelope, QuestError> {
        Err(QuestError::Transport {
            status: None,
            message: "connection refused".into(),
        })
    }
}

/// A scripted service that parks each call until the test releases it.
/// Used to interleave user actions with an in-flight request.
#[derive(Debug)]
pub struct GatedChapterService {
    inner: ScriptedChapterService,
    entered: Notify,
    gate: Semaphore,
}

impl GatedChapterService {
    /// Create a gated service answering with `script` once released.
    #[must_use]
    pub fn new(script: Vec<Result<GameEnvelope, QuestError>>) -> Self {
        Self {
            inner: ScriptedChapterService::new(script),
            entered: Notify::new(),
            gate: Semaphore::new(0),
        }
    }

    /// Resolves once a call has reached the service.
    pub async fn wait_until_called(&self) {
        self.entered.notified().await;
    }

    /// Lets one parked call proceed.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests()
    }

    async fn pass_gate(&self) {
        self.entered.notify_one();
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
    }
}

#[async_trait]
impl ChapterService for GatedChapterService {
    async fn start_game(&self, request: &StartGameRequest) -> Result<GameEnvelope, QuestError> {
        self.pass_gate().await;
        self.inner.start_game(request).await
    }

    async fn continue_game(
        &self,
        request: &ContinueGameRequest,
    ) -> Result<GameEnvelope, QuestError> {
        self.pass_gate().await;
        self.inner.continue_game(request).await
    }
}
