//! Test ingestion — mock `SourceIngestion` implementation for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use storyquest_core::error::QuestError;
use storyquest_core::service::{SourceIngestion, UploadDocument, UploadEnvelope};

/// An ingestion endpoint that returns a fixed result and records the names of
/// uploaded documents.
#[derive(Debug)]
pub struct StubIngestion {
    result: Result<UploadEnvelope, QuestError>,
    uploaded: Mutex<Vec<String>>,
}

impl StubIngestion {
    /// Create a stub answering every upload with `result`.
    #[must_use]
    pub fn new(result: Result<UploadEnvelope, QuestError>) -> Self {
        Self {
            result,
            uploaded: Mutex::new(Vec::new()),
        }
    }

    /// Names of the documents uploaded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceIngestion for StubIngestion {
    async fn upload(&self, document: &UploadDocument) -> Result<UploadEnvelope, QuestError> {
        self.uploaded
            .lock()
            .unwrap()
            .push(document.file_name.clone());
        self.result.clone()
    }
}
