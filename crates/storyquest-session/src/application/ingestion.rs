//! Turns an uploaded document into session content.

use storyquest_core::error::QuestError;
use storyquest_core::service::{SourceIngestion, UploadDocument};
use tracing::{info, instrument};

use crate::domain::context::ContentSource;

/// What a successful upload produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Description shown in place of the typed-text input.
    pub label: String,
    /// Length of the full extracted text, as reported by the service.
    pub content_length: u64,
}

/// Uploads `document` and, on success, replaces the content of `source` with
/// the extracted text.
///
/// # Errors
///
/// Returns `QuestError::Transport` if the upload fails, and
/// `QuestError::Service` if the service reports failure or returns no text.
/// `source` is left untouched on error.
#[instrument(skip(document, ingestion, source), fields(file_name = %document.file_name))]
pub async fn ingest_document(
    document: &UploadDocument,
    ingestion: &dyn SourceIngestion,
    source: &mut ContentSource,
) -> Result<UploadReceipt, QuestError> {
    let envelope = ingestion.upload(document).await?;
    if !envelope.success {
        return Err(QuestError::Service(
            envelope.error.unwrap_or_else(|| "Unknown error".to_owned()),
        ));
    }

    let Some(preview) = envelope.preview.filter(|text| !text.is_empty()) else {
        return Err(QuestError::Service(
            "upload returned no extracted text".to_owned(),
        ));
    };
    let content_length = envelope
        .content_length
        .unwrap_or_else(|| preview.chars().count() as u64);
    let label = format!(
        "PDF uploaded: {} ({content_length} characters)",
        document.file_name
    );

    source.set_from_extracted_source(&preview, &label);
    info!(content_length, "document ingested");

    Ok(UploadReceipt {
        label,
        content_length,
    })
}
