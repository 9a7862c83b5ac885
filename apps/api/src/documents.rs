//! Uploaded document to plain text.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document could not be parsed: {0}")]
    Unreadable(String),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// `Ok("")` means the document parsed but holds no text (e.g. a scanned image).
    async fn extract_text(&self, document: Bytes) -> Result<String, DocumentError>;
}

/// `pdf-extract` on the blocking pool. The parser can panic on hostile input; a
/// panicked task is reported as an unreadable document.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, document: Bytes) -> Result<String, DocumentError> {
        let parsed = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&document)
                .map_err(|e| DocumentError::Unreadable(e.to_string()))
        })
        .await
        .map_err(|e| {
            warn!("PDF parser task failed: {e}");
            DocumentError::Unreadable("parser aborted".to_string())
        })??;

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_is_unreadable() {
        let err = PdfTextExtractor
            .extract_text(Bytes::from_static(b"definitely not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Unreadable(_)));
    }
}
