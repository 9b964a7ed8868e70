//! Plain-text extraction from uploaded documents.
//!
//! Defines the [`TextExtractor`] trait and dispatches on [`DocumentKind`], so
//! each format backend only has to turn bytes into raw text. Emptiness checks
//! and trimming are shared here.

pub mod docx;
pub mod pdf;

use crate::intake::{DocumentKind, UploadedDocument};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("The uploaded file is empty.")]
    EmptyUpload,

    /// The document parsed, but had no text layer.
    #[error("No readable text found in the {0} document.")]
    NoReadableText(DocumentKind),

    /// The parser rejected the file.
    #[error("Failed to read document: {0}")]
    ReadFailed(String),
}

/// Implemented by each document format backend.
pub trait TextExtractor: Send + Sync {
    fn kind(&self) -> DocumentKind;

    /// Return the raw (untrimmed) text of the document.
    fn extract(&self, data: &[u8]) -> Result<String, ExtractError>;
}

/// Backend for a document kind.
pub fn extractor_for(kind: DocumentKind) -> &'static dyn TextExtractor {
    match kind {
        DocumentKind::Pdf => &pdf::PdfExtractor,
        DocumentKind::Docx => &docx::DocxExtractor,
    }
}

/// Extract trimmed, non-empty text from an upload.
pub fn extract_text(document: &UploadedDocument) -> Result<String, ExtractError> {
    if document.data.is_empty() {
        return Err(ExtractError::EmptyUpload);
    }

    let raw = extractor_for(document.kind).extract(&document.data)?;
    let text = raw.trim();
    if text.is_empty() {
        return Err(ExtractError::NoReadableText(document.kind));
    }

    info!(
        "Extracted {} chars from {} ({})",
        text.chars().count(),
        document.filename,
        document.kind
    );
    Ok(text.to_string())
}
