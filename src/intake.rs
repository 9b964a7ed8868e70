//! Upload intake: pulls the `file` field out of a multipart request and checks
//! that it names a supported document type.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Multipart field that carries the document.
pub const FILE_FIELD: &str = "file";

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Resolve a kind from a filename's extension, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated upload. Lives only until its text has been extracted.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub kind: DocumentKind,
    pub data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("File is required.")]
    FileRequired,

    #[error("Unsupported file type.")]
    UnsupportedType,

    #[error("File is too large.")]
    TooLarge,

    #[error("Invalid upload: {0}")]
    Malformed(String),
}

impl From<MultipartError> for IntakeError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            IntakeError::TooLarge
        } else {
            IntakeError::Malformed(err.body_text())
        }
    }
}

/// Check a declared filename and return the document kind it names.
pub fn validate_filename(filename: Option<&str>) -> Result<DocumentKind, IntakeError> {
    let filename = filename.ok_or(IntakeError::FileRequired)?;
    if filename.is_empty() {
        return Err(IntakeError::FileRequired);
    }
    DocumentKind::from_filename(filename).ok_or(IntakeError::UnsupportedType)
}

/// Read the `file` field from a multipart body.
///
/// The filename is validated before the field body is read, so unsupported
/// uploads are rejected without buffering them.
pub async fn read_upload(multipart: &mut Multipart) -> Result<UploadedDocument, IntakeError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        // A part without a filename parameter is a plain form value, not a file.
        let Some(filename) = field.file_name().map(str::to_string) else {
            debug!("Skipping '{}' part without a filename", FILE_FIELD);
            continue;
        };
        let kind = validate_filename(Some(&filename))?;

        let data = field.bytes().await?.to_vec();

        debug!("Accepted upload field: {} ({}, {} bytes)", filename, kind, data.len());
        return Ok(UploadedDocument {
            filename,
            kind,
            data,
        });
    }

    Err(IntakeError::FileRequired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_filename("contract.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("Contract.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("lease.v2.DocX"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_filename("notes.txt"), None);
        assert_eq!(DocumentKind::from_filename("contract.doc"), None);
        assert_eq!(DocumentKind::from_filename("pdf"), None);
    }

    #[test]
    fn test_dotfile_has_no_extension() {
        assert_eq!(DocumentKind::from_filename(".pdf"), None);
    }

    #[test]
    fn test_missing_or_empty_filename() {
        assert!(matches!(validate_filename(None), Err(IntakeError::FileRequired)));
        assert!(matches!(validate_filename(Some("")), Err(IntakeError::FileRequired)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = validate_filename(Some("image.png")).unwrap_err();
        assert!(matches!(err, IntakeError::UnsupportedType));
        assert_eq!(err.to_string(), "Unsupported file type.");
    }
}
