//! PDF text extraction (lopdf).

use super::{ExtractError, TextExtractor};
use crate::intake::DocumentKind;
use lopdf::Document;
use std::io::Cursor;
use tracing::debug;

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
        let doc = Document::load_from(Cursor::new(data))
            .map_err(|e| ExtractError::ReadFailed(format!("Failed to load PDF: {}", e)))?;

        // Pages without a usable text layer contribute an empty string.
        let pages: Vec<String> = doc
            .get_pages()
            .into_keys()
            .map(|page_num| match doc.extract_text(&[page_num]) {
                Ok(text) => text,
                Err(e) => {
                    debug!("No text on PDF page {}: {}", page_num, e);
                    String::new()
                }
            })
            .collect();

        debug!("PDF has {} pages", pages.len());
        Ok(pages.join("\n"))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;
    use crate::extract::extract_text;
    use crate::intake::UploadedDocument;

    fn upload(data: Vec<u8>) -> UploadedDocument {
        UploadedDocument {
            filename: "contract.pdf".to_string(),
            kind: DocumentKind::Pdf,
            data,
        }
    }

    #[test]
    fn test_pages_in_order() {
        let data = pdf_with_pages(&[Some("Supply agreement"), Some("Liability clause")]);
        let text = extract_text(&upload(data)).unwrap();

        let first = text.find("Supply agreement").unwrap();
        let second = text.find("Liability clause").unwrap();
        assert!(first < second);
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_blank_pages_skipped_over() {
        let data = pdf_with_pages(&[None, Some("Only page with text"), None]);
        let text = extract_text(&upload(data)).unwrap();
        assert_eq!(text, "Only page with text");
    }

    #[test]
    fn test_image_only_pdf_has_no_text() {
        let data = pdf_with_pages(&[None, None]);
        let err = extract_text(&upload(data)).unwrap_err();
        assert!(matches!(err, ExtractError::NoReadableText(DocumentKind::Pdf)));
    }

    #[test]
    fn test_truncated_pdf_fails_to_load() {
        let data = pdf_with_pages(&[Some("text")]);
        let err = PdfExtractor.extract(&data[..16]).unwrap_err();
        assert!(matches!(err, ExtractError::ReadFailed(_)));
    }
}
