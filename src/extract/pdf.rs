//! Native PDF text extraction using lopdf.

use lopdf::Document as LopdfDocument;

use crate::error::NativeTextError;

use super::{NativeText, TextExtractor};

/// [`TextExtractor`] that reads text embedded in PDF content streams.
///
/// Pages that fail to decode are skipped with a warning; only a document
/// that cannot be loaded at all is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extract(&self, data: &[u8]) -> Result<NativeText, NativeTextError> {
        let doc = LopdfDocument::load_mem(data)?;

        if doc.is_encrypted() {
            log::warn!("PDF is encrypted; embedded text may be unreadable");
        }

        let pages = doc.get_pages();
        let page_count = pages.len() as u32;
        let mut parts = Vec::with_capacity(pages.len());

        for page_num in pages.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(text) => {
                    let text = text.trim_end();
                    if !text.is_empty() {
                        parts.push(text.to_string());
                    }
                }
                Err(e) => log::warn!("Failed to extract text from page {}: {}", page_num, e),
            }
        }

        log::debug!(
            "Native PDF extraction: {} of {} pages had text",
            parts.len(),
            page_count
        );

        Ok(NativeText {
            text: parts.join("\n"),
            page_count: Some(page_count),
        })
    }
}
