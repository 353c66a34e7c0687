//! Text extraction: format-specific extractors and the orchestrator.

mod cancel;
mod docx;
mod ingestor;
mod options;
mod pdf;

pub use cancel::{CancelOnDrop, CancelToken};
pub use docx::DocxTextExtractor;
pub use ingestor::{Ingestor, IngestorBuilder};
pub use options::{
    ExtractOptions, OcrBackend, DEFAULT_FALLBACK_THRESHOLD, ENV_PREFIX, MAX_OCR_CONCURRENCY,
};
pub use pdf::PdfTextExtractor;

use crate::error::NativeTextError;

/// Text read directly from a document's structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeText {
    /// Extracted text, possibly empty
    pub text: String,
    /// Page count, for paged containers
    pub page_count: Option<u32>,
}

impl NativeText {
    /// Length of the text after trimming, in characters.
    pub fn trimmed_len(&self) -> usize {
        self.text.trim().chars().count()
    }
}

/// Reads embedded text out of one container format.
pub trait TextExtractor: Send + Sync {
    /// Extractor name, for logs.
    fn name(&self) -> &'static str;

    /// Extract plain text from a document buffer.
    fn extract(&self, data: &[u8]) -> Result<NativeText, NativeTextError>;
}
