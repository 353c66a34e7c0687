//! Input document and extraction output types.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::detect::{mime_from_path, sniff_mime};

/// MIME type used when neither the extension nor the content is recognized.
pub const MIME_UNKNOWN: &str = "application/octet-stream";

/// An uploaded document: raw bytes plus the declared MIME type.
///
/// Immutable once built; the orchestrator borrows it for one ingestion call.
#[derive(Debug, Clone)]
pub struct Document {
    data: Vec<u8>,
    mime_type: String,
    filename: String,
}

impl Document {
    /// Create a document from a buffer and its declared MIME type.
    pub fn new(
        data: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
            filename: filename.into(),
        }
    }

    /// Read a document from disk.
    ///
    /// The MIME type is guessed from the extension first, then from the
    /// leading bytes. Unrecognized files get `application/octet-stream`
    /// and will be rejected as unsupported during extraction.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let mime = mime_from_path(path)
            .or_else(|| sniff_mime(&data))
            .unwrap_or(MIME_UNKNOWN);
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(data, mime, filename))
    }

    /// Replace the declared MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Raw document bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Declared MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Original filename (may be empty).
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Which strategy produced the final text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceStrategy {
    /// Text embedded in the document structure
    Native,
    /// OCR was the only strategy (raster images)
    Ocr,
    /// Native text was insufficient and rasterized pages were recognized
    OcrFallback,
}

impl SourceStrategy {
    /// Name as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Ocr => "ocr",
            Self::OcrFallback => "ocr-fallback",
        }
    }
}

impl std::fmt::Display for SourceStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified plain text produced by one extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Extracted text; empty, never absent, when nothing was recognized
    pub text: String,

    /// Strategy that produced `text`
    pub source_strategy: SourceStrategy,

    /// Number of pages, when the container has pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

impl ExtractionResult {
    /// Create a result without page information.
    pub fn new(text: impl Into<String>, source_strategy: SourceStrategy) -> Self {
        Self {
            text: text.into(),
            source_strategy,
            page_count: None,
        }
    }

    /// Set the page count.
    pub fn with_page_count(mut self, page_count: Option<u32>) -> Self {
        self.page_count = page_count;
        self
    }

    /// Count whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A single rasterized page.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Zero-based page index in document order
    pub index: u32,

    /// Encoded raster (PNG)
    pub pixels: Vec<u8>,
}

impl PageImage {
    /// Create a page image.
    pub fn new(index: u32, pixels: Vec<u8>) -> Self {
        Self { index, pixels }
    }
}
