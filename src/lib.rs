//! # resume-ingest
//!
//! Turn uploaded resumes into plain text and best-effort structured fields.
//!
//! Documents arrive as bytes plus a declared MIME type. PDFs are read
//! natively and fall back to page-by-page OCR when they carry almost no
//! embedded text; Word documents are read from their OOXML container;
//! images go straight to OCR. The resulting text can then be run through
//! a heuristic parser that picks out contact details, skills, experience
//! and education.
//!
//! ## Quick Start
//!
//! ```no_run
//! use resume_ingest::{render, Document, Ingestor};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ingestor = Ingestor::from_env();
//!     let doc = Document::from_path("cv.pdf")?;
//!
//!     let extracted = ingestor.extract(&doc)?;
//!     println!("{} ({})", extracted.text, extracted.source_strategy);
//!
//!     let resume = resume_ingest::parse(&extracted.text);
//!     println!("{}", render::to_json(&resume, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## External tools
//!
//! OCR shells out to `tesseract`, and PDF pages are rasterized with
//! `pdftoppm` (Poppler). Both are optional: without them, scanned PDFs and
//! images simply yield no text.

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod ocr;
pub mod render;
pub mod resume;

// Re-export commonly used types
pub use detect::{mime_from_path, sniff_mime, DocumentFormat};
pub use error::{ExtractionError, NativeTextError, RasterizeError, Result};
pub use extract::{
    CancelToken, ExtractOptions, Ingestor, IngestorBuilder, NativeText, OcrBackend, TextExtractor,
};
pub use model::{
    Document, EducationEntry, ExperienceEntry, ExtractionResult, PageImage, ParsedResume,
    SourceStrategy,
};
pub use ocr::{ImageRecognizer, PageImages, PageRasterizer, RasterConfig};
pub use render::JsonFormat;

use std::sync::OnceLock;

fn shared_ingestor() -> &'static Ingestor {
    static INGESTOR: OnceLock<Ingestor> = OnceLock::new();
    INGESTOR.get_or_init(Ingestor::from_env)
}

/// Extract plain text from a buffer with a declared MIME type.
///
/// Uses a process-wide [`Ingestor`] configured from the environment on
/// first use.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("cv.pdf").unwrap();
/// let result = resume_ingest::extract(&data, "application/pdf").unwrap();
/// println!("{}", result.text);
/// ```
pub fn extract(data: &[u8], mime_type: &str) -> Result<ExtractionResult> {
    let document = Document::new(data, mime_type, "");
    shared_ingestor().extract(&document)
}

/// Recognize text in a single image.
///
/// Never fails; an empty string means nothing was recognized or OCR is
/// unavailable.
pub fn recognize_image(image: &[u8]) -> String {
    shared_ingestor().recognize_image(image)
}

/// Parse resume text into structured fields.
///
/// See [`resume::parse`].
pub fn parse(text: &str) -> ParsedResume {
    resume::parse(text)
}

/// Extract on the blocking thread pool.
///
/// Dropping the returned future cancels the extraction at the next OCR
/// batch boundary.
#[cfg(feature = "async")]
pub async fn extract_async(
    ingestor: std::sync::Arc<Ingestor>,
    document: Document,
) -> Result<ExtractionResult> {
    let cancel = CancelToken::new();
    let guard = cancel.drop_guard();

    let task =
        tokio::task::spawn_blocking(move || ingestor.extract_with_cancel(&document, &cancel));

    let result = match task.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(_) => Err(ExtractionError::Cancelled),
    };
    guard.disarm();
    result
}
