//! Error types for resume-ingest.
//!
//! Each stage boundary has its own error type. Only [`ExtractionError`]
//! ever reaches a caller; the stage errors are either mapped into it or
//! recovered locally by the orchestrator.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors surfaced by an ingestion call.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The declared MIME type is not a PDF, Word document or image.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The document container could not be read.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Every strategy ran and nothing usable came out.
    #[error("No extractable text found in document")]
    NoExtractableText,

    /// The surrounding call was cancelled before extraction finished.
    #[error("Extraction cancelled")]
    Cancelled,

    /// Error serializing a result (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),
}

/// Failure of a native text extractor (PDF or Word).
#[derive(Error, Debug)]
pub enum NativeTextError {
    /// I/O error while reading the container.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The PDF structure could not be parsed.
    #[error("PDF parsing error: {0}")]
    Pdf(String),

    /// The OOXML zip container could not be opened.
    #[error("Zip container error: {0}")]
    Zip(String),

    /// A container part held invalid XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// A required container part is missing.
    #[error("Missing document part: {0}")]
    MissingPart(String),
}

impl From<lopdf::Error> for NativeTextError {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => NativeTextError::Io(e),
            _ => NativeTextError::Pdf(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for NativeTextError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => NativeTextError::Io(e),
            zip::result::ZipError::FileNotFound => {
                NativeTextError::MissingPart("word/document.xml".to_string())
            }
            _ => NativeTextError::Zip(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for NativeTextError {
    fn from(err: quick_xml::Error) -> Self {
        NativeTextError::Xml(err.to_string())
    }
}

/// Failure of the page rasterizer to open a PDF.
#[derive(Error, Debug)]
pub enum RasterizeError {
    /// I/O error writing scratch files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The buffer could not be opened as a PDF at all.
    #[error("Cannot open PDF for rasterization: {0}")]
    Open(String),

    /// The rasterization backend failed.
    #[error("Rasterization backend failed: {0}")]
    Backend(String),
}

/// Failure running an external backend process.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The program could not be started.
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program did not finish in time and was killed.
    #[error("{program} timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },

    /// The program exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// I/O error while talking to the program.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<ProcessError> for RasterizeError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Io(e) => RasterizeError::Io(e),
            other => RasterizeError::Backend(other.to_string()),
        }
    }
}
