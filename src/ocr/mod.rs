//! Optical character recognition and page rasterization.
//!
//! Backends are capability traits with a small closed set of
//! implementations, chosen once at startup:
//!
//! - [`ImageRecognizer`]: [`TesseractRecognizer`] or [`DisabledRecognizer`]
//! - [`PageRasterizer`]: [`PdftoppmRasterizer`]
//!
//! Recognizers never fail past their boundary. Any backend problem
//! (missing binary, corrupt image, timeout) comes back as an empty string.

mod aggregate;
mod process;
mod raster;
mod tesseract;

pub use aggregate::{recognize_pages, RecognizedPages};
pub use raster::{PageImages, PageRasterizer, PdftoppmRasterizer, RasterConfig, DEFAULT_RASTER_TIMEOUT};
pub use tesseract::{TesseractRecognizer, DEFAULT_OCR_TIMEOUT};

/// Language hint used when none is given.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Converts a single raster image into text.
pub trait ImageRecognizer: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &'static str;

    /// Recognize text in an encoded image.
    ///
    /// Returns an empty string when nothing was recognized or the backend
    /// failed.
    fn recognize(&self, image: &[u8], language: &str) -> String;

    /// Whether this backend can produce any text at all.
    fn is_available(&self) -> bool {
        true
    }
}

/// Recognizer used when no OCR backend is configured or installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRecognizer;

impl ImageRecognizer for DisabledRecognizer {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn recognize(&self, _image: &[u8], _language: &str) -> String {
        String::new()
    }

    fn is_available(&self) -> bool {
        false
    }
}
