//! Document format resolution and MIME detection.

use std::fmt;
use std::path::Path;

use crate::error::{ExtractionError, Result};

/// MIME type for PDF documents.
pub const MIME_PDF: &str = "application/pdf";
/// MIME type for OOXML Word documents (.docx).
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type for legacy Word documents (.doc).
pub const MIME_MSWORD: &str = "application/msword";

/// Supported container formats, resolved once from a declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// PDF document
    Pdf,
    /// Word document
    Word,
    /// Any raster image
    Image,
}

impl DocumentFormat {
    /// Resolve a format from a declared MIME type.
    ///
    /// Case and parameters (`; charset=...`) are ignored.
    ///
    /// # Returns
    /// * `Err(ExtractionError::UnsupportedFormat)` for anything that is not
    ///   a PDF, a Word document or an `image/*` type
    pub fn from_mime(mime: &str) -> Result<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            MIME_PDF => Ok(Self::Pdf),
            MIME_DOCX | MIME_MSWORD => Ok(Self::Word),
            m if m.starts_with("image/") && m.len() > "image/".len() => Ok(Self::Image),
            _ => Err(ExtractionError::UnsupportedFormat(mime.to_string())),
        }
    }

    /// Short lowercase name, used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xFF\xD8\xFF";
const TIFF_LE_MAGIC: &[u8] = b"II*\x00";
const TIFF_BE_MAGIC: &[u8] = b"MM\x00*";

/// Guess a MIME type from the leading bytes of a buffer.
///
/// Zip containers are assumed to be Word documents.
pub fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(PDF_MAGIC) {
        Some(MIME_PDF)
    } else if data.starts_with(ZIP_MAGIC) {
        Some(MIME_DOCX)
    } else if data.starts_with(PNG_MAGIC) {
        Some("image/png")
    } else if data.starts_with(JPEG_MAGIC) {
        Some("image/jpeg")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if data.starts_with(TIFF_LE_MAGIC) || data.starts_with(TIFF_BE_MAGIC) {
        Some("image/tiff")
    } else if data.starts_with(b"BM") && data.len() >= 14 {
        Some("image/bmp")
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Guess a MIME type from a file extension.
pub fn mime_from_path<P: AsRef<Path>>(path: P) -> Option<&'static str> {
    let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => MIME_PDF,
        "docx" => MIME_DOCX,
        "doc" => MIME_MSWORD,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime)
}
