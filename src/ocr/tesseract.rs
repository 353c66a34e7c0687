//! Tesseract command-line backend.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::error::ProcessError;

use super::process;
use super::{ImageRecognizer, DEFAULT_LANGUAGE};

/// Default time allowed for a single recognition.
pub const DEFAULT_OCR_TIMEOUT: Duration = Duration::from_secs(60);

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// [`ImageRecognizer`] that shells out to the `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: PathBuf,
    timeout: Duration,
}

impl TesseractRecognizer {
    /// Create a recognizer for the given binary path.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: DEFAULT_OCR_TIMEOUT,
        }
    }

    /// Set the per-image timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path of the binary.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Check whether the binary can be executed.
    pub fn probe(&self) -> bool {
        process::probe(&self.binary, "--version", PROBE_TIMEOUT)
    }

    fn try_recognize(&self, image: &[u8], language: &str) -> Result<String, ProcessError> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("page");
        fs::write(&input, image)?;

        let mut command = Command::new(&self.binary);
        command.arg(&input).arg("stdout").arg("-l").arg(language);

        let output = process::run(command, self.timeout)?;
        Ok(clean_output(&output.stdout))
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl ImageRecognizer for TesseractRecognizer {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &[u8], language: &str) -> String {
        if image.is_empty() {
            return String::new();
        }
        let language = if language.trim().is_empty() {
            DEFAULT_LANGUAGE
        } else {
            language.trim()
        };

        match self.try_recognize(image, language) {
            Ok(text) => {
                log::debug!(
                    "Recognized {} characters from {} byte image",
                    text.len(),
                    image.len()
                );
                text
            }
            Err(e) => {
                log::warn!("OCR failed, treating image as blank: {}", e);
                String::new()
            }
        }
    }
}

/// Strip the page-separator form feed tesseract appends.
fn clean_output(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .replace('\u{000C}', "")
        .trim_end()
        .to_string()
}
