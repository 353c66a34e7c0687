//! Extraction options and configuration.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::ocr::{RasterConfig, DEFAULT_LANGUAGE, DEFAULT_OCR_TIMEOUT, DEFAULT_RASTER_TIMEOUT};

/// Trimmed native-text length below which a PDF is treated as scanned.
pub const DEFAULT_FALLBACK_THRESHOLD: usize = 20;

/// Upper bound on pages recognized in parallel.
pub const MAX_OCR_CONCURRENCY: usize = 4;

/// Prefix of every recognized environment variable.
pub const ENV_PREFIX: &str = "RESUME_INGEST_";

/// OCR backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OcrBackend {
    /// Tesseract command-line tool
    #[default]
    Tesseract,
    /// No OCR; every recognition yields an empty string
    Disabled,
}

impl FromStr for OcrBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tesseract" => Ok(Self::Tesseract),
            "none" | "disabled" | "off" => Ok(Self::Disabled),
            other => Err(format!("unknown OCR backend: {}", other)),
        }
    }
}

/// Options for building an [`Ingestor`](super::Ingestor).
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Trimmed native-text length that triggers the OCR fallback
    pub fallback_threshold: usize,

    /// Language hint passed to the OCR backend
    pub ocr_language: String,

    /// Which OCR backend to use
    pub ocr_backend: OcrBackend,

    /// Path of the tesseract binary
    pub tesseract_path: PathBuf,

    /// Path of the pdftoppm binary
    pub pdftoppm_path: PathBuf,

    /// Time allowed per OCR call
    pub ocr_timeout: Duration,

    /// Time allowed for rasterizing a document
    pub raster_timeout: Duration,

    /// Page raster resolution
    pub raster: RasterConfig,

    /// Pages recognized in parallel
    pub ocr_concurrency: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            ocr_language: DEFAULT_LANGUAGE.to_string(),
            ocr_backend: OcrBackend::default(),
            tesseract_path: PathBuf::from("tesseract"),
            pdftoppm_path: PathBuf::from("pdftoppm"),
            ocr_timeout: DEFAULT_OCR_TIMEOUT,
            raster_timeout: DEFAULT_RASTER_TIMEOUT,
            raster: RasterConfig::default(),
            ocr_concurrency: default_concurrency(),
        }
    }
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from `RESUME_INGEST_*` environment variables.
    ///
    /// Unset variables keep their defaults. Unparsable values are logged
    /// and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read options through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        let get = |name: &str| {
            let key = format!("{}{}", ENV_PREFIX, name);
            lookup(&key).map(|value| (key, value))
        };

        if let Some(v) = parse_var::<OcrBackend>(get("OCR_BACKEND")) {
            options.ocr_backend = v;
        }
        if let Some((_, v)) = get("OCR_LANG") {
            if !v.trim().is_empty() {
                options.ocr_language = v.trim().to_string();
            }
        }
        if let Some((_, v)) = get("TESSERACT") {
            options.tesseract_path = PathBuf::from(v);
        }
        if let Some((_, v)) = get("PDFTOPPM") {
            options.pdftoppm_path = PathBuf::from(v);
        }
        if let Some(secs) = parse_var::<u64>(get("OCR_TIMEOUT_SECS")) {
            options.ocr_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(get("RASTER_TIMEOUT_SECS")) {
            options.raster_timeout = Duration::from_secs(secs);
        }
        if let Some(dpi) = parse_var::<u32>(get("RASTER_DPI")) {
            options.raster.density_dpi = dpi;
        }
        if let Some(max) = parse_var::<u32>(get("RASTER_MAX_DIM")) {
            options.raster.max_dimension = max;
        }
        if let Some(threshold) = parse_var::<usize>(get("FALLBACK_THRESHOLD")) {
            options.fallback_threshold = threshold;
        }
        if let Some(n) = parse_var::<usize>(get("OCR_CONCURRENCY")) {
            options.ocr_concurrency = n.max(1);
        }

        options
    }

    /// Set the fallback threshold.
    pub fn with_fallback_threshold(mut self, chars: usize) -> Self {
        self.fallback_threshold = chars;
        self
    }

    /// Set the OCR language hint.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = language.into();
        self
    }

    /// Set the OCR backend.
    pub fn with_ocr_backend(mut self, backend: OcrBackend) -> Self {
        self.ocr_backend = backend;
        self
    }

    /// Disable OCR entirely.
    pub fn without_ocr(self) -> Self {
        self.with_ocr_backend(OcrBackend::Disabled)
    }

    /// Set the tesseract binary path.
    pub fn with_tesseract_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tesseract_path = path.into();
        self
    }

    /// Set the pdftoppm binary path.
    pub fn with_pdftoppm_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdftoppm_path = path.into();
        self
    }

    /// Set the per-call OCR timeout.
    pub fn with_ocr_timeout(mut self, timeout: Duration) -> Self {
        self.ocr_timeout = timeout;
        self
    }

    /// Set the rasterization timeout.
    pub fn with_raster_timeout(mut self, timeout: Duration) -> Self {
        self.raster_timeout = timeout;
        self
    }

    /// Set the raster resolution.
    pub fn with_raster(mut self, raster: RasterConfig) -> Self {
        self.raster = raster;
        self
    }

    /// Set how many pages are recognized in parallel.
    pub fn with_ocr_concurrency(mut self, n: usize) -> Self {
        self.ocr_concurrency = n.max(1);
        self
    }

    /// Recognize pages one at a time.
    pub fn sequential(self) -> Self {
        self.with_ocr_concurrency(1)
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, MAX_OCR_CONCURRENCY)
}

fn parse_var<T: FromStr>(entry: Option<(String, String)>) -> Option<T> {
    let (key, value) = entry?;
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring invalid value for {}: {:?}", key, value);
            None
        }
    }
}
