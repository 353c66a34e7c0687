//! PDF page rasterization.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tempfile::TempDir;

use crate::error::{ProcessError, RasterizeError};
use crate::model::PageImage;

use super::process;

/// Default time allowed for rasterizing a whole document.
pub const DEFAULT_RASTER_TIMEOUT: Duration = Duration::from_secs(120);

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const PAGE_PREFIX: &str = "page";

/// Fixed raster resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterConfig {
    /// Rendering density in dots per inch, used when `max_dimension` is 0
    pub density_dpi: u32,
    /// Long side of every page, in pixels. pdftoppm scales each page to
    /// exactly this size and ignores `density_dpi`. 0 disables it.
    pub max_dimension: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        // A4 at 300 DPI is 2480x3508.
        Self {
            density_dpi: 300,
            max_dimension: 3508,
        }
    }
}

/// Converts a PDF buffer into page images.
pub trait PageRasterizer: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &'static str;

    /// Rasterize every page, in document order.
    ///
    /// Zero pages is not an error. Failing to open the buffer is.
    fn rasterize(&self, pdf: &[u8]) -> Result<PageImages, RasterizeError>;
}

/// Lazy, finite, single-pass sequence of rasterized pages.
pub struct PageImages {
    pages: Box<dyn Iterator<Item = PageImage> + Send>,
    page_count: u32,
}

impl PageImages {
    /// Wrap an iterator that will yield `page_count` pages.
    pub fn new<I>(pages: I, page_count: u32) -> Self
    where
        I: Iterator<Item = PageImage> + Send + 'static,
    {
        Self {
            pages: Box::new(pages),
            page_count,
        }
    }

    /// Build from already-rendered pages.
    pub fn from_pages(pages: Vec<PageImage>) -> Self {
        let count = pages.len() as u32;
        Self::new(pages.into_iter(), count)
    }

    /// A sequence with no pages.
    pub fn empty() -> Self {
        Self::new(std::iter::empty(), 0)
    }

    /// Number of pages the rasterizer produced.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }
}

impl Iterator for PageImages {
    type Item = PageImage;

    fn next(&mut self) -> Option<PageImage> {
        self.pages.next()
    }
}

/// [`PageRasterizer`] backed by Poppler's `pdftoppm`.
///
/// All pages are rendered into a scratch directory in one call. Pixels are
/// loaded one page at a time as the sequence is consumed, and the directory
/// is removed when the sequence is dropped.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: PathBuf,
    config: RasterConfig,
    timeout: Duration,
}

impl PdftoppmRasterizer {
    /// Create a rasterizer for the given binary path.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            config: RasterConfig::default(),
            timeout: DEFAULT_RASTER_TIMEOUT,
        }
    }

    /// Set the raster resolution.
    pub fn with_config(mut self, config: RasterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the whole-document timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check whether the binary can be executed.
    pub fn probe(&self) -> bool {
        process::probe(&self.binary, "-v", PROBE_TIMEOUT)
    }

    fn command(&self, input: &Path, output_root: &Path) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("-png")
            .arg("-r")
            .arg(self.config.density_dpi.to_string());
        if self.config.max_dimension > 0 {
            command
                .arg("-scale-to")
                .arg(self.config.max_dimension.to_string());
        }
        command.arg(input).arg(output_root);
        command
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn name(&self) -> &'static str {
        "pdftoppm"
    }

    fn rasterize(&self, pdf: &[u8]) -> Result<PageImages, RasterizeError> {
        if pdf.is_empty() {
            return Err(RasterizeError::Open("empty buffer".to_string()));
        }

        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("input.pdf");
        fs::write(&input, pdf)?;

        let output_root = scratch.path().join(PAGE_PREFIX);
        match process::run(self.command(&input, &output_root), self.timeout) {
            Ok(_) => {}
            // A non-zero exit means poppler could not open the document.
            Err(ProcessError::Failed { stderr, .. }) => return Err(RasterizeError::Open(stderr)),
            Err(e) => return Err(e.into()),
        }

        let files = page_files(scratch.path())?;
        log::debug!("Rasterized {} pages", files.len());
        let count = files.len() as u32;
        Ok(PageImages::new(ScratchPages::new(scratch, files), count))
    }
}

/// Lists rendered page files sorted by page number.
///
/// pdftoppm names pages `page-1.png` or `page-01.png` depending on the
/// page count, so a lexical sort is not enough.
fn page_files(dir: &Path) -> Result<Vec<PathBuf>, RasterizeError> {
    let mut pages: Vec<(u32, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter_map(|path| page_number(&path).map(|n| (n, path)))
        .collect();
    pages.sort_by_key(|(n, _)| *n);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let number = stem.strip_prefix(PAGE_PREFIX)?.strip_prefix('-')?;
    number.parse().ok()
}

/// Iterator that owns the scratch directory for its lifetime.
struct ScratchPages {
    _scratch: TempDir,
    files: std::vec::IntoIter<PathBuf>,
    next_index: u32,
}

impl ScratchPages {
    fn new(scratch: TempDir, files: Vec<PathBuf>) -> Self {
        Self {
            _scratch: scratch,
            files: files.into_iter(),
            next_index: 0,
        }
    }
}

impl Iterator for ScratchPages {
    type Item = PageImage;

    fn next(&mut self) -> Option<PageImage> {
        loop {
            let path = self.files.next()?;
            let index = self.next_index;
            self.next_index += 1;

            match fs::read(&path) {
                Ok(pixels) => {
                    // Free disk space as soon as the page is in memory.
                    let _ = fs::remove_file(&path);
                    return Some(PageImage::new(index, pixels));
                }
                Err(e) => log::warn!("Skipping page {}: {}", index, e),
            }
        }
    }
}
