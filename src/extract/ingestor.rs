//! Extraction orchestrator.

use std::sync::Arc;

use rayon::ThreadPool;

use crate::detect::DocumentFormat;
use crate::error::{ExtractionError, Result};
use crate::model::{Document, ExtractionResult, ParsedResume, SourceStrategy};
use crate::ocr::{
    recognize_pages, DisabledRecognizer, ImageRecognizer, PageRasterizer, PdftoppmRasterizer,
    RecognizedPages, TesseractRecognizer,
};
use crate::resume;

use super::{
    CancelToken, DocxTextExtractor, ExtractOptions, NativeText, OcrBackend, PdfTextExtractor,
    TextExtractor,
};

/// Turns uploaded documents into plain text, and text into resumes.
///
/// Backends are fixed when the ingestor is built. One ingestor can serve
/// any number of concurrent calls; calls share no mutable state.
///
/// # Example
///
/// ```no_run
/// use resume_ingest::{Document, Ingestor};
///
/// let ingestor = Ingestor::from_env();
/// let doc = Document::from_path("cv.pdf")?;
/// let resume = ingestor.ingest(&doc)?;
/// println!("{:?}", resume.email);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Ingestor {
    options: ExtractOptions,
    pdf: Arc<dyn TextExtractor>,
    word: Arc<dyn TextExtractor>,
    recognizer: Arc<dyn ImageRecognizer>,
    rasterizer: Arc<dyn PageRasterizer>,
    pool: Option<ThreadPool>,
}

impl Ingestor {
    /// Create an ingestor with default options.
    pub fn new() -> Self {
        Self::from_options(ExtractOptions::default())
    }

    /// Create an ingestor configured from the environment.
    pub fn from_env() -> Self {
        Self::from_options(ExtractOptions::from_env())
    }

    /// Create an ingestor with the given options and default backends.
    pub fn from_options(options: ExtractOptions) -> Self {
        Self::builder().options(options).build()
    }

    /// Start building an ingestor with custom backends.
    pub fn builder() -> IngestorBuilder {
        IngestorBuilder::default()
    }

    /// Options in effect.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Name of the OCR backend in use.
    pub fn recognizer_name(&self) -> &'static str {
        self.recognizer.name()
    }

    /// Extract plain text from a document.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::UnsupportedFormat`] for an unrecognized MIME type
    /// - [`ExtractionError::MalformedDocument`] for an unreadable Word container
    /// - [`ExtractionError::NoExtractableText`] when every strategy came up empty
    pub fn extract(&self, document: &Document) -> Result<ExtractionResult> {
        self.extract_with_cancel(document, &CancelToken::new())
    }

    /// Extract plain text, aborting if `cancel` fires during OCR.
    pub fn extract_with_cancel(
        &self,
        document: &Document,
        cancel: &CancelToken,
    ) -> Result<ExtractionResult> {
        let format = DocumentFormat::from_mime(document.mime_type())?;
        log::debug!(
            "Extracting {} ({} bytes) as {}",
            document.filename(),
            document.len(),
            format
        );

        let result = match format {
            DocumentFormat::Pdf => self.extract_pdf(document.data(), cancel)?,
            DocumentFormat::Word => self.extract_word(document.data())?,
            DocumentFormat::Image => {
                ExtractionResult::new(self.recognize_image(document.data()), SourceStrategy::Ocr)
            }
        };

        if cancel.is_cancelled() {
            return Err(ExtractionError::Cancelled);
        }
        if result.text.trim().is_empty() {
            log::debug!("No text from {} after all strategies", document.filename());
            return Err(ExtractionError::NoExtractableText);
        }

        Ok(result)
    }

    /// Extract a document and parse it into resume fields.
    pub fn ingest(&self, document: &Document) -> Result<ParsedResume> {
        let extracted = self.extract(document)?;
        Ok(resume::parse(&extracted.text))
    }

    /// Recognize a single image with the configured language.
    ///
    /// Never fails; an empty string means nothing was recognized.
    pub fn recognize_image(&self, image: &[u8]) -> String {
        self.recognizer.recognize(image, &self.options.ocr_language)
    }

    fn extract_pdf(&self, data: &[u8], cancel: &CancelToken) -> Result<ExtractionResult> {
        let native = match self.pdf.extract(data) {
            Ok(native) => native,
            Err(e) => {
                log::warn!("Native PDF extraction failed, continuing with no text: {}", e);
                NativeText::default()
            }
        };

        let native_len = native.trimmed_len();
        if native_len >= self.options.fallback_threshold {
            return Ok(ExtractionResult::new(native.text, SourceStrategy::Native)
                .with_page_count(native.page_count));
        }

        log::info!(
            "Native PDF text too short ({} < {} chars), trying OCR",
            native_len,
            self.options.fallback_threshold
        );

        match self.ocr_fallback(data, cancel)? {
            Some(pages) if !pages.text.trim().is_empty() => {
                let page_count = native.page_count.or(Some(pages.page_count));
                Ok(ExtractionResult::new(pages.text, SourceStrategy::OcrFallback)
                    .with_page_count(page_count))
            }
            _ => Ok(ExtractionResult::new(native.text, SourceStrategy::Native)
                .with_page_count(native.page_count)),
        }
    }

    /// Rasterize and recognize every page.
    ///
    /// `Ok(None)` means the fallback contributed nothing; only
    /// cancellation is an error here.
    fn ocr_fallback(&self, data: &[u8], cancel: &CancelToken) -> Result<Option<RecognizedPages>> {
        if !self.recognizer.is_available() {
            log::warn!("OCR backend unavailable, skipping fallback");
            return Ok(None);
        }

        let pages = match self.rasterizer.rasterize(data) {
            Ok(pages) => pages,
            Err(e) => {
                log::warn!("{} could not rasterize PDF: {}", self.rasterizer.name(), e);
                return Ok(None);
            }
        };

        let recognized = recognize_pages(
            pages,
            self.recognizer.as_ref(),
            &self.options.ocr_language,
            self.options.ocr_concurrency,
            self.pool.as_ref(),
            cancel,
        )?;
        log::info!(
            "OCR recognized text on {} of {} pages",
            recognized.recognized,
            recognized.page_count
        );

        Ok(Some(recognized))
    }

    fn extract_word(&self, data: &[u8]) -> Result<ExtractionResult> {
        let native = self
            .word
            .extract(data)
            .map_err(|e| ExtractionError::MalformedDocument(e.to_string()))?;
        Ok(ExtractionResult::new(native.text, SourceStrategy::Native))
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Ingestor`] with injectable backends.
#[derive(Default)]
pub struct IngestorBuilder {
    options: ExtractOptions,
    pdf: Option<Arc<dyn TextExtractor>>,
    word: Option<Arc<dyn TextExtractor>>,
    recognizer: Option<Arc<dyn ImageRecognizer>>,
    rasterizer: Option<Arc<dyn PageRasterizer>>,
}

impl IngestorBuilder {
    /// Set the options.
    pub fn options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a custom PDF text extractor.
    pub fn pdf_extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.pdf = Some(Arc::new(extractor));
        self
    }

    /// Use a custom Word text extractor.
    pub fn word_extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.word = Some(Arc::new(extractor));
        self
    }

    /// Use a custom OCR backend.
    pub fn recognizer(mut self, recognizer: impl ImageRecognizer + 'static) -> Self {
        self.recognizer = Some(Arc::new(recognizer));
        self
    }

    /// Use a custom page rasterizer.
    pub fn rasterizer(mut self, rasterizer: impl PageRasterizer + 'static) -> Self {
        self.rasterizer = Some(Arc::new(rasterizer));
        self
    }

    /// Build the ingestor, selecting default backends where none were given.
    pub fn build(self) -> Ingestor {
        let options = self.options;
        let recognizer = self
            .recognizer
            .unwrap_or_else(|| default_recognizer(&options));
        let rasterizer = self.rasterizer.unwrap_or_else(|| {
            Arc::new(
                PdftoppmRasterizer::new(&options.pdftoppm_path)
                    .with_config(options.raster)
                    .with_timeout(options.raster_timeout),
            )
        });
        let pool = build_pool(options.ocr_concurrency);

        log::debug!(
            "Ingestor ready: ocr={}, rasterizer={}, concurrency={}",
            recognizer.name(),
            rasterizer.name(),
            options.ocr_concurrency
        );

        Ingestor {
            pdf: self.pdf.unwrap_or_else(|| Arc::new(PdfTextExtractor::new())),
            word: self.word.unwrap_or_else(|| Arc::new(DocxTextExtractor::new())),
            recognizer,
            rasterizer,
            pool,
            options,
        }
    }
}

fn default_recognizer(options: &ExtractOptions) -> Arc<dyn ImageRecognizer> {
    match options.ocr_backend {
        OcrBackend::Disabled => Arc::new(DisabledRecognizer),
        OcrBackend::Tesseract => {
            let tesseract =
                TesseractRecognizer::new(&options.tesseract_path).with_timeout(options.ocr_timeout);
            if tesseract.probe() {
                Arc::new(tesseract)
            } else {
                log::warn!(
                    "{} is not available; OCR is disabled",
                    options.tesseract_path.display()
                );
                Arc::new(DisabledRecognizer)
            }
        }
    }
}

fn build_pool(threads: usize) -> Option<ThreadPool> {
    if threads <= 1 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("ocr-{}", i))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(e) => {
            log::warn!("Could not start OCR thread pool, using global pool: {}", e);
            None
        }
    }
}
