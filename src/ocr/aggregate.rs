//! Per-page OCR over a rasterized document.

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::error::{ExtractionError, Result};
use crate::extract::CancelToken;
use crate::model::PageImage;

use super::{ImageRecognizer, PageImages};

/// Text recognized across all pages of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedPages {
    /// Page texts joined by newlines, in page order
    pub text: String,
    /// Pages the rasterizer produced
    pub page_count: u32,
    /// Pages that yielded any text
    pub recognized: u32,
}

/// Recognize every page, `batch_size` pages at a time.
///
/// Pages inside a batch run in parallel; at most one batch of rasters is
/// held in memory. Output is ordered by page index regardless of which
/// page finished first. Pages that recognize nothing are left out, so the
/// n-th line group of the text is not necessarily page n.
///
/// Cancellation is checked between batches and discards everything
/// recognized so far.
pub fn recognize_pages(
    pages: PageImages,
    recognizer: &dyn ImageRecognizer,
    language: &str,
    batch_size: usize,
    pool: Option<&ThreadPool>,
    cancel: &CancelToken,
) -> Result<RecognizedPages> {
    let page_count = pages.page_count();
    let batch_size = batch_size.max(1);
    let mut texts: Vec<(u32, String)> = Vec::with_capacity(page_count as usize);
    let mut pages = pages.peekable();

    while pages.peek().is_some() {
        if cancel.is_cancelled() {
            log::debug!("OCR cancelled after {} pages", texts.len());
            return Err(ExtractionError::Cancelled);
        }

        let batch: Vec<PageImage> = pages.by_ref().take(batch_size).collect();
        let run = || recognize_batch(&batch, recognizer, language);
        let results = match pool {
            Some(pool) => pool.install(run),
            None => run(),
        };
        texts.extend(results);
    }

    if cancel.is_cancelled() {
        return Err(ExtractionError::Cancelled);
    }

    Ok(join_pages(texts, page_count))
}

fn recognize_batch(
    batch: &[PageImage],
    recognizer: &dyn ImageRecognizer,
    language: &str,
) -> Vec<(u32, String)> {
    batch
        .par_iter()
        .map(|page| (page.index, recognizer.recognize(&page.pixels, language)))
        .collect()
}

fn join_pages(mut texts: Vec<(u32, String)>, page_count: u32) -> RecognizedPages {
    texts.sort_by_key(|(index, _)| *index);

    let parts: Vec<&str> = texts
        .iter()
        .map(|(_, text)| text.trim())
        .filter(|text| !text.is_empty())
        .collect();

    RecognizedPages {
        text: parts.join("\n"),
        page_count,
        recognized: parts.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    /// Decodes the page index from the pixel buffer and echoes it back.
    struct EchoRecognizer {
        calls: AtomicUsize,
    }

    impl ImageRecognizer for EchoRecognizer {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn recognize(&self, image: &[u8], _language: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let index = image[0];
            // Earlier pages finish later.
            thread::sleep(Duration::from_millis(u64::from(8 - index.min(8)) * 3));
            format!("page{}", index)
        }
    }

    fn pages(n: u8) -> PageImages {
        PageImages::from_pages((0..n).map(|i| PageImage::new(u32::from(i), vec![i])).collect())
    }

    #[test]
    fn test_pages_joined_in_index_order() {
        let recognizer = EchoRecognizer {
            calls: AtomicUsize::new(0),
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap();

        let result =
            recognize_pages(pages(6), &recognizer, "eng", 4, Some(&pool), &CancelToken::new())
                .unwrap();

        assert_eq!(result.text, "page0\npage1\npage2\npage3\npage4\npage5");
        assert_eq!(result.page_count, 6);
        assert_eq!(result.recognized, 6);
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_empty_sequence() {
        let recognizer = EchoRecognizer {
            calls: AtomicUsize::new(0),
        };
        let result =
            recognize_pages(PageImages::empty(), &recognizer, "eng", 2, None, &CancelToken::new())
                .unwrap();
        assert_eq!(result, RecognizedPages::default());
    }

    #[test]
    fn test_cancelled_before_first_batch() {
        let recognizer = EchoRecognizer {
            calls: AtomicUsize::new(0),
        };
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = recognize_pages(pages(3), &recognizer, "eng", 2, None, &cancel);
        assert!(matches!(result, Err(ExtractionError::Cancelled)));
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blank_pages_are_dropped() {
        let texts = vec![
            (2, "third".to_string()),
            (0, " first \n".to_string()),
            (1, "   ".to_string()),
        ];
        let result = join_pages(texts, 3);
        assert_eq!(result.text, "first\nthird");
        assert_eq!(result.recognized, 2);
    }
}
