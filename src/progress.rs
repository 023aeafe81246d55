//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`]. Pages are
//! processed strictly one after another, so events for page `n + 1` never
//! arrive before `on_page_complete` for page `n`.

use std::sync::Arc;

/// Called by the extraction pipeline as it processes each page.
///
/// All methods default to no-ops.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after rasterisation, before the first page is recognised.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before preprocessing and OCR of a page (1-indexed).
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after the page's text file has been written.
    ///
    /// `text_len` is the byte length of the recognised text.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called once after the last page file is written.
    fn on_extraction_complete(&self, pages_processed: usize) {
        let _ = pages_processed;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
