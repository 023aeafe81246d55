//! Result types returned by extraction and combine runs.

use crate::error::PageFileError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary of one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub pdf_path: PathBuf,
    pub output_dir: PathBuf,
    /// Number of page files written. Equals the document's page count.
    pub pages_processed: usize,
    /// Written files in page order.
    pub page_files: Vec<PathBuf>,
    pub render_duration_ms: u64,
    /// Time spent in preprocessing, OCR and writing.
    pub ocr_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Summary of one combine run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombineReport {
    pub combined_path: PathBuf,
    /// Page files whose content made it into the combined document.
    pub pages_combined: usize,
    /// Page files that could not be read and were left out.
    pub skipped: Vec<PageFileError>,
}

impl CombineReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}
