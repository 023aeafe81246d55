//! # edgequake-pdf2txt
//!
//! Extract plain text from scanned PDFs: rasterise every page with pdfium,
//! clean the bitmap up for OCR, recognise it with Tesseract and write one
//! text file per page. Optionally concatenate the pages into one document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input       validate path and %PDF header
//!  ├─ 2. Render      rasterise all pages via pdfium (spawn_blocking)
//!  ├─ 3. Preprocess  grayscale → contrast ×2 → threshold @150
//!  ├─ 4. OCR         tesseract <page.png> stdout
//!  ├─ 5. Write       output_dir/page_001.txt, page_002.txt, …
//!  └─ 6. Combine     (optional) output_dir/combined_text.txt
//! ```
//!
//! Pages go through steps 3–5 one at a time, in order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2txt::{combine_pages, extract, prepare_environment, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = ExtractionConfig::default();
//!     prepare_environment(&config.tesseract_cmd, None)?.apply_to(&mut config);
//!
//!     let report = extract("scan.pdf", "out", &config).await?;
//!     println!("{} pages written", report.pages_processed);
//!
//!     combine_pages("out", "combined_text.txt").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2txt` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod combine;
pub mod config;
pub mod error;
pub mod extract;
pub mod mode;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod setup;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use combine::{combine_pages, page_separator};
pub use config::{ExtractionConfig, ExtractionConfigBuilder, DEFAULT_COMBINED_FILE};
pub use error::{PageFileError, Pdf2TxtError};
pub use extract::{extract, extract_pages, extract_sync};
pub use mode::RunMode;
pub use output::{CombineReport, ExtractionReport};
pub use pipeline::ocr::{OcrEngine, TesseractEngine, TesseractInfo};
pub use pipeline::preprocess::prepare_page;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use setup::{prepare_environment, Environment};
