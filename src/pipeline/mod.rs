//! Pipeline stages for scanned-PDF text extraction.
//!
//! Each submodule implements exactly one step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ preprocess ──▶ ocr ──▶ write
//! (path)    (pdfium)   (gray/contrast/ (tesseract) (page_NNN.txt)
//!                       threshold)
//! ```
//!
//! 1. [`input`]      — check the PDF exists, is readable and looks like a PDF
//! 2. [`render`]     — rasterise every page; runs in `spawn_blocking`
//! 3. [`preprocess`] — pure image → image transform for OCR
//! 4. [`ocr`]        — recognise text through an [`ocr::OcrEngine`]
//! 5. [`write`]      — persist one text file per page

pub mod input;
pub mod ocr;
pub mod preprocess;
pub mod render;
pub mod write;
