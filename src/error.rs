//! Error types for the edgequake-pdf2txt library.
//!
//! * [`Pdf2TxtError`] — **Fatal** for the operation that returned it: a
//!   precondition failed, a page could not be rasterised or recognised, or
//!   an output file could not be written. Extraction stops at the first one;
//!   page files already written stay on disk.
//!
//! * [`PageFileError`] — **Non-fatal**: one page file could not be read while
//!   combining. It is recorded in [`crate::output::CombineReport::skipped`]
//!   and the combine carries on with the remaining pages.

use std::path::PathBuf;
use thiserror::Error;

/// Installation instructions shown when the Tesseract binary is missing.
pub const TESSERACT_INSTALL_HINT: &str = "\
Tesseract OCR is not installed. Please install it:
  Ubuntu/Debian: sudo apt install tesseract-ocr
  macOS: brew install tesseract
  Windows: download installer from https://github.com/UB-Mannheim/tesseract/wiki";

/// All fatal errors returned by the edgequake-pdf2txt library.
#[derive(Debug, Error)]
pub enum Pdf2TxtError {
    // ── Precondition errors ───────────────────────────────────────────────
    /// A required command-line argument was not supplied.
    #[error("{0}")]
    MissingArgument(String),

    /// Input file was not found at the given path.
    #[error("The file '{path}' does not exist.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The Tesseract binary could not be started.
    #[error("Could not run '{command}': {reason}\n{}", TESSERACT_INSTALL_HINT)]
    OcrRuntimeMissing { command: String, reason: String },

    // ── Provisioning errors ───────────────────────────────────────────────
    /// The pdfium library could not be downloaded, unpacked or loaded.
    #[error(
        "PDF rendering engine is unavailable: {0}\n\n\
PDFium is normally downloaded automatically on first run.\n\
If that failed, you can:\n\
  • Check your internet connection and try again.\n\
  • Set PDF2TXT_PDFIUM_LIB=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumUnavailable(#[from] pdfium_setup::SetupError),

    // ── Per-page processing errors ────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt or unsupported: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// The OCR engine failed on a specific page.
    #[error("OCR failed for page {page}: {detail}")]
    OcrFailed { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write a page file or the combined file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Combine errors ────────────────────────────────────────────────────
    /// The directory to combine does not exist or is not a directory.
    #[error("Output directory {path:?} does not exist.")]
    OutputDirMissing { path: PathBuf },

    /// The directory holds no `page_NNN.txt` files.
    #[error("No text files found in {path:?}")]
    NoPageFiles { path: PathBuf },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A page file that could not be read while combining.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
#[error("Error reading {path:?}: {detail}")]
pub struct PageFileError {
    /// Page number parsed from the file name.
    pub page: usize,
    pub path: PathBuf,
    pub detail: String,
}
