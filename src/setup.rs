//! One-time environment preparation, run before any extraction.
//!
//! [`prepare_environment`] checks the two external collaborators in a fixed
//! order and returns an explicit [`Environment`]:
//!
//! 1. Tesseract — probed with `--version`; a missing install aborts here,
//!    before any download or file write.
//! 2. pdfium — provisioned once per host by [`pdfium_setup::ensure_library`];
//!    already-present libraries are reused without network access.
//!
//! This is blocking (it may download ~30 MB). Async callers should wrap it in
//! `spawn_blocking` or `block_in_place`.

use crate::config::ExtractionConfig;
use crate::error::Pdf2TxtError;
use crate::pipeline::ocr::{TesseractEngine, TesseractInfo};
use pdfium_setup::Provisioned;
use std::sync::Arc;
use tracing::{debug, info};

/// The host's OCR and rendering runtimes, ready to use.
#[derive(Debug, Clone)]
pub struct Environment {
    pub tesseract: TesseractInfo,
    pub pdfium: Provisioned,
}

impl Environment {
    /// Point `config` at the probed Tesseract and the provisioned pdfium.
    ///
    /// Leaves a caller-supplied `ocr_engine` or `pdfium_library` in place.
    pub fn apply_to(&self, config: &mut ExtractionConfig) {
        if config.ocr_engine.is_none() {
            config.ocr_engine = Some(Arc::new(TesseractEngine::new(
                self.tesseract.command.clone(),
            )));
        }
        if config.pdfium_library.is_none() {
            config.pdfium_library = Some(self.pdfium.path().to_path_buf());
        }
    }
}

/// Probe Tesseract, then make sure pdfium is installed.
///
/// `on_progress` is forwarded to the pdfium download and is only called when
/// a download actually happens.
pub fn prepare_environment(
    tesseract_cmd: &str,
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<Environment, Pdf2TxtError> {
    let tesseract = TesseractEngine::probe(tesseract_cmd)?;
    debug!("{}", tesseract);

    let pdfium = pdfium_setup::ensure_library(on_progress)?;
    match &pdfium {
        Provisioned::Downloaded(p) => info!("PDFium installed to {}", p.display()),
        Provisioned::Cached(p) | Provisioned::Override(p) => {
            info!("PDFium already available at {}", p.display())
        }
    }

    Ok(Environment { tesseract, pdfium })
}
