//! Configuration types for scanned-PDF text extraction.
//!
//! Every extraction knob lives in [`ExtractionConfig`], built via
//! [`ExtractionConfigBuilder`]. The preprocessing constants (contrast factor
//! and binarisation threshold) are deliberately *not* configurable; see
//! [`crate::pipeline::preprocess`].

use crate::error::Pdf2TxtError;
use crate::pipeline::ocr::OcrEngine;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default file name of the combined document.
pub const DEFAULT_COMBINED_FILE: &str = "combined_text.txt";

/// Configuration for one extraction run.
///
/// # Example
/// ```rust
/// use edgequake_pdf2txt::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .dpi(300)
///     .tesseract_cmd("/usr/local/bin/tesseract")
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 300);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Rendering DPI used when rasterising each page. Range: 72–600. Default: 200.
    ///
    /// Tesseract is tuned for glyphs around 20–30 px tall; 200 DPI gets
    /// ordinary 10–12 pt body text into that band. Raise to 300 for
    /// small print.
    pub dpi: u32,

    /// Upper bound on either rendered dimension, in pixels. Default: 6000.
    ///
    /// Keeps a large-format page (A0 drawings, posters) from allocating a
    /// multi-gigabyte bitmap at high DPI.
    pub max_rendered_pixels: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Tesseract executable name or path. Default: `tesseract`.
    pub tesseract_cmd: String,

    /// Explicit pdfium library to bind. If None, the system library is used.
    pub pdfium_library: Option<PathBuf>,

    /// Pre-constructed OCR engine. Takes precedence over `tesseract_cmd`.
    pub ocr_engine: Option<Arc<dyn OcrEngine>>,

    /// Receives per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            dpi: 200,
            max_rendered_pixels: 6000,
            password: None,
            tesseract_cmd: "tesseract".to_string(),
            pdfium_library: None,
            ocr_engine: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("pdfium_library", &self.pdfium_library)
            .field("ocr_engine", &self.ocr_engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr_engine = Some(engine);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Pdf2TxtError> {
        let c = &self.config;
        if !(72..=600).contains(&c.dpi) {
            return Err(Pdf2TxtError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.tesseract_cmd.trim().is_empty() {
            return Err(Pdf2TxtError::InvalidConfig(
                "Tesseract command must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
