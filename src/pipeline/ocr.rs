//! OCR stage: binarised page image → text, via the Tesseract command-line
//! tool.
//!
//! The engine is reached through the [`OcrEngine`] trait so the pipeline can
//! be driven by a fake engine in tests, or by any other recogniser a library
//! caller wants to plug in through
//! [`crate::config::ExtractionConfigBuilder::ocr_engine`].
//!
//! [`TesseractEngine`] writes each page to a temporary PNG and runs
//! `tesseract <png> stdout`. Tesseract is probed once with `--version` before
//! any page is processed so a missing install is reported up front.

use crate::error::Pdf2TxtError;
use image::GrayImage;
use serde::Serialize;
use std::process::Command;
use tracing::debug;

/// Converts one preprocessed page image into text.
pub trait OcrEngine: Send + Sync {
    /// Recognise the text on a page. `page_num` is 1-indexed and only used
    /// for error reporting.
    fn recognize(&self, page_num: usize, image: &GrayImage) -> Result<String, Pdf2TxtError>;
}

/// Result of probing the Tesseract binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TesseractInfo {
    pub command: String,
    /// Version token reported by `--version`, or `"Unknown"`.
    pub version: String,
}

impl std::fmt::Display for TesseractInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tesseract version: {}", self.version)
    }
}

/// OCR engine backed by the `tesseract` executable.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: String,
}

impl TesseractEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Run `<command> --version` and report the installed version.
    ///
    /// Fails with [`Pdf2TxtError::OcrRuntimeMissing`], whose message carries
    /// per-platform installation instructions, when the binary cannot be
    /// started.
    pub fn probe(command: &str) -> Result<TesseractInfo, Pdf2TxtError> {
        let output = Command::new(command)
            .arg("--version")
            .output()
            .map_err(|e| Pdf2TxtError::OcrRuntimeMissing {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        // Tesseract 3.x/4.x print the banner on stderr, 5.x on stdout.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let banner = if stdout.trim().is_empty() { stderr } else { stdout };

        Ok(TesseractInfo {
            command: command.to_string(),
            version: parse_version(&banner).unwrap_or_else(|| "Unknown".to_string()),
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, page_num: usize, image: &GrayImage) -> Result<String, Pdf2TxtError> {
        let ocr_err = |detail: String| Pdf2TxtError::OcrFailed {
            page: page_num,
            detail,
        };

        let png = tempfile::Builder::new()
            .prefix("pdf2txt-page-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| ocr_err(format!("temporary image: {e}")))?;
        image
            .save_with_format(png.path(), image::ImageFormat::Png)
            .map_err(|e| ocr_err(format!("encoding page image: {e}")))?;

        let output = Command::new(&self.command)
            .arg(png.path())
            .arg("stdout")
            .output()
            .map_err(|e| ocr_err(format!("could not run '{}': {e}", self.command)))?;

        if !output.status.success() {
            return Err(ocr_err(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("Page {}: recognised {} bytes", page_num, text.len());
        Ok(text)
    }
}

/// Second whitespace-separated token of the first line:
/// `"tesseract 5.3.0\n leptonica-1.82.0"` → `"5.3.0"`.
fn parse_version(banner: &str) -> Option<String> {
    banner
        .lines()
        .next()?
        .split_whitespace()
        .nth(1)
        .map(|v| v.trim_start_matches('v').to_string())
}
