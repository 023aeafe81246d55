//! Input validation: make sure the PDF path names a readable PDF before any
//! other work (Tesseract probe, pdfium provisioning, directory creation)
//! happens.

use crate::error::Pdf2TxtError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate a local PDF path and return it in absolute form.
///
/// Checks existence, read permission and the `%PDF` magic bytes. Files
/// shorter than four bytes are passed through and left for pdfium to reject.
pub fn validate_pdf_path(path: &Path) -> Result<PathBuf, Pdf2TxtError> {
    let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    if !path.is_file() {
        return Err(Pdf2TxtError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(Pdf2TxtError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2TxtError::PermissionDenied { path });
        }
        Err(_) => return Err(Pdf2TxtError::FileNotFound { path }),
    }

    debug!("Validated PDF: {}", path.display());
    Ok(path)
}
