//! Page writer: persist one page's text as `page_NNN.txt`.
//!
//! Numbers are zero-padded to three digits so a plain directory listing
//! sorts in page order up to page 999. Beyond that the names simply grow a
//! digit; [`crate::combine`] sorts numerically and does not depend on the
//! padding.

use crate::error::Pdf2TxtError;
use std::path::{Path, PathBuf};

/// File name for a 1-indexed page: `page_001.txt`, `page_042.txt`, …
pub fn page_file_name(page_num: usize) -> String {
    format!("page_{:03}.txt", page_num)
}

/// Create the output directory (and parents) if it does not exist yet.
///
/// Existing contents are left untouched.
pub async fn ensure_output_dir(output_dir: &Path) -> Result<(), Pdf2TxtError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| Pdf2TxtError::OutputDirFailed {
            path: output_dir.to_path_buf(),
            source,
        })
}

/// Write `text` verbatim (UTF-8) to the page's file, replacing any previous
/// file of that name. Returns the path written.
pub async fn write_page(
    output_dir: &Path,
    page_num: usize,
    text: &str,
) -> Result<PathBuf, Pdf2TxtError> {
    let path = output_dir.join(page_file_name(page_num));
    tokio::fs::write(&path, text)
        .await
        .map_err(|source| Pdf2TxtError::OutputWriteFailed {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
