//! Combine step: concatenate `page_NNN.txt` files into one document.
//!
//! Pages are ordered by the number parsed out of the file name, never by
//! directory-listing order. Each page's text is trimmed and followed by a
//! blank line, an 80-dash rule and another blank line; the rule after the
//! last page is kept.
//!
//! A page file that cannot be read (I/O error, invalid UTF-8) is logged,
//! recorded in [`CombineReport::skipped`] and left out; the remaining pages
//! are still combined.

use crate::error::{PageFileError, Pdf2TxtError};
use crate::output::CombineReport;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub use crate::config::DEFAULT_COMBINED_FILE;

/// Width of the dash rule between pages.
pub const RULE_WIDTH: usize = 80;

static RE_PAGE_FILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^page_(\d+)\.txt$").unwrap());

/// Text appended after every page: `"\n\n" + "-" * 80 + "\n\n"`.
pub fn page_separator() -> String {
    format!("\n\n{}\n\n", "-".repeat(RULE_WIDTH))
}

/// Page number encoded in a page file name, if it is one.
pub fn parse_page_number(file_name: &str) -> Option<usize> {
    RE_PAGE_FILE
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Combine every page file in `output_dir` into `output_dir/output_file`.
///
/// # Errors
/// - `OutputDirMissing` — `output_dir` does not exist or is not a directory
/// - `NoPageFiles` — nothing matching `page_<digits>.txt`; no file is written
/// - `OutputWriteFailed` — the combined file could not be written
pub async fn combine_pages(
    output_dir: impl AsRef<Path>,
    output_file: &str,
) -> Result<CombineReport, Pdf2TxtError> {
    let output_dir = output_dir.as_ref();

    let is_dir = tokio::fs::metadata(output_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(Pdf2TxtError::OutputDirMissing {
            path: output_dir.to_path_buf(),
        });
    }

    let pages = list_page_files(output_dir).await?;
    if pages.is_empty() {
        return Err(Pdf2TxtError::NoPageFiles {
            path: output_dir.to_path_buf(),
        });
    }

    let separator = page_separator();
    let mut combined = String::new();
    let mut report = CombineReport::default();

    for (page, path) in pages {
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                combined.push_str(content.trim());
                combined.push_str(&separator);
                report.pages_combined += 1;
            }
            Err(e) => {
                let skipped = PageFileError {
                    page,
                    path,
                    detail: e.to_string(),
                };
                error!("{}", skipped);
                report.skipped.push(skipped);
            }
        }
    }

    let combined_path = output_dir.join(output_file);
    tokio::fs::write(&combined_path, &combined)
        .await
        .map_err(|source| Pdf2TxtError::OutputWriteFailed {
            path: combined_path.clone(),
            source,
        })?;
    info!("Combined text saved to {}", combined_path.display());

    report.combined_path = combined_path;
    Ok(report)
}

/// Page files in `dir`, sorted by page number.
async fn list_page_files(dir: &Path) -> Result<Vec<(usize, PathBuf)>, Pdf2TxtError> {
    let read_err = |e: std::io::Error| Pdf2TxtError::Internal(format!(
        "Failed to list {}: {}",
        dir.display(),
        e
    ));

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_err)?;
    let mut pages = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let name = entry.file_name();
        if let Some(page) = name.to_str().and_then(parse_page_number) {
            pages.push((page, entry.path()));
        }
    }

    pages.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_shape() {
        let sep = page_separator();
        assert_eq!(sep.len(), 84);
        assert!(sep.starts_with("\n\n---"));
        assert!(sep.ends_with("---\n\n"));
        assert_eq!(sep.trim().len(), RULE_WIDTH);
    }

    #[test]
    fn page_numbers_are_parsed() {
        assert_eq!(parse_page_number("page_001.txt"), Some(1));
        assert_eq!(parse_page_number("page_042.txt"), Some(42));
        assert_eq!(parse_page_number("page_1000.txt"), Some(1000));
    }

    #[test]
    fn non_page_files_are_ignored() {
        assert_eq!(parse_page_number("combined_text.txt"), None);
        assert_eq!(parse_page_number("page_abc.txt"), None);
        assert_eq!(parse_page_number("page_001.txt.bak"), None);
        assert_eq!(parse_page_number("mypage_001.txt"), None);
        assert_eq!(parse_page_number("page_.txt"), None);
    }

    #[tokio::test]
    async fn numeric_order_beats_lexicographic_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page_1000.txt"), "last").unwrap();
        std::fs::write(dir.path().join("page_999.txt"), "middle").unwrap();
        std::fs::write(dir.path().join("page_002.txt"), "first").unwrap();

        let report = combine_pages(dir.path(), DEFAULT_COMBINED_FILE).await.unwrap();
        let out = std::fs::read_to_string(report.combined_path).unwrap();
        let sep = page_separator();
        assert_eq!(out, format!("first{sep}middle{sep}last{sep}"));
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = combine_pages(dir.path().join("nope"), DEFAULT_COMBINED_FILE)
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2TxtError::OutputDirMissing { .. }));
    }

    #[tokio::test]
    async fn file_instead_of_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page_001.txt");
        std::fs::write(&file, "x").unwrap();
        let err = combine_pages(&file, DEFAULT_COMBINED_FILE).await.unwrap_err();
        assert!(matches!(err, Pdf2TxtError::OutputDirMissing { .. }));
    }

    #[tokio::test]
    async fn custom_output_file_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page_001.txt"), "only").unwrap();
        let report = combine_pages(dir.path(), "book.txt").await.unwrap();
        assert_eq!(report.combined_path, dir.path().join("book.txt"));
        assert_eq!(report.pages_combined, 1);
    }

    #[tokio::test]
    async fn rerun_overwrites_combined_file_and_ignores_it_as_input() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page_001.txt"), "A").unwrap();
        combine_pages(dir.path(), DEFAULT_COMBINED_FILE).await.unwrap();
        let report = combine_pages(dir.path(), DEFAULT_COMBINED_FILE).await.unwrap();

        assert_eq!(report.pages_combined, 1);
        let out = std::fs::read_to_string(report.combined_path).unwrap();
        assert_eq!(out, format!("A{}", page_separator()));
    }
}
