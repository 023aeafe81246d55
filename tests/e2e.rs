//! End-to-end tests for edgequake-pdf2txt.
//!
//! These rasterise a real scanned PDF with pdfium and run the real Tesseract
//! binary. They are gated behind `E2E_ENABLED` so they do not run in CI
//! unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture
//!
//! The PDF defaults to `test_cases/scanned.pdf`; override it with
//! `PDF2TXT_E2E_PDF=/path/to/file.pdf`.

use edgequake_pdf2txt::{
    combine_pages, extract, prepare_environment, ExtractionConfig, Pdf2TxtError,
    DEFAULT_COMBINED_FILE,
};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn scanned_pdf() -> PathBuf {
    std::env::var_os("PDF2TXT_E2E_PDF")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases/scanned.pdf")
        })
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

fn ready_config() -> ExtractionConfig {
    let mut config = ExtractionConfig::default();
    prepare_environment(&config.tesseract_cmd, None)
        .expect("tesseract and pdfium must be available for e2e tests")
        .apply_to(&mut config);
    config
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_extract_scanned_pdf() {
    let pdf = e2e_skip_unless_ready!(scanned_pdf());
    let out = tempfile::tempdir().unwrap();
    let config = ready_config();

    let report = extract(&pdf, out.path(), &config).await.unwrap();
    println!(
        "{} pages in {}ms (render {}ms)",
        report.pages_processed, report.total_duration_ms, report.render_duration_ms
    );

    assert!(report.pages_processed > 0, "scanned PDF should have pages");
    for (i, path) in report.page_files.iter().enumerate() {
        let expected = out.path().join(format!("page_{:03}.txt", i + 1));
        assert_eq!(path, &expected);
        assert!(path.is_file());
    }

    let any_text = report
        .page_files
        .iter()
        .any(|p| !std::fs::read_to_string(p).unwrap().trim().is_empty());
    assert!(any_text, "OCR produced no text for any page");
}

#[tokio::test]
async fn test_extract_then_combine() {
    let pdf = e2e_skip_unless_ready!(scanned_pdf());
    let out = tempfile::tempdir().unwrap();
    let config = ready_config();

    let extracted = extract(&pdf, out.path(), &config).await.unwrap();
    let combined = combine_pages(out.path(), DEFAULT_COMBINED_FILE)
        .await
        .unwrap();

    assert_eq!(combined.pages_combined, extracted.pages_processed);
    assert!(combined.is_complete());
    let text = std::fs::read_to_string(&combined.combined_path).unwrap();
    assert_eq!(text.matches(&"-".repeat(80)).count(), extracted.pages_processed);
}

#[tokio::test]
async fn test_non_pdf_is_rejected_before_ocr() {
    let _ = e2e_skip_unless_ready!(scanned_pdf());
    let dir = tempfile::tempdir().unwrap();
    let fake = dir.path().join("notes.pdf");
    std::fs::write(&fake, "just some text").unwrap();
    let out = dir.path().join("out");

    let err = extract(&fake, &out, &ready_config()).await.unwrap_err();
    assert!(matches!(err, Pdf2TxtError::NotAPdf { .. }));
    assert!(!out.exists());
}
