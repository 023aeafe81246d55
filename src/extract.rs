//! Extraction entry points: PDF → one text file per page.
//!
//! [`extract`] runs the whole pipeline. [`extract_pages`] is the per-page
//! loop on its own, for callers that already hold rasterised pages (and for
//! tests, which drive it with synthetic images and a fake OCR engine).
//!
//! Pages are handled strictly one at a time, in rasterisation order. The
//! first page that fails aborts the run; files already written for earlier
//! pages are left in place.

use crate::config::ExtractionConfig;
use crate::error::Pdf2TxtError;
use crate::output::ExtractionReport;
use crate::pipeline::ocr::{OcrEngine, TesseractEngine};
use crate::pipeline::{input, preprocess, render, write};
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Extract the text of every page of a scanned PDF into `output_dir`.
///
/// Writes `page_001.txt` … `page_NNN.txt`; a PDF without pages yields no
/// files. The output directory is created if missing; unrelated files in it,
/// and page files left over from an earlier run of a longer document, are
/// not removed.
///
/// # Errors
/// - `FileNotFound` / `PermissionDenied` / `NotAPdf` — bad input path
/// - `OcrRuntimeMissing` — Tesseract is not installed (checked before any
///   file is touched)
/// - `CorruptPdf`, `RasterisationFailed`, `OcrFailed`, `OutputWriteFailed`
///   — a page could not be processed; the run stops there
pub async fn extract(
    pdf_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, Pdf2TxtError> {
    let total_start = Instant::now();

    // ── Step 1: Preconditions ────────────────────────────────────────────
    let pdf_path = input::validate_pdf_path(pdf_path.as_ref())?;
    let engine = resolve_engine(config)?;

    // ── Step 2: Rasterise ────────────────────────────────────────────────
    let render_start = Instant::now();
    let images = render::render_document(&pdf_path, config).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!(
        "Rendered {} pages in {}ms",
        images.len(),
        render_duration_ms
    );

    // ── Step 3: Preprocess → OCR → write, page by page ───────────────────
    let mut report = extract_pages(images, output_dir.as_ref(), engine, config).await?;

    report.pdf_path = pdf_path;
    report.render_duration_ms = render_duration_ms;
    report.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(report)
}

/// Run preprocessing, OCR and page writing over already-rasterised pages.
///
/// `images[0]` becomes `page_001.txt`. Each image is dropped as soon as its
/// text is written.
pub async fn extract_pages(
    images: Vec<DynamicImage>,
    output_dir: &Path,
    engine: Arc<dyn OcrEngine>,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, Pdf2TxtError> {
    let start = Instant::now();
    let total_pages = images.len();

    write::ensure_output_dir(output_dir).await?;

    info!("Extracting text from {} pages...", total_pages);
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(total_pages);
    }

    let mut page_files = Vec::with_capacity(total_pages);
    for (idx, image) in images.into_iter().enumerate() {
        let page_num = idx + 1;
        debug!("Processing page {}/{}", page_num, total_pages);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total_pages);
        }

        let text = recognize_page(Arc::clone(&engine), page_num, image).await?;
        let path = write::write_page(output_dir, page_num, &text).await?;
        info!("Saved text from page {} to {}", page_num, path.display());

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page_num, total_pages, text.len());
        }
        page_files.push(path);
    }

    info!(
        "Complete! Extracted text from {} pages to {}",
        total_pages,
        output_dir.display()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(total_pages);
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    Ok(ExtractionReport {
        pdf_path: Default::default(),
        output_dir: output_dir.to_path_buf(),
        pages_processed: page_files.len(),
        page_files,
        render_duration_ms: 0,
        ocr_duration_ms: elapsed_ms,
        total_duration_ms: elapsed_ms,
    })
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    pdf_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, Pdf2TxtError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2TxtError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(pdf_path, output_dir, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Use the caller's engine if one was supplied, otherwise probe Tesseract.
fn resolve_engine(config: &ExtractionConfig) -> Result<Arc<dyn OcrEngine>, Pdf2TxtError> {
    if let Some(ref engine) = config.ocr_engine {
        return Ok(Arc::clone(engine));
    }
    let tesseract = TesseractEngine::probe(&config.tesseract_cmd)?;
    info!("{}", tesseract);
    Ok(Arc::new(TesseractEngine::new(tesseract.command)))
}

/// Preprocess and recognise one page on the blocking pool.
async fn recognize_page(
    engine: Arc<dyn OcrEngine>,
    page_num: usize,
    image: DynamicImage,
) -> Result<String, Pdf2TxtError> {
    tokio::task::spawn_blocking(move || {
        let prepared = preprocess::prepare_page(&image);
        drop(image);
        engine.recognize(page_num, &prepared)
    })
    .await
    .map_err(|e| Pdf2TxtError::Internal(format!("OCR task for page {} panicked: {}", page_num, e)))?
}
