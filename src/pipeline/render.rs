//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! pdfium is not async-safe, so the whole document is rendered inside
//! `spawn_blocking`. All pages are materialised before any OCR starts; a
//! long scan at high DPI therefore needs memory for every page bitmap at
//! once.

use crate::config::ExtractionConfig;
use crate::error::Pdf2TxtError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rasterise all pages of a PDF, in page order.
///
/// An empty document yields an empty vector.
pub async fn render_document(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<Vec<DynamicImage>, Pdf2TxtError> {
    let path = pdf_path.to_path_buf();
    let library = config.pdfium_library.clone();
    let scale = config.dpi as f32 / 72.0;
    let max_pixels = config.max_rendered_pixels;
    let password = config.password.clone();

    tokio::task::spawn_blocking(move || {
        render_document_blocking(&path, library, scale, max_pixels, password.as_deref())
    })
    .await
    .map_err(|e| Pdf2TxtError::Internal(format!("Render task panicked: {}", e)))?
}

fn render_document_blocking(
    pdf_path: &Path,
    library: Option<PathBuf>,
    scale: f32,
    max_pixels: u32,
    password: Option<&str>,
) -> Result<Vec<DynamicImage>, Pdf2TxtError> {
    let pdfium = pdfium_setup::bind(library.as_deref())?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| classify_load_error(pdf_path, password.is_some(), format!("{:?}", e)))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("Converting PDF to images: {} pages", total_pages);

    let render_config = PdfRenderConfig::new()
        .scale_page_by_factor(scale)
        .set_maximum_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let mut images = Vec::with_capacity(total_pages);
    for (idx, page) in pages.iter().enumerate() {
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            Pdf2TxtError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );
        images.push(image);
    }

    Ok(images)
}

/// Map a pdfium load failure to the most specific error.
fn classify_load_error(pdf_path: &Path, had_password: bool, detail: String) -> Pdf2TxtError {
    let path = pdf_path.to_path_buf();
    if detail.to_lowercase().contains("password") {
        if had_password {
            Pdf2TxtError::WrongPassword { path }
        } else {
            Pdf2TxtError::PasswordRequired { path }
        }
    } else {
        Pdf2TxtError::CorruptPdf { path, detail }
    }
}
