//! Page preprocessing: raw page bitmap → binarised image ready for OCR.
//!
//! Three fixed steps, always in this order:
//!
//! ```text
//! RGB(A) ──▶ grayscale ──▶ contrast ×2 ──▶ threshold @150 ──▶ black/white
//! ```
//!
//! Every step is a pure function of pixel values, so the same input image
//! always yields the same output and each step can be tested on synthetic
//! bitmaps without Tesseract.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{threshold, ThresholdType};

/// Contrast enhancement factor applied to the grayscale page.
pub const CONTRAST_FACTOR: f32 = 2.0;

/// Pixels strictly brighter than this become white; all others black.
pub const BINARIZE_THRESHOLD: u8 = 150;

/// Run the full preprocessing chain on one rasterised page.
pub fn prepare_page(image: &DynamicImage) -> GrayImage {
    let gray = to_grayscale(image);
    let enhanced = enhance_contrast(&gray, CONTRAST_FACTOR);
    binarize(&enhanced, BINARIZE_THRESHOLD)
}

/// ITU-R 601-2 luma in 16-bit fixed point, rounded. Alpha is ignored.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        Luma([luma as u8])
    })
}

/// Push every pixel away from the image's mean intensity by `factor`.
///
/// `out = mean + factor * (p - mean)`, clamped to `0..=255` and truncated.
/// `mean` is the average intensity rounded to the nearest integer. A factor
/// of 1.0 is the identity; 0.0 flattens the image to its mean.
pub fn enhance_contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let mean = mean_intensity(gray) as f32;
    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        let v = mean + factor * (pixel.0[0] as f32 - mean);
        pixel.0[0] = v.clamp(0.0, 255.0) as u8;
    }
    out
}

/// Hard threshold: `p > threshold` → 255, otherwise 0.
pub fn binarize(gray: &GrayImage, level: u8) -> GrayImage {
    threshold(gray, level, ThresholdType::Binary)
}

fn mean_intensity(gray: &GrayImage) -> u8 {
    let count = gray.width() as u64 * gray.height() as u64;
    if count == 0 {
        return 0;
    }
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    ((sum as f64 / count as f64) + 0.5) as u8
}
