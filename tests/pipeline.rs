//! Integration tests for the extraction and combine pipeline.
//!
//! These run without Tesseract or pdfium: pages are synthetic images and
//! OCR is a fake engine that describes the binarised bitmap it receives.

use edgequake_pdf2txt::{
    combine_pages, extract_pages, page_separator, ExtractionConfig, ExtractionProgressCallback,
    OcrEngine, Pdf2TxtError, DEFAULT_COMBINED_FILE,
};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Reports the page size and how many pixels survived as black ink.
struct DescribingEngine {
    seen: Mutex<Vec<usize>>,
}

impl DescribingEngine {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }
}

impl OcrEngine for DescribingEngine {
    fn recognize(&self, page_num: usize, image: &GrayImage) -> Result<String, Pdf2TxtError> {
        self.seen.lock().unwrap().push(page_num);
        assert!(
            image.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255),
            "engine must receive a binarised image"
        );
        let ink = image.pixels().filter(|p| p.0[0] == 0).count();
        Ok(format!("  width {} ink {}\n", image.width(), ink))
    }
}

/// Fails on one page number, succeeds elsewhere.
struct FailOnPage(usize);

impl OcrEngine for FailOnPage {
    fn recognize(&self, page_num: usize, _image: &GrayImage) -> Result<String, Pdf2TxtError> {
        if page_num == self.0 {
            Err(Pdf2TxtError::OcrFailed {
                page: page_num,
                detail: "unreadable scan".into(),
            })
        } else {
            Ok(format!("text of page {page_num}"))
        }
    }
}

/// A light page of the given width with `ink` dark pixels on the first row.
fn page(width: u32, ink: u32) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, 4, Rgb([235, 235, 235]));
    for x in 0..ink.min(width) {
        img.put_pixel(x, 0, Rgb([20, 20, 20]));
    }
    DynamicImage::ImageRgb8(img)
}

fn page_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("page_"))
        .collect();
    names.sort();
    names
}

fn config() -> ExtractionConfig {
    ExtractionConfig::default()
}

// ── Extraction ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn n_pages_produce_n_numbered_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let engine = DescribingEngine::new();
    let images = vec![page(10, 1), page(20, 2), page(30, 3)];

    let report = extract_pages(images, &out, engine.clone(), &config())
        .await
        .unwrap();

    assert_eq!(report.pages_processed, 3);
    assert_eq!(
        page_files(&out),
        vec!["page_001.txt", "page_002.txt", "page_003.txt"]
    );
    assert_eq!(*engine.seen.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(
        report.page_files,
        (1..=3)
            .map(|n| out.join(format!("page_{n:03}.txt")))
            .collect::<Vec<PathBuf>>()
    );

    // text is stored verbatim, including surrounding whitespace
    let second = std::fs::read_to_string(out.join("page_002.txt")).unwrap();
    assert_eq!(second, "  width 20 ink 2\n");
}

#[tokio::test]
async fn zero_pages_produce_zero_files_but_create_directory() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty");

    let report = extract_pages(Vec::new(), &out, DescribingEngine::new(), &config())
        .await
        .unwrap();

    assert_eq!(report.pages_processed, 0);
    assert!(out.is_dir());
    assert!(page_files(&out).is_empty());
}

#[tokio::test]
async fn many_pages_keep_three_digit_padding() {
    let dir = tempfile::tempdir().unwrap();
    let images: Vec<DynamicImage> = (0..12).map(|_| page(4, 0)).collect();

    extract_pages(images, dir.path(), DescribingEngine::new(), &config())
        .await
        .unwrap();

    let names = page_files(dir.path());
    assert_eq!(names.len(), 12);
    assert_eq!(names.first().unwrap(), "page_001.txt");
    assert_eq!(names.last().unwrap(), "page_012.txt");
}

#[tokio::test]
async fn failure_stops_run_and_keeps_earlier_pages() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![page(4, 0), page(4, 0), page(4, 0), page(4, 0)];

    let err = extract_pages(images, dir.path(), Arc::new(FailOnPage(3)), &config())
        .await
        .unwrap_err();

    assert!(matches!(err, Pdf2TxtError::OcrFailed { page: 3, .. }));
    assert_eq!(page_files(dir.path()), vec!["page_001.txt", "page_002.txt"]);
}

#[tokio::test]
async fn rerun_overwrites_but_leaves_stale_higher_pages() {
    let dir = tempfile::tempdir().unwrap();
    let engine = DescribingEngine::new();

    let first: Vec<DynamicImage> = (0..3).map(|_| page(8, 8)).collect();
    extract_pages(first, dir.path(), engine.clone(), &config())
        .await
        .unwrap();
    std::fs::write(dir.path().join("notes.md"), "unrelated").unwrap();

    let second = vec![page(5, 0)];
    extract_pages(second, dir.path(), engine, &config())
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("page_001.txt")).unwrap(),
        "  width 5 ink 0\n"
    );
    // stale pages from the longer run are not cleaned up
    assert_eq!(
        page_files(dir.path()),
        vec!["page_001.txt", "page_002.txt", "page_003.txt"]
    );
    assert!(dir.path().join("notes.md").exists());
}

#[tokio::test]
async fn progress_events_arrive_in_page_order() {
    #[derive(Default)]
    struct Log(Mutex<Vec<String>>);

    impl ExtractionProgressCallback for Log {
        fn on_extraction_start(&self, total: usize) {
            self.0.lock().unwrap().push(format!("start {total}"));
        }
        fn on_page_start(&self, page: usize, _total: usize) {
            self.0.lock().unwrap().push(format!("begin {page}"));
        }
        fn on_page_complete(&self, page: usize, _total: usize, _len: usize) {
            self.0.lock().unwrap().push(format!("done {page}"));
        }
        fn on_extraction_complete(&self, pages: usize) {
            self.0.lock().unwrap().push(format!("end {pages}"));
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(Log::default());
    let config = ExtractionConfig::builder()
        .progress_callback(log.clone())
        .build()
        .unwrap();

    extract_pages(vec![page(4, 0), page(4, 0)], dir.path(), DescribingEngine::new(), &config)
        .await
        .unwrap();

    assert_eq!(
        *log.0.lock().unwrap(),
        vec!["start 2", "begin 1", "done 1", "begin 2", "done 2", "end 2"]
    );
}

// ── Combine ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn combine_trims_orders_and_separates_pages() {
    let dir = tempfile::tempdir().unwrap();
    // written out of order on purpose
    std::fs::write(dir.path().join("page_003.txt"), "third\n\n").unwrap();
    std::fs::write(dir.path().join("page_001.txt"), "\n  first  \n").unwrap();
    std::fs::write(dir.path().join("page_002.txt"), "second").unwrap();
    std::fs::write(dir.path().join("readme.txt"), "not a page").unwrap();

    let report = combine_pages(dir.path(), DEFAULT_COMBINED_FILE).await.unwrap();

    let sep = format!("\n\n{}\n\n", "-".repeat(80));
    assert_eq!(page_separator(), sep);
    let combined = std::fs::read_to_string(dir.path().join("combined_text.txt")).unwrap();
    assert_eq!(combined, format!("first{sep}second{sep}third{sep}"));
    assert_eq!(report.pages_combined, 3);
    assert!(report.is_complete());
}

#[tokio::test]
async fn combine_without_page_files_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), "not a page").unwrap();

    let err = combine_pages(dir.path(), DEFAULT_COMBINED_FILE)
        .await
        .unwrap_err();

    assert!(matches!(err, Pdf2TxtError::NoPageFiles { .. }));
    assert!(!dir.path().join("combined_text.txt").exists());
}

#[tokio::test]
async fn combine_skips_corrupt_page_and_keeps_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("page_001.txt"), "A").unwrap();
    std::fs::write(dir.path().join("page_002.txt"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();
    std::fs::write(dir.path().join("page_003.txt"), "B").unwrap();

    let report = combine_pages(dir.path(), DEFAULT_COMBINED_FILE).await.unwrap();

    let sep = page_separator();
    let combined = std::fs::read_to_string(&report.combined_path).unwrap();
    assert_eq!(combined, format!("A{sep}B{sep}"));
    assert_eq!(report.pages_combined, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].page, 2);
}

#[tokio::test]
async fn extract_then_combine_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![page(6, 1), page(7, 0)];
    extract_pages(images, dir.path(), DescribingEngine::new(), &config())
        .await
        .unwrap();

    let report = combine_pages(dir.path(), DEFAULT_COMBINED_FILE).await.unwrap();
    let sep = page_separator();
    assert_eq!(
        std::fs::read_to_string(report.combined_path).unwrap(),
        format!("width 6 ink 1{sep}width 7 ink 0{sep}")
    );
}
