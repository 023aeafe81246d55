//! CLI binary for edgequake-pdf2txt.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` / `RunMode` and prints status lines.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2txt::pipeline::input;
use edgequake_pdf2txt::{
    combine_pages, extract, prepare_environment, CombineReport, ExtractionConfig,
    ExtractionProgressCallback, ProgressCallback, RunMode, DEFAULT_COMBINED_FILE,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress bar plus one log line per finished page.
struct CliProgressCallback {
    bar: ProgressBar,
    output_dir: PathBuf,
    page_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new(output_dir: &Path) -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Preparing");
        bar.set_message("Converting PDF to images…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            output_dir: output_dir.to_path_buf(),
            page_started: Mutex::new(None),
        })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} pages  \
                 ⏱ {elapsed_precise}  ETA {eta_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        self.bar.set_prefix("OCR");
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Extracting text from {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        if let Ok(mut started) = self.page_started.lock() {
            *started = Some(Instant::now());
        }
        self.bar
            .set_message(format!("Processing page {page_num}/{total_pages}"));
    }

    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let elapsed_ms = self
            .page_started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<8}  {}  {}",
            green("✓"),
            page_num,
            total_pages,
            dim(&format!("{text_len:>5} chars")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
            dim(&self
                .output_dir
                .join(format!("page_{page_num:03}.txt"))
                .display()
                .to_string()),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, pages_processed: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} Complete! Extracted text from {} pages to {}",
            green("✔"),
            bold(&pages_processed.to_string()),
            self.output_dir.display()
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract one text file per page
  pdf2txt --pdf-path scan.pdf --output-dir out

  # Extract and also write out/combined_text.txt
  pdf2txt --pdf-path scan.pdf --output-dir out --combine

  # Only combine page files from an earlier run
  pdf2txt --output-dir out --skip-extraction --combine

  # Higher resolution for small print
  pdf2txt --pdf-path contract.pdf --output-dir contract --dpi 300

OUTPUT LAYOUT:
  out/page_001.txt, out/page_002.txt, …   one file per page (UTF-8)
  out/combined_text.txt                   with --combine; pages separated
                                          by a line of 80 dashes

REQUIREMENTS:
  Tesseract OCR must be installed:
    Ubuntu/Debian: sudo apt install tesseract-ocr
    macOS:         brew install tesseract
    Windows:       https://github.com/UB-Mannheim/tesseract/wiki

  PDFium (~30 MB) is downloaded automatically on first run and cached in
  ~/.cache/pdf2txt/pdfium-7690/.

ENVIRONMENT VARIABLES:
  PDF2TXT_PDFIUM_LIB     Path to an existing libpdfium (skips the download)
  PDF2TXT_CACHE_DIR      Override the pdfium cache directory
  RUST_LOG               Override log filtering (e.g. RUST_LOG=debug)
"#;

/// Extract text from scanned PDFs using OCR.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2txt",
    version,
    about = "Extract text from scanned PDFs using OCR",
    long_about = "Rasterise every page of a scanned PDF, clean it up for OCR, recognise it \
with Tesseract and save one text file per page. Optionally combine the pages into one document.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file.
    #[arg(long, alias = "pdf_path", env = "PDF2TXT_PDF_PATH")]
    pdf_path: Option<PathBuf>,

    /// Directory to save extracted text files.
    #[arg(long, alias = "output_dir", env = "PDF2TXT_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Combine extracted text files into a single document.
    #[arg(long)]
    combine: bool,

    /// Skip extraction and only combine existing text files.
    #[arg(long, alias = "skip_extraction")]
    skip_extraction: bool,

    /// File name of the combined document inside the output directory.
    #[arg(long, env = "PDF2TXT_COMBINED_FILE", default_value = DEFAULT_COMBINED_FILE)]
    combined_file: String,

    /// Rendering DPI (72–600).
    #[arg(long, env = "PDF2TXT_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Tesseract executable name or path.
    #[arg(long, env = "PDF2TXT_TESSERACT", default_value = "tesseract")]
    tesseract_cmd: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2TXT_PASSWORD")]
    password: Option<String>,

    /// Print a JSON report on stdout.
    #[arg(long, env = "PDF2TXT_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2TXT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TXT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level status lines; without it the
    // library's own `info!` lines are the status output.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Resolve mode (no filesystem access) ──────────────────────────────
    let mode = RunMode::resolve(
        cli.pdf_path.clone(),
        cli.output_dir.clone(),
        cli.combine,
        cli.skip_extraction,
    )?;

    match mode {
        RunMode::CombineOnly { output_dir } => {
            if !cli.quiet {
                eprintln!(
                    "Combining existing text files from {}...",
                    output_dir.display()
                );
            }
            let report = run_combine(&cli, &output_dir).await?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "combine": report }))
                        .context("Failed to serialise report")?
                );
            }
        }
        RunMode::Extract {
            pdf_path,
            output_dir,
            combine,
        } => {
            // Preconditions, in order: PDF exists → Tesseract → pdfium.
            let pdf_path = input::validate_pdf_path(&pdf_path)?;
            let mut config = build_config(&cli, &output_dir, show_progress)?;
            let env = tokio::task::block_in_place(|| provision(&cli))?;
            if !cli.quiet {
                eprintln!("{}", env.tesseract);
            }
            env.apply_to(&mut config);

            if !cli.quiet && !show_progress {
                eprintln!("Starting extraction process...");
            }
            let report = extract(&pdf_path, &output_dir, &config)
                .await
                .context("Error during extraction")?;

            if !cli.quiet && !show_progress {
                eprintln!(
                    "Extracted {} pages in {}ms",
                    report.pages_processed, report.total_duration_ms
                );
            }

            let combine_outcome = if combine {
                if !cli.quiet {
                    eprintln!("Combining extracted text files...");
                }
                Some(combine_after_extraction(&cli, &output_dir).await)
            } else {
                None
            };

            if cli.json {
                let mut out = serde_json::json!({ "extraction": report });
                match combine_outcome {
                    Some(Ok(combine_report)) => out["combine"] = serde_json::json!(combine_report),
                    Some(Err(message)) => out["combine_error"] = serde_json::json!(message),
                    None => {}
                }
                println!(
                    "{}",
                    serde_json::to_string_pretty(&out).context("Failed to serialise report")?
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, output_dir: &Path, show_progress: bool) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .dpi(cli.dpi)
        .tesseract_cmd(cli.tesseract_cmd.clone());

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if show_progress {
        let cb: ProgressCallback = CliProgressCallback::new(output_dir);
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Probe Tesseract and make sure pdfium is installed, with a download bar
/// on first run.
fn provision(cli: &Cli) -> Result<edgequake_pdf2txt::Environment> {
    if cli.quiet || pdfium_setup::installed_library().is_some() {
        return prepare_environment(&cli.tesseract_cmd, None)
            .context("Environment setup failed");
    }

    let dl_bar = ProgressBar::new(0);
    dl_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS),
    );
    dl_bar.set_prefix("PDF engine");
    dl_bar.enable_steady_tick(Duration::from_millis(80));

    let bar = dl_bar.clone();
    let env = prepare_environment(
        &cli.tesseract_cmd,
        Some(&|downloaded, total| {
            if let Some(t) = total {
                bar.set_length(t);
            }
            bar.set_position(downloaded);
        }),
    );

    match env {
        Ok(env) => {
            dl_bar.finish_with_message("ready ✓");
            Ok(env)
        }
        Err(e) => {
            dl_bar.finish_and_clear();
            Err(e).context("Environment setup failed")
        }
    }
}

/// Combine after a successful extraction. The page files are already on
/// disk, so a failure here is reported but does not fail the run.
async fn combine_after_extraction(
    cli: &Cli,
    output_dir: &Path,
) -> std::result::Result<CombineReport, String> {
    run_combine(cli, output_dir).await.map_err(|e| {
        let message = format!("{e:#}");
        eprintln!("{} {}", red("✗"), message);
        message
    })
}

async fn run_combine(cli: &Cli, output_dir: &Path) -> Result<CombineReport> {
    let report = combine_pages(output_dir, &cli.combined_file)
        .await
        .context("Combine failed")?;

    if !cli.quiet {
        let mark = if report.is_complete() {
            green("✔")
        } else {
            cyan("⚠")
        };
        eprintln!(
            "{} Combined text saved to {}  {}",
            mark,
            bold(&report.combined_path.display().to_string()),
            dim(&format!("({} pages)", report.pages_combined)),
        );
        for skipped in &report.skipped {
            eprintln!("  {} {}", red("✗"), skipped);
        }
    }

    Ok(report)
}
