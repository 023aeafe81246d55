//! Run-mode resolution: map raw command-line arguments onto what to do.
//!
//! Kept in the library so the argument rules are unit-tested without
//! spawning the binary. Resolution touches nothing on disk.

use crate::error::Pdf2TxtError;
use std::path::PathBuf;

/// What a single invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Rasterise + OCR the PDF, then optionally combine the pages.
    Extract {
        pdf_path: PathBuf,
        output_dir: PathBuf,
        combine: bool,
    },
    /// Only combine page files already present in `output_dir`.
    CombineOnly { output_dir: PathBuf },
}

impl RunMode {
    /// Decide the mode from the four user-facing arguments.
    ///
    /// `skip_extraction` together with `combine` selects combine-only mode,
    /// which requires `output_dir` and ignores `pdf_path`. Every other
    /// combination, including `skip_extraction` on its own, is extraction
    /// and needs both paths.
    pub fn resolve(
        pdf_path: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        combine: bool,
        skip_extraction: bool,
    ) -> Result<Self, Pdf2TxtError> {
        if skip_extraction && combine {
            let output_dir = output_dir.ok_or_else(|| {
                Pdf2TxtError::MissingArgument(
                    "--output-dir is required when using --skip-extraction and --combine".into(),
                )
            })?;
            return Ok(RunMode::CombineOnly { output_dir });
        }

        match (pdf_path, output_dir) {
            (Some(pdf_path), Some(output_dir)) => Ok(RunMode::Extract {
                pdf_path,
                output_dir,
                combine,
            }),
            _ => Err(Pdf2TxtError::MissingArgument(
                "Both --pdf-path and --output-dir are required for extraction".into(),
            )),
        }
    }

    pub fn output_dir(&self) -> &std::path::Path {
        match self {
            RunMode::Extract { output_dir, .. } | RunMode::CombineOnly { output_dir } => output_dir,
        }
    }
}
