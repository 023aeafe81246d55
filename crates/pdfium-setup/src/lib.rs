//! # pdfium-setup
//!
//! One-time, per-host provisioning of the [PDFium](https://pdfium.googlesource.com/pdfium/)
//! shared library used by `pdfium-render`.
//!
//! [`ensure_library`] is idempotent: the first call on a fresh host downloads
//! the platform archive from
//! [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries)
//! and unpacks the library into a versioned cache directory. Every later call
//! (in this process or a future one) finds the cached copy and returns
//! without touching the network. The returned [`Provisioned`] value tells the
//! caller which of the three cases applied.
//!
//! ```rust,no_run
//! use pdfium_setup::{bind, ensure_library};
//!
//! let provisioned = ensure_library(None).expect("PDFium unavailable");
//! let pdfium = bind(Some(provisioned.path())).expect("bind failed");
//! # drop(pdfium);
//! ```
//!
//! ## Environment variables
//!
//! - `PDF2TXT_PDFIUM_LIB` — use this library file and skip the cache.
//! - `PDF2TXT_CACHE_DIR` — root directory for the cache.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pdfium_render::prelude::Pdfium;
use thiserror::Error;

/// pdfium-binaries release tag (`chromium/<VERSION>`).
pub const PDFIUM_VERSION: &str = "7690";

/// Explicit library path override.
pub const LIBRARY_ENV: &str = "PDF2TXT_PDFIUM_LIB";

/// Cache root override.
pub const CACHE_DIR_ENV: &str = "PDF2TXT_CACHE_DIR";

const RELEASE_BASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Errors raised while provisioning or binding PDFium.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("No PDFium build is published for {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Cannot prepare cache directory '{path}': {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Downloading {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("Unpacking the PDFium archive failed: {0}")]
    Extract(String),

    #[error("Failed to load PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },
}

/// Outcome of [`ensure_library`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned {
    /// `PDF2TXT_PDFIUM_LIB` pointed at an existing file.
    Override(PathBuf),
    /// The library was already present in the cache; nothing was done.
    Cached(PathBuf),
    /// The library was fetched and unpacked by this call.
    Downloaded(PathBuf),
}

impl Provisioned {
    /// Path to the shared library on disk.
    pub fn path(&self) -> &Path {
        match self {
            Provisioned::Override(p) | Provisioned::Cached(p) | Provisioned::Downloaded(p) => p,
        }
    }

    pub fn was_downloaded(&self) -> bool {
        matches!(self, Provisioned::Downloaded(_))
    }

    /// How a later call in the same process sees this result: a download
    /// has become a cache hit, everything else is unchanged.
    fn on_reuse(&self) -> Provisioned {
        match self {
            Provisioned::Downloaded(p) => Provisioned::Cached(p.clone()),
            other => other.clone(),
        }
    }
}

// ── Platform assets ──────────────────────────────────────────────────────────

struct Asset {
    os: &'static str,
    arch: &'static str,
    archive: &'static str,
    member: &'static str,
    file_name: &'static str,
}

const ASSETS: &[Asset] = &[
    Asset { os: "linux", arch: "x86_64", archive: "pdfium-linux-x64.tgz", member: "lib/libpdfium.so", file_name: "libpdfium.so" },
    Asset { os: "linux", arch: "aarch64", archive: "pdfium-linux-arm64.tgz", member: "lib/libpdfium.so", file_name: "libpdfium.so" },
    Asset { os: "macos", arch: "x86_64", archive: "pdfium-mac-x64.tgz", member: "lib/libpdfium.dylib", file_name: "libpdfium.dylib" },
    Asset { os: "macos", arch: "aarch64", archive: "pdfium-mac-arm64.tgz", member: "lib/libpdfium.dylib", file_name: "libpdfium.dylib" },
    Asset { os: "windows", arch: "x86_64", archive: "pdfium-win-x64.tgz", member: "bin/pdfium.dll", file_name: "pdfium.dll" },
    Asset { os: "windows", arch: "aarch64", archive: "pdfium-win-arm64.tgz", member: "bin/pdfium.dll", file_name: "pdfium.dll" },
];

fn asset_for(os: &str, arch: &str) -> Result<&'static Asset, SetupError> {
    ASSETS
        .iter()
        .find(|a| a.os == os && a.arch == arch)
        .ok_or_else(|| SetupError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        })
}

fn host_asset() -> Result<&'static Asset, SetupError> {
    asset_for(std::env::consts::OS, std::env::consts::ARCH)
}

// ── Cache location ───────────────────────────────────────────────────────────

/// Versioned directory holding the cached library.
///
/// `~/.cache/pdf2txt/pdfium-{VERSION}` on Linux, the platform cache dir
/// elsewhere, or `$PDF2TXT_CACHE_DIR/pdfium-{VERSION}` when set.
pub fn cache_dir() -> PathBuf {
    cache_dir_from(std::env::var_os(CACHE_DIR_ENV))
}

fn cache_dir_from(root_override: Option<OsString>) -> PathBuf {
    let versioned = format!("pdfium-{PDFIUM_VERSION}");
    if let Some(root) = root_override.filter(|r| !r.is_empty()) {
        return PathBuf::from(root).join(versioned);
    }

    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir)
        .join("pdf2txt")
        .join(versioned)
}

/// Library path if it is already available without any download.
pub fn installed_library() -> Option<PathBuf> {
    let asset = host_asset().ok()?;
    existing_library(std::env::var_os(LIBRARY_ENV), &cache_dir(), asset)
        .map(|p| p.path().to_path_buf())
}

fn existing_library(
    library_override: Option<OsString>,
    cache: &Path,
    asset: &Asset,
) -> Option<Provisioned> {
    if let Some(p) = library_override.map(PathBuf::from) {
        if p.is_file() {
            return Some(Provisioned::Override(p));
        }
    }
    let cached = cache.join(asset.file_name);
    cached.is_file().then_some(Provisioned::Cached(cached))
}

// ── Provisioning ─────────────────────────────────────────────────────────────

static PROVISIONED: OnceLock<Provisioned> = OnceLock::new();

/// Make sure the PDFium library exists on this host, downloading it once.
///
/// `on_progress` receives `(bytes_downloaded, total_bytes)` while the archive
/// streams in. It is never called when no download is needed.
pub fn ensure_library(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<Provisioned, SetupError> {
    if let Some(done) = PROVISIONED.get() {
        return Ok(done.on_reuse());
    }

    let asset = host_asset()?;
    let cache = cache_dir();

    let provisioned = match existing_library(std::env::var_os(LIBRARY_ENV), &cache, asset) {
        Some(found) => found,
        None => {
            if let Some(p) = std::env::var_os(LIBRARY_ENV) {
                eprintln!(
                    "pdfium-setup: {LIBRARY_ENV}='{}' does not exist; using the cache instead",
                    PathBuf::from(p).display()
                );
            }
            Provisioned::Downloaded(download_into(&cache, asset, on_progress)?)
        }
    };

    let _ = PROVISIONED.set(provisioned.clone());
    Ok(provisioned)
}

/// Bind `pdfium-render` to the library at `path`, or to the system library
/// when `path` is `None`.
pub fn bind(path: Option<&Path>) -> Result<Pdfium, SetupError> {
    let bindings = match path {
        Some(p) => Pdfium::bind_to_library(p).map_err(|e| SetupError::Bind {
            path: p.to_path_buf(),
            reason: e.to_string(),
        })?,
        None => Pdfium::bind_to_system_library().map_err(|e| SetupError::Bind {
            path: PathBuf::from(Pdfium::pdfium_platform_library_name()),
            reason: e.to_string(),
        })?,
    };
    Ok(Pdfium::new(bindings))
}

fn download_into(
    cache: &Path,
    asset: &Asset,
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, SetupError> {
    std::fs::create_dir_all(cache).map_err(|source| SetupError::CacheDir {
        path: cache.to_path_buf(),
        source,
    })?;

    let url = format!(
        "{RELEASE_BASE_URL}/chromium%2F{PDFIUM_VERSION}/{}",
        asset.archive
    );
    let archive = fetch(&url, on_progress)?;

    // Unpack next to the final name, then rename, so an interrupted run never
    // leaves a truncated library that a later call would treat as cached.
    let target = cache.join(asset.file_name);
    let partial = cache.join(format!("{}.part", asset.file_name));
    unpack_member(&archive, asset.member, &partial)?;
    std::fs::rename(&partial, &target).map_err(|source| SetupError::CacheDir {
        path: target.clone(),
        source,
    })?;

    Ok(target)
}

fn fetch(url: &str, on_progress: Option<&dyn Fn(u64, Option<u64>)>) -> Result<Vec<u8>, SetupError> {
    let download_err = |reason: String| SetupError::Download {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-setup/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| download_err(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| download_err(e.to_string()))?;

    if !response.status().is_success() {
        return Err(download_err(format!("HTTP {}", response.status())));
    }

    let total = response.content_length();
    let mut body = Vec::with_capacity(total.unwrap_or(32 * 1024 * 1024) as usize);
    let mut chunk = [0u8; 64 * 1024];

    loop {
        let n = match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(download_err(e.to_string())),
        };
        body.extend_from_slice(&chunk[..n]);
        if let Some(cb) = on_progress {
            cb(body.len() as u64, total);
        }
    }

    Ok(body)
}

/// Copy the archive entry named `member` out of a `.tgz` into `dest`.
fn unpack_member(archive: &[u8], member: &str, dest: &Path) -> Result<(), SetupError> {
    let extract_err = |e: std::io::Error| SetupError::Extract(e.to_string());
    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(archive));

    for entry in tar.entries().map_err(extract_err)? {
        let mut entry = entry.map_err(extract_err)?;
        if entry.path().map_err(extract_err)?.to_string_lossy() == member {
            entry.unpack(dest).map_err(extract_err)?;
            return Ok(());
        }
    }

    Err(SetupError::Extract(format!("'{member}' is missing from the archive")))
}
