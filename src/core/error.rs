use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the bundler.
/// Every module returns `Result<T, BundlerError>`.
#[derive(Debug, Error)]
pub enum BundlerError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Could not obtain a verified copy of {url} at {path:?}")]
    VerificationFailed { url: String, path: PathBuf },

    // ── Metadata ────────────────────────────────────────
    #[error("Minecraft version {0} not found in manifest")]
    VersionNotFound(String),

    #[error("Version {0} has no client download")]
    MissingClientDownload(String),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Configuration ───────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ── Archive ─────────────────────────────────────────
    #[error("Target archive {path:?} is unavailable: {source}")]
    TargetUnavailable {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── Launch script ───────────────────────────────────
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type BundlerResult<T> = Result<T, BundlerError>;

impl From<std::io::Error> for BundlerError {
    fn from(source: std::io::Error) -> Self {
        BundlerError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl BundlerError {
    /// Attach a path to an IO error. Used with `map_err`.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| BundlerError::Io { path, source }
    }
}
