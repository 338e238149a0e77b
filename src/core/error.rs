use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`LauncherError`], for callers that need to
/// branch on the failure family without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Fetch,
    Integrity,
    Schema,
    FileSystem,
    Incomplete,
    Cancelled,
}

/// Central error type for the launch pipeline.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
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

    #[error("Version {0} not found in catalog")]
    VersionNotFound(String),

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    IntegrityMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Schema ──────────────────────────────────────────
    #[error("Invalid {document}: {reason}")]
    Schema { document: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── Pipeline ────────────────────────────────────────
    #[error("Version {version} is not fully installed ({failures} missing files)")]
    IncompleteInstall { version: String, failures: usize },

    #[error("Version {0} is not installed")]
    NotInstalled(String),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl LauncherError {
    pub fn schema(document: impl Into<String>, reason: impl Into<String>) -> Self {
        LauncherError::Schema {
            document: document.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LauncherError::Http(_)
            | LauncherError::DownloadFailed { .. }
            | LauncherError::VersionNotFound(_) => ErrorKind::Fetch,
            LauncherError::IntegrityMismatch { .. } => ErrorKind::Integrity,
            LauncherError::Schema { .. } | LauncherError::Json(_) | LauncherError::Zip(_) => {
                ErrorKind::Schema
            }
            LauncherError::Io { .. } => ErrorKind::FileSystem,
            LauncherError::IncompleteInstall { .. } | LauncherError::NotInstalled(_) => {
                ErrorKind::Incomplete
            }
            LauncherError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether a later attempt at the same target can succeed without
    /// any change to the inputs.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Fetch | ErrorKind::Integrity | ErrorKind::Cancelled
        )
    }
}

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

// ── Serialization for the UI layer ──────────────────────
// Callers surface errors as plain strings.
impl serde::Serialize for LauncherError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
