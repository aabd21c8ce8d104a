use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the bundlesize crates.
pub type Result<T> = std::result::Result<T, BundleSizeError>;

#[derive(Debug, Error)]
pub enum BundleSizeError {
    #[error("Config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Config file already exists: {}", path.display())]
    ConfigAlreadyExists { path: PathBuf },

    #[error("Failed to parse config {}: {details}", path.display())]
    ConfigParse { path: PathBuf, details: String },

    #[error("Invalid config: {details}")]
    InvalidConfigShape { details: String },

    #[error("Invalid size format: {input}")]
    InvalidSizeFormat { input: String },

    /// Only produced while scanning; the scanner skips the subtree and keeps going.
    #[error("Permission denied: {}", path.display())]
    FileSystemAccessDenied { path: PathBuf },

    #[error("Failed to watch {}: {details}", path.display())]
    WatchSetupFailure { path: PathBuf, details: String },

    #[error("IO failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BundleSizeError {
    /// Convenience constructor for IO errors with a known path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io { path: path.as_ref().to_path_buf(), source }
    }

    /// Classify a filesystem error, keeping permission failures distinct.
    pub fn from_fs(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => {
                Self::FileSystemAccessDenied { path: path.as_ref().to_path_buf() }
            }
            _ => Self::io(path, source),
        }
    }

    pub fn invalid_shape(details: impl Into<String>) -> Self {
        Self::InvalidConfigShape { details: details.into() }
    }
}
