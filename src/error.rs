//! Centralized error types for vkrescue.
//!
//! Only failures that make continuing pointless end up here: the
//! destination tree cannot be written, the source root is missing, or the
//! HTTP client cannot be built. Per-attachment problems are reported as
//! [`FetchOutcome`](crate::model::outcome::FetchOutcome) values instead.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the vkrescue library.
#[derive(Error, Debug)]
pub enum RescueError {
    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The archive root does not exist.
    #[error("Archive root not found: {0}")]
    RootNotFound(PathBuf),

    /// The archive root exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for `Result<T, RescueError>`.
pub type Result<T> = std::result::Result<T, RescueError>;

impl RescueError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
