//! Classification of single-attempt failures.
//!
//! Server errors, transport failures and stalls are retried; client errors and
//! content-type mismatches end the fetch; `Fatal` aborts the run.

use thiserror::Error;

use crate::error::RescueError;

/// Why one request attempt did not produce a file.
#[derive(Debug, Error)]
pub(crate) enum AttemptError {
    /// 4xx: the resource is gone or forbidden.
    #[error("client error: HTTP {0}")]
    ClientError(u16),

    /// 5xx: the server may recover.
    #[error("server error: HTTP {0}")]
    ServerError(u16),

    /// DNS failure, refused or reset connection, or a body cut short.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// No response head or body chunk arrived in time.
    #[error("timed out after {0:?} without data")]
    Timeout(std::time::Duration),

    /// The server answered with something that is not an accepted image.
    #[error("content type '{0}' not allowed")]
    WrongMime(String),

    /// The destination could not be written. Aborts the run.
    #[error(transparent)]
    Fatal(RescueError),
}
