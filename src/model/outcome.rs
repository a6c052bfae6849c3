//! Terminal outcomes of a single fetch.

use std::path::PathBuf;

use serde::Serialize;

/// How a fetch ended. No outcome is ever retried after it is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The body was written to `path` (extension corrected from the URL).
    Downloaded { path: PathBuf, bytes: u64 },
    /// The destination already existed and re-download was not forced.
    SkippedExisting(PathBuf),
    /// The server answered 4xx.
    SkippedClientError(u16),
    /// The server answered with a content type outside the allowed set.
    SkippedWrongMime(String),
    /// Every attempt hit a 5xx or a transport failure.
    FailedExhausted { attempts: u32 },
    /// The run was cancelled before or during this fetch.
    Cancelled,
}

impl FetchOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Downloaded { .. } => OutcomeKind::Downloaded,
            Self::SkippedExisting(_) => OutcomeKind::SkippedExisting,
            Self::SkippedClientError(_) => OutcomeKind::SkippedClientError,
            Self::SkippedWrongMime(_) => OutcomeKind::SkippedWrongMime,
            Self::FailedExhausted { .. } => OutcomeKind::FailedExhausted,
            Self::Cancelled => OutcomeKind::Cancelled,
        }
    }
}

/// Field-less mirror of [`FetchOutcome`], used for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Downloaded,
    SkippedExisting,
    SkippedClientError,
    SkippedWrongMime,
    FailedExhausted,
    Cancelled,
}

impl OutcomeKind {
    pub const ALL: [OutcomeKind; 6] = [
        Self::Downloaded,
        Self::SkippedExisting,
        Self::SkippedClientError,
        Self::SkippedWrongMime,
        Self::FailedExhausted,
        Self::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Downloaded => "Downloaded",
            Self::SkippedExisting => "Already present",
            Self::SkippedClientError => "Client errors (4xx)",
            Self::SkippedWrongMime => "Wrong content type",
            Self::FailedExhausted => "Failed after retries",
            Self::Cancelled => "Cancelled",
        }
    }
}
