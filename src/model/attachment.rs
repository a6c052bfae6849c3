//! Dated chat attachments.

use std::fmt;

use chrono::NaiveDateTime;

/// Canonical, locale-independent timestamp format.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An image attached to a chat message.
///
/// Equality and hashing cover both fields, so a set of attachments drops
/// exact duplicates but keeps the same URL sent at two different times.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Attachment {
    pub url: String,
    pub timestamp: Timestamp,
}

impl Attachment {
    pub fn new(url: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            url: url.into(),
            timestamp: Timestamp(timestamp),
        }
    }
}

/// Message time, displayed as `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(pub NaiveDateTime);

impl Timestamp {
    /// The canonical string form used in filenames.
    pub fn canonical(&self) -> String {
        self.0.format(CANONICAL_FORMAT).to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}
