//! Content-type allow lists.

use std::collections::BTreeSet;

/// The set of content types a fetch accepts.
///
/// Built fresh for every run from configuration; matching ignores case and
/// any `; charset=...` style parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimePolicy {
    allowed: BTreeSet<String>,
}

impl MimePolicy {
    pub fn new<S: AsRef<str>>(types: &[S]) -> Self {
        Self {
            allowed: types.iter().map(|t| essence(t.as_ref())).collect(),
        }
    }

    /// `true` if a response declaring `content_type` may be saved.
    pub fn allows(&self, content_type: &str) -> bool {
        self.allowed.contains(&essence(content_type))
    }
}

/// `"Image/PNG; q=1"` -> `"image/png"`.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
