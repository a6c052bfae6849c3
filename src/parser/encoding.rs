//! Decode archive pages of unknown encoding.
//!
//! Exports come either from a UTF-8 pipeline or from an older one that
//! wrote windows-1251. Decoding never fails: anything that is not valid
//! UTF-8 is read as windows-1251 with replacement characters.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
use regex::bytes::Regex;
use tracing::{debug, warn};

/// How far into the page to look for a `<meta charset>` declaration.
const SNIFF_LIMIT: usize = 1024;

static META_CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*?charset\s*=\s*["']?([A-Za-z0-9_.:\-]+)"#).unwrap()
});

/// The encoding a page was actually decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEncoding {
    Utf8,
    Windows1251,
}

/// A decoded archive page.
#[derive(Debug, Clone)]
pub struct ArchivePage {
    pub text: String,
    pub encoding: PageEncoding,
    /// Encoding announced by a BOM or `<meta charset>`, if any.
    pub declared: Option<&'static Encoding>,
}

/// Decode raw page bytes.
///
/// Strict UTF-8 is tried first. A failed decode, or a declaration naming
/// an encoding other than UTF-8 or windows-1251, falls back to a lossy
/// windows-1251 decode.
pub fn resolve(bytes: &[u8]) -> ArchivePage {
    let declared = sniff(bytes);
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    if let Some(encoding) = declared {
        if encoding != UTF_8 && encoding != WINDOWS_1251 {
            warn!(
                declared = encoding.name(),
                "Unsupported page encoding declared, decoding as windows-1251"
            );
            return legacy(body, declared);
        }
    }

    match std::str::from_utf8(body) {
        Ok(text) => ArchivePage {
            text: text.to_string(),
            encoding: PageEncoding::Utf8,
            declared,
        },
        Err(_) => legacy(body, declared),
    }
}

fn legacy(bytes: &[u8], declared: Option<&'static Encoding>) -> ArchivePage {
    let (text, had_errors) = WINDOWS_1251.decode_without_bom_handling(bytes);
    if had_errors {
        debug!("Replaced undecodable bytes while reading windows-1251 page");
    }
    ArchivePage {
        text: text.into_owned(),
        encoding: PageEncoding::Windows1251,
        declared,
    }
}

/// Detect a declared encoding from a byte-order mark or `<meta charset>`.
fn sniff(bytes: &[u8]) -> Option<&'static Encoding> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Some(encoding);
    }
    let head = &bytes[..bytes.len().min(SNIFF_LIMIT)];
    let label = META_CHARSET_REGEX.captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes())
}
