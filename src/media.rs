//! Image URL recognition, shared by extraction and fetching.

use std::sync::LazyLock;

use regex::Regex;

/// Extension used when a URL carries no recognizable image extension.
pub const DEFAULT_EXTENSION: &str = "jpg";

static IMAGE_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpe?g|png|gif)(\?.*)?$").unwrap());

/// `true` if the URL path ends in `.jpg`, `.jpeg`, `.png` or `.gif`,
/// optionally followed by a query string.
pub fn is_image_url(url: &str) -> bool {
    IMAGE_URL_REGEX.is_match(url)
}

/// The lowercase image extension of a URL, if it has one.
pub fn image_extension(url: &str) -> Option<String> {
    IMAGE_URL_REGEX
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// The URL's image extension, or [`DEFAULT_EXTENSION`].
pub fn extension_or_default(url: &str) -> String {
    image_extension(url).unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_image_urls() {
        assert!(is_image_url("https://sun9-1.userapi.com/c1/a.jpg"));
        assert!(is_image_url("https://sun9-1.userapi.com/c1/a.JPEG"));
        assert!(is_image_url("https://x/y.png?size=large&quality=95"));
        assert!(is_image_url("https://x/y.gif"));
        assert!(!is_image_url("https://x/doc.pdf"));
        assert!(!is_image_url("https://vk.com/photo1_2"));
        assert!(!is_image_url("https://x/a.jpg.html"));
    }

    #[test]
    fn test_extension() {
        assert_eq!(image_extension("https://x/y.png?size=large").as_deref(), Some("png"));
        assert_eq!(image_extension("https://x/y.JPeG").as_deref(), Some("jpeg"));
        assert_eq!(image_extension("https://x/y"), None);
        assert_eq!(extension_or_default("https://x/y"), "jpg");
    }
}
