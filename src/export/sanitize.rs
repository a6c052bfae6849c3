//! Map arbitrary display strings to safe path segments.

/// Longest path segment accepted by common filesystems, in bytes.
pub const MAX_SEGMENT_LEN: usize = 255;

/// Segment used when nothing printable survives sanitizing.
const EMPTY_NAME: &str = "unnamed";

/// Sanitize a string for use as a single file or directory name.
///
/// Replaces `< > : " / \ | ? *` with `_`, cuts the result to
/// [`MAX_SEGMENT_LEN`] bytes on a character boundary, and strips trailing
/// dots. Total and idempotent.
pub fn sanitize(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if is_reserved(c) { '_' } else { c })
        .collect();

    let cut = truncate_on_char_boundary(&replaced, MAX_SEGMENT_LEN);
    let trimmed = cut.trim_end_matches('.');

    if trimmed.is_empty() {
        EMPTY_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build `{stem}.{ext}` where the whole name still fits in one segment.
///
/// The stem is sanitized and shortened as needed so the extension is
/// never cut off.
pub fn file_name(stem: &str, ext: &str) -> String {
    let stem = sanitize(stem);
    let budget = MAX_SEGMENT_LEN.saturating_sub(ext.len() + 1);
    let stem = truncate_on_char_boundary(&stem, budget).trim_end_matches('.');
    let stem = if stem.is_empty() { EMPTY_NAME } else { stem };
    format!("{stem}.{ext}")
}

fn is_reserved(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
}

fn truncate_on_char_boundary(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESERVED: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

    #[test]
    fn test_replaces_reserved_characters() {
        assert_eq!(sanitize(r#"a<b>c:d"e/f\g|h?i*j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize("2021-03-15 22:30:00"), "2021-03-15 22_30_00");
    }

    #[test]
    fn test_strips_trailing_dots() {
        assert_eq!(sanitize("Summer..."), "Summer");
        assert_eq!(sanitize("v1.2"), "v1.2");
        assert_eq!(sanitize(".."), "unnamed");
        assert_eq!(sanitize(""), "unnamed");
    }

    #[test]
    fn test_truncates_long_names() {
        let long = "x".repeat(300);
        assert_eq!(sanitize(&long).len(), MAX_SEGMENT_LEN);

        // Two-byte characters never get split in half.
        let cyrillic = "ж".repeat(200);
        let out = sanitize(&cyrillic);
        assert!(out.len() <= MAX_SEGMENT_LEN);
        assert!(out.chars().all(|c| c == 'ж'));
    }

    #[test]
    fn test_truncation_does_not_expose_trailing_dot() {
        let mut name = "a".repeat(254);
        name.push('.');
        name.push_str("bbb");
        let out = sanitize(&name);
        assert!(!out.ends_with('.'));
        assert_eq!(out, "a".repeat(254));
    }

    #[test]
    fn test_properties_hold_for_awkward_inputs() {
        let inputs = [
            "plain",
            "Мой альбом: лето 2019",
            "...",
            "a.b.c.",
            "???",
            "con/../etc/passwd",
            " trailing space ",
            "emoji 🎉🎉🎉.",
            &"ю.".repeat(200),
            &format!("{}.", "q".repeat(255)),
        ];
        for input in inputs {
            let once = sanitize(input);
            assert!(!once.chars().any(|c| RESERVED.contains(&c)), "{once:?}");
            assert!(once.chars().count() <= MAX_SEGMENT_LEN);
            assert!(!once.ends_with('.'), "{once:?}");
            assert_eq!(sanitize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_file_name_keeps_extension() {
        assert_eq!(file_name("beach", "png"), "beach.png");
        assert_eq!(file_name("2021-03-15 22:30:00", "jpg"), "2021-03-15 22_30_00.jpg");

        let long = file_name(&"z".repeat(400), "jpeg");
        assert_eq!(long.len(), MAX_SEGMENT_LEN);
        assert!(long.ends_with(".jpeg"));
    }
}
