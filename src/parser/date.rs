//! Message header dates in the two locales the export is produced in.
//!
//! English headers read `Name, 15 Mar 2021 at 10:30:00 pm`; Russian ones
//! read `Имя, 15 мар 2021 в 22:30:00` on a 24-hour clock. Either may end
//! with an edit marker.

use chrono::{Month, NaiveDateTime};

const ENGLISH_FORMAT: &str = "%d %b %Y at %I:%M:%S %p";
const RUSSIAN_FORMAT: &str = "%d %b %Y at %H:%M:%S";

const EDIT_MARKERS: [&str; 2] = ["(edited)", "(ред.)"];

/// Three-letter Cyrillic month abbreviations.
const RUSSIAN_MONTHS: [(&str, Month); 12] = [
    ("янв", Month::January),
    ("фев", Month::February),
    ("мар", Month::March),
    ("апр", Month::April),
    ("мая", Month::May),
    ("июн", Month::June),
    ("июл", Month::July),
    ("авг", Month::August),
    ("сен", Month::September),
    ("окт", Month::October),
    ("ноя", Month::November),
    ("дек", Month::December),
];

/// Parse the date out of a message header.
///
/// Returns `None` for headers that match neither locale.
pub fn parse_header_date(header: &str) -> Option<NaiveDateTime> {
    let text = strip_sender(header);
    let text = strip_edit_markers(text);

    if let Ok(dt) = NaiveDateTime::parse_from_str(&text, ENGLISH_FORMAT) {
        return Some(dt);
    }

    let translated = translate_russian(&text)?;
    NaiveDateTime::parse_from_str(&translated, RUSSIAN_FORMAT).ok()
}

/// Drop the leading `sender, ` part. Dates never contain a comma.
fn strip_sender(header: &str) -> &str {
    match header.rsplit_once(',') {
        Some((_, rest)) => rest,
        None => header,
    }
}

/// Remove edit markers and collapse whitespace runs to single spaces.
fn strip_edit_markers(text: &str) -> String {
    let mut text = text.to_string();
    for marker in EDIT_MARKERS {
        text = text.replace(marker, " ");
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rewrite a Russian header into the English-month form chrono can read.
///
/// Returns `None` if no Cyrillic month is present.
fn translate_russian(text: &str) -> Option<String> {
    let mut found_month = false;
    let tokens: Vec<String> = text
        .split(' ')
        .map(|token| {
            if token == "в" {
                return "at".to_string();
            }
            match russian_month(token) {
                Some(month) => {
                    found_month = true;
                    month.name()[..3].to_string()
                }
                None => token.to_string(),
            }
        })
        .collect();

    found_month.then(|| tokens.join(" "))
}

fn russian_month(token: &str) -> Option<Month> {
    let token = token.trim_end_matches('.').to_lowercase();
    RUSSIAN_MONTHS
        .iter()
        .find(|(abbr, _)| token.starts_with(abbr))
        .map(|(_, month)| *month)
}
