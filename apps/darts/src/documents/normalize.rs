//! Text Normalizer: strips list markers and re-spaces model output.
//!
//! Both transforms are pure and idempotent: applying either one twice gives
//! the same result as applying it once.

use std::sync::LazyLock;

use regex::Regex;

/// A leading ordinal ("12.") or bullet glyph ("-", "*", "•") plus trailing spaces.
static LEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+\.|[-*•])\s*").expect("marker regex is valid"));

/// Strips list markers and asterisks, trims every line and drops empty lines.
///
/// Markers are stripped repeatedly ("1. - item" becomes "item") and asterisks
/// are removed from each line before it is trimmed, which keeps the
/// transform idempotent.
pub fn remove_formatting_marks(text: &str) -> String {
    text.lines()
        .filter_map(|line| {
            let line = line.replace('*', "");
            let mut rest = line.trim();
            while let Some(marker) = LEADING_MARKER.find(rest) {
                rest = rest[marker.end()..].trim_start();
            }
            let rest = rest.trim_end();
            (!rest.is_empty()).then(|| rest.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rejoins non-empty trimmed lines with a blank line between each.
pub fn format_with_spacing(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Cleanup applied to every piece of generated content shown to a user.
pub fn clean_generated(text: &str) -> String {
    format_with_spacing(&remove_formatting_marks(text))
}
