use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// Unicode punctuation except the ASCII apostrophe.
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{P}--']").unwrap());

/// Lowercases, strips punctuation (keeping apostrophes) and collapses
/// whitespace so reference and hypothesis compare on words alone.
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    let apostrophes = composed.replace(|c| matches!(c, '\u{2019}' | '\u{2018}' | '\u{02BC}'), "'");
    let lowered = apostrophes.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, "");

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn words(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}
