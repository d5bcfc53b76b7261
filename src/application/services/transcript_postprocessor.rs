/// Shown instead of an empty transcript.
pub const NO_SPEECH_TEXT: &str = "Nessun audio rilevato o audio non comprensibile.";

const PLACEHOLDER_TOKENS: &[&str] = &["<s>", "</s>", "<pad>", "<unk>", "[PAD]", "[UNK]"];
const CTC_WORD_DELIMITER: &str = "|";
const MIN_CHARS_FOR_PERIOD: usize = 10;

/// Cleans raw backend output into display text.
#[derive(Debug, Clone)]
pub struct TranscriptPostprocessor {
    empty_text: String,
}

impl Default for TranscriptPostprocessor {
    fn default() -> Self {
        Self::new(NO_SPEECH_TEXT)
    }
}

impl TranscriptPostprocessor {
    pub fn new(empty_text: impl Into<String>) -> Self {
        Self {
            empty_text: empty_text.into(),
        }
    }

    pub fn empty_text(&self) -> &str {
        &self.empty_text
    }

    /// Returns the cleaned text, or the no-speech text when nothing is left.
    pub fn process(&self, raw: &str) -> String {
        let cleaned = clean_transcript(raw);
        if cleaned.is_empty() {
            self.empty_text.clone()
        } else {
            cleaned
        }
    }
}

/// Strips placeholder tokens, collapses whitespace, capitalizes sentences and
/// closes text longer than ten characters with a period.
pub fn clean_transcript(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    for token in PLACEHOLDER_TOKENS {
        text = text.replace(token, "");
    }
    text = text.replace(CTC_WORD_DELIMITER, " ");

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return collapsed;
    }

    let mut result = collapsed
        .split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(". ");

    if !result.ends_with('.') && result.chars().count() > MIN_CHARS_FOR_PERIOD {
        result.push('.');
    }

    result
}

fn capitalize_first(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
