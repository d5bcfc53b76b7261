const MAX_VISIBLE_CHARS: usize = 100;

/// Bounded, single-line rendering of transcript text for logs.
pub fn preview_text(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let single_line = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    let total = single_line.chars().count();
    if total > MAX_VISIBLE_CHARS {
        let visible: String = single_line.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", visible, total)
    } else {
        single_line
    }
}
