use ascolto::infrastructure::observability::preview_text;

#[test]
fn given_blank_text_when_previewing_then_marks_it_empty() {
    assert_eq!(preview_text(""), "[EMPTY]");
    assert_eq!(preview_text(" \n\t "), "[EMPTY]");
}

#[test]
fn given_multiline_text_when_previewing_then_returns_single_line() {
    assert_eq!(preview_text("uno\ndue   tre"), "uno due tre");
}

#[test]
fn given_long_text_when_previewing_then_truncates_with_total() {
    let text = "è".repeat(150);

    let preview = preview_text(&text);

    assert!(preview.starts_with(&"è".repeat(100)));
    assert!(preview.ends_with("... (150 chars total)"));
}

#[test]
fn given_exactly_limit_when_previewing_then_keeps_everything() {
    let text = "a".repeat(100);

    assert_eq!(preview_text(&text), text);
}
