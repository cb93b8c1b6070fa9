// WHY: sentence splitting runs on a copy of the text with every '\n' replaced by one space
// The replacement is char-for-char so sentence strings keep the raw text's length

/// Replace every newline with a single space
pub fn collapse_newlines(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    collapse_newlines_into(text, &mut result);
    result
}

/// Replace every newline with a single space, writing into a reused buffer
pub fn collapse_newlines_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());
    buffer.extend(text.chars().map(|ch| if ch == '\n' { ' ' } else { ch }));
}
