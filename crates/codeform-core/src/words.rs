//! Word count shown under the description box.

/// Count whitespace-separated words.
///
/// Returns `None` for empty text so nothing is displayed; any other text yields the
/// number of non-empty tokens.
pub fn word_count(text: &str) -> Option<usize> {
    if text.is_empty() {
        return None;
    }
    Some(text.split_whitespace().count())
}

/// Label rendered next to the description, e.g. `3 word(s)`.
pub fn word_count_label(text: &str) -> Option<String> {
    word_count(text).map(|n| format!("{} word(s)", n))
}
