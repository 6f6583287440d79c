pub const SNIPPET_CHARS: usize = 140;
pub const ELLIPSIS: &str = "...";

/// First [`SNIPPET_CHARS`] characters of `text`, trimmed, with [`ELLIPSIS`] appended iff
/// `text` is longer than that.
pub fn make_snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", text[..cut].trim()),
        None => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{make_snippet, ELLIPSIS, SNIPPET_CHARS};

    #[test]
    fn short_text_kept_as_is() {
        assert_eq!(make_snippet("short message"), "short message");
    }

    #[test]
    fn exactly_the_limit_gets_no_marker() {
        let text = "a".repeat(SNIPPET_CHARS);
        assert_eq!(make_snippet(&text), text);
    }

    #[test]
    fn long_text_is_cut_and_marked() {
        let text = "a".repeat(SNIPPET_CHARS + 1);
        let snippet = make_snippet(&text);
        assert!(snippet.ends_with(ELLIPSIS));
        assert_eq!(snippet.chars().count(), SNIPPET_CHARS + ELLIPSIS.len());
    }

    #[test]
    fn cut_counts_characters_not_bytes() {
        let text = "é".repeat(SNIPPET_CHARS + 5);
        let snippet = make_snippet(&text);
        assert_eq!(snippet, format!("{}{ELLIPSIS}", "é".repeat(SNIPPET_CHARS)));
    }

    #[test]
    fn trailing_space_at_the_cut_is_trimmed() {
        let text = format!("{} tail", "b".repeat(SNIPPET_CHARS - 1));
        assert_eq!(
            make_snippet(&text),
            format!("{}{ELLIPSIS}", "b".repeat(SNIPPET_CHARS - 1))
        );
    }
}
