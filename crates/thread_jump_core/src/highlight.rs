use std::ops::Range;

/// A run of snippet text, either plain or wrapped in the highlight marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetSegment {
    pub text: String,
    pub highlighted: bool,
}

impl SnippetSegment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }

    fn marked(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: true,
        }
    }
}

/// Byte range of the first case-insensitive occurrence of `needle` in `haystack`.
///
/// `needle` is expected in lowercase (see [`crate::normalize_term`]). The haystack is
/// lowercased as a whole so context rules such as the Greek final sigma agree with the
/// term, and the match is then mapped back onto char boundaries of the original text.
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    let lowered = haystack.to_lowercase();
    let found = lowered.find(needle)?;
    let found_end = found + needle.len();

    // Per-char lowering yields the same byte lengths as whole-string lowering
    // (σ and ς are both two bytes), so offsets line up.
    let mut start = None;
    let mut lowered_offset = 0;
    for (offset, ch) in haystack.char_indices() {
        let next = lowered_offset + ch.to_lowercase().map(char::len_utf8).sum::<usize>();
        if start.is_none() && next > found {
            start = Some(offset);
        }
        if next >= found_end {
            return start.map(|start| start..offset + ch.len_utf8());
        }
        lowered_offset = next;
    }
    None
}

/// Splits a snippet around the first occurrence of `needle`.
///
/// Without a needle, or when the needle does not occur inside the snippet, the whole
/// snippet comes back as one plain segment.
pub fn highlight_segments(snippet: &str, needle: Option<&str>) -> Vec<SnippetSegment> {
    let Some(range) = needle.and_then(|needle| find_case_insensitive(snippet, needle)) else {
        return vec![SnippetSegment::plain(snippet)];
    };

    let mut segments = Vec::with_capacity(3);
    if range.start > 0 {
        segments.push(SnippetSegment::plain(&snippet[..range.start]));
    }
    segments.push(SnippetSegment::marked(&snippet[range.clone()]));
    if range.end < snippet.len() {
        segments.push(SnippetSegment::plain(&snippet[range.end..]));
    }
    segments
}
