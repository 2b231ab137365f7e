/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive substring test against an already upper-cased haystack.
pub fn contains_upper(haystack_upper: &str, needle: &str) -> bool {
    haystack_upper.contains(&needle.to_uppercase())
}

/// Split a page into lines on `\r\n`, `\n` or a lone `\r`.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().flat_map(|l| l.split('\r'))
}

/// Append-only text for one record field.
///
/// Segments are kept apart and only joined when the record is flushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    segments: Vec<String>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: &str) {
        let segment = segment.trim();
        if !segment.is_empty() {
            self.segments.push(segment.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Join the segments with single spaces.
    pub fn into_text(self) -> String {
        collapse_whitespace(&self.segments.join(" "))
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        let mut buf = TextBuffer::new();
        buf.push(s);
        buf
    }
}
