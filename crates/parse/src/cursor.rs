use crate::text::split_lines;

/// Forward-only cursor over the trimmed lines of one page.
///
/// Builders that need to look past the current line use `peek` and only
/// `advance` over what they consume.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: split_lines(text).map(str::trim).collect(),
            pos: 0,
        }
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    pub fn advance(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.lines.len()
    }
}
