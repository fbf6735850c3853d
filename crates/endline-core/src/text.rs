//! Text model primitives: sizes, ranges, and line lookups.

pub use text_size::{TextRange, TextSize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Pre-computed line boundaries for a particular text snapshot.
///
/// `\n`, `\r\n` and a lone `\r` are all treated as line breaks. For every line the index
/// records where it starts, where its content ends (before the break), and where it ends
/// *including* the break (which is the start of the next line, or the end of the text).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    line_ends: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = Vec::with_capacity(64);
        let mut line_ends = Vec::with_capacity(64);
        line_starts.push(TextSize::from(0));

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                b'\r' => {
                    let width = if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + width) as u32));
                    i += width;
                }
                _ => i += 1,
            }
        }

        line_ends.push(TextSize::from(text.len() as u32));

        Self {
            line_starts,
            line_ends,
            text_len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.text_len
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    #[inline]
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        self.line_starts.get(line as usize).copied()
    }

    /// End of the line's content, excluding the line break.
    #[inline]
    pub fn line_end(&self, line: u32) -> Option<TextSize> {
        self.line_ends.get(line as usize).copied()
    }

    /// End of the line including its line break: the next line's start, or the end of
    /// the text for the last line.
    pub fn line_end_including_break(&self, line: u32) -> Option<TextSize> {
        let line = line as usize;
        if line >= self.line_starts.len() {
            return None;
        }
        Some(
            self.line_starts
                .get(line + 1)
                .copied()
                .unwrap_or(self.text_len),
        )
    }

    /// Content range of `line` (line break excluded).
    pub fn line_range(&self, line: u32) -> Option<TextRange> {
        Some(TextRange::new(self.line_start(line)?, self.line_end(line)?))
    }

    /// Zero-based line containing `offset`.
    ///
    /// Offsets past the end are clamped; an offset sitting on a line break belongs to the
    /// line the break terminates.
    pub fn line_of(&self, offset: TextSize) -> u32 {
        let offset = offset.min(self.text_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        };
        line as u32
    }

    /// Convert a byte offset to a UTF-8 (byte) line/column pair.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.text_len);
        let line = self.line_of(offset);
        let line_start = self.line_starts[line as usize];
        let line_end = self.line_ends[line as usize];
        let col = offset.min(line_end) - line_start;
        LineCol {
            line,
            col: u32::from(col),
        }
    }

    /// Convert a UTF-8 (byte) line/column pair to a byte offset.
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let start = self.line_start(line_col.line)?;
        let end = self.line_end(line_col.line)?;
        let offset = start + TextSize::from(line_col.col);
        if offset > end {
            return None;
        }
        Some(offset)
    }
}

/// Slice `text` by a [`TextRange`].
///
/// Returns `None` if the range is out of bounds or not on char boundaries.
pub fn slice(text: &str, range: TextRange) -> Option<&str> {
    let start = u32::from(range.start()) as usize;
    let end = u32::from(range.end()) as usize;
    text.get(start..end)
}
