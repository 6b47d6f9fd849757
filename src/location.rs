//! Mapping byte offsets to human-readable positions.
//!
//! The parsers work in byte offsets; diagnostics report 1-indexed line and
//! column numbers. `SourceIndex` precomputes line starts once and answers
//! lookups with a binary search.

/// A 1-indexed line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Width of a tab stop when computing columns.
pub const TAB_WIDTH: usize = 4;

/// Line-start table for a source document.
#[derive(Debug, Clone)]
pub struct SourceIndex {
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
    /// The source text, kept for tab-aware column computation.
    source: String,
}

impl SourceIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let bytes = source.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_starts.push(i + 1);
                    i += 1;
                }
                b'\r' => {
                    // \r\n counts as one line end.
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 2;
                    } else {
                        i += 1;
                    }
                    line_starts.push(i);
                }
                _ => i += 1,
            }
        }
        Self {
            line_starts,
            source: source.to_string(),
        }
    }

    /// Resolve a byte offset to a 1-indexed, tab-aware position.
    ///
    /// Offsets past the end of the source resolve to just past the last
    /// character.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insertion) => insertion - 1,
        };
        let line_start = self.line_starts[line_idx];
        let mut column = 1;
        for ch in self.source[line_start..offset].chars() {
            if ch == '\t' {
                column += TAB_WIDTH;
            } else {
                column += 1;
            }
        }
        Position {
            line: line_idx + 1,
            column,
        }
    }
}
