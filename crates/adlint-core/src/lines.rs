//! Byte-offset to line/column mapping.

use crate::types::Position;

/// Precomputed line starts for a document, for O(log n) offset lookups.
///
/// Lines are 1-based, columns are 0-based byte offsets within the line.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Indexes a document.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        Self {
            starts,
            len: text.len(),
        }
    }

    /// Converts a byte offset into a position. Offsets past the end of
    /// the document clamp to the last position.
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line_idx = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Position {
            line: line_idx + 1,
            column: offset - self.starts[line_idx],
        }
    }

    /// Byte offset where the given 1-based line starts.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line.checked_sub(1)?).copied()
    }

    /// Number of lines in the document.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions() {
        let idx = LineIndex::new("abc\ndef\n\nxyz");
        assert_eq!(idx.position(0), Position { line: 1, column: 0 });
        assert_eq!(idx.position(2), Position { line: 1, column: 2 });
        assert_eq!(idx.position(4), Position { line: 2, column: 0 });
        assert_eq!(idx.position(8), Position { line: 3, column: 0 });
        assert_eq!(idx.position(9), Position { line: 4, column: 0 });
        assert_eq!(idx.position(12), Position { line: 4, column: 3 });
    }

    #[test]
    fn clamps_past_end() {
        let idx = LineIndex::new("abc");
        assert_eq!(idx.position(100), Position { line: 1, column: 3 });
    }

    #[test]
    fn line_starts() {
        let idx = LineIndex::new("abc\ndef");
        assert_eq!(idx.line_start(1), Some(0));
        assert_eq!(idx.line_start(2), Some(4));
        assert_eq!(idx.line_start(3), None);
        assert_eq!(idx.line_count(), 2);
    }

    #[test]
    fn empty_document() {
        let idx = LineIndex::new("");
        assert_eq!(idx.position(0), Position { line: 1, column: 0 });
        assert_eq!(idx.line_count(), 1);
    }
}
