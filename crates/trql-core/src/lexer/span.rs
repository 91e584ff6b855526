//! Source location tracking for tokens and syntax-tree nodes.

use serde::Serialize;

/// Represents a span in the source code.
///
/// `line` and `column` describe the start of the span and are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Line of the start offset.
    pub line: u32,
    /// Column of the start offset, counted in characters.
    pub column: u32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merges two spans into one that covers both.
    ///
    /// The line and column are taken from whichever span starts first.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let (start, line, column) = if self.start <= other.start {
            (self.start, self.line, self.column)
        } else {
            (other.start, other.line, other.column)
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::new(0, 0, 1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_new() {
        let span = Span::new(5, 10, 1, 6);
        assert_eq!(span.start, 5);
        assert_eq!(span.end, 10);
        assert_eq!(span.column, 6);
    }

    #[test]
    fn test_span_len() {
        let span = Span::new(5, 10, 1, 6);
        assert_eq!(span.len(), 5);
    }

    #[test]
    fn test_span_is_empty() {
        let empty = Span::new(5, 5, 1, 6);
        let non_empty = Span::new(5, 10, 1, 6);
        assert!(empty.is_empty());
        assert!(!non_empty.is_empty());
    }

    #[test]
    fn test_span_merge_keeps_earliest_position() {
        let first = Span::new(5, 10, 2, 1);
        let second = Span::new(8, 15, 2, 4);
        let merged = second.merge(first);
        assert_eq!(merged.start, 5);
        assert_eq!(merged.end, 15);
        assert_eq!((merged.line, merged.column), (2, 1));
    }
}
