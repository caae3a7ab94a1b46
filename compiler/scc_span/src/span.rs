// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt;

/// A `{line, column}` pair attached by the parser to every node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

impl SourcePos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents a continuous range in a source file.
/// Both start and end are inclusive positions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Starting position (line and column).
    pub start: SourcePos,

    /// Ending position (line and column).
    pub end: SourcePos,
}

impl Span {
    pub fn new(start: SourcePos, end: SourcePos) -> Self {
        Self { start, end }
    }

    /// A span covering exactly one position.
    pub fn at(line: usize, column: usize) -> Self {
        let pos = SourcePos::new(line, column);
        Self { start: pos, end: pos }
    }
}

/// A trait for types that provide access to a source code span.
pub trait HasSpan {
    fn span(&self) -> &Span;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_at_points_to_single_position() {
        let span = Span::at(4, 9);
        assert_eq!(span.start, span.end);
        assert_eq!(span.start.to_string(), "4:9");
    }
}
