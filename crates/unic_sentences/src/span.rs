//! Character positions inside a source text

use derive_more::Display;

/// A half open range of character indices into a source text.
///
/// Indices count `char`s, not bytes, since the tokenizer walks the source one character at a time.
#[derive(Debug, Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Display)]
#[display(fmt = "{}..{}", start, end)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a new span. An `end` before `start` is clamped to an empty span.
    pub const fn new(start: usize, end: usize) -> Self {
        if end < start {
            Self { start, end: start }
        } else {
            Self { start, end }
        }
    }

    /// A span covering the single character at `index`
    pub const fn at(index: usize) -> Self {
        Self::new(index, index + 1)
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    /// The line and column where this span starts in `source`
    pub fn line_col(&self, source: &str) -> LineCol {
        LineCol::of(source, self.start)
    }
}

/// A 1-based line and column
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Display)]
#[display(fmt = "{}:{}", line, column)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

impl LineCol {
    /// Finds the line and column of the character at `index`.
    ///
    /// An index past the end of the source resolves to the position right after the last character.
    pub fn of(source: &str, index: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for c in source.chars().take(index) {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}
