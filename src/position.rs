//! Mapping between flat codepoint offsets and line/column coordinates.
//!
//! The parser service reports spans as 1-indexed line and column numbers
//! counted in codepoints, with end bounds exclusive. The source panel
//! addresses cells the same way. This module holds the one place where
//! offsets become coordinates: [`locate_offset`] answers for a single
//! offset, and [`SpanWalker`] walks a span one codepoint at a time without
//! rescanning the prefix on every step.

use crate::unicode::{codepoint_slice, last_index_of_codepoint};

/// A 1-indexed line/column pair, columns counted in codepoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

/// Line and column of the codepoint at 0-indexed codepoint `offset`.
///
/// The line is one more than the number of newlines strictly before the
/// offset. The column restarts at 1 after each newline; on the first line it
/// is `offset + 1`.
pub fn locate_offset(source: &str, offset: usize) -> LineColumn {
    let prefix = codepoint_slice(source, 0, offset);
    let newlines = prefix.chars().filter(|&c| c == '\n').count();
    let column = match last_index_of_codepoint(prefix, '\n') {
        Some(last) => offset - last,
        None => offset + 1,
    };
    LineColumn {
        line: newlines + 1,
        column,
    }
}

/// Incremental line/column tracker for walking a span codepoint by
/// codepoint.
///
/// Seeded once at the span's start offset, then advanced per codepoint.
/// Advancing over `'\n'` moves to column 1 of the next line; every other
/// codepoint, `'\r'` included, moves one column right.
#[derive(Debug, Clone, Copy)]
pub struct SpanWalker {
    line: usize,
    column: usize,
}

impl SpanWalker {
    /// Walker positioned at `offset` within `source`.
    pub fn seed(source: &str, offset: usize) -> Self {
        let at = locate_offset(source, offset);
        SpanWalker {
            line: at.line,
            column: at.column,
        }
    }

    /// Current position.
    pub fn position(&self) -> LineColumn {
        LineColumn {
            line: self.line,
            column: self.column,
        }
    }

    /// Step past one codepoint.
    pub fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}
