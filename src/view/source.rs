//! Addressable model of the source text panel.
//!
//! The panel is a list of lines, each line a list of character cells plus
//! one trailing terminator slot. Lines and columns are addressed 1-based to
//! match parser positions: column `n + 1` of an `n`-cell line is the
//! terminator slot, which is what gives an empty line something to mark.
//! Every parse response rebuilds the whole panel; marks never survive a
//! rebuild.

/// One codepoint of a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharCell {
    pub glyph: char,
    pub marked: bool,
}

/// One source line: its character cells plus mark state for the terminator
/// slot and for the line as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub cells: Vec<CharCell>,
    pub terminator_marked: bool,
    pub line_marked: bool,
}

impl SourceLine {
    fn from_text(text: &str) -> Self {
        SourceLine {
            cells: text
                .chars()
                .map(|glyph| CharCell {
                    glyph,
                    marked: false,
                })
                .collect(),
            terminator_marked: false,
            line_marked: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePanel {
    lines: Vec<SourceLine>,
    gutter_width: usize,
}

impl SourcePanel {
    /// Panel with no lines at all, shown before the first response and
    /// while one is pending.
    pub fn empty() -> Self {
        SourcePanel {
            lines: Vec::new(),
            gutter_width: 1,
        }
    }

    /// Builds the panel from the parsed input text.
    ///
    /// Lines are split on `\n` with one preceding `\r` absorbed into the
    /// terminator. A trailing terminator yields a real, empty final line.
    /// An empty input is a single empty line.
    pub fn build(input: &str) -> Self {
        let pieces: Vec<&str> = input.split('\n').collect();
        let final_piece = pieces.len() - 1;
        let lines: Vec<SourceLine> = pieces
            .iter()
            .enumerate()
            .map(|(idx, piece)| {
                let text = if idx < final_piece {
                    piece.strip_suffix('\r').unwrap_or(piece)
                } else {
                    piece
                };
                SourceLine::from_text(text)
            })
            .collect();
        let gutter_width = lines.len().to_string().len();
        SourcePanel {
            lines,
            gutter_width,
        }
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Digits needed for the widest line number in the gutter.
    pub fn gutter_width(&self) -> usize {
        self.gutter_width
    }

    /// Marks a whole line, 1-based. Out-of-range lines are ignored.
    pub fn mark_line(&mut self, line: usize) {
        if line == 0 {
            return;
        }
        if let Some(entry) = self.lines.get_mut(line - 1) {
            entry.line_marked = true;
        }
    }

    /// Marks one cell, 1-based line and column. Column `cells + 1` is the
    /// terminator slot; anything further out is ignored.
    pub fn mark_cell(&mut self, line: usize, column: usize) {
        if line == 0 || column == 0 {
            return;
        }
        let Some(entry) = self.lines.get_mut(line - 1) else {
            return;
        };
        if let Some(cell) = entry.cells.get_mut(column - 1) {
            cell.marked = true;
        } else if column == entry.cells.len() + 1 {
            entry.terminator_marked = true;
        }
    }

    /// Removes every mark. Safe to call on an unmarked panel.
    pub fn clear_marks(&mut self) {
        for line in &mut self.lines {
            line.line_marked = false;
            line.terminator_marked = false;
            for cell in &mut line.cells {
                cell.marked = false;
            }
        }
    }
}
