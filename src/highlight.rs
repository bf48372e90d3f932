//! Selection state shared by the two panels.
//!
//! At most one tree row is active at a time, and the source marks always
//! belong to that row. Activation always clears first and reapplies from
//! the row's position, even when the same row is picked again: the panels
//! may have been rebuilt since the last activation, so remembered marks
//! cannot be trusted.
//!
//! A span produces two kinds of marks. Lines `start_line..end_line` (end
//! exclusive) get a whole-line mark, which leaves the final line to the
//! character pass alone; every codepoint in the character range gets a cell
//! mark, with the walker crossing line terminators the same way the panel
//! split its lines.

use crate::position::SpanWalker;
use crate::protocol::Position;
use crate::unicode::codepoint_slice;
use crate::view::source::SourcePanel;
use crate::view::tree::TreePanel;

#[derive(Debug, Default)]
pub struct HighlightController {
    active: Option<usize>,
}

impl HighlightController {
    pub fn new() -> Self {
        HighlightController { active: None }
    }

    /// Row index currently highlighted, if any.
    pub fn active_row(&self) -> Option<usize> {
        self.active
    }

    /// Forgets the selection without touching panels. For when the panels
    /// have just been rebuilt or emptied and carry no marks anyway.
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Removes all marks from both panels. Idempotent.
    pub fn clear_active(&mut self, source: &mut SourcePanel, tree: &mut TreePanel) {
        source.clear_marks();
        tree.clear_active_row();
        self.active = None;
    }

    /// Makes `row` the active selection and paints its span onto the
    /// source panel, returning the span. A row index the tree does not
    /// have leaves everything cleared and returns `None`.
    pub fn activate(
        &mut self,
        row: usize,
        source_text: &str,
        source: &mut SourcePanel,
        tree: &mut TreePanel,
    ) -> Option<Position> {
        self.clear_active(source, tree);
        let position = tree.set_active_row(row)?;
        self.active = Some(row);
        self.paint_span(position, source_text, source);
        Some(position)
    }

    fn paint_span(&self, position: Position, source_text: &str, source: &mut SourcePanel) {
        for line in position.start_line..position.end_line {
            source.mark_line(line);
        }

        let start = position.start_character.saturating_sub(1);
        let end = position.end_character.saturating_sub(1);
        let span = codepoint_slice(source_text, start, end);
        let mut walker = SpanWalker::seed(source_text, start);
        for c in span.chars() {
            let at = walker.position();
            source.mark_cell(at.line, at.column);
            walker.advance(c);
        }
    }
}
