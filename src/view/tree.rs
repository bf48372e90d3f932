//! Addressable model of the parse tree panel.
//!
//! The node tree is flattened into rows up front (preorder, an explicit
//! stack, so service-supplied depth cannot overflow ours). Each row keeps
//! its node's source position, which is how a selection later recovers the
//! span without re-walking the tree. Rows are addressed by index; the
//! cursor is the keyboard-selected row, `active` the highlighted one.

use crate::protocol::{ParseResponse, Position};
use crate::unicode::codepoint_slice;

/// One flattened tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub label: String,
    pub depth: usize,
    pub position: Position,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreePanel {
    rows: Vec<TreeRow>,
    cursor: usize,
}

/// Row label: the node name plus the exact source text of its span,
/// escaped so embedded newlines and control characters stay on one row.
fn row_label(name: &str, position: Position, input: &str) -> String {
    let span = codepoint_slice(
        input,
        position.start_character.saturating_sub(1),
        position.end_character.saturating_sub(1),
    );
    format!("{}: \"{}\"", name, span.escape_debug())
}

impl TreePanel {
    pub fn empty() -> Self {
        TreePanel {
            rows: Vec::new(),
            cursor: 0,
        }
    }

    /// Flattens a response into rows. Both response shapes land here: a
    /// `tree` root becomes one depth-0 row, `lists` entries become one
    /// depth-0 row each, in order, children always directly after their
    /// parent.
    pub fn build(response: &ParseResponse) -> Self {
        let mut rows = Vec::new();
        let mut stack: Vec<(usize, &crate::protocol::AstNode)> = response
            .roots()
            .iter()
            .rev()
            .map(|node| (0, node))
            .collect();
        while let Some((depth, node)) = stack.pop() {
            rows.push(TreeRow {
                label: row_label(&node.name, node.position, &response.input),
                depth,
                position: node.position,
                active: false,
            });
            for child in node.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        TreePanel { rows, cursor: 0 }
    }

    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    pub fn set_cursor(&mut self, index: usize) {
        if index < self.rows.len() {
            self.cursor = index;
        }
    }

    /// Index of the active row, if any.
    pub fn active_row(&self) -> Option<usize> {
        self.rows.iter().position(|row| row.active)
    }

    /// Makes `index` the single active row and returns its position, or
    /// `None` if the index is out of range (the panel is left with no
    /// active row in that case).
    pub fn set_active_row(&mut self, index: usize) -> Option<Position> {
        for row in &mut self.rows {
            row.active = false;
        }
        let row = self.rows.get_mut(index)?;
        row.active = true;
        Some(row.position)
    }

    /// Deactivates whichever row is active. Idempotent.
    pub fn clear_active_row(&mut self) {
        for row in &mut self.rows {
            row.active = false;
        }
    }
}
