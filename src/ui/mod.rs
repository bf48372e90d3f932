//! Widget rendering
//!
//! Renderers for the three content panels and the status bar, plus the
//! frame layout they share. All of them read model state and draw; none
//! of them mutate anything.

pub mod panels;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::UnicodeWidthChar;

/// Panel geometry for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub input: Rect,
    pub source: Rect,
    pub tree: Rect,
    pub status: Rect,
}

/// Splits the frame: input buffer above the source panel on the left,
/// the tree on the right, one status line at the bottom.
pub fn compute_layout(area: Rect) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(columns[0]);

    AppLayout {
        input: left[0],
        source: left[1],
        tree: columns[1],
        status: rows[1],
    }
}

/// Longest prefix of `text` that fits in `width` terminal columns.
/// Splits on codepoint boundaries and never cuts a wide glyph in half.
pub(crate) fn truncate_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in text.char_indices() {
        let char_width = c.width().unwrap_or(0);
        if used + char_width > width {
            return &text[..idx];
        }
        used += char_width;
    }
    text
}
