//! Bottom status line.
//!
//! Left side shows the focused panel, cursor position, and parse state.
//! Right side shows the key hints when there is room for them.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::app::{FailureKind, Focus, ViewState};
use crate::ui::truncate_to_width;

const KEY_HINTS: &str = "Tab focus  Enter select  Esc clear  Ctrl+Q quit";

pub struct StatusBarRenderer;

impl StatusBarRenderer {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        state: &ViewState,
        focus: Focus,
        cursor: (usize, usize),
        node_count: usize,
        server_url: &str,
    ) {
        let focus_label = match focus {
            Focus::Input => "INPUT",
            Focus::Tree => "TREE",
        };
        let left = format!(
            " {focus_label} | Ln {}, Col {} | {}",
            cursor.0 + 1,
            cursor.1 + 1,
            Self::state_label(state, node_count, server_url),
        );

        let style = match state {
            ViewState::Failed { .. } => {
                Style::new().fg(Color::Red).add_modifier(Modifier::REVERSED)
            }
            _ => Style::new().add_modifier(Modifier::REVERSED),
        };

        let width = area.width as usize;
        let left_width = left.width();
        let hints_width = KEY_HINTS.width();
        let mut spans = Vec::new();
        if left_width + hints_width + 2 <= width {
            let padding = width - left_width - hints_width - 1;
            spans.push(Span::raw(left));
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(Span::raw(KEY_HINTS));
            spans.push(Span::raw(" "));
        } else {
            spans.push(Span::raw(truncate_to_width(&left, width).to_string()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).style(style), area);
    }

    fn state_label(state: &ViewState, node_count: usize, server_url: &str) -> String {
        match state {
            ViewState::Idle => format!("idle | {server_url}"),
            ViewState::Pending => format!("parsing | {server_url}"),
            ViewState::Ready => format!("{node_count} nodes"),
            ViewState::Failed {
                kind: FailureKind::Transport,
                message,
            } => format!("request failed: {message}"),
            ViewState::Failed {
                kind: FailureKind::InvalidResponse,
                message,
            } => format!("bad response: {message}"),
        }
    }
}
