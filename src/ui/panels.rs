//! Renderers for the input, source, and tree panels.
//!
//! Marks drawn here come straight from the panel models. A marked cell
//! is black on yellow, a marked line gets a dark gray wash, and a marked
//! terminator slot shows up as one highlighted blank past the end of the
//! line so spans that cover only a line break stay visible.

use ratatui::layout::{Position as ScreenPosition, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{FailureKind, ViewState};
use crate::editor::InputEditor;
use crate::ui::truncate_to_width;
use crate::view::source::{SourceLine, SourcePanel};
use crate::view::tree::TreePanel;

fn panel_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::new().fg(Color::Cyan))
    } else {
        block
    }
}

fn marked_cell_style() -> Style {
    Style::new().fg(Color::Black).bg(Color::Yellow)
}

fn marked_line_style() -> Style {
    Style::new().bg(Color::DarkGray)
}

fn gutter_style(current: bool) -> Style {
    if current {
        Style::new().fg(Color::White)
    } else {
        Style::new().fg(Color::DarkGray)
    }
}

/// The editable text buffer with a line-number gutter.
pub struct InputRenderer;

impl InputRenderer {
    pub fn render(frame: &mut Frame, area: Rect, editor: &InputEditor, focused: bool) {
        let block = panel_block("Input", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let gutter_width = editor.lines().len().to_string().len();
        let (cursor_line, cursor_col) = editor.cursor();
        let (scroll_line, scroll_col) = editor.scroll();

        let text = Text::from_iter(
            editor
                .lines()
                .iter()
                .enumerate()
                .skip(scroll_line)
                .take(inner.height as usize)
                .map(|(index, line)| {
                    let number = format!("{:>width$} ", index + 1, width = gutter_width);
                    let visible: String = line.chars().skip(scroll_col).collect();
                    Line::from(vec![
                        Span::styled(number, gutter_style(index == cursor_line)),
                        Span::raw(visible),
                    ])
                }),
        );
        frame.render_widget(text, inner);

        if focused {
            let x = inner.x
                + gutter_width as u16
                + 1
                + cursor_col.saturating_sub(scroll_col) as u16;
            let y = inner.y + cursor_line.saturating_sub(scroll_line) as u16;
            if x < inner.right() && y < inner.bottom() {
                frame.set_cursor_position(ScreenPosition::new(x, y));
            }
        }
    }
}

/// The parsed source text with span marks applied.
pub struct SourceRenderer;

impl SourceRenderer {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        panel: &SourcePanel,
        scroll: usize,
        state: &ViewState,
    ) {
        let block = panel_block("Source", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        match state {
            ViewState::Idle => {
                let hint = Paragraph::new("Nothing parsed yet.").style(Style::new().fg(Color::DarkGray));
                frame.render_widget(hint, inner);
            }
            ViewState::Pending => {
                let hint = Paragraph::new("Parsing...").style(Style::new().fg(Color::DarkGray));
                frame.render_widget(hint, inner);
            }
            ViewState::Failed { kind, message } => {
                let header = match kind {
                    FailureKind::Transport => "parse request failed",
                    FailureKind::InvalidResponse => "unusable parse response",
                };
                let error = Paragraph::new(vec![
                    Line::from(Span::styled(
                        header,
                        Style::new().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(message.as_str()),
                ])
                .style(Style::new().fg(Color::Red))
                .wrap(Wrap { trim: false });
                frame.render_widget(error, inner);
            }
            ViewState::Ready => {
                let gutter_width = panel.gutter_width();
                let text = Text::from_iter(
                    panel
                        .lines()
                        .iter()
                        .enumerate()
                        .skip(scroll)
                        .take(inner.height as usize)
                        .map(|(index, line)| render_source_line(index, line, gutter_width)),
                );
                frame.render_widget(text, inner);
            }
        }
    }
}

fn render_source_line(index: usize, line: &SourceLine, gutter_width: usize) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:>width$} ", index + 1, width = gutter_width),
        gutter_style(false),
    )];

    // Adjacent cells with the same mark state collapse into one span.
    let mut run = String::new();
    let mut run_marked = None;
    for cell in &line.cells {
        match run_marked {
            Some(marked) if marked == cell.marked => run.push(cell.glyph),
            Some(marked) => {
                spans.push(cell_run_span(std::mem::take(&mut run), marked, line.line_marked));
                run.push(cell.glyph);
                run_marked = Some(cell.marked);
            }
            None => {
                run.push(cell.glyph);
                run_marked = Some(cell.marked);
            }
        }
    }
    if let Some(marked) = run_marked {
        spans.push(cell_run_span(run, marked, line.line_marked));
    }

    if line.terminator_marked {
        spans.push(Span::styled(" ".to_string(), marked_cell_style()));
    } else if line.line_marked {
        spans.push(Span::styled(" ".to_string(), marked_line_style()));
    }

    Line::from(spans)
}

fn cell_run_span(text: String, marked: bool, line_marked: bool) -> Span<'static> {
    let style = if marked {
        marked_cell_style()
    } else if line_marked {
        marked_line_style()
    } else {
        Style::new()
    };
    Span::styled(text, style)
}

/// The flattened tree, one indented row per node.
pub struct TreeRenderer;

impl TreeRenderer {
    pub fn render(frame: &mut Frame, area: Rect, panel: &TreePanel, scroll: usize, focused: bool) {
        let block = panel_block("Tree", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let text = Text::from_iter(
            panel
                .rows()
                .iter()
                .enumerate()
                .skip(scroll)
                .take(inner.height as usize)
                .map(|(index, row)| {
                    let indent = "  ".repeat(row.depth);
                    let room = (inner.width as usize).saturating_sub(indent.len());
                    let label = truncate_to_width(&row.label, room);
                    let mut style = if row.active {
                        marked_cell_style()
                    } else {
                        Style::new()
                    };
                    if focused && index == panel.cursor() {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Line::from(vec![
                        Span::raw(indent),
                        Span::styled(label.to_string(), style),
                    ])
                }),
        );
        frame.render_widget(text, inner);
    }
}
