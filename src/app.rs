//! Application state and main loop.
//!
//! `App` owns the whole session: the editable input buffer, the two result
//! panels, the single active selection, and the parse client. Every edit
//! restarts the cycle the same way: cancel the in-flight request, empty
//! both panels so nothing stale stays visible, submit the new text. Worker
//! results come back through the bridge tagged with their generation, and
//! anything that is not the latest generation is dropped unseen, so an old
//! response can never overwrite a newer one no matter how the service
//! reorders completions.

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::{Margin, Position};
use ratatui::{DefaultTerminal, Frame};

use crate::config::Config;
use crate::editor::InputEditor;
use crate::highlight::HighlightController;
use crate::protocol::ParseResponse;
use crate::services::bridge::{UiBridge, UiMessage};
use crate::services::parser::{ParseOutcome, ParserClient};
use crate::ui::panels::{InputRenderer, SourceRenderer, TreeRenderer};
use crate::ui::status_bar::StatusBarRenderer;
use crate::ui::{self, AppLayout};
use crate::view::source::SourcePanel;
use crate::view::tree::TreePanel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Tree,
}

/// What the result panels currently show.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Nothing has been submitted yet.
    Idle,
    /// A request is in flight; the panels are empty until it lands.
    Pending,
    /// The panels reflect the latest response.
    Ready,
    /// The latest request failed; the panels stay empty.
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a usable response.
    Transport,
    /// The service answered, but not with a response we accept.
    InvalidResponse,
}

pub struct App {
    config: Config,
    editor: InputEditor,
    source: SourcePanel,
    tree: TreePanel,
    highlight: HighlightController,
    client: ParserClient,
    bridge: UiBridge,
    focus: Focus,
    view_state: ViewState,
    /// Input text the current panels were built from. Highlight spans are
    /// resolved against this, never against the live editor buffer.
    parsed_input: String,
    /// First visible tree row.
    tree_scroll: usize,
    /// First visible source line.
    source_scroll: usize,
    /// Panel geometry from the last draw, for mouse hit tests and paging.
    layout: Option<AppLayout>,
    should_quit: bool,
}

impl App {
    /// Builds the session. When `initial_text` is given (a file was passed
    /// on the command line) it is submitted right away; otherwise the app
    /// waits for the first keystroke.
    pub fn new(config: Config, initial_text: Option<String>) -> Self {
        let bridge = UiBridge::new();
        let client = ParserClient::new(
            &config.server_url,
            config.request_timeout(),
            bridge.sender(),
        );
        let editor = match &initial_text {
            Some(text) => InputEditor::from_text(text),
            None => InputEditor::new(),
        };
        let mut app = App {
            config,
            editor,
            source: SourcePanel::empty(),
            tree: TreePanel::empty(),
            highlight: HighlightController::new(),
            client,
            bridge,
            focus: Focus::Input,
            view_state: ViewState::Idle,
            parsed_input: String::new(),
            tree_scroll: 0,
            source_scroll: 0,
            layout: None,
            should_quit: false,
        };
        if initial_text.is_some() {
            app.on_edit();
        }
        app
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn source(&self) -> &SourcePanel {
        &self.source
    }

    pub fn tree(&self) -> &TreePanel {
        &self.tree
    }

    pub fn editor(&self) -> &InputEditor {
        &self.editor
    }

    /// Main loop: draw, wait up to one tick for input, drain worker
    /// results, repeat.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(self.config.tick_interval())? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }

            self.drain_messages();
        }
        Ok(())
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let layout = ui::compute_layout(frame.area());

        let input_inner = layout.input.inner(Margin::new(1, 1));
        let gutter = self.editor.lines().len().to_string().len() as u16;
        self.editor.scroll_to_cursor(input_inner, gutter);

        let tree_inner = layout.tree.inner(Margin::new(1, 1));
        self.scroll_tree_to_cursor(usize::from(tree_inner.height.max(1)));

        InputRenderer::render(frame, layout.input, &self.editor, self.focus == Focus::Input);
        SourceRenderer::render(
            frame,
            layout.source,
            &self.source,
            self.source_scroll,
            &self.view_state,
        );
        TreeRenderer::render(
            frame,
            layout.tree,
            &self.tree,
            self.tree_scroll,
            self.focus == Focus::Tree,
        );
        StatusBarRenderer::render(
            frame,
            layout.status,
            &self.view_state,
            self.focus,
            self.editor.cursor(),
            self.tree.rows().len(),
            &self.config.server_url,
        );

        self.layout = Some(layout);
    }

    /// Restarts the parse cycle for the current buffer contents.
    ///
    /// Order matters: the old request is flagged first, then the panels
    /// are emptied before the new request leaves, so a keystroke never
    /// leaves stale content on screen while the new parse runs.
    pub fn on_edit(&mut self) {
        self.client.cancel_in_flight();
        self.clear_panels();
        let text = self.editor.contents();
        tracing::trace!(chars = text.chars().count(), "Input changed");
        self.client.submit(&text);
        self.view_state = ViewState::Pending;
    }

    fn clear_panels(&mut self) {
        self.source = SourcePanel::empty();
        self.tree = TreePanel::empty();
        self.highlight.reset();
        self.parsed_input.clear();
        self.tree_scroll = 0;
        self.source_scroll = 0;
    }

    /// Applies every pending worker result.
    pub fn drain_messages(&mut self) {
        for message in self.bridge.try_recv_all() {
            match message {
                UiMessage::ParseFinished {
                    generation,
                    outcome,
                } => self.apply_parse_outcome(generation, outcome),
            }
        }
    }

    /// Applies one worker result, unless a newer request has superseded
    /// it. Cancelled outcomes are dropped either way.
    pub fn apply_parse_outcome(&mut self, generation: u64, outcome: ParseOutcome) {
        if generation != self.client.current_generation() {
            tracing::trace!(
                generation,
                current = self.client.current_generation(),
                "Dropping superseded parse result"
            );
            return;
        }
        match outcome {
            ParseOutcome::Success(response) => self.apply_response(response),
            ParseOutcome::Cancelled => {}
            ParseOutcome::TransportError(message) => {
                tracing::warn!(generation, %message, "Parse request failed");
                self.view_state = ViewState::Failed {
                    kind: FailureKind::Transport,
                    message,
                };
            }
            ParseOutcome::InvalidResponse(message) => {
                tracing::warn!(generation, %message, "Parse response rejected");
                self.view_state = ViewState::Failed {
                    kind: FailureKind::InvalidResponse,
                    message,
                };
            }
        }
    }

    fn apply_response(&mut self, response: ParseResponse) {
        tracing::debug!(
            roots = response.roots().len(),
            input_bytes = response.input.len(),
            "Applying parse response"
        );
        self.source = SourcePanel::build(&response.input);
        self.tree = TreePanel::build(&response);
        self.highlight.reset();
        self.tree_scroll = 0;
        self.source_scroll = 0;
        self.parsed_input = response.input;
        self.view_state = ViewState::Ready;
    }

    /// Highlights the span of tree row `row` in both panels and scrolls
    /// the span's first line into view.
    pub fn activate_row(&mut self, row: usize) {
        if self.view_state != ViewState::Ready {
            return;
        }
        let painted =
            self.highlight
                .activate(row, &self.parsed_input, &mut self.source, &mut self.tree);
        if let Some(position) = painted {
            self.scroll_source_to_line(position.start_line);
        }
    }

    pub fn clear_selection(&mut self) {
        self.highlight.clear_active(&mut self.source, &mut self.tree);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key {
            KeyEvent {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.should_quit = true,

            KeyEvent {
                code: KeyCode::Tab | KeyCode::BackTab,
                ..
            } => {
                self.focus = match self.focus {
                    Focus::Input => Focus::Tree,
                    Focus::Tree => Focus::Input,
                };
            }

            KeyEvent {
                code: KeyCode::Esc, ..
            } => self.clear_selection(),

            _ => match self.focus {
                Focus::Input => self.handle_input_key(key),
                Focus::Tree => self.handle_tree_key(key),
            },
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key {
            KeyEvent {
                code: KeyCode::Char(c),
                modifiers,
                ..
            } if modifiers == KeyModifiers::NONE || modifiers == KeyModifiers::SHIFT => {
                self.editor.insert_char(c);
                self.on_edit();
            }

            KeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
                ..
            } => {
                self.editor.insert_newline();
                self.on_edit();
            }

            KeyEvent {
                code: KeyCode::Backspace,
                modifiers: KeyModifiers::NONE,
                ..
            } => {
                let before = self.editor.contents();
                self.editor.delete_prev_char();
                if self.editor.contents() != before {
                    self.on_edit();
                }
            }

            KeyEvent {
                code: KeyCode::Delete,
                modifiers: KeyModifiers::NONE,
                ..
            } => {
                let before = self.editor.contents();
                self.editor.delete_next_char();
                if self.editor.contents() != before {
                    self.on_edit();
                }
            }

            KeyEvent {
                code: KeyCode::Home,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.editor.move_to_line_start(),

            KeyEvent {
                code: KeyCode::End,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.editor.move_to_line_end(),

            KeyEvent {
                code: KeyCode::Left,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.editor.move_left(),

            KeyEvent {
                code: KeyCode::Right,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.editor.move_right(),

            KeyEvent {
                code: KeyCode::Left,
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.editor.move_word_left(),

            KeyEvent {
                code: KeyCode::Right,
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.editor.move_word_right(),

            KeyEvent {
                code: KeyCode::Up,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.editor.move_up(),

            KeyEvent {
                code: KeyCode::Down,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.editor.move_down(),

            KeyEvent {
                code: KeyCode::PageUp,
                ..
            } => {
                for _ in 0..self.input_page_size() {
                    self.editor.move_up();
                }
            }

            KeyEvent {
                code: KeyCode::PageDown,
                ..
            } => {
                for _ in 0..self.input_page_size() {
                    self.editor.move_down();
                }
            }

            _ => {}
        }
    }

    fn handle_tree_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.tree.move_cursor_up(),
            KeyCode::Down => self.tree.move_cursor_down(),
            KeyCode::PageUp => {
                for _ in 0..self.tree_page_size() {
                    self.tree.move_cursor_up();
                }
            }
            KeyCode::PageDown => {
                for _ in 0..self.tree_page_size() {
                    self.tree.move_cursor_down();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_row(self.tree.cursor()),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(layout) = self.layout else {
            return;
        };
        let at = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if layout.tree.contains(at) {
                    self.focus = Focus::Tree;
                    let inner = layout.tree.inner(Margin::new(1, 1));
                    if inner.contains(at) {
                        let row = self.tree_scroll + usize::from(at.y - inner.y);
                        if row < self.tree.rows().len() {
                            self.tree.set_cursor(row);
                            self.activate_row(row);
                        }
                    }
                } else if layout.input.contains(at) {
                    self.focus = Focus::Input;
                }
            }
            MouseEventKind::ScrollDown => {
                if layout.tree.contains(at) {
                    self.scroll_tree_by(1);
                } else if layout.source.contains(at) {
                    self.scroll_source_by(1);
                }
            }
            MouseEventKind::ScrollUp => {
                if layout.tree.contains(at) {
                    self.scroll_tree_by(-1);
                } else if layout.source.contains(at) {
                    self.scroll_source_by(-1);
                }
            }
            _ => {}
        }
    }

    fn tree_page_size(&self) -> usize {
        self.layout
            .map(|layout| usize::from(layout.tree.inner(Margin::new(1, 1)).height.max(1)))
            .unwrap_or(10)
    }

    fn input_page_size(&self) -> usize {
        self.layout
            .map(|layout| usize::from(layout.input.inner(Margin::new(1, 1)).height.max(1)))
            .unwrap_or(10)
    }

    fn scroll_tree_by(&mut self, delta: isize) {
        let max = self.tree.rows().len().saturating_sub(1);
        let next = self.tree_scroll.saturating_add_signed(delta);
        self.tree_scroll = next.min(max);
    }

    fn scroll_source_by(&mut self, delta: isize) {
        let max = self.source.line_count().saturating_sub(1);
        let next = self.source_scroll.saturating_add_signed(delta);
        self.source_scroll = next.min(max);
    }

    /// Scrolls the source panel until 1-based `line` is visible.
    fn scroll_source_to_line(&mut self, line: usize) {
        let height = self
            .layout
            .map(|layout| usize::from(layout.source.inner(Margin::new(1, 1)).height.max(1)))
            .unwrap_or(10);
        let target = line.saturating_sub(1);
        if target < self.source_scroll {
            self.source_scroll = target;
        } else if target >= self.source_scroll + height {
            self.source_scroll = target + 1 - height;
        }
    }

    fn scroll_tree_to_cursor(&mut self, height: usize) {
        let cursor = self.tree.cursor();
        if cursor < self.tree_scroll {
            self.tree_scroll = cursor;
        } else if cursor >= self.tree_scroll + height {
            self.tree_scroll = cursor + 1 - height;
        }
    }
}
