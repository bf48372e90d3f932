//! Editable input buffer.
//!
//! A small line-based buffer for the text being parsed. The cursor column
//! counts codepoints, not bytes, so edits land where the cursor shows even
//! in non-ASCII text. The buffer always holds at least one line; joining
//! with `\n` reproduces exactly what was loaded or typed, which is what
//! gets POSTed to the parser.

use ratatui::layout::Rect;

use crate::unicode::{byte_offset, codepoint_len};

pub struct InputEditor {
    lines: Vec<String>,
    /// 0-based line index of the cursor.
    cursor_line: usize,
    /// 0-based codepoint offset of the cursor within its line.
    cursor_col: usize,
    scroll_line: usize,
    scroll_col: usize,
}

impl InputEditor {
    pub fn new() -> Self {
        InputEditor {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
            scroll_line: 0,
            scroll_col: 0,
        }
    }

    /// Buffer holding `text`, cursor at the start. Lossless: only `\n`
    /// splits lines, so `contents` returns `text` unchanged.
    pub fn from_text(text: &str) -> Self {
        InputEditor {
            lines: text.split('\n').map(|line| line.to_string()).collect(),
            cursor_line: 0,
            cursor_col: 0,
            scroll_line: 0,
            scroll_col: 0,
        }
    }

    /// The full buffer text as sent to the parser.
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 0-based (line, codepoint column) of the cursor.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_line, self.cursor_col)
    }

    /// 0-based (line, column) of the top-left visible cell.
    pub fn scroll(&self) -> (usize, usize) {
        (self.scroll_line, self.scroll_col)
    }

    fn current_line(&self) -> &str {
        &self.lines[self.cursor_line]
    }

    fn current_line_len(&self) -> usize {
        codepoint_len(self.current_line())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = byte_offset(self.current_line(), self.cursor_col);
        self.lines[self.cursor_line].insert(at, c);
        self.cursor_col += 1;
    }

    pub fn insert_newline(&mut self) {
        let at = byte_offset(self.current_line(), self.cursor_col);
        let rest = self.lines[self.cursor_line].split_off(at);
        self.cursor_line += 1;
        self.cursor_col = 0;
        self.lines.insert(self.cursor_line, rest);
    }

    pub fn delete_prev_char(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let at = byte_offset(self.current_line(), self.cursor_col);
            self.lines[self.cursor_line].remove(at);
        } else if self.cursor_line > 0 {
            let line = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
            self.lines[self.cursor_line].push_str(&line);
        }
    }

    pub fn delete_next_char(&mut self) {
        if self.cursor_col < self.current_line_len() {
            let at = byte_offset(self.current_line(), self.cursor_col);
            self.lines[self.cursor_line].remove(at);
        } else if self.cursor_line + 1 < self.lines.len() {
            let next_line = self.lines.remove(self.cursor_line + 1);
            self.lines[self.cursor_line].push_str(&next_line);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_line == 0 {
            return;
        }
        self.cursor_line -= 1;
        self.cursor_col = std::cmp::min(self.cursor_col, self.current_line_len());
    }

    pub fn move_down(&mut self) {
        if self.cursor_line + 1 >= self.lines.len() {
            return;
        }
        self.cursor_line += 1;
        self.cursor_col = std::cmp::min(self.cursor_col, self.current_line_len());
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor_col = self.current_line_len();
    }

    pub fn move_word_left(&mut self) {
        if self.cursor_col == 0 {
            self.move_left();
            return;
        }
        let chars: Vec<char> = self.current_line().chars().collect();
        let is_whitespace = chars[self.cursor_col - 1].is_whitespace();
        for i in (0..self.cursor_col).rev() {
            if chars[i].is_whitespace() != is_whitespace {
                self.cursor_col = i + 1;
                return;
            }
        }
        self.cursor_col = 0;
    }

    pub fn move_word_right(&mut self) {
        let line_len = self.current_line_len();
        if self.cursor_col == line_len {
            self.move_right();
            return;
        }
        let chars: Vec<char> = self.current_line().chars().collect();
        let is_whitespace = chars[self.cursor_col].is_whitespace();
        for i in self.cursor_col..line_len {
            if chars[i].is_whitespace() != is_whitespace {
                self.cursor_col = i;
                return;
            }
        }
        self.cursor_col = line_len;
    }

    /// Adjusts the scroll offsets so the cursor falls inside `area`.
    /// `gutter` is how many leading columns the line numbers consume.
    pub fn scroll_to_cursor(&mut self, area: Rect, gutter: u16) {
        let visible_cols = usize::from(area.width.saturating_sub(gutter + 1).max(1));
        let visible_lines = usize::from(area.height.max(1));

        // Trailing slot so the cursor can sit after the last character.
        let min_col = (self.cursor_col + 2).saturating_sub(visible_cols);
        self.scroll_col = self.scroll_col.max(min_col).min(self.cursor_col);

        let min_line = (self.cursor_line + 1).saturating_sub(visible_lines);
        self.scroll_line = self.scroll_line.max(min_line).min(self.cursor_line);
    }
}

impl Default for InputEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_one_empty_line() {
        let editor = InputEditor::new();
        assert_eq!(editor.lines().len(), 1);
        assert_eq!(editor.contents(), "");
        assert_eq!(editor.cursor(), (0, 0));
    }

    #[test]
    fn test_from_text_round_trip() {
        for text in ["", "one", "one\ntwo", "one\n", "a\r\nb", "a\rb"] {
            assert_eq!(InputEditor::from_text(text).contents(), text);
        }
    }

    #[test]
    fn test_insert_chars() {
        let mut editor = InputEditor::new();
        for c in "hey".chars() {
            editor.insert_char(c);
        }
        assert_eq!(editor.contents(), "hey");
        assert_eq!(editor.cursor(), (0, 3));
    }

    #[test]
    fn test_insert_multibyte_at_codepoint_boundary() {
        let mut editor = InputEditor::from_text("é𝄞");
        editor.move_right();
        editor.insert_char('x');
        assert_eq!(editor.contents(), "éx𝄞");
        assert_eq!(editor.cursor(), (0, 2));
    }

    #[test]
    fn test_insert_newline_splits_line() {
        let mut editor = InputEditor::from_text("abcd");
        editor.move_right();
        editor.move_right();
        editor.insert_newline();
        assert_eq!(editor.contents(), "ab\ncd");
        assert_eq!(editor.cursor(), (1, 0));
    }

    #[test]
    fn test_backspace_within_line_and_joining() {
        let mut editor = InputEditor::from_text("ab\ncd");
        editor.move_down();
        editor.move_right();
        editor.delete_prev_char();
        assert_eq!(editor.contents(), "ab\nd");

        // At column 0, backspace joins onto the previous line.
        editor.delete_prev_char();
        assert_eq!(editor.contents(), "abd");
        assert_eq!(editor.cursor(), (0, 2));

        // At the very start there is nothing to delete.
        let mut editor = InputEditor::new();
        editor.delete_prev_char();
        assert_eq!(editor.contents(), "");
    }

    #[test]
    fn test_delete_next_and_joining() {
        let mut editor = InputEditor::from_text("ab\ncd");
        editor.delete_next_char();
        assert_eq!(editor.contents(), "b\ncd");

        editor.move_to_line_end();
        editor.delete_next_char();
        assert_eq!(editor.contents(), "bcd");

        // Nothing right of the last character of the last line.
        editor.move_to_line_end();
        editor.delete_next_char();
        assert_eq!(editor.contents(), "bcd");
    }

    #[test]
    fn test_horizontal_movement_wraps_lines() {
        let mut editor = InputEditor::from_text("ab\ncd");
        editor.move_to_line_end();
        editor.move_right();
        assert_eq!(editor.cursor(), (1, 0));
        editor.move_left();
        assert_eq!(editor.cursor(), (0, 2));

        // Clamped at the buffer edges.
        editor.move_to_line_start();
        editor.move_left();
        assert_eq!(editor.cursor(), (0, 0));
        editor.move_down();
        editor.move_to_line_end();
        editor.move_right();
        assert_eq!(editor.cursor(), (1, 2));
    }

    #[test]
    fn test_vertical_movement_clamps_column() {
        let mut editor = InputEditor::from_text("long line\nab\nlonger line");
        editor.move_to_line_end();
        editor.move_down();
        assert_eq!(editor.cursor(), (1, 2));
        editor.move_down();
        assert_eq!(editor.cursor(), (2, 2));
        editor.move_up();
        editor.move_up();
        assert_eq!(editor.cursor(), (0, 2));
        editor.move_up();
        assert_eq!(editor.cursor(), (0, 2));
    }

    #[test]
    fn test_word_movement() {
        let mut editor = InputEditor::from_text("one  two");
        editor.move_word_right();
        assert_eq!(editor.cursor(), (0, 3));
        editor.move_word_right();
        assert_eq!(editor.cursor(), (0, 5));
        editor.move_word_right();
        assert_eq!(editor.cursor(), (0, 8));

        editor.move_word_left();
        assert_eq!(editor.cursor(), (0, 5));
        editor.move_word_left();
        assert_eq!(editor.cursor(), (0, 3));
        editor.move_word_left();
        assert_eq!(editor.cursor(), (0, 0));
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut editor = InputEditor::from_text("abcdefghij\n1\n2\n3\n4\n5");
        let area = Rect::new(0, 0, 8, 3);

        editor.move_to_line_end();
        editor.scroll_to_cursor(area, 2);
        let (_, scroll_col) = editor.scroll();
        assert!(scroll_col > 0);
        assert!(scroll_col <= 10);

        for _ in 0..5 {
            editor.move_down();
        }
        editor.scroll_to_cursor(area, 2);
        let (scroll_line, _) = editor.scroll();
        assert_eq!(scroll_line, 3);

        // Moving back up pulls the window up as well.
        for _ in 0..5 {
            editor.move_up();
        }
        editor.scroll_to_cursor(area, 2);
        let (scroll_line, _) = editor.scroll();
        assert_eq!(scroll_line, 0);
    }
}
