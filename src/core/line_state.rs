//! Editable input line: text, cursor and the last render snapshot.

use crate::core::cursor::CursorPos;
use crate::core::text::utils::{byte_offset, char_len};

/// The current input plus what was last drawn for it.
///
/// `cursor` is a char index into `text` and stays within `0..=len`. The render
/// snapshot (`last_rendered` and `rendered_cursor`) belongs to the render engine;
/// edits never touch it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineState {
    prompt: String,
    text: String,
    cursor: usize,
    last_rendered: String,
    rendered_cursor: CursorPos,
}

impl LineState {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub(crate) fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the input in chars.
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// `prompt + text`, the full line as it should appear on screen.
    pub fn visible_line(&self) -> String {
        let mut line = String::with_capacity(self.prompt.len() + self.text.len());
        line.push_str(&self.prompt);
        line.push_str(&self.text);
        line
    }

    /// Replace the input and move the cursor to its end. `None` clears the input.
    pub fn set_text(&mut self, text: Option<&str>) {
        self.text = text.unwrap_or_default().to_string();
        self.cursor = self.len();
    }

    /// Insert `ch` at the cursor and advance past it.
    pub fn insert_char(&mut self, ch: char) {
        let at = byte_offset(&self.text, self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    /// Remove the char before the cursor. No-op at position 0.
    pub fn delete_before_cursor(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = byte_offset(&self.text, self.cursor);
        self.text.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move right by one char. The cursor may reach `len`, the same place
    /// inserts and autocomplete leave it.
    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    /// Capture the input and clear it, leaving the cursor at 0.
    pub fn take_text(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub(crate) fn restore_text(&mut self, text: String, cursor: usize) {
        self.text = text;
        self.cursor = cursor.min(self.len());
    }

    pub fn last_rendered(&self) -> &str {
        &self.last_rendered
    }

    /// Where the last render left the terminal cursor, relative to the line start.
    pub fn rendered_cursor(&self) -> CursorPos {
        self.rendered_cursor
    }

    /// Whether a prompt drawn by the engine is currently on screen.
    pub fn has_render(&self) -> bool {
        !self.last_rendered.is_empty()
    }

    pub(crate) fn record_render(&mut self, rendered: String, cursor: CursorPos) {
        self.last_rendered = rendered;
        self.rendered_cursor = cursor;
    }

    /// Move the snapshot cursor to where the terminal's own echo left it.
    /// `painted` is appended to the snapshot when the echo drew past its end.
    pub(crate) fn record_echo(&mut self, painted: Option<char>, cursor: CursorPos) {
        if let Some(ch) = painted {
            self.last_rendered.push(ch);
        }
        self.rendered_cursor = cursor;
    }

    /// Forget the snapshot, so the next render starts from the current row.
    pub fn reset_render_snapshot(&mut self) {
        self.last_rendered.clear();
        self.rendered_cursor = CursorPos::default();
    }
}
