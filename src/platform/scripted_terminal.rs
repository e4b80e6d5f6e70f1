//! In-memory terminal for tests and headless use.
//!
//! Keeps a character grid with console wrap semantics (writing into the last
//! column moves the cursor to column 0 of the next row), replays a scripted key
//! queue, and logs every command it receives. Keys are echoed onto the grid as
//! they are read when the capabilities say the terminal echoes.

use std::collections::VecDeque;
use std::io;

use crate::core::key::Key;
use crate::core::output::TerminalCmd;
use crate::core::terminal::{Terminal, TerminalCapabilities};

#[derive(Debug, Clone)]
pub struct ScriptedTerminal {
    width: usize,
    grid: Vec<Vec<char>>,
    row: usize,
    col: usize,
    keys: VecDeque<Key>,
    commands: Vec<TerminalCmd>,
    caps: TerminalCapabilities,
    raw_mode: bool,
    stop_count: usize,
}

impl ScriptedTerminal {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            grid: vec![Vec::new()],
            row: 0,
            col: 0,
            keys: VecDeque::new(),
            commands: Vec::new(),
            caps: TerminalCapabilities::default(),
            raw_mode: false,
            stop_count: 0,
        }
    }

    pub fn with_keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = Key>,
    {
        self.keys.extend(keys);
        self
    }

    /// Start with the cursor at `column` of the first row, as if the host had
    /// already printed part of a line.
    pub fn with_column(mut self, column: usize) -> Self {
        self.col = column.min(self.width - 1);
        self
    }

    /// Behave as `caps` describe: with `echoes_input` printable keys are drawn
    /// at the cursor when read; Enter is echoed as a line feed without
    /// `submit_advances_row`, and as a carriage return otherwise.
    pub fn with_capabilities(mut self, caps: TerminalCapabilities) -> Self {
        self.caps = caps;
        self
    }

    /// Resize the screen. Rows are clipped to the new width, not reflowed.
    pub fn set_width(&mut self, width: usize) {
        self.width = width.max(1);
        self.col = self.col.min(self.width - 1);
        for row in &mut self.grid {
            row.truncate(self.width);
        }
    }

    pub fn push_key(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    /// Queue one key per char: `\n`/`\r` as Enter, `\t` as Tab, DEL/BS as
    /// Backspace, anything else as [`Key::Char`].
    pub fn type_text(&mut self, text: &str) {
        self.keys.extend(text.chars().map(|ch| match ch {
            '\n' | '\r' => Key::Enter,
            '\t' => Key::Tab,
            '\u{7f}' | '\u{8}' => Key::Backspace,
            other => Key::Char(other),
        }));
    }

    pub fn pending_keys(&self) -> usize {
        self.keys.len()
    }

    pub fn commands(&self) -> &[TerminalCmd] {
        &self.commands
    }

    /// Cursor position as `(row, col)`, rows counted from the first screen row.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count
    }

    /// Screen contents, one string per row with trailing blanks trimmed.
    /// Empty rows at the bottom are dropped.
    pub fn screen_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .grid
            .iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect();
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines
    }

    fn ensure_row(&mut self) {
        while self.grid.len() <= self.row {
            self.grid.push(Vec::new());
        }
    }

    fn put(&mut self, ch: char) {
        self.ensure_row();
        let col = self.col;
        let row = &mut self.grid[self.row];
        if row.len() <= col {
            row.resize(col + 1, ' ');
        }
        row[col] = ch;

        self.col += 1;
        if self.col == self.width {
            self.row += 1;
            self.col = 0;
            self.ensure_row();
        }
    }

    fn echo(&mut self, key: &Key) {
        if *key == Key::Enter {
            if !self.caps.submit_advances_row {
                self.line_feed();
            } else if self.caps.echoes_input {
                self.col = 0;
            }
        } else if let Some(ch) = key.printable().filter(|_| self.caps.echoes_input) {
            self.put(ch);
        }
    }

    fn line_feed(&mut self) {
        self.row += 1;
        self.col = 0;
        self.ensure_row();
    }
}

impl Terminal for ScriptedTerminal {
    fn start(&mut self) -> io::Result<()> {
        self.raw_mode = true;
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        self.raw_mode = false;
        self.stop_count += 1;
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        let key = self
            .keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted keys left"))?;
        self.echo(&key);
        Ok(key)
    }

    fn cursor_column(&mut self) -> io::Result<usize> {
        Ok(self.col)
    }

    fn set_column(&mut self, column: usize) -> io::Result<()> {
        self.commands.push(TerminalCmd::ColumnAbs(column));
        self.col = column.min(self.width - 1);
        Ok(())
    }

    fn move_up(&mut self, rows: usize) -> io::Result<()> {
        self.commands.push(TerminalCmd::MoveUp(rows));
        self.row = self.row.saturating_sub(rows);
        Ok(())
    }

    fn move_down(&mut self, rows: usize) -> io::Result<()> {
        self.commands.push(TerminalCmd::MoveDown(rows));
        self.row += rows;
        self.ensure_row();
        Ok(())
    }

    fn new_line(&mut self) -> io::Result<()> {
        self.commands.push(TerminalCmd::NewLine);
        self.line_feed();
        Ok(())
    }

    fn write(&mut self, data: &str) -> io::Result<()> {
        self.commands.push(TerminalCmd::bytes(data));
        for ch in data.chars() {
            match ch {
                '\n' => self.line_feed(),
                '\r' => self.col = 0,
                other => self.put(other),
            }
        }
        Ok(())
    }

    fn columns(&self) -> usize {
        self.width
    }

    fn capabilities(&self) -> TerminalCapabilities {
        self.caps
    }
}

#[cfg(test)]
mod tests {
    use super::ScriptedTerminal;
    use crate::core::key::Key;
    use crate::core::terminal::{Terminal, TerminalCapabilities};

    #[test]
    fn writes_wrap_immediately_at_the_margin() {
        let mut terminal = ScriptedTerminal::new(4);
        terminal.write("abcd").expect("write");
        assert_eq!(terminal.cursor(), (1, 0));
        terminal.write("ef").expect("write");
        assert_eq!(terminal.screen_lines(), vec!["abcd", "ef"]);
    }

    #[test]
    fn moves_saturate_and_columns_clamp() {
        let mut terminal = ScriptedTerminal::new(4);
        terminal.move_up(3).expect("up");
        terminal.set_column(10).expect("column");
        assert_eq!(terminal.cursor(), (0, 3));
        terminal.move_down(2).expect("down");
        terminal.write("x").expect("write");
        assert_eq!(terminal.screen_lines(), vec!["", "", "   x"]);
    }

    #[test]
    fn typed_text_maps_control_chars_to_keys() {
        let mut terminal = ScriptedTerminal::new(10);
        terminal.type_text("a\t\n\u{7f}");
        let keys: Vec<Key> = (0..4).map(|_| terminal.read_key().expect("key")).collect();
        assert_eq!(keys, vec![Key::Char('a'), Key::Tab, Key::Enter, Key::Backspace]);
        let err = terminal.read_key().expect_err("empty queue");
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn echoing_terminal_draws_keys_as_they_are_read() {
        let mut terminal =
            ScriptedTerminal::new(3).with_capabilities(TerminalCapabilities::line_echo());
        terminal.type_text("abcd\n");
        for _ in 0..4 {
            terminal.read_key().expect("key");
        }
        assert_eq!(terminal.cursor(), (1, 1));
        assert_eq!(terminal.read_key().expect("enter"), Key::Enter);
        assert_eq!(terminal.cursor(), (2, 0));
        assert_eq!(terminal.screen_lines(), vec!["abc", "d"]);
    }

    #[test]
    fn console_echo_returns_the_carriage_on_enter() {
        let mut terminal =
            ScriptedTerminal::new(10).with_capabilities(TerminalCapabilities::console());
        terminal.type_text("ab\n");
        for _ in 0..3 {
            terminal.read_key().expect("key");
        }
        assert_eq!(terminal.cursor(), (0, 0));
        assert_eq!(terminal.screen_lines(), vec!["ab"]);
    }
}
