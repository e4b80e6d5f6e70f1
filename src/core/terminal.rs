//! Terminal trait and capability flags.

use std::io;

use crate::core::key::Key;

/// How a terminal reacts to input on its own, before the engine draws anything.
///
/// Raw-mode terminals echo nothing and use the defaults. The other flags are
/// for terminals that echo keys as they are read; the engine replays that echo
/// on its render snapshot so the next redraw still starts on the prompt row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    /// Enter is not echoed as a line feed, so the engine opens the next row
    /// itself. When `false` the terminal already moved to a fresh row.
    pub submit_advances_row: bool,
    /// Literal tabs in `write_line` output are expanded to spaces before printing.
    pub expand_tabs: bool,
    /// Printable keys are echoed at the cursor as they are read. An echo in the
    /// last column wraps the cursor onto the next row.
    pub echoes_input: bool,
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self {
            submit_advances_row: true,
            expand_tabs: true,
            echoes_input: false,
        }
    }
}

impl TerminalCapabilities {
    /// Echoing console: printable keys are echoed, Enter only returns the
    /// carriage, tabs are trusted.
    pub fn console() -> Self {
        Self {
            submit_advances_row: true,
            expand_tabs: false,
            echoes_input: true,
        }
    }

    /// Cooked line discipline: printable keys and Enter are both echoed.
    pub fn line_echo() -> Self {
        Self {
            submit_advances_row: false,
            expand_tabs: true,
            echoes_input: true,
        }
    }
}

/// Narrow terminal interface the shell runtime drives.
///
/// Writes assume console wrap semantics: once a write fills the last column the
/// cursor is on column 0 of the next row.
///
/// The engine counts one cell per char. Wide graphemes (CJK, most emoji) take
/// two cells on real terminals, so wrap rows and cursor columns drift once a
/// line holds them.
pub trait Terminal {
    /// Prepare the terminal for key-by-key input (raw mode).
    fn start(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Restore the terminal state saved by [`Terminal::start`].
    fn stop(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Block until one key is pressed.
    fn read_key(&mut self) -> io::Result<Key>;

    /// Current cursor column (0-based).
    fn cursor_column(&mut self) -> io::Result<usize>;

    /// Move the cursor to `column` (0-based) on the current row.
    fn set_column(&mut self, column: usize) -> io::Result<()>;

    fn move_up(&mut self, rows: usize) -> io::Result<()>;

    fn move_down(&mut self, rows: usize) -> io::Result<()>;

    /// Move to column 0 of the next row, scrolling if needed.
    fn new_line(&mut self) -> io::Result<()>;

    /// Write text at the cursor without starting a new line.
    fn write(&mut self, data: &str) -> io::Result<()>;

    /// Terminal width in columns, read fresh on every call.
    fn columns(&self) -> usize;

    fn capabilities(&self) -> TerminalCapabilities {
        TerminalCapabilities::default()
    }
}
