//! Typed terminal output commands and a single output gate.
//!
//! Invariant: all terminal writes from the engine flow through `OutputGate::flush(..)`.

use std::io;

use crate::core::terminal::Terminal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Text written at the cursor.
    Bytes(String),

    /// Relative row moves. Zero is a no-op.
    MoveUp(usize),
    MoveDown(usize),
    /// Absolute 0-based column on the current row.
    ColumnAbs(usize),
    /// Column 0 of the next row.
    NewLine,
}

impl TerminalCmd {
    pub fn bytes(data: impl Into<String>) -> Self {
        Self::Bytes(data.into())
    }
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = TerminalCmd>,
    {
        self.cmds.extend(cmds);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Flush buffered commands to the terminal.
    ///
    /// Commands are drained even when a write fails; the first error is returned.
    pub fn flush(&mut self, term: &mut dyn Terminal) -> io::Result<()> {
        let mut result = Ok(());
        for cmd in self.cmds.drain(..) {
            if result.is_err() {
                continue;
            }
            result = match cmd {
                TerminalCmd::Bytes(data) => term.write(&data),
                TerminalCmd::MoveUp(0) | TerminalCmd::MoveDown(0) => Ok(()),
                TerminalCmd::MoveUp(rows) => term.move_up(rows),
                TerminalCmd::MoveDown(rows) => term.move_down(rows),
                TerminalCmd::ColumnAbs(column) => term.set_column(column),
                TerminalCmd::NewLine => term.new_line(),
            };
        }
        result
    }
}
