//! Incremental single-line renderer.
//!
//! Redraws `prompt + text` from the first row of the previous render, pads over
//! leftovers of a longer previous render, and parks the cursor on the input
//! cursor. All row math assumes console wrap semantics (see
//! [`Terminal`](crate::core::terminal::Terminal)).

use crate::core::cursor::CursorPos;
use crate::core::key::Key;
use crate::core::line_state::LineState;
use crate::core::output::TerminalCmd;
use crate::core::terminal::TerminalCapabilities;
use crate::core::text::utils::{char_len, spaces};

/// Rows below the first one that the cursor sits on after writing `len` cells.
///
/// Anything shorter than one row is 0; an exact multiple of `width` counts the
/// extra row the cursor wrapped onto.
pub fn wrap_rows(len: usize, width: usize) -> usize {
    len / width.max(1)
}

/// Spaces needed to blank out the tail of a longer previous render.
pub fn padding_for(old_len: usize, new_len: usize) -> usize {
    old_len.saturating_sub(new_len)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderEngine {
    caps: TerminalCapabilities,
}

impl RenderEngine {
    pub fn new(caps: TerminalCapabilities) -> Self {
        Self { caps }
    }

    pub fn capabilities(&self) -> TerminalCapabilities {
        self.caps
    }

    /// Commands that bring the terminal line from `line.last_rendered()` to
    /// `line.visible_line()`, then record the new snapshot.
    pub fn reconcile(&self, line: &mut LineState, width: usize) -> Vec<TerminalCmd> {
        let width = width.max(1);
        let visible = line.visible_line();
        let prompt_len = char_len(line.prompt());
        let old_len = char_len(line.last_rendered());
        let new_len = prompt_len + line.len();

        let rows_up = if line.has_render() {
            line.rendered_cursor().row
        } else {
            0
        };
        let padding = padding_for(old_len, new_len);

        let mut cmds = Vec::with_capacity(6);
        cmds.push(TerminalCmd::MoveUp(rows_up));
        cmds.push(TerminalCmd::ColumnAbs(0));
        cmds.push(TerminalCmd::Bytes(visible.clone()));
        if padding > 0 {
            cmds.push(TerminalCmd::Bytes(spaces(padding)));
        }

        let written = CursorPos::at_offset(new_len + padding, width);
        let target = CursorPos::at_offset(prompt_len + line.cursor(), width);
        cmds.push(TerminalCmd::MoveUp(written.row - target.row));
        cmds.push(TerminalCmd::ColumnAbs(target.col));

        tracing::trace!(old_len, new_len, rows_up, padding, ?target, "reconcile line");
        line.record_render(visible, target);
        cmds
    }

    /// Replay the terminal's echo of `key` on the render snapshot.
    ///
    /// Called after every key read and before it is dispatched. Does nothing on
    /// terminals that do not echo, or while no prompt is on screen.
    pub fn record_echo(&self, line: &mut LineState, key: &Key, width: usize) {
        if !line.has_render() {
            return;
        }
        let width = width.max(1);
        let cursor = line.rendered_cursor();

        if *key == Key::Enter && !self.caps.submit_advances_row {
            line.record_echo(
                None,
                CursorPos {
                    row: cursor.row + 1,
                    col: 0,
                },
            );
            return;
        }

        let Some(ch) = key.printable().filter(|_| self.caps.echoes_input) else {
            return;
        };
        let offset = cursor.row * width + cursor.col;
        let painted = (offset >= char_len(line.last_rendered())).then_some(ch);
        line.record_echo(painted, CursorPos::at_offset(offset + 1, width));
    }

    /// Commands that leave the rendered line and put the cursor on column 0 of a
    /// fresh row below it. Resets the render snapshot.
    pub fn finish_line(&self, line: &mut LineState, width: usize) -> Vec<TerminalCmd> {
        let width = width.max(1);
        let mut cmds = Vec::with_capacity(2);

        if !line.has_render() {
            if self.caps.submit_advances_row {
                cmds.push(TerminalCmd::NewLine);
            } else {
                cmds.push(TerminalCmd::ColumnAbs(0));
            }
        } else {
            let end = CursorPos::at_offset(char_len(line.last_rendered()), width);
            let cursor = line.rendered_cursor();
            // A line that filled its last row exactly already opened the row below.
            let below = if end.col == 0 { end.row } else { end.row + 1 };

            if cursor.row > below {
                cmds.push(TerminalCmd::MoveUp(cursor.row - below));
                cmds.push(TerminalCmd::ColumnAbs(0));
            } else if end.col == 0 {
                cmds.push(TerminalCmd::MoveDown(below - cursor.row));
                cmds.push(TerminalCmd::ColumnAbs(0));
            } else if cursor.row == below {
                // An echoed line feed already left the text.
                cmds.push(TerminalCmd::ColumnAbs(0));
            } else {
                cmds.push(TerminalCmd::MoveDown(end.row - cursor.row));
                cmds.push(TerminalCmd::NewLine);
            }
        }

        line.reset_render_snapshot();
        cmds
    }
}
