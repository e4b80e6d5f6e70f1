//! The `Shell` customization trait and the session handle passed to its hooks.

use std::fmt;
use std::io;

use crate::core::key::Key;
use crate::core::line_state::LineState;
use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::terminal::Terminal;
use crate::core::text::utils::{char_len, expand_tabs, pad_right};
use crate::error::ShellResult;
use crate::render::reconcile::RenderEngine;
use crate::runtime::run_state::RunState;

/// A concrete shell built on the engine.
///
/// Hooks receive a [`Session`] to inspect the input, print output or halt the
/// run loop. An `Err` from any hook propagates out of
/// [`ShellRuntime::run`](crate::runtime::shell::ShellRuntime::run) right away:
/// the loop does not shield hook failures and `on_stop` is skipped. Wrap the
/// hook body yourself if a failing command should not end the session.
pub trait Shell {
    /// Text shown before the input on every render.
    fn prompt(&self) -> &str;

    /// Called with the finished line when the submit key is pressed. The input
    /// has already been cleared.
    fn on_submit(&mut self, session: &mut Session<'_>, line: String) -> ShellResult<()>;

    /// Called once before the first key is read.
    fn on_start(&mut self, _session: &mut Session<'_>) -> ShellResult<()> {
        Ok(())
    }

    /// Called once after the loop ends normally.
    fn on_stop(&mut self, _session: &mut Session<'_>) -> ShellResult<()> {
        Ok(())
    }

    /// First look at every key. Return `true` to skip the built-in behaviour.
    fn on_key(&mut self, _session: &mut Session<'_>, _key: &Key) -> ShellResult<bool> {
        Ok(false)
    }

    /// Called on the autocomplete key with the current input. `Some` replaces
    /// the input and moves the cursor to its end.
    fn on_autocomplete(
        &mut self,
        _session: &mut Session<'_>,
        _input: &str,
    ) -> ShellResult<Option<String>> {
        Ok(None)
    }
}

/// Borrowed view of a running shell: terminal, input line and run flag.
pub struct Session<'a> {
    terminal: &'a mut dyn Terminal,
    line: &'a mut LineState,
    run_state: &'a mut RunState,
    engine: RenderEngine,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        terminal: &'a mut dyn Terminal,
        line: &'a mut LineState,
        run_state: &'a mut RunState,
        engine: RenderEngine,
    ) -> Self {
        Self {
            terminal,
            line,
            run_state,
            engine,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }

    /// Stop the run loop after the current key. Returns whether this call stopped it.
    pub fn halt(&mut self) -> bool {
        let halted = self.run_state.halt();
        if halted {
            tracing::debug!("shell halt requested");
        }
        halted
    }

    pub fn line(&self) -> &LineState {
        &*self.line
    }

    pub(crate) fn line_mut(&mut self) -> &mut LineState {
        &mut *self.line
    }

    pub fn prompt(&self) -> &str {
        self.line.prompt()
    }

    pub fn text(&self) -> &str {
        self.line.text()
    }

    pub fn cursor(&self) -> usize {
        self.line.cursor()
    }

    /// Replace the input; the cursor moves to its end. Shown on the next render.
    pub fn set_text(&mut self, text: Option<&str>) {
        self.line.set_text(text);
    }

    pub fn columns(&self) -> usize {
        self.terminal.columns()
    }

    /// Reconcile the terminal line with the current input.
    pub fn render(&mut self) -> io::Result<()> {
        let cmds = self.engine.reconcile(&mut *self.line, self.terminal.columns());
        self.flush(cmds)
    }

    /// Note the terminal's echo of a key that was just read.
    pub(crate) fn record_echo(&mut self, key: &Key) {
        let width = self.terminal.columns();
        self.engine.record_echo(&mut *self.line, key, width);
    }

    pub(crate) fn cursor_column(&mut self) -> io::Result<usize> {
        self.terminal.cursor_column()
    }

    /// Print `text` on its own row above the live prompt.
    ///
    /// While the loop runs, the prompt is blanked, `text` is written over it
    /// (padded to at least the prompt width), and prompt plus input are drawn
    /// again on the next row. Without a live prompt the text is printed as is.
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        let text = if self.engine.capabilities().expand_tabs {
            expand_tabs(text)
        } else {
            text.to_string()
        };

        if !self.is_running() && !self.line.has_render() {
            return self.flush(vec![TerminalCmd::Bytes(text), TerminalCmd::NewLine]);
        }

        let cursor = self.line.cursor();
        let input = self.line.take_text();
        self.render()?;

        let padded = pad_right(&text, char_len(self.line.prompt()));
        self.flush(vec![
            TerminalCmd::ColumnAbs(0),
            TerminalCmd::Bytes(padded),
            TerminalCmd::NewLine,
        ])?;

        self.line.reset_render_snapshot();
        self.line.restore_text(input, cursor);
        if self.is_running() {
            self.render()?;
        }
        Ok(())
    }

    /// [`Session::write_line`] with `format_args!` input.
    pub fn write_fmt_line(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.write_line(&args.to_string())
    }

    pub fn write_blank_line(&mut self) -> io::Result<()> {
        self.write_line("")
    }

    /// Clear the input and move the terminal to a fresh row, returning the input.
    pub(crate) fn submit_line(&mut self) -> io::Result<String> {
        let submitted = self.line.take_text();
        let cmds = self.engine.finish_line(&mut *self.line, self.terminal.columns());
        self.flush(cmds)?;
        Ok(submitted)
    }

    /// End the session's output: leave the live prompt, if any, and start a new row.
    pub(crate) fn close(&mut self) -> io::Result<()> {
        if self.line.has_render() {
            let cmds = self.engine.finish_line(&mut *self.line, self.terminal.columns());
            return self.flush(cmds);
        }
        self.flush(vec![TerminalCmd::NewLine])
    }

    fn flush(&mut self, cmds: Vec<TerminalCmd>) -> io::Result<()> {
        let mut gate = OutputGate::new();
        gate.extend(cmds);
        gate.flush(&mut *self.terminal)
    }
}

impl fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("line", &self.line)
            .field("run_state", &self.run_state)
            .finish_non_exhaustive()
    }
}
