//! The shell run loop.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::core::keybindings::ShellKeymap;
use crate::core::line_state::LineState;
use crate::core::terminal::Terminal;
use crate::error::ShellResult;
use crate::render::reconcile::RenderEngine;
use crate::runtime::dispatch::{Dispatch, KeyDispatcher};
use crate::runtime::run_state::RunState;
use crate::runtime::session::{Session, Shell};

/// Cloneable handle for printing lines from other threads.
///
/// Lines are queued and written above the prompt by the run loop, before the
/// next key is read and after each dispatched key.
#[derive(Debug, Clone)]
pub struct OutputSender {
    tx: Sender<String>,
}

impl OutputSender {
    /// Queue `line`. Returns `false` once the runtime has been dropped.
    pub fn send(&self, line: impl Into<String>) -> bool {
        self.tx.send(line.into()).is_ok()
    }
}

/// Owns a terminal, a [`Shell`] and the input line, and drives them key by key.
pub struct ShellRuntime<T: Terminal, S: Shell> {
    terminal: T,
    shell: S,
    line: LineState,
    run_state: RunState,
    dispatcher: KeyDispatcher,
    engine: RenderEngine,
    outbox_tx: Sender<String>,
    outbox_rx: Receiver<String>,
}

impl<T: Terminal, S: Shell> ShellRuntime<T, S> {
    pub fn new(terminal: T, shell: S) -> Self {
        let (outbox_tx, outbox_rx) = mpsc::channel();
        let engine = RenderEngine::new(terminal.capabilities());
        let line = LineState::new(shell.prompt());
        Self {
            terminal,
            shell,
            line,
            run_state: RunState::new(),
            dispatcher: KeyDispatcher::default(),
            engine,
            outbox_tx,
            outbox_rx,
        }
    }

    pub fn with_keymap(mut self, keymap: ShellKeymap) -> Self {
        self.dispatcher = KeyDispatcher::new(keymap);
        self
    }

    pub fn keymap_mut(&mut self) -> &mut ShellKeymap {
        self.dispatcher.keymap_mut()
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }

    pub fn line(&self) -> &LineState {
        &self.line
    }

    /// Stop the loop after the key being dispatched. Returns whether this call stopped it.
    pub fn halt(&mut self) -> bool {
        self.run_state.halt()
    }

    pub fn output_sender(&self) -> OutputSender {
        OutputSender {
            tx: self.outbox_tx.clone(),
        }
    }

    /// Print `text` above the prompt. See [`Session::write_line`].
    pub fn write_line(&mut self, text: &str) -> ShellResult<()> {
        let mut session = Session::new(
            &mut self.terminal,
            &mut self.line,
            &mut self.run_state,
            self.engine,
        );
        session.write_line(text)?;
        Ok(())
    }

    /// Run until a hook halts the shell.
    ///
    /// Returns `Ok(false)` without touching the terminal when the shell is
    /// already running. A hook error ends the loop immediately and skips
    /// `on_stop`; the terminal is restored either way.
    pub fn run(&mut self) -> ShellResult<bool> {
        if !self.run_state.start() {
            tracing::warn!("run called while the shell is already running");
            return Ok(false);
        }

        if let Err(err) = self.terminal.start() {
            self.run_state.halt();
            return Err(err.into());
        }
        tracing::info!(columns = self.terminal.columns(), "shell started");

        let result = self.run_loop();
        let restored = self.terminal.stop();
        self.run_state.halt();

        match (result, restored) {
            (Err(err), _) => {
                tracing::error!(error = %err, "shell stopped with an error");
                Err(err)
            }
            (Ok(()), Err(err)) => Err(err.into()),
            (Ok(()), Ok(())) => {
                tracing::info!("shell stopped");
                Ok(true)
            }
        }
    }

    fn run_loop(&mut self) -> ShellResult<()> {
        self.engine = RenderEngine::new(self.terminal.capabilities());
        self.line.set_prompt(self.shell.prompt());
        self.line.set_text(None);
        self.line.reset_render_snapshot();

        {
            let mut session = Session::new(
                &mut self.terminal,
                &mut self.line,
                &mut self.run_state,
                self.engine,
            );
            self.shell.on_start(&mut session)?;
            // Output from `on_start` may leave the cursor mid-row or a prompt drawn.
            if session.is_running() && session.cursor_column()? == 0 {
                session.render()?;
            }
        }

        while self.run_state.is_running() {
            self.drain_outbox()?;
            let key = self.terminal.read_key()?;

            let mut session = Session::new(
                &mut self.terminal,
                &mut self.line,
                &mut self.run_state,
                self.engine,
            );
            session.record_echo(&key);
            match self.dispatcher.dispatch(&mut self.shell, &mut session, &key)? {
                Dispatch::Render => session.render()?,
                Dispatch::Halted => break,
            }
            drop(session);
            self.drain_outbox()?;
        }

        let mut session = Session::new(
            &mut self.terminal,
            &mut self.line,
            &mut self.run_state,
            self.engine,
        );
        self.shell.on_stop(&mut session)?;
        session.close()?;
        Ok(())
    }

    fn drain_outbox(&mut self) -> ShellResult<()> {
        while let Ok(line) = self.outbox_rx.try_recv() {
            self.write_line(&line)?;
        }
        Ok(())
    }
}

impl<T: Terminal, S: Shell> std::fmt::Debug for ShellRuntime<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellRuntime")
            .field("line", &self.line)
            .field("run_state", &self.run_state)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::ShellRuntime;
    use crate::core::output::TerminalCmd;
    use crate::error::{ShellError, ShellResult};
    use crate::platform::scripted_terminal::ScriptedTerminal;
    use crate::runtime::session::{Session, Shell};

    #[derive(Default)]
    struct Counter {
        greeting: Option<&'static str>,
        starts: usize,
        stops: usize,
        lines: Vec<String>,
    }

    impl Shell for Counter {
        fn prompt(&self) -> &str {
            "> "
        }

        fn on_start(&mut self, session: &mut Session<'_>) -> ShellResult<()> {
            self.starts += 1;
            if let Some(greeting) = self.greeting {
                session.write_line(greeting)?;
            }
            Ok(())
        }

        fn on_stop(&mut self, _session: &mut Session<'_>) -> ShellResult<()> {
            self.stops += 1;
            Ok(())
        }

        fn on_submit(&mut self, session: &mut Session<'_>, line: String) -> ShellResult<()> {
            if line == "quit" {
                session.halt();
            } else if line == "boom" {
                return Err(ShellError::message("boom"));
            }
            self.lines.push(line);
            Ok(())
        }
    }

    fn runtime(keys: &str) -> ShellRuntime<ScriptedTerminal, Counter> {
        let mut terminal = ScriptedTerminal::new(40);
        terminal.type_text(keys);
        ShellRuntime::new(terminal, Counter::default())
    }

    #[test]
    fn run_submits_lines_until_halted() {
        let mut shell = runtime("one\ntwo\nquit\n");
        assert!(shell.run().expect("run"));
        assert!(!shell.is_running());
        assert_eq!(shell.shell().lines, vec!["one", "two"]);
        assert_eq!((shell.shell().starts, shell.shell().stops), (1, 1));
    }

    #[test]
    fn second_run_while_running_is_refused() {
        let mut shell = runtime("quit\n");
        assert!(shell.run_state.start());
        assert!(!shell.run().expect("re-entry"));
        assert_eq!(shell.shell().starts, 0);
        assert!(shell.terminal().commands().is_empty());

        assert!(shell.halt());
        assert!(shell.run().expect("run"));
        assert_eq!(shell.shell().starts, 1);
    }

    #[test]
    fn hook_error_skips_on_stop() {
        let mut shell = runtime("boom\n");
        let err = shell.run().expect_err("hook error");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(shell.shell().stops, 0);
        assert!(!shell.is_running());
    }

    #[test]
    fn running_out_of_keys_is_an_io_error() {
        let mut shell = runtime("abc");
        let err = shell.run().expect_err("eof");
        assert!(matches!(err, ShellError::Io(_)));
    }

    #[test]
    fn initial_render_waits_for_line_start() {
        let terminal = ScriptedTerminal::new(40).with_column(3);
        let mut shell = ShellRuntime::new(terminal, Counter::default());
        assert!(shell.run().is_err());
        assert!(shell.terminal().screen_lines().iter().all(|row| !row.contains('>')));
        assert_eq!(shell.shell().starts, 1);
    }

    #[test]
    fn prompt_drawn_by_on_start_is_not_drawn_again() {
        let counter = Counter {
            greeting: Some("welcome"),
            ..Counter::default()
        };
        let mut shell = ShellRuntime::new(ScriptedTerminal::new(40), counter);
        assert!(shell.run().is_err());

        let prompts = shell
            .terminal()
            .commands()
            .iter()
            .filter(|cmd| **cmd == TerminalCmd::bytes("> "))
            .count();
        assert_eq!(prompts, 2);
        assert_eq!(shell.terminal().screen_lines(), vec!["welcome", ">"]);
    }

    #[test]
    fn output_sender_lines_print_above_prompt() {
        let mut shell = runtime("ab");
        let sender = shell.output_sender();
        assert!(sender.send("queued"));
        shell.terminal_mut().type_text("\nquit\n");
        shell.run().expect("run");
        let screen = shell.terminal().screen_lines();
        assert_eq!(screen[0], "queued");
        assert_eq!(screen[1], "> ab");
    }
}
