use std::thread;

use lineshell::{
    Completer, Key, ScriptedTerminal, Session, Shell, ShellAction, ShellError, ShellKeymap,
    ShellResult, ShellRuntime, TerminalCapabilities, VocabularyCompleter,
};

/// F5 records the current input; Ctrl-D halts; Up prints a note.
struct Recorder {
    greeting: Option<&'static str>,
    vocabulary: VocabularyCompleter,
    submitted: Vec<String>,
    snapshots: Vec<(String, usize)>,
    starts: usize,
    stops: usize,
}

impl Recorder {
    fn new() -> Self {
        Self {
            greeting: None,
            vocabulary: VocabularyCompleter::new([
                "apple",
                "pear",
                "pineapple",
                "grapefruit",
                "chokecherry",
                "orange",
                "coconut",
                "lemon",
            ]),
            submitted: Vec::new(),
            snapshots: Vec::new(),
            starts: 0,
            stops: 0,
        }
    }

    fn greeting(mut self, text: &'static str) -> Self {
        self.greeting = Some(text);
        self
    }
}

impl Shell for Recorder {
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

    fn on_submit(&mut self, _session: &mut Session<'_>, line: String) -> ShellResult<()> {
        if line == "boom" {
            return Err(ShellError::hook(std::io::Error::other("submit failed")));
        }
        self.submitted.push(line);
        Ok(())
    }

    fn on_key(&mut self, session: &mut Session<'_>, key: &Key) -> ShellResult<bool> {
        match key {
            Key::F(5) => {
                self.snapshots
                    .push((session.text().to_string(), session.cursor()));
                Ok(true)
            }
            Key::Ctrl('d') => {
                session.halt();
                Ok(true)
            }
            Key::Up => {
                session.write_line("note")?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn on_autocomplete(
        &mut self,
        _session: &mut Session<'_>,
        input: &str,
    ) -> ShellResult<Option<String>> {
        Ok(self.vocabulary.complete(input))
    }
}

fn terminal(width: usize, script: &[Key]) -> ScriptedTerminal {
    ScriptedTerminal::new(width).with_keys(script.iter().cloned())
}

fn typed(text: &str) -> Vec<Key> {
    text.chars().map(Key::Char).collect()
}

fn script(parts: &[&[Key]]) -> Vec<Key> {
    parts.concat()
}

#[test]
fn autocomplete_then_submit() {
    let keys = script(&[
        &typed("ap"),
        &[Key::Tab, Key::F(5), Key::Enter, Key::F(5), Key::Ctrl('d')],
    ]);
    let mut shell = ShellRuntime::new(terminal(80, &keys), Recorder::new());

    assert!(shell.run().expect("run"));
    let recorder = shell.shell();
    assert_eq!(
        recorder.snapshots,
        vec![("apple".to_string(), 5), (String::new(), 0)]
    );
    assert_eq!(recorder.submitted, vec!["apple".to_string()]);
    assert_eq!(
        shell.terminal().screen_lines(),
        vec!["> apple".to_string(), ">".to_string()]
    );
}

#[test]
fn backspace_twice_after_hello() {
    let keys = script(&[
        &typed("hello"),
        &[Key::Backspace, Key::Backspace, Key::F(5), Key::Ctrl('d')],
    ]);
    let mut shell = ShellRuntime::new(terminal(80, &keys), Recorder::new());

    shell.run().expect("run");
    assert_eq!(shell.shell().snapshots, vec![("hel".to_string(), 3)]);
    assert_eq!(shell.terminal().screen_lines(), vec!["> hel".to_string()]);
}

#[test]
fn cursor_editing_in_the_middle() {
    let keys = script(&[
        &typed("helo"),
        &[Key::Left, Key::Char('l'), Key::Right, Key::Right, Key::F(5)],
        &[Key::Left, Key::Left, Key::Left, Key::Left, Key::Left, Key::Left],
        &[Key::Backspace, Key::F(5), Key::Ctrl('d')],
    ]);
    let mut shell = ShellRuntime::new(terminal(80, &keys), Recorder::new());

    shell.run().expect("run");
    assert_eq!(
        shell.shell().snapshots,
        vec![("hello".to_string(), 5), ("hello".to_string(), 0)]
    );
}

#[test]
fn write_line_keeps_the_line_being_edited() {
    let keys = script(&[&typed("abc"), &[Key::Up, Key::F(5), Key::Ctrl('d')]]);
    let mut shell = ShellRuntime::new(terminal(40, &keys), Recorder::new());

    shell.run().expect("run");
    assert_eq!(shell.shell().snapshots, vec![("abc".to_string(), 3)]);
    assert_eq!(
        shell.terminal().screen_lines(),
        vec!["note".to_string(), "> abc".to_string()]
    );
}

#[test]
fn wrapped_line_shrinks_cleanly() {
    let keys = script(&[
        &typed("abcdefghijkl"),
        &vec![Key::Backspace; 6],
        &[Key::F(5), Key::Ctrl('d')],
    ]);
    let mut shell = ShellRuntime::new(terminal(10, &keys), Recorder::new());

    shell.run().expect("run");
    assert_eq!(shell.shell().snapshots, vec![("abcdef".to_string(), 6)]);
    assert_eq!(shell.terminal().screen_lines(), vec!["> abcdef".to_string()]);
}

#[test]
fn insert_inside_wrapped_line_lands_on_the_right_row() {
    let keys = script(&[
        &typed("abcdefghijkl"),
        &vec![Key::Left; 6],
        &[Key::Char('X'), Key::F(5), Key::Ctrl('d')],
    ]);
    let mut shell = ShellRuntime::new(terminal(10, &keys), Recorder::new());

    shell.run().expect("run");
    assert_eq!(
        shell.shell().snapshots,
        vec![("abcdefXghijkl".to_string(), 7)]
    );
    assert_eq!(
        shell.terminal().screen_lines(),
        vec!["> abcdefXg".to_string(), "hijkl".to_string()]
    );
    assert_eq!(shell.terminal().cursor(), (2, 0));
}

#[test]
fn submit_after_exact_wrap_does_not_leave_a_blank_row() {
    let keys = script(&[&typed("abcdefgh"), &[Key::Enter, Key::Ctrl('d')]]);
    let mut shell = ShellRuntime::new(terminal(10, &keys), Recorder::new());

    shell.run().expect("run");
    assert_eq!(shell.shell().submitted, vec!["abcdefgh".to_string()]);
    assert_eq!(
        shell.terminal().screen_lines(),
        vec!["> abcdefgh".to_string(), ">".to_string()]
    );
}

#[test]
fn hook_error_ends_run_without_on_stop() {
    let keys = script(&[&typed("boom"), &[Key::Enter, Key::Ctrl('d')]]);
    let mut shell = ShellRuntime::new(terminal(40, &keys), Recorder::new());

    let err = shell.run().expect_err("hook error propagates");
    assert!(matches!(err, ShellError::Hook(_)));
    assert_eq!(err.to_string(), "shell hook failed: submit failed");
    assert_eq!((shell.shell().starts, shell.shell().stops), (1, 0));
    assert!(!shell.is_running());
    assert!(!shell.terminal().is_raw_mode());
    assert_eq!(shell.terminal().stop_count(), 1);
    assert_eq!(shell.terminal().pending_keys(), 1);
}

#[test]
fn shell_can_run_again_after_halting() {
    let keys = script(&[&typed("first"), &[Key::Enter, Key::Ctrl('d')]]);
    let mut shell = ShellRuntime::new(terminal(40, &keys), Recorder::new());
    assert!(shell.run().expect("first run"));

    shell.shell_mut().submitted.clear();
    shell.keymap_mut().bind(Key::F(3), ShellAction::Submit);
    shell.terminal_mut().type_text("again");
    shell.terminal_mut().push_key(Key::F(3));
    shell.terminal_mut().push_key(Key::Ctrl('d'));
    assert!(shell.run().expect("second run"));

    let recorder = shell.shell();
    assert_eq!((recorder.starts, recorder.stops), (2, 2));
    assert_eq!(recorder.submitted, vec!["again".to_string()]);
}

#[test]
fn output_from_other_threads_is_printed_between_keys() {
    let keys = script(&[&typed("x"), &[Key::Ctrl('d')]]);
    let mut shell = ShellRuntime::new(terminal(40, &keys), Recorder::new());

    let sender = shell.output_sender();
    let worker = thread::spawn(move || sender.send("from thread"));
    assert!(worker.join().expect("worker"));

    shell.run().expect("run");
    assert_eq!(
        shell.terminal().screen_lines(),
        vec!["from thread".to_string(), "> x".to_string()]
    );

    let sender = shell.output_sender();
    drop(shell);
    assert!(!sender.send("too late"));
}

#[test]
fn rebound_autocomplete_key() {
    let mut keymap = ShellKeymap::default();
    keymap.unbind(&Key::Tab);
    keymap.bind(Key::F(2), ShellAction::Autocomplete);

    let keys = script(&[
        &typed("pi"),
        &[Key::Tab, Key::F(5), Key::F(2), Key::F(5), Key::Ctrl('d')],
    ]);
    let mut shell = ShellRuntime::new(terminal(40, &keys), Recorder::new()).with_keymap(keymap);

    shell.run().expect("run");
    assert_eq!(
        shell.shell().snapshots,
        vec![("pi".to_string(), 2), ("pineapple".to_string(), 9)]
    );
}

#[test]
fn write_line_outside_a_run_prints_plainly() {
    let mut shell = ShellRuntime::new(ScriptedTerminal::new(40), Recorder::new());
    shell.write_line("before\tstart").expect("write");
    assert_eq!(
        shell.terminal().screen_lines(),
        vec!["before        start".to_string()]
    );
    assert_eq!(shell.terminal().cursor(), (1, 0));
}

#[test]
fn echoing_console_keeps_earlier_output_when_the_line_wraps() {
    let keys = script(&[&typed("abcdefg"), &[Key::Ctrl('d')]]);
    let terminal = terminal(8, &keys).with_capabilities(TerminalCapabilities::console());
    let mut shell = ShellRuntime::new(terminal, Recorder::new().greeting("keep"));

    shell.run().expect("run");
    assert_eq!(
        shell.terminal().screen_lines(),
        vec!["keep".to_string(), "> abcdef".to_string(), "g".to_string()]
    );
}

#[test]
fn echoed_enter_leaves_the_submitted_line_in_place() {
    let keys = script(&[&typed("apple"), &[Key::Enter], &typed("x"), &[Key::Ctrl('d')]]);
    let terminal = terminal(40, &keys).with_capabilities(TerminalCapabilities::line_echo());
    let mut shell = ShellRuntime::new(terminal, Recorder::new().greeting("keep"));

    shell.run().expect("run");
    assert_eq!(shell.shell().submitted, vec!["apple".to_string()]);
    assert_eq!(
        shell.terminal().screen_lines(),
        vec!["keep".to_string(), "> apple".to_string(), "> x".to_string()]
    );
}

#[test]
fn echo_swallowed_by_the_shell_is_erased() {
    let keys = script(&[&typed("abq"), &[Key::Ctrl('d')]]);
    let terminal = terminal(40, &keys).with_capabilities(TerminalCapabilities::console());
    let mut shell = ShellRuntime::new(terminal, Quitter::default());

    shell.run().expect("run");
    assert_eq!(shell.terminal().screen_lines(), vec!["> ab".to_string()]);
}

/// Treats a typed `q` as a command instead of input.
#[derive(Default)]
struct Quitter;

impl Shell for Quitter {
    fn prompt(&self) -> &str {
        "> "
    }

    fn on_submit(&mut self, _session: &mut Session<'_>, _line: String) -> ShellResult<()> {
        Ok(())
    }

    fn on_key(&mut self, session: &mut Session<'_>, key: &Key) -> ShellResult<bool> {
        match key {
            Key::Char('q') => Ok(true),
            Key::Ctrl('d') => {
                session.halt();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

