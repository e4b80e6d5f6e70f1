use lineshell::{
    init_logging, install_signal_handlers, Completer, EnvConfig, Key, ProcessTerminal, Session,
    Shell, ShellResult, ShellRuntime, VocabularyCompleter,
};

const FRUITS: [&str; 8] = [
    "apple",
    "pear",
    "pineapple",
    "grapefruit",
    "chokecherry",
    "orange",
    "coconut",
    "lemon",
];

struct FruitShell {
    fruits: VocabularyCompleter,
}

impl FruitShell {
    fn new() -> Self {
        Self {
            fruits: VocabularyCompleter::new(FRUITS),
        }
    }
}

impl Shell for FruitShell {
    fn prompt(&self) -> &str {
        "EXAMPLE> "
    }

    fn on_start(&mut self, session: &mut Session<'_>) -> ShellResult<()> {
        session.write_line("Welcome to the Interactive Shell Example")?;
        session.write_blank_line()?;
        session.write_line("Type 'quit' to close the shell.")?;
        session.write_line("Try pressing 'tab' to autocomplete a fruit")?;
        Ok(())
    }

    fn on_stop(&mut self, session: &mut Session<'_>) -> ShellResult<()> {
        session.write_line("Goodbye!")?;
        Ok(())
    }

    fn on_submit(&mut self, session: &mut Session<'_>, line: String) -> ShellResult<()> {
        if line == "quit" {
            session.halt();
            return Ok(());
        }

        if self.fruits.contains(&line) {
            session.write_line("You entered one of the available fruits!")?;
        } else {
            session.write_fmt_line(format_args!("{line} was not found in our list of fruits."))?;
        }
        Ok(())
    }

    fn on_key(&mut self, session: &mut Session<'_>, key: &Key) -> ShellResult<bool> {
        match key {
            Key::Up => {
                session.write_line("Pressed up!")?;
                Ok(true)
            }
            Key::Ctrl('c') | Key::Ctrl('d') => {
                session.halt();
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
        Ok(self.fruits.complete(input))
    }
}

fn main() -> ShellResult<()> {
    let config = EnvConfig::from_env();
    let _log_guard = init_logging(&config);

    let terminal = ProcessTerminal::from_config(&config);

    #[cfg(unix)]
    let _signals = {
        let saved = terminal.saved_mode()?;
        install_signal_handlers(move || {
            let _ = saved.restore();
            std::process::exit(130);
        })?
    };

    let mut shell = ShellRuntime::new(terminal, FruitShell::new());
    shell.run()?;
    Ok(())
}
