//! Tracing subscriber setup.
//!
//! Logs never go to the terminal the shell draws on; they are written to the
//! file named by `LINESHELL_LOG_FILE`, or dropped.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{EnvConfig, DEFAULT_LOG_FILTER};

/// Install a global `fmt` subscriber writing to `config.log_file`.
///
/// Returns the writer guard; keep it alive until the shell exits so buffered
/// events are flushed. Returns `None` when no log file is configured or a
/// global subscriber is already installed.
pub fn init_logging(config: &EnvConfig) -> Option<WorkerGuard> {
    let path = config.log_file.as_deref()?;
    let (dir, file_name) = split_log_path(path)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        // A subscriber is already installed; dropping the guard shuts the writer down.
        Err(_) => None,
    }
}

fn split_log_path(path: &Path) -> Option<(&Path, &std::ffi::OsStr)> {
    let file_name = path.file_name()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Some((dir, file_name))
}

#[cfg(test)]
mod tests {
    use super::{init_logging, split_log_path};
    use crate::config::EnvConfig;
    use std::path::Path;

    #[test]
    fn no_log_file_installs_nothing() {
        assert!(init_logging(&EnvConfig::default()).is_none());
    }

    #[test]
    fn bare_file_names_log_to_the_current_dir() {
        let (dir, name) = split_log_path(Path::new("shell.log")).expect("split");
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "shell.log");

        let (dir, name) = split_log_path(Path::new("/tmp/logs/shell.log")).expect("split");
        assert_eq!(dir, Path::new("/tmp/logs"));
        assert_eq!(name, "shell.log");

        assert!(split_log_path(Path::new("/")).is_none());
    }
}
