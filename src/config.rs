//! Environment configuration.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// `LINESHELL_LOG_FILE`: tracing output file. Unset means no logging.
    pub log_file: Option<PathBuf>,
    /// `LINESHELL_LOG`: `EnvFilter` directives.
    pub log_filter: String,
    /// `LINESHELL_WRITE_LOG`: mirror of every byte written to the terminal.
    pub write_log: Option<PathBuf>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            write_log: None,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            log_file: env_string_opt("LINESHELL_LOG_FILE").map(PathBuf::from),
            log_filter: env_string_opt("LINESHELL_LOG")
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            write_log: env_string_opt("LINESHELL_WRITE_LOG").map(PathBuf::from),
        }
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
