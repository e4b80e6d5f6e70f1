//! Error type shared by the runtime and shell hooks.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

pub type ShellResult<T> = Result<T, ShellError>;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A failure raised by a `Shell` hook. The run loop does not catch it.
    #[error("shell hook failed: {0}")]
    Hook(#[source] Box<dyn StdError + Send + Sync>),

    #[error("{0}")]
    Message(String),
}

impl ShellError {
    pub fn hook<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Hook(err.into())
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}
