//! Embeddable interactive line-editing shell.
//!
//! Invariant: single output gate. Only `core::output::OutputGate::flush(..)`
//! writes to the terminal.
//!
//! # Public API Overview
//! - Implement [`Shell`] for the prompt and the submit, key and autocomplete hooks.
//! - Drive it with [`ShellRuntime`] over any [`Terminal`]: [`ProcessTerminal`]
//!   for the real tty, [`ScriptedTerminal`] for tests.
//! - Print from hooks with [`Session::write_line`], from other threads with
//!   [`OutputSender`].
//! - Rebind built-in actions through [`ShellKeymap`].

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod platform;
pub mod render;
pub mod runtime;

/// Autocomplete helpers a shell can delegate to.
pub use crate::core::autocomplete::{Completer, VocabularyCompleter};
pub use crate::core::glob::glob_match;

/// Keys and the built-in action table.
pub use crate::core::key::Key;
pub use crate::core::keybindings::{ShellAction, ShellKeymap};

/// Input line state.
pub use crate::core::cursor::CursorPos;
pub use crate::core::line_state::LineState;

/// Terminal seam and implementations.
pub use crate::core::output::{OutputGate, TerminalCmd};
pub use crate::core::terminal::{Terminal, TerminalCapabilities};
pub use crate::platform::{install_signal_handlers, ProcessTerminal, ScriptedTerminal};

/// Rendering.
pub use crate::render::{padding_for, wrap_rows, RenderEngine};

/// Runtime.
pub use crate::runtime::{OutputSender, RunState, Session, Shell, ShellRuntime};

pub use crate::config::EnvConfig;
pub use crate::error::{ShellError, ShellResult};
pub use crate::logging::init_logging;
