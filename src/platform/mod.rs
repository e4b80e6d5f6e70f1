//! Terminal implementations.

pub mod key_decoder;
pub mod process_terminal;
pub mod scripted_terminal;

pub use key_decoder::KeyDecoder;
pub use process_terminal::{install_signal_handlers, ProcessTerminal, SignalHookGuard};
pub use scripted_terminal::ScriptedTerminal;

#[cfg(unix)]
pub use process_terminal::SavedMode;
