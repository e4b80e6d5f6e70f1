//! Core interfaces and types.

pub mod autocomplete;
pub mod cursor;
pub mod glob;
pub mod key;
pub mod keybindings;
pub mod line_state;
pub mod output;
pub mod terminal;
pub mod text;
