//! Decoded key presses.

use std::fmt;

/// One key press as reported by a [`Terminal`](crate::core::terminal::Terminal).
///
/// Printable keys carry their character in [`Key::Char`]; everything else is a
/// key code without a character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Insert,
    Escape,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    /// Function key row, `F(1)` through `F(12)`.
    F(u8),
    /// Control chord such as `ctrl+c`, stored as the lowercase letter.
    Ctrl(char),
    /// A sequence the decoder recognized as a key but could not name.
    Unknown(String),
}

impl Key {
    /// The character this key inserts, if it is printable.
    pub fn printable(&self) -> Option<char> {
        match self {
            Key::Char(ch) if !ch.is_control() => Some(*ch),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => f.write_str("space"),
            Key::Char(ch) => write!(f, "{ch}"),
            Key::Enter => f.write_str("enter"),
            Key::Tab => f.write_str("tab"),
            Key::Backspace => f.write_str("backspace"),
            Key::Delete => f.write_str("delete"),
            Key::Insert => f.write_str("insert"),
            Key::Escape => f.write_str("escape"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Home => f.write_str("home"),
            Key::End => f.write_str("end"),
            Key::PageUp => f.write_str("pageUp"),
            Key::PageDown => f.write_str("pageDown"),
            Key::F(n) => write!(f, "f{n}"),
            Key::Ctrl(ch) => write!(f, "ctrl+{ch}"),
            Key::Unknown(raw) => write!(f, "unknown({raw:?})"),
        }
    }
}
