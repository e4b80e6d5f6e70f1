//! Built-in shell keybindings.

use std::collections::HashMap;

use crate::core::key::Key;

/// Built-in behaviour a key can trigger when the interceptor does not handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellAction {
    /// Swallow the key with no state change. Exists so shells can hook it in `on_key`.
    Ignore,
    Autocomplete,
    CursorLeft,
    CursorRight,
    DeleteBackward,
    Submit,
}

/// Key to action table consulted by the dispatcher.
///
/// Keys without an entry fall through to the default branch, which inserts
/// printable characters and swallows everything else.
#[derive(Debug, Clone)]
pub struct ShellKeymap {
    bindings: HashMap<Key, ShellAction>,
}

impl Default for ShellKeymap {
    fn default() -> Self {
        use ShellAction::*;

        let mut bindings = HashMap::new();
        for key in [Key::Up, Key::Down, Key::Escape] {
            bindings.insert(key, Ignore);
        }
        for n in 1..=12 {
            bindings.insert(Key::F(n), Ignore);
        }
        bindings.insert(Key::Tab, Autocomplete);
        bindings.insert(Key::Left, CursorLeft);
        bindings.insert(Key::Right, CursorRight);
        bindings.insert(Key::Backspace, DeleteBackward);
        bindings.insert(Key::Enter, Submit);

        Self { bindings }
    }
}

impl ShellKeymap {
    /// Bind `key` to `action`, returning the previous action for that key.
    pub fn bind(&mut self, key: Key, action: ShellAction) -> Option<ShellAction> {
        self.bindings.insert(key, action)
    }

    pub fn unbind(&mut self, key: &Key) -> Option<ShellAction> {
        self.bindings.remove(key)
    }

    pub fn action_for(&self, key: &Key) -> Option<ShellAction> {
        self.bindings.get(key).copied()
    }

    /// All keys bound to `action`, in no particular order.
    pub fn keys_for(&self, action: ShellAction) -> Vec<Key> {
        self.bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| key.clone())
            .collect()
    }
}
