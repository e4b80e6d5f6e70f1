//! Key dispatch: one key in, one edit or hook call out.

use crate::core::key::Key;
use crate::core::keybindings::{ShellAction, ShellKeymap};
use crate::error::ShellResult;
use crate::runtime::session::{Session, Shell};

/// What the run loop should do after a key was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Reconcile the screen, then read the next key.
    Render,
    /// A hook halted the run; leave the loop without rendering.
    Halted,
}

/// Applies the interceptor, then the keymap, then the printable-char default.
#[derive(Debug, Clone, Default)]
pub struct KeyDispatcher {
    keymap: ShellKeymap,
}

impl KeyDispatcher {
    pub fn new(keymap: ShellKeymap) -> Self {
        Self { keymap }
    }

    pub fn keymap(&self) -> &ShellKeymap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut ShellKeymap {
        &mut self.keymap
    }

    pub fn dispatch<S>(
        &self,
        shell: &mut S,
        session: &mut Session<'_>,
        key: &Key,
    ) -> ShellResult<Dispatch>
    where
        S: Shell + ?Sized,
    {
        if shell.on_key(session, key)? {
            tracing::trace!(%key, "key handled by shell");
            return Ok(Self::outcome(session));
        }

        match self.keymap.action_for(key) {
            Some(ShellAction::Ignore) => {}
            Some(ShellAction::Autocomplete) => {
                let input = session.text().to_string();
                if let Some(completed) = shell.on_autocomplete(session, &input)? {
                    session.set_text(Some(&completed));
                }
            }
            Some(ShellAction::CursorLeft) => session.line_mut().move_left(),
            Some(ShellAction::CursorRight) => session.line_mut().move_right(),
            Some(ShellAction::DeleteBackward) => session.line_mut().delete_before_cursor(),
            Some(ShellAction::Submit) => {
                let line = session.submit_line()?;
                tracing::debug!(chars = line.chars().count(), "line submitted");
                shell.on_submit(session, line)?;
            }
            None => {
                if let Some(ch) = key.printable() {
                    session.line_mut().insert_char(ch);
                }
            }
        }

        Ok(Self::outcome(session))
    }

    fn outcome(session: &Session<'_>) -> Dispatch {
        if session.is_running() {
            Dispatch::Render
        } else {
            Dispatch::Halted
        }
    }
}
