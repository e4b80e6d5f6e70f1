//! Per-shell running flag.

/// Whether a shell's run loop is active.
///
/// Each runtime owns its own `RunState`, so independent shells can live in the
/// same process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunState {
    running: bool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Enter the running state. Returns `false` if it was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Leave the running state. Returns whether this call stopped it.
    pub fn halt(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }
}
