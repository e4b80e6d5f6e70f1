//! Run loop, key dispatch and the hook surface for concrete shells.

pub mod dispatch;
pub mod run_state;
pub mod session;
pub mod shell;

pub use dispatch::{Dispatch, KeyDispatcher};
pub use run_state::RunState;
pub use session::{Session, Shell};
pub use shell::{OutputSender, ShellRuntime};
