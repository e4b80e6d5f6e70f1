//! Raw-mode terminal over the process's stdin/stdout.

use std::io;

use crate::config::EnvConfig;
use crate::core::key::Key;
use crate::core::terminal::Terminal;

#[cfg(unix)]
use std::collections::VecDeque;
#[cfg(unix)]
use std::fs::OpenOptions;
#[cfg(unix)]
use std::io::Write;
#[cfg(unix)]
use std::path::PathBuf;
#[cfg(unix)]
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
#[cfg(unix)]
use std::thread::{self, JoinHandle};
#[cfg(unix)]
use std::time::{Duration, Instant};

#[cfg(unix)]
use libc::{self, c_int};
#[cfg(unix)]
use signal_hook::iterator::Signals;

#[cfg(unix)]
use unicode_segmentation::UnicodeSegmentation;

#[cfg(unix)]
use crate::core::text::width::grapheme_width;
#[cfg(unix)]
use crate::platform::key_decoder::{DecodedInput, KeyDecoder};

/// How long a lone ESC waits for the rest of an escape sequence.
pub const ESCAPE_TIMEOUT_MS: i32 = 10;
/// How long `cursor_column` waits for the terminal to answer `ESC[6n`.
pub const CURSOR_QUERY_TIMEOUT_MS: u64 = 100;
/// Width reported when the terminal size cannot be read.
pub const FALLBACK_COLUMNS: usize = 80;

#[cfg(unix)]
fn wait_writable(fd: c_int) -> io::Result<()> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLOUT,
        revents: 0,
    };
    loop {
        let result = unsafe { libc::poll(&mut fds, 1, -1) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result == 0 {
            continue;
        }
        if (fds.revents & libc::POLLOUT) != 0 {
            return Ok(());
        }
        return Err(io::Error::other(format!(
            "poll(POLLOUT) returned revents=0x{:x}",
            fds.revents
        )));
    }
}

#[cfg(unix)]
fn write_all_fd(fd: c_int, bytes: &[u8]) -> io::Result<()> {
    let mut written = 0;
    while written < bytes.len() {
        let rest = &bytes[written..];
        let result = unsafe { libc::write(fd, rest.as_ptr() as *const libc::c_void, rest.len()) };
        if result < 0 {
            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::Interrupted => continue,
                io::ErrorKind::WouldBlock => {
                    wait_writable(fd)?;
                    continue;
                }
                _ => return Err(err),
            }
        }
        if result == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "write returned 0"));
        }
        written += result as usize;
    }
    Ok(())
}

#[cfg(unix)]
fn read_fd(fd: c_int) -> io::Result<Vec<u8>> {
    let mut buf = [0u8; 256];
    loop {
        let result = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        return Ok(buf[..result as usize].to_vec());
    }
}

#[cfg(unix)]
fn read_winsize(fd: c_int) -> Option<u16> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 {
        Some(size.ws_col)
    } else {
        None
    }
}

/// Wait up to `timeout_ms` (-1 for ever) for `fd` to become readable.
#[cfg(unix)]
fn poll_readable(fd: c_int, timeout_ms: i32) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    loop {
        let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        return Ok(result > 0 && (fds.revents & (libc::POLLIN | libc::POLLHUP)) != 0);
    }
}

#[cfg(unix)]
fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Terminal mode captured before raw mode, restorable from any thread.
#[cfg(unix)]
#[derive(Clone, Copy)]
pub struct SavedMode {
    fd: c_int,
    termios: libc::termios,
}

#[cfg(unix)]
impl SavedMode {
    pub fn restore(&self) -> io::Result<()> {
        set_termios(self.fd, &self.termios)
    }
}

#[cfg(unix)]
impl std::fmt::Debug for SavedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedMode").field("fd", &self.fd).finish_non_exhaustive()
    }
}

/// Key-by-key terminal on the controlling tty.
///
/// `start` switches stdin to raw mode, so nothing is echoed and Enter arrives
/// as `\r`; the default [`TerminalCapabilities`](crate::core::terminal::TerminalCapabilities)
/// describe it. Output goes through [`Terminal::write`], which translates `\n` to
/// `\r\n` and forces the wrap when a write ends on the right margin, giving
/// the console semantics the render engine relies on.
#[cfg(unix)]
pub struct ProcessTerminal {
    stdin_fd: c_int,
    stdout_fd: c_int,
    original_termios: Option<libc::termios>,
    decoder: KeyDecoder,
    queued: VecDeque<Key>,
    shadow_column: usize,
    write_log_path: Option<PathBuf>,
    write_log_failed: bool,
}

#[cfg(unix)]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self {
            stdin_fd: libc::STDIN_FILENO,
            stdout_fd: libc::STDOUT_FILENO,
            original_termios: None,
            decoder: KeyDecoder::new(),
            queued: VecDeque::new(),
            shadow_column: 0,
            write_log_path: None,
            write_log_failed: false,
        }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        let mut terminal = Self::new();
        terminal.write_log_path = config.write_log.clone();
        terminal
    }

    pub fn with_write_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.write_log_path = Some(path.into());
        self
    }

    /// Snapshot of the current stdin mode, for restoring from a signal handler.
    pub fn saved_mode(&self) -> io::Result<SavedMode> {
        let termios = match self.original_termios {
            Some(termios) => termios,
            None => get_termios(self.stdin_fd)?,
        };
        Ok(SavedMode {
            fd: self.stdin_fd,
            termios,
        })
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        let original = match self.original_termios {
            Some(termios) => termios,
            None => {
                let termios = get_termios(self.stdin_fd)?;
                self.original_termios = Some(termios);
                termios
            }
        };
        let mut raw = original;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        set_termios(self.stdin_fd, &raw)
    }

    fn restore_raw_mode(&mut self) -> io::Result<()> {
        if let Some(original) = self.original_termios.take() {
            set_termios(self.stdin_fd, &original)?;
        }
        Ok(())
    }

    fn write_raw(&mut self, data: &str) -> io::Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.mirror_to_log(data);
        write_all_fd(self.stdout_fd, data.as_bytes())
    }

    fn mirror_to_log(&mut self, data: &str) {
        if self.write_log_failed {
            return;
        }
        let Some(path) = self.write_log_path.as_ref() else {
            return;
        };
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(data.as_bytes()));
        if let Err(err) = result {
            tracing::warn!(path = %path.display(), error = %err, "write log disabled");
            self.write_log_failed = true;
        }
    }

    fn enqueue(&mut self, inputs: Vec<DecodedInput>) -> Option<usize> {
        let mut reported = None;
        for input in inputs {
            match input {
                DecodedInput::Key(key) => self.queued.push_back(key),
                DecodedInput::CursorReport { col, .. } => reported = Some(col.saturating_sub(1)),
            }
        }
        reported
    }
}

#[cfg(unix)]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl Drop for ProcessTerminal {
    fn drop(&mut self) {
        let _ = self.restore_raw_mode();
    }
}

#[cfg(unix)]
impl Terminal for ProcessTerminal {
    fn start(&mut self) -> io::Result<()> {
        self.enable_raw_mode()
    }

    fn stop(&mut self) -> io::Result<()> {
        self.restore_raw_mode()
    }

    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            if let Some(key) = self.queued.pop_front() {
                return Ok(key);
            }
            let timeout = if self.decoder.has_pending() {
                ESCAPE_TIMEOUT_MS
            } else {
                -1
            };
            if !poll_readable(self.stdin_fd, timeout)? {
                if let Some(key) = self.decoder.flush_pending() {
                    return Ok(key);
                }
                continue;
            }
            let bytes = read_fd(self.stdin_fd)?;
            let decoded = self.decoder.feed(&bytes);
            // A late reply to an abandoned cursor query; nothing is waiting for it.
            let _ = self.enqueue(decoded);
        }
    }

    fn cursor_column(&mut self) -> io::Result<usize> {
        if self.original_termios.is_none() {
            return Ok(self.shadow_column);
        }
        write_all_fd(self.stdout_fd, b"\x1b[6n")?;

        let deadline = Instant::now() + Duration::from_millis(CURSOR_QUERY_TIMEOUT_MS);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now()).as_millis() as i32;
            if remaining == 0 || !poll_readable(self.stdin_fd, remaining)? {
                tracing::debug!(
                    column = self.shadow_column,
                    "cursor query unanswered, using tracked column"
                );
                return Ok(self.shadow_column);
            }
            let bytes = read_fd(self.stdin_fd)?;
            let decoded = self.decoder.feed(&bytes);
            if let Some(column) = self.enqueue(decoded) {
                self.shadow_column = column;
                return Ok(column);
            }
        }
    }

    fn set_column(&mut self, column: usize) -> io::Result<()> {
        self.shadow_column = column;
        self.write_raw(&format!("\x1b[{}G", column + 1))
    }

    fn move_up(&mut self, rows: usize) -> io::Result<()> {
        if rows == 0 {
            return Ok(());
        }
        self.write_raw(&format!("\x1b[{rows}A"))
    }

    fn move_down(&mut self, rows: usize) -> io::Result<()> {
        if rows == 0 {
            return Ok(());
        }
        self.write_raw(&format!("\x1b[{rows}B"))
    }

    fn new_line(&mut self) -> io::Result<()> {
        self.shadow_column = 0;
        self.write_raw("\r\n")
    }

    fn write(&mut self, data: &str) -> io::Result<()> {
        let width = self.columns();
        let mut out = String::with_capacity(data.len() + 2);
        let mut wrapped_at_end = false;
        for grapheme in data.graphemes(true) {
            wrapped_at_end = false;
            match grapheme {
                "\n" | "\r\n" => {
                    out.push_str("\r\n");
                    self.shadow_column = 0;
                }
                "\r" => {
                    out.push('\r');
                    self.shadow_column = 0;
                }
                other => {
                    out.push_str(other);
                    self.shadow_column += grapheme_width(other);
                    if self.shadow_column >= width {
                        self.shadow_column -= width;
                        wrapped_at_end = self.shadow_column == 0;
                    }
                }
            }
        }
        if wrapped_at_end {
            // Emulators defer the wrap until the next printable char; take it now.
            out.push_str("\r\n");
        }
        self.write_raw(&out)
    }

    fn columns(&self) -> usize {
        read_winsize(self.stdout_fd)
            .map(usize::from)
            .unwrap_or(FALLBACK_COLUMNS)
    }
}

/// Signal handler guard for cleanup hooks.
#[cfg(unix)]
pub struct SignalHookGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

#[cfg(unix)]
impl Drop for SignalHookGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Run `cleanup` once on the first SIGINT, SIGTERM or SIGHUP.
///
/// The signals' default actions are replaced while the guard lives, so the
/// cleanup is responsible for exiting the process if that is wanted.
#[cfg(unix)]
pub fn install_signal_handlers<F>(cleanup: F) -> io::Result<SignalHookGuard>
where
    F: Fn() + Send + Sync + 'static,
{
    let ran = Arc::new(AtomicBool::new(false));
    let mut signals = Signals::new([libc::SIGINT, libc::SIGTERM, libc::SIGHUP])?;
    let handle = signals.handle();

    let thread = thread::spawn(move || {
        for signal in signals.forever() {
            if !ran.swap(true, Ordering::SeqCst) {
                tracing::info!(signal, "signal received, running cleanup");
                cleanup();
            }
        }
    });

    Ok(SignalHookGuard {
        handle,
        thread: Some(thread),
    })
}

#[cfg(not(unix))]
pub struct ProcessTerminal;

#[cfg(not(unix))]
pub struct SignalHookGuard;

#[cfg(not(unix))]
fn unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "raw terminal input is only implemented for unix",
    )
}

#[cfg(not(unix))]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self
    }

    pub fn from_config(_config: &EnvConfig) -> Self {
        Self
    }
}

#[cfg(not(unix))]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(unix))]
impl Terminal for ProcessTerminal {
    fn start(&mut self) -> io::Result<()> {
        Err(unsupported())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        Err(unsupported())
    }

    fn cursor_column(&mut self) -> io::Result<usize> {
        Err(unsupported())
    }

    fn set_column(&mut self, _column: usize) -> io::Result<()> {
        Err(unsupported())
    }

    fn move_up(&mut self, _rows: usize) -> io::Result<()> {
        Err(unsupported())
    }

    fn move_down(&mut self, _rows: usize) -> io::Result<()> {
        Err(unsupported())
    }

    fn new_line(&mut self) -> io::Result<()> {
        Err(unsupported())
    }

    fn write(&mut self, _data: &str) -> io::Result<()> {
        Err(unsupported())
    }

    fn columns(&self) -> usize {
        FALLBACK_COLUMNS
    }
}

#[cfg(not(unix))]
pub fn install_signal_handlers<F>(_cleanup: F) -> io::Result<SignalHookGuard>
where
    F: Fn() + Send + Sync + 'static,
{
    Err(unsupported())
}
