//! Raw terminal bytes to [`Key`]s.

use crate::core::key::Key;

const ESC: u8 = 0x1b;

/// One decoded unit of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedInput {
    Key(Key),
    /// Reply to a `ESC[6n` cursor position query (1-based, as sent).
    CursorReport { row: usize, col: usize },
}

#[derive(Debug)]
enum Step {
    Done(DecodedInput, usize),
    Incomplete,
}

/// Incremental decoder for raw-mode input.
///
/// Bytes that may start a longer sequence (a lone ESC, a CSI without its final
/// byte, a partial UTF-8 char) stay pending until more bytes arrive or the
/// caller gives up waiting and calls [`KeyDecoder::flush_pending`].
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Vec<DecodedInput> {
        self.pending.extend_from_slice(bytes);

        let mut decoded = Vec::new();
        let mut pos = 0;
        while pos < self.pending.len() {
            match decode_one(&self.pending[pos..]) {
                Step::Done(input, used) => {
                    decoded.push(input);
                    pos += used;
                }
                Step::Incomplete => break,
            }
        }
        self.pending.drain(..pos);
        decoded
    }

    /// Resolve whatever is pending after the sequence timeout expired.
    ///
    /// A lone ESC becomes [`Key::Escape`]; any other leftover is reported as
    /// [`Key::Unknown`] so no input is silently dropped.
    pub fn flush_pending(&mut self) -> Option<Key> {
        if self.pending.is_empty() {
            return None;
        }
        let pending = std::mem::take(&mut self.pending);
        if pending == [ESC] {
            return Some(Key::Escape);
        }
        Some(Key::Unknown(String::from_utf8_lossy(&pending).into_owned()))
    }
}

fn decode_one(bytes: &[u8]) -> Step {
    let key = |key: Key| Step::Done(DecodedInput::Key(key), 1);
    match bytes[0] {
        ESC => decode_escape(bytes),
        b'\r' | b'\n' => key(Key::Enter),
        b'\t' => key(Key::Tab),
        0x7f | 0x08 => key(Key::Backspace),
        byte @ 0x01..=0x1a => key(Key::Ctrl(char::from(b'a' + byte - 1))),
        byte @ 0x20..=0x7e => key(Key::Char(char::from(byte))),
        byte if byte >= 0xc0 => decode_utf8(bytes),
        byte => key(Key::Unknown(String::from_utf8_lossy(&[byte]).into_owned())),
    }
}

fn decode_utf8(bytes: &[u8]) -> Step {
    let width = match bytes[0] {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    };
    if bytes.len() < width {
        return Step::Incomplete;
    }
    let raw = &bytes[..width];
    let key = match std::str::from_utf8(raw).ok().and_then(|s| s.chars().next()) {
        Some(ch) => Key::Char(ch),
        None => {
            let lossy = String::from_utf8_lossy(&raw[..1]).into_owned();
            return Step::Done(DecodedInput::Key(Key::Unknown(lossy)), 1);
        }
    };
    Step::Done(DecodedInput::Key(key), width)
}

fn decode_escape(bytes: &[u8]) -> Step {
    match bytes.get(1) {
        None => Step::Incomplete,
        Some(b'[') => decode_csi(bytes),
        Some(b'O') => decode_ss3(bytes),
        // Alt+key and friends: nothing the shell binds.
        Some(_) => Step::Done(DecodedInput::Key(unknown(&bytes[..2])), 2),
    }
}

fn decode_ss3(bytes: &[u8]) -> Step {
    let Some(&last) = bytes.get(2) else {
        return Step::Incomplete;
    };
    let key = match last {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'H' => Key::Home,
        b'F' => Key::End,
        b'P' => Key::F(1),
        b'Q' => Key::F(2),
        b'R' => Key::F(3),
        b'S' => Key::F(4),
        _ => unknown(&bytes[..3]),
    };
    Step::Done(DecodedInput::Key(key), 3)
}

fn decode_csi(bytes: &[u8]) -> Step {
    // ESC [ params* intermediates* final
    let mut end = 2;
    while let Some(&byte) = bytes.get(end) {
        if (0x40..=0x7e).contains(&byte) {
            break;
        }
        if !(0x20..=0x3f).contains(&byte) {
            return Step::Done(DecodedInput::Key(unknown(&bytes[..end])), end);
        }
        end += 1;
    }
    let Some(&last) = bytes.get(end) else {
        return Step::Incomplete;
    };

    let raw = &bytes[..=end];
    let params: Vec<usize> = std::str::from_utf8(&bytes[2..end])
        .unwrap_or_default()
        .split(';')
        .map(|param| param.parse().unwrap_or(0))
        .collect();
    let first = params.first().copied().unwrap_or(0);

    let input = match last {
        b'R' if params.len() == 2 => DecodedInput::CursorReport {
            row: params[0],
            col: params[1],
        },
        b'A' => DecodedInput::Key(Key::Up),
        b'B' => DecodedInput::Key(Key::Down),
        b'C' => DecodedInput::Key(Key::Right),
        b'D' => DecodedInput::Key(Key::Left),
        b'H' => DecodedInput::Key(Key::Home),
        b'F' => DecodedInput::Key(Key::End),
        b'P' => DecodedInput::Key(Key::F(1)),
        b'Q' => DecodedInput::Key(Key::F(2)),
        b'S' => DecodedInput::Key(Key::F(4)),
        b'~' => DecodedInput::Key(tilde_key(first).unwrap_or_else(|| unknown(raw))),
        _ => DecodedInput::Key(unknown(raw)),
    };
    Step::Done(input, end + 1)
}

fn tilde_key(code: usize) -> Option<Key> {
    let key = match code {
        1 | 7 => Key::Home,
        2 => Key::Insert,
        3 => Key::Delete,
        4 | 8 => Key::End,
        5 => Key::PageUp,
        6 => Key::PageDown,
        11..=15 => Key::F((code - 10) as u8),
        17..=21 => Key::F((code - 11) as u8),
        23 | 24 => Key::F((code - 12) as u8),
        _ => return None,
    };
    Some(key)
}

fn unknown(raw: &[u8]) -> Key {
    Key::Unknown(String::from_utf8_lossy(raw).into_owned())
}
