//! Text helpers (char lengths, padding, tab expansion, grapheme width).
//!
//! Line math in the engine counts chars: one char is one cursor advance and one
//! rendered cell. Display width is only used by terminals that track their own
//! cursor column.

pub mod utils;
pub mod width;
