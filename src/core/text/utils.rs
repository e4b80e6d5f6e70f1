//! Char-counted string helpers shared by the renderer and `write_line`.

/// Spaces substituted for each literal tab when a terminal asks for expansion.
pub const TAB_EXPANSION: &str = "        ";

/// Length of `text` in chars.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the char at `index`, or `text.len()` when `index` is at or past the end.
pub fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

/// Pad `text` with trailing spaces until it is at least `min_len` chars long.
pub fn pad_right(text: &str, min_len: usize) -> String {
    let len = char_len(text);
    if len >= min_len {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + (min_len - len));
    out.push_str(text);
    out.extend(std::iter::repeat(' ').take(min_len - len));
    out
}

pub fn spaces(count: usize) -> String {
    " ".repeat(count)
}

/// Replace every literal tab with [`TAB_EXPANSION`].
pub fn expand_tabs(text: &str) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }
    text.replace('\t', TAB_EXPANSION)
}
