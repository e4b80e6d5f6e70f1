//! Grapheme display width, used to track a real terminal's cursor column.

use unicode_width::UnicodeWidthStr;

/// Terminal cells taken by one grapheme cluster.
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    UnicodeWidthStr::width(grapheme)
}
