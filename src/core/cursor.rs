/// Cursor position relative to the first row of the rendered input line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPos {
    pub row: usize,
    pub col: usize,
}

impl CursorPos {
    /// Where a terminal that wraps immediately at `width` leaves the cursor after
    /// `offset` cells have been written from column 0.
    pub fn at_offset(offset: usize, width: usize) -> Self {
        let width = width.max(1);
        Self {
            row: offset / width,
            col: offset % width,
        }
    }
}
