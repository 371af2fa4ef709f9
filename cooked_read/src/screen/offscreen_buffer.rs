// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

use super::{Cell, SavedRegion, ScreenBuffer, TextAttributes, glyph_width};
use crate::{Point, Rect, Size, point};

/// In-memory grid of cells. It is the screen of a headless session, the shadow copy
/// behind [`crate::CrosstermScreen`], and what tests assert against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffscreenBuffer {
    size: Size,
    cells: Vec<Cell>,
    cursor: Point,
}

impl OffscreenBuffer {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![Cell::default(); size.cols * size.rows],
            cursor: Point::default(),
        }
    }

    #[must_use]
    pub fn cell(&self, pos: Point) -> Option<&Cell> {
        self.index_of(pos).map(|index| &self.cells[index])
    }

    /// Text of one row with trailing blanks removed.
    #[must_use]
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.size.rows {
            return String::new();
        }
        let start = row * self.size.cols;
        let text: String = self.cells[start..start + self.size.cols]
            .iter()
            .filter_map(|cell| cell.glyph)
            .collect();
        text.trim_end().to_string()
    }

    /// Blank every cell and home the cursor.
    pub fn clear(&mut self) { *self = Self::new(self.size); }

    /// Change the size, keeping whatever still fits.
    pub fn resize(&mut self, new_size: Size) {
        let mut resized = Self::new(new_size);
        for row in 0..self.size.rows.min(new_size.rows) {
            for col in 0..self.size.cols.min(new_size.cols) {
                if let (Some(from), Some(to)) =
                    (self.index_of(point(col, row)), resized.index_of(point(col, row)))
                {
                    resized.cells[to] = self.cells[from];
                }
            }
        }
        resized.cursor = point(
            self.cursor.col.min(new_size.cols.saturating_sub(1)),
            self.cursor.row.min(new_size.rows.saturating_sub(1)),
        );
        *self = resized;
    }

    fn index_of(&self, pos: Point) -> Option<usize> {
        (pos.col < self.size.cols && pos.row < self.size.rows)
            .then(|| pos.row * self.size.cols + pos.col)
    }
}

impl ScreenBuffer for OffscreenBuffer {
    fn size(&self) -> Size { self.size }

    fn cursor_position(&self) -> Point { self.cursor }

    fn set_cursor_position(&mut self, position: Point) -> io::Result<()> {
        self.cursor = position;
        Ok(())
    }

    fn write_text(
        &mut self,
        text: &str,
        position: Point,
        attributes: TextAttributes,
    ) -> io::Result<()> {
        let mut col = position.col;
        for ch in text.chars() {
            let width = glyph_width(ch);
            // A wide glyph that would straddle the right edge is dropped.
            if col + width > self.size.cols {
                break;
            }
            if let Some(index) = self.index_of(point(col, position.row)) {
                self.cells[index] = Cell {
                    glyph: Some(ch),
                    attributes,
                };
            }
            if width == 2
                && let Some(index) = self.index_of(point(col + 1, position.row))
            {
                self.cells[index] = Cell {
                    glyph: None,
                    attributes,
                };
            }
            col += width;
        }
        Ok(())
    }

    fn save_region(&self, region: Rect) -> SavedRegion {
        let region = region.clipped_to(self.size);
        let mut cells = Vec::with_capacity(region.size.cols * region.size.rows);
        for row in region.origin.row..region.bottom() {
            for col in region.origin.col..region.right() {
                if let Some(index) = self.index_of(point(col, row)) {
                    cells.push(self.cells[index]);
                }
            }
        }
        SavedRegion { region, cells }
    }

    fn restore_region(&mut self, saved: &SavedRegion) -> io::Result<()> {
        let region = saved.region;
        let mut source = saved.cells.iter();
        for row in region.origin.row..region.bottom() {
            for col in region.origin.col..region.right() {
                let Some(cell) = source.next() else {
                    return Ok(());
                };
                if let Some(index) = self.index_of(point(col, row)) {
                    self.cells[index] = *cell;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_eq2, size};

    #[test]
    fn test_write_text_clips_at_right_edge() {
        let mut buffer = OffscreenBuffer::new(size(5, 2));
        buffer
            .write_text("hello world", point(2, 1), TextAttributes::DEFAULT)
            .unwrap();
        assert_eq2!(buffer.row_text(1), "  hel");
        assert_eq2!(buffer.row_text(0), "");
    }

    #[test]
    fn test_fullwidth_glyph_takes_two_cells() {
        let mut buffer = OffscreenBuffer::new(size(6, 1));
        buffer.write_text("a漢b", point(0, 0), TextAttributes::DEFAULT).unwrap();
        assert_eq2!(buffer.row_text(0), "a漢b");
        assert_eq2!(buffer.cell(point(2, 0)).unwrap().glyph, None);
        assert_eq2!(buffer.cell(point(3, 0)).unwrap().glyph, Some('b'));
    }

    #[test]
    fn test_save_and_restore_region() {
        let mut buffer = OffscreenBuffer::new(size(8, 3));
        buffer.write_text("abcdefgh", point(0, 1), TextAttributes::DEFAULT).unwrap();

        let saved = buffer.save_region(Rect::new(point(2, 1), size(3, 1)));
        buffer.write_text("XYZ", point(2, 1), TextAttributes::POPUP).unwrap();
        assert_eq2!(buffer.row_text(1), "abXYZfgh");

        buffer.restore_region(&saved).unwrap();
        assert_eq2!(buffer.row_text(1), "abcdefgh");
        assert_eq2!(
            buffer.cell(point(3, 1)).unwrap().attributes,
            TextAttributes::DEFAULT
        );
    }

    #[test]
    fn test_resize_keeps_overlap() {
        let mut buffer = OffscreenBuffer::new(size(4, 2));
        buffer.write_text("abcd", point(0, 0), TextAttributes::DEFAULT).unwrap();
        buffer.resize(size(2, 1));
        assert_eq2!(buffer.row_text(0), "ab");
        assert_eq2!(buffer.size(), size(2, 1));
    }
}
