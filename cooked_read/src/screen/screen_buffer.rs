// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The seam between the line editor and whatever actually draws cells. The editor echoes
//! the prompt through [`ScreenBuffer::write_text`], and each popup backs up the cells it
//! covers with [`ScreenBuffer::save_region`] and puts them back with
//! [`ScreenBuffer::restore_region`] when it closes.

use std::{fmt::Debug, io};

use crate::{Point, Rect, Size, is_fullwidth_char};

/// Foreground in the low nibble, background in the high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextAttributes(pub u16);

impl TextAttributes {
    /// Light gray on black.
    pub const DEFAULT: Self = Self(0x07);
    /// Magenta on white.
    pub const POPUP: Self = Self(0xF5);

    /// Swap foreground and background, used to highlight a selection.
    #[must_use]
    pub fn inverted(self) -> Self {
        let fg = self.0 & 0x0F;
        let bg = (self.0 >> 4) & 0x0F;
        Self((self.0 & !0xFF) | (fg << 4) | bg)
    }
}

impl Default for TextAttributes {
    fn default() -> Self { Self::DEFAULT }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// `None` marks the right half of a fullwidth glyph.
    pub glyph: Option<char>,
    pub attributes: TextAttributes,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: Some(' '),
            attributes: TextAttributes::DEFAULT,
        }
    }
}

/// The cells under a rectangle, captured by [`ScreenBuffer::save_region`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRegion {
    pub region: Rect,
    /// Row-major, `region.size.cols` cells per row.
    pub cells: Vec<Cell>,
}

/// Display cells taken by `ch`.
#[must_use]
pub fn glyph_width(ch: char) -> usize { if is_fullwidth_char(ch) { 2 } else { 1 } }

pub trait ScreenBuffer: Debug + Send {
    fn size(&self) -> Size;

    fn cursor_position(&self) -> Point;

    /// # Errors
    ///
    /// Returns an error if the underlying device can't be written to.
    fn set_cursor_position(&mut self, position: Point) -> io::Result<()>;

    /// Write `text` starting at `position`, one glyph per cell (two for fullwidth
    /// glyphs). Text that runs past the right edge is clipped, not wrapped.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device can't be written to.
    fn write_text(
        &mut self,
        text: &str,
        position: Point,
        attributes: TextAttributes,
    ) -> io::Result<()>;

    fn save_region(&self, region: Rect) -> SavedRegion;

    /// # Errors
    ///
    /// Returns an error if the underlying device can't be written to.
    fn restore_region(&mut self, saved: &SavedRegion) -> io::Result<()>;

    fn popup_attributes(&self) -> TextAttributes { TextAttributes::POPUP }

    fn default_attributes(&self) -> TextAttributes { TextAttributes::DEFAULT }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    #[test]
    fn test_inverted_swaps_nibbles() {
        assert_eq2!(TextAttributes(0xF5).inverted(), TextAttributes(0x5F));
        assert_eq2!(TextAttributes(0x0107).inverted(), TextAttributes(0x0170));
    }

    #[test]
    fn test_glyph_width() {
        assert_eq2!(glyph_width('a'), 1);
        assert_eq2!(glyph_width('漢'), 2);
    }
}
