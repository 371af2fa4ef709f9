// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug, io::{self, Write}};

use crossterm::{cursor::MoveTo,
                queue,
                style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
                terminal::{Clear, ClearType}};

use super::{Cell, OffscreenBuffer, SavedRegion, ScreenBuffer, TextAttributes};
use crate::{Point, Rect, Size, point};

/// A [`ScreenBuffer`] that draws to a terminal through crossterm. A terminal can't be
/// read back, so an [`OffscreenBuffer`] shadows every write and
/// [`ScreenBuffer::restore_region`] repaints from it.
#[derive(Debug)]
pub struct CrosstermScreen<W: Write + Send + Debug> {
    shadow: OffscreenBuffer,
    output: W,
}

impl<W: Write + Send + Debug> CrosstermScreen<W> {
    #[must_use]
    pub fn new(output: W, size: Size) -> Self {
        Self {
            shadow: OffscreenBuffer::new(size),
            output,
        }
    }

    #[must_use]
    pub fn shadow(&self) -> &OffscreenBuffer { &self.shadow }

    pub fn resize(&mut self, new_size: Size) { self.shadow.resize(new_size); }

    pub fn output_mut(&mut self) -> &mut W { &mut self.output }

    /// # Errors
    ///
    /// Returns an error if the terminal can't be written to.
    pub fn clear(&mut self) -> io::Result<()> {
        self.shadow.clear();
        queue!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        self.output.flush()
    }

    fn queue_cells(&mut self, origin: Point, cells: &[Cell]) -> io::Result<()> {
        queue!(self.output, MoveTo(to_u16(origin.col), to_u16(origin.row)))?;
        for cell in cells {
            // The right half of a wide glyph was drawn with its left half.
            let Some(glyph) = cell.glyph else {
                continue;
            };
            queue_attributes(&mut self.output, cell.attributes)?;
            queue!(self.output, Print(glyph))?;
        }
        queue!(self.output, ResetColor)
    }
}

impl<W: Write + Send + Debug> ScreenBuffer for CrosstermScreen<W> {
    fn size(&self) -> Size { self.shadow.size() }

    fn cursor_position(&self) -> Point { self.shadow.cursor_position() }

    fn set_cursor_position(&mut self, position: Point) -> io::Result<()> {
        self.shadow.set_cursor_position(position)?;
        queue!(self.output, MoveTo(to_u16(position.col), to_u16(position.row)))?;
        self.output.flush()
    }

    fn write_text(
        &mut self,
        text: &str,
        position: Point,
        attributes: TextAttributes,
    ) -> io::Result<()> {
        self.shadow.write_text(text, position, attributes)?;
        queue!(self.output, MoveTo(to_u16(position.col), to_u16(position.row)))?;
        queue_attributes(&mut self.output, attributes)?;
        queue!(self.output, Print(text), ResetColor)?;
        self.output.flush()
    }

    fn save_region(&self, region: Rect) -> SavedRegion { self.shadow.save_region(region) }

    fn restore_region(&mut self, saved: &SavedRegion) -> io::Result<()> {
        self.shadow.restore_region(saved)?;
        let cols = saved.region.size.cols.max(1);
        for (offset, row_cells) in saved.cells.chunks(cols).enumerate() {
            let origin = point(saved.region.origin.col, saved.region.origin.row + offset);
            self.queue_cells(origin, row_cells)?;
        }
        self.output.flush()
    }
}

fn to_u16(value: usize) -> u16 { u16::try_from(value).unwrap_or(u16::MAX) }

fn queue_attributes(output: &mut impl Write, attributes: TextAttributes) -> io::Result<()> {
    let fg = console_color(attributes.0 & 0x0F);
    let bg = console_color((attributes.0 >> 4) & 0x0F);
    queue!(output, SetForegroundColor(fg), SetBackgroundColor(bg))
}

/// Console palette order: blue, green, and red bits, plus intensity.
fn console_color(nibble: u16) -> Color {
    match nibble {
        0x0 => Color::Black,
        0x1 => Color::DarkBlue,
        0x2 => Color::DarkGreen,
        0x3 => Color::DarkCyan,
        0x4 => Color::DarkRed,
        0x5 => Color::DarkMagenta,
        0x6 => Color::DarkYellow,
        0x7 => Color::Grey,
        0x8 => Color::DarkGrey,
        0x9 => Color::Blue,
        0xA => Color::Green,
        0xB => Color::Cyan,
        0xC => Color::Red,
        0xD => Color::Magenta,
        0xE => Color::Yellow,
        _ => Color::White,
    }
}
