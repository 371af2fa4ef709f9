// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Echo of the prompt buffer onto the screen. The prompt is laid out as one run of cells
//! starting at its origin and wrapping at the right edge. Control characters are shown
//! as `^X`, tabs expand to the next multiple of [`TAB_SIZE`], and a fullwidth glyph that
//! would straddle the right edge is pushed to the next row.

use std::io;

use crate::{InlineString, Point, PromptBuffer, ScreenBuffer, UNICODE_TAB, glyph_width,
            next_code_point, point};

pub const TAB_SIZE: usize = 8;

/// Where the last echo put things.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptLayout {
    /// Cells used by the prompt text, counted from the origin.
    pub cells: usize,
    pub cursor: Point,
    /// Row holding the last cell of the prompt.
    pub last_row: usize,
}

#[derive(Debug)]
struct Run {
    start: Point,
    end_offset: usize,
    text: String,
}

/// Turns cell offsets from the prompt origin into rows of text.
#[derive(Debug)]
struct RunBuilder {
    cols: usize,
    start: usize,
    runs: Vec<Run>,
}

impl RunBuilder {
    fn new(origin: Point, cols: usize) -> Self {
        Self {
            cols,
            start: origin.row * cols + origin.col,
            runs: vec![],
        }
    }

    fn position(&self, offset: usize) -> Point {
        let absolute = self.start + offset;
        point(absolute % self.cols, absolute / self.cols)
    }

    fn push(&mut self, ch: char, offset: usize, width: usize) {
        let pos = self.position(offset);
        let continues_run = self
            .runs
            .last()
            .is_some_and(|run| run.end_offset == offset && pos.col != 0);
        if !continues_run {
            self.runs.push(Run {
                start: pos,
                end_offset: offset,
                text: String::new(),
            });
        }
        if let Some(run) = self.runs.last_mut() {
            run.text.push(ch);
            run.end_offset = offset + width;
        }
    }
}

fn glyph_repr(units: &[u16], column: usize) -> InlineString {
    let mut acc = InlineString::new();
    match units {
        [UNICODE_TAB] => {
            acc.extend(std::iter::repeat_n(' ', TAB_SIZE - column % TAB_SIZE));
        }
        [unit] if *unit < 0x20 => {
            acc.push('^');
            acc.push(char::from_u32(u32::from(*unit) + 0x40).unwrap_or('?'));
        }
        _ => {
            acc.extend(char::decode_utf16(units.iter().copied()).map(|it| {
                it.unwrap_or(char::REPLACEMENT_CHARACTER)
            }));
        }
    }
    acc
}

/// Echo `prompt` and move the cursor to its insertion index. Cells drawn by the previous
/// echo (`previous_cells`) that the new text no longer covers are blanked.
///
/// # Errors
///
/// Returns an error if the screen can't be written to.
pub fn render_prompt(
    prompt: &PromptBuffer,
    screen: &mut dyn ScreenBuffer,
    previous_cells: usize,
) -> io::Result<PromptLayout> {
    let cols = screen.size().cols.max(1);
    let mut builder = RunBuilder::new(prompt.origin(), cols);
    let text = prompt.text();

    let mut offset = 0;
    let mut cursor_offset = None;
    let mut index = 0;
    while index < text.len() {
        if index == prompt.insertion_index() {
            cursor_offset = Some(offset);
        }
        let next = next_code_point(text, index);
        let column = builder.position(offset).col;
        for ch in glyph_repr(&text[index..next], column).chars() {
            let width = glyph_width(ch);
            if width == 2 && builder.position(offset).col == cols - 1 {
                builder.push(' ', offset, 1);
                offset += 1;
            }
            builder.push(ch, offset, width);
            offset += width;
        }
        index = next;
    }
    let cursor_offset = cursor_offset.unwrap_or(offset);

    for stale in offset..previous_cells {
        builder.push(' ', stale, 1);
    }

    let attributes = screen.default_attributes();
    for run in &builder.runs {
        screen.write_text(&run.text, run.start, attributes)?;
    }

    let cursor = builder.position(cursor_offset);
    screen.set_cursor_position(cursor)?;

    Ok(PromptLayout {
        cells: offset,
        cursor,
        last_row: builder.position(offset.saturating_sub(1)).row,
    })
}
