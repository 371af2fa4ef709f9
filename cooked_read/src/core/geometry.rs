// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Cell position in screen coordinates. `(0, 0)` is the top left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub col: usize,
    pub row: usize,
}

#[must_use]
pub fn point(col: usize, row: usize) -> Point { Point { col, row } }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub cols: usize,
    pub rows: usize,
}

#[must_use]
pub fn size(cols: usize, rows: usize) -> Size { Size { cols, rows } }

/// A rectangle of cells, `origin` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[must_use]
    pub fn new(origin: Point, size: Size) -> Self { Self { origin, size } }

    /// One past the last column.
    #[must_use]
    pub fn right(&self) -> usize { self.origin.col + self.size.cols }

    /// One past the last row.
    #[must_use]
    pub fn bottom(&self) -> usize { self.origin.row + self.size.rows }

    #[must_use]
    pub fn contains(&self, pos: Point) -> bool {
        (self.origin.col..self.right()).contains(&pos.col)
            && (self.origin.row..self.bottom()).contains(&pos.row)
    }

    /// Clip this rectangle so it lies inside a screen of `bounds`.
    #[must_use]
    pub fn clipped_to(&self, bounds: Size) -> Self {
        let col = self.origin.col.min(bounds.cols);
        let row = self.origin.row.min(bounds.rows);
        Self {
            origin: point(col, row),
            size: size(
                self.right().min(bounds.cols) - col,
                self.bottom().min(bounds.rows) - row,
            ),
        }
    }
}

impl Display for Rect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{},{} {}x{}]",
            self.origin.col, self.origin.row, self.size.cols, self.size.rows
        )
    }
}
