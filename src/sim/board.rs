//! Discrete playfield: shape matrices and the color grid they lock into

use serde::{Deserialize, Serialize};

use super::collision::Occupancy;

/// Abstract color/category identifier. Mapping to a visual is up to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorId(pub u8);

/// A boolean shape matrix, row-major
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Shape {
    /// Build from rows of 0/1 values. Rows are expected to share a length.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut cells = vec![false; width * height];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                cells[r * width + c] = v != 0;
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Single filled cell
    pub fn dot() -> Self {
        Self::from_rows(&[&[1]])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height && self.cells[row * self.width + col]
    }

    /// Offsets (col, row) of every filled cell, in row-major order
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(i, _)| (i % self.width, i / self.width))
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Clockwise quarter turn: transpose, then reverse each row.
    ///
    /// Row `i` of the result is column `i` of the original read bottom to top.
    pub fn rotated_cw(&self) -> Self {
        let (w, h) = (self.height, self.width);
        let mut cells = vec![false; w * h];
        for row in 0..h {
            for col in 0..w {
                cells[row * w + col] = self.get(row, self.height - 1 - col);
            }
        }
        Self {
            width: w,
            height: h,
            cells,
        }
    }
}

/// Fixed-size grid of color cells. Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Option<ColorId>>,
}

impl Board {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    pub fn width(&self) -> usize {
        self.cols
    }

    pub fn height(&self) -> usize {
        self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<ColorId> {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col]
        } else {
            None
        }
    }

    pub fn set(&mut self, col: usize, row: usize, value: Option<ColorId>) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = value;
        }
    }

    pub fn row(&self, row: usize) -> &[Option<ColorId>] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_slices(&self) -> impl Iterator<Item = &[Option<ColorId>]> {
        self.cells.chunks(self.cols.max(1))
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row).iter().all(Option::is_some)
    }

    /// Write `color` into every cell covered by `shape` at the anchor.
    /// Cells falling outside the board are skipped.
    pub fn stamp(&mut self, shape: &Shape, col: i32, row: i32, color: ColorId) {
        for (dc, dr) in shape.filled() {
            let (c, r) = (col + dc as i32, row + dr as i32);
            if c >= 0 && r >= 0 {
                self.set(c as usize, r as usize, Some(color));
            }
        }
    }

    /// Remove every full row at once, shift the rest down and pad the top with
    /// empty rows. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let kept: Vec<Option<ColorId>> = (0..self.rows)
            .filter(|&r| !self.is_row_full(r))
            .flat_map(|r| self.row(r).to_vec())
            .collect();
        let cleared = self.rows - kept.len() / self.cols.max(1);
        if cleared == 0 {
            return 0;
        }
        let mut cells = vec![None; cleared * self.cols];
        cells.extend(kept);
        self.cells = cells;
        cleared as u32
    }

    /// Cells (col, row) that are still empty, row-major
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| (i % self.cols, i / self.cols))
            .collect()
    }
}

impl Occupancy for Board {
    fn cols(&self) -> i32 {
        self.cols as i32
    }

    fn rows(&self) -> i32 {
        self.rows as i32
    }

    fn occupied(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && self.get(col as usize, row as usize).is_some()
    }
}
