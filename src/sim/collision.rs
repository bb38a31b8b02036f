//! Collision detection for both kinds of playfield
//!
//! Continuous games (Pong, Breakout) test axis-aligned rectangles against the
//! moving entity's *next* position. Grid games (Tetris, Snake) test a shape
//! matrix against an occupancy grid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::board::Shape;

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn min(&self) -> Vec2 {
        self.pos
    }

    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Strict overlap on both axes. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }

    /// Normalized position of `x` along this rect's width (0 = left edge, 1 = right edge)
    pub fn fraction_along_x(&self, x: f32) -> f32 {
        if self.size.x <= 0.0 {
            return 0.5;
        }
        (x - self.pos.x) / self.size.x
    }
}

/// Anything that can answer "is this grid cell taken?"
///
/// Coordinates are signed so that callers can probe outside the grid;
/// out-of-range cells are reported by [`Occupancy::in_bounds`], not here.
pub trait Occupancy {
    fn cols(&self) -> i32;
    fn rows(&self) -> i32;
    fn occupied(&self, col: i32, row: i32) -> bool;

    fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && col < self.cols() && row >= 0 && row < self.rows()
    }
}

/// True iff every filled cell of `shape`, anchored at (`col`, `row`), lands on an
/// in-bounds, unoccupied cell of `grid`.
pub fn fits<O: Occupancy + ?Sized>(grid: &O, shape: &Shape, col: i32, row: i32) -> bool {
    shape.filled().all(|(dc, dr)| {
        let (c, r) = (col + dc as i32, row + dr as i32);
        grid.in_bounds(c, r) && !grid.occupied(c, r)
    })
}
