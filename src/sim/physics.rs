//! Continuous-space entity physics (ball and paddles)
//!
//! Coordinates are canvas pixels with the origin at the top-left corner and y
//! growing downward. Velocities are pixels per tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;

/// Velocity axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Negate one velocity component, leaving the other unchanged
pub fn reflect(vel: Vec2, axis: Axis) -> Vec2 {
    match axis {
        Axis::X => Vec2::new(-vel.x, vel.y),
        Axis::Y => Vec2::new(vel.x, -vel.y),
    }
}

/// Which arena edges bounce the ball. Open edges are exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Walls {
    /// Pong: ball bounces off top and bottom, leaves left/right
    pub const HORIZONTAL: Walls = Walls {
        left: false,
        right: false,
        top: true,
        bottom: true,
    };

    /// Breakout: everything except the floor
    pub const OPEN_BOTTOM: Walls = Walls {
        left: true,
        right: true,
        top: true,
        bottom: false,
    };
}

/// A square ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, size: f32) -> Self {
        Self { pos, vel, size }
    }

    /// Where the ball will be after this tick's advance
    pub fn next_pos(&self) -> Vec2 {
        self.pos + self.vel
    }

    pub fn rect_at(&self, pos: Vec2) -> Rect {
        Rect {
            pos,
            size: Vec2::splat(self.size),
        }
    }
}

/// A rectangular paddle, position only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Paddle {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Shift by `delta`, clamped so the paddle stays inside `arena`
    pub fn nudge(&mut self, delta: Vec2, arena: Vec2) {
        let max = (arena - self.size).max(Vec2::ZERO);
        self.pos = (self.pos + delta).clamp(Vec2::ZERO, max);
    }
}

/// Result of a wall pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBounce {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Reflect `vel` off any closed arena edge the ball reaches at `next`.
///
/// Each axis is handled independently; the returned position is clamped back
/// inside the arena along every reflecting axis.
pub fn bounce_off_walls(next: Vec2, vel: Vec2, size: f32, arena: Vec2, walls: Walls) -> WallBounce {
    let mut out = WallBounce { pos: next, vel };
    let max = arena - Vec2::splat(size);

    if (walls.left && next.x <= 0.0) || (walls.right && next.x >= max.x) {
        out.vel = reflect(out.vel, Axis::X);
    }
    if (walls.top && next.y <= 0.0) || (walls.bottom && next.y >= max.y) {
        out.vel = reflect(out.vel, Axis::Y);
    }

    if walls.left {
        out.pos.x = out.pos.x.max(0.0);
    }
    if walls.right {
        out.pos.x = out.pos.x.min(max.x);
    }
    if walls.top {
        out.pos.y = out.pos.y.max(0.0);
    }
    if walls.bottom {
        out.pos.y = out.pos.y.min(max.y);
    }
    out
}

/// Deterministic "english": impact at the paddle's left edge sends the ball
/// left at `-factor / 2`, the center sends it straight, the right edge at `+factor / 2`.
pub fn english(impact: f32, factor: f32) -> f32 {
    (impact - 0.5) * factor
}

/// Bounded random perturbation in `[-amount, amount)`
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    if amount <= 0.0 {
        return 0.0;
    }
    rng.random_range(-amount..amount)
}
