//! Deterministic simulation building blocks
//!
//! Everything the five games share lives here. This module must stay pure:
//! - Fixed ticks only, time comes in as plain milliseconds
//! - Seeded RNG only, passed in by the caller
//! - No rendering or platform dependencies

pub mod adversary;
pub mod board;
pub mod collision;
pub mod input;
pub mod lifecycle;
pub mod physics;
pub mod scheduler;

pub use adversary::{Tracker, pick_empty_slot, pick_uniform};
pub use board::{Board, ColorId, Shape};
pub use collision::{Occupancy, Rect, fits};
pub use input::{Command, Direction, InputRouter, InputTiming, KeyOutcome, KeyProfile};
pub use lifecycle::{Lifecycle, LifecycleAction, Mark, Outcome, Side, Transition};
pub use physics::{Axis, Ball, Paddle, WallBounce, Walls, bounce_off_walls, english, jitter, reflect};
pub use scheduler::{Deferred, DeferredToken, MAX_CATCHUP_TICKS, TickScheduler, TickToken};
