//! Grid snake
//!
//! The head advances one cell per tick in the buffered heading. Leaving the
//! grid or running into the body ends the game; eating food grows the snake
//! by skipping the tail drop for that tick.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::{Game, Snapshot, View};
use crate::catalog::GameId;
use crate::config::SnakeTuning;
use crate::sim::{
    Command, Direction, InputTiming, KeyProfile, Lifecycle, LifecycleAction, Occupancy, Outcome, Shape, fits,
    pick_uniform,
};

/// Grid coordinate, rows grow downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    fn step(self, dir: Direction) -> Self {
        let (dc, dr) = dir.delta();
        Self::new(self.col + dc, self.row + dr)
    }
}

impl From<(usize, usize)> for GridPos {
    fn from((col, row): (usize, usize)) -> Self {
        Self::new(col as i32, row as i32)
    }
}

/// The body seen as occupied grid cells
struct BodyGrid<'a> {
    size: i32,
    body: &'a VecDeque<GridPos>,
}

impl Occupancy for BodyGrid<'_> {
    fn cols(&self) -> i32 {
        self.size
    }

    fn rows(&self) -> i32 {
        self.size
    }

    fn occupied(&self, col: i32, row: i32) -> bool {
        self.body.contains(&GridPos::new(col, row))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SnakeState {
    /// Head first, never empty
    body: VecDeque<GridPos>,
    /// Direction of the last applied move
    heading: Direction,
    /// Direction the next tick will use
    pending: Direction,
    food: GridPos,
    score: u64,
    interval_ms: u64,
    outcome: Option<Outcome>,
}

impl SnakeState {
    fn new(tuning: &SnakeTuning) -> Self {
        Self {
            body: VecDeque::from([GridPos::from(tuning.start)]),
            heading: tuning.initial_heading,
            pending: tuning.initial_heading,
            food: GridPos::from(tuning.initial_food),
            score: 0,
            interval_ms: tuning.base_interval_ms,
            outcome: None,
        }
    }
}

/// Renderable view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeView {
    pub size: usize,
    /// Head first
    pub body: Vec<GridPos>,
    pub food: GridPos,
    pub heading: Direction,
}

pub struct Snake {
    tuning: SnakeTuning,
    rng: Pcg32,
    lifecycle: Lifecycle,
    state: SnakeState,
    dot: Shape,
}

impl Snake {
    pub fn new(tuning: SnakeTuning, seed: u64) -> Self {
        let state = SnakeState::new(&tuning);
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            lifecycle: Lifecycle::Idle,
            state,
            dot: Shape::dot(),
        }
    }

    pub fn len(&self) -> usize {
        self.state.body.len()
    }

    pub fn head(&self) -> GridPos {
        // body is never empty
        self.state.body.front().copied().unwrap_or(GridPos::from(self.tuning.start))
    }

    pub fn food(&self) -> GridPos {
        self.state.food
    }

    fn end(&mut self, outcome: Outcome) {
        self.state.outcome = Some(outcome);
        self.lifecycle.transition(LifecycleAction::End);
        log::info!("snake over: {:?}, score {} length {}", outcome, self.state.score, self.len());
    }

    /// Move food to a uniformly random free cell. Returns false when none is left.
    fn relocate_food(&mut self) -> bool {
        let size = self.tuning.size as i32;
        let free: Vec<GridPos> = (0..size)
            .flat_map(|row| (0..size).map(move |col| GridPos::new(col, row)))
            .filter(|pos| !self.state.body.contains(pos))
            .collect();
        match pick_uniform(&free, &mut self.rng) {
            Some(&pos) => {
                self.state.food = pos;
                true
            }
            None => false,
        }
    }

    fn eat(&mut self) {
        let before = self.state.score;
        self.state.score += self.tuning.points_per_food;
        let every = self.tuning.speedup_every.max(1);
        if self.state.score / every > before / every {
            self.state.interval_ms = self
                .state
                .interval_ms
                .saturating_sub(self.tuning.interval_step_ms)
                .max(self.tuning.min_interval_ms);
            log::debug!("snake speed up: {}ms", self.state.interval_ms);
        }
        if !self.relocate_food() {
            self.end(Outcome::BoardFull);
        }
    }
}

impl Game for Snake {
    fn id(&self) -> GameId {
        GameId::Snake
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn start(&mut self) {
        if self.lifecycle != Lifecycle::Idle {
            return;
        }
        self.state = SnakeState::new(&self.tuning);
        self.lifecycle.transition(LifecycleAction::Start);
    }

    fn handle_input(&mut self, command: Command) {
        if !self.lifecycle.is_running() {
            return;
        }
        if let Command::Move(dir) = command {
            if !dir.reverses(self.state.heading) {
                self.state.pending = dir;
            }
        }
    }

    fn tick(&mut self) {
        if !self.lifecycle.is_running() {
            return;
        }
        let dir = self.state.pending;
        let head = self.head().step(dir);
        let grid = BodyGrid {
            size: self.tuning.size as i32,
            body: &self.state.body,
        };
        if !fits(&grid, &self.dot, head.col, head.row) {
            self.end(Outcome::Collision);
            return;
        }

        self.state.heading = dir;
        self.state.body.push_front(head);
        if head == self.state.food {
            log::debug!("snake ate at {:?}", head);
            self.eat();
        } else {
            self.state.body.pop_back();
        }
    }

    fn reset(&mut self) {
        self.lifecycle.transition(LifecycleAction::Reset);
        self.state = SnakeState::new(&self.tuning);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            lifecycle: self.lifecycle,
            score: self.state.score,
            level: 1,
            lives: None,
            outcome: self.state.outcome,
            player: None,
            view: View::Snake(SnakeView {
                size: self.tuning.size,
                body: self.state.body.iter().copied().collect(),
                food: self.state.food,
                heading: self.state.heading,
            }),
        }
    }

    fn tick_interval_ms(&self) -> Option<u64> {
        Some(self.state.interval_ms)
    }

    fn key_profile(&self) -> KeyProfile {
        KeyProfile::ARROWS
    }

    fn input_timing(&self) -> InputTiming {
        InputTiming::PerTick
    }

    fn heading(&self) -> Option<Direction> {
        Some(self.state.heading)
    }
}
