//! Single-paddle Breakout
//!
//! The ball bounces off the side and top walls, the paddle and the block
//! wall. Every visible block the ball overlaps in a tick is destroyed. The
//! floor is open: dropping the ball costs a life.

use glam::Vec2;
use serde::Serialize;

use super::{Game, Snapshot, View};
use crate::catalog::GameId;
use crate::config::BreakoutTuning;
use crate::sim::{
    Ball, ColorId, Command, Direction, KeyProfile, Lifecycle, LifecycleAction, Outcome, Paddle, Rect, Walls,
    bounce_off_walls, english,
};

/// One destructible block
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Block {
    pub rect: Rect,
    /// Row index, used as the palette entry
    pub color: ColorId,
    pub visible: bool,
}

fn block_wall(t: &BreakoutTuning) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(t.block_rows * t.block_cols);
    for row in 0..t.block_rows {
        for col in 0..t.block_cols {
            blocks.push(Block {
                rect: Rect::new(
                    col as f32 * t.block_width,
                    t.block_top + row as f32 * t.block_height,
                    t.block_width,
                    t.block_height,
                ),
                color: ColorId(row as u8),
                visible: true,
            });
        }
    }
    blocks
}

#[derive(Debug, Clone, PartialEq)]
struct BreakoutState {
    ball: Ball,
    paddle: Paddle,
    blocks: Vec<Block>,
    score: u64,
    lives: u8,
    outcome: Option<Outcome>,
}

impl BreakoutState {
    fn new(t: &BreakoutTuning) -> Self {
        let paddle_pos = Vec2::new(
            (t.width - t.paddle_width) / 2.0,
            t.height - t.paddle_height - t.paddle_margin,
        );
        Self {
            ball: launch_ball(t),
            paddle: Paddle::new(paddle_pos, Vec2::new(t.paddle_width, t.paddle_height)),
            blocks: block_wall(t),
            score: 0,
            lives: t.lives,
            outcome: None,
        }
    }
}

fn launch_ball(t: &BreakoutTuning) -> Ball {
    Ball::new(
        Vec2::new(t.ball_start.0, t.ball_start.1),
        Vec2::new(t.ball_speed, -t.ball_speed),
        t.ball_size,
    )
}

/// Renderable view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakoutView {
    pub width: f32,
    pub height: f32,
    pub ball: Ball,
    pub paddle: Paddle,
    pub blocks: Vec<Block>,
    pub blocks_left: usize,
}

pub struct Breakout {
    tuning: BreakoutTuning,
    lifecycle: Lifecycle,
    state: BreakoutState,
}

impl Breakout {
    pub fn new(tuning: BreakoutTuning) -> Self {
        let state = BreakoutState::new(&tuning);
        Self {
            tuning,
            lifecycle: Lifecycle::Idle,
            state,
        }
    }

    pub fn blocks_left(&self) -> usize {
        self.state.blocks.iter().filter(|b| b.visible).count()
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    fn end(&mut self, outcome: Outcome) {
        self.state.outcome = Some(outcome);
        self.lifecycle.transition(LifecycleAction::End);
        log::info!("breakout over: {:?}, score {}", outcome, self.state.score);
    }

    /// Destroy every visible block overlapping `rect`. Returns how many went.
    fn smash(&mut self, rect: &Rect) -> usize {
        let mut hits = 0;
        for block in self.state.blocks.iter_mut().filter(|b| b.visible) {
            if block.rect.overlaps(rect) {
                block.visible = false;
                hits += 1;
            }
        }
        self.state.score += hits as u64 * self.tuning.points_per_block;
        hits
    }
}

impl Game for Breakout {
    fn id(&self) -> GameId {
        GameId::Breakout
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn start(&mut self) {
        if self.lifecycle != Lifecycle::Idle {
            return;
        }
        self.state = BreakoutState::new(&self.tuning);
        self.lifecycle.transition(LifecycleAction::Start);
    }

    fn handle_input(&mut self, command: Command) {
        if !self.lifecycle.is_running() {
            return;
        }
        let step = self.tuning.player_step;
        let delta = match command {
            Command::Move(Direction::Left) => Vec2::new(-step, 0.0),
            Command::Move(Direction::Right) => Vec2::new(step, 0.0),
            _ => return,
        };
        let arena = Vec2::new(self.tuning.width, self.tuning.height);
        self.state.paddle.nudge(delta, arena);
    }

    fn tick(&mut self) {
        if !self.lifecycle.is_running() {
            return;
        }
        let ball = self.state.ball;
        let arena = Vec2::new(self.tuning.width, self.tuning.height);
        let bounce = bounce_off_walls(ball.next_pos(), ball.vel, ball.size, arena, Walls::OPEN_BOTTOM);
        let (pos, mut vel) = (bounce.pos, bounce.vel);
        let rect = ball.rect_at(pos);

        let paddle = self.state.paddle.rect();
        if vel.y > 0.0 && paddle.overlaps(&rect) {
            vel.y = -vel.y.abs();
            vel.x = english(paddle.fraction_along_x(pos.x), self.tuning.english);
        }

        let hits = self.smash(&rect);
        if hits > 0 {
            vel.y = -vel.y;
            log::debug!("breakout: {} block(s), {} left", hits, self.blocks_left());
        }
        self.state.ball.pos = pos;
        self.state.ball.vel = vel;

        if self.blocks_left() == 0 {
            self.end(Outcome::Cleared);
            return;
        }

        if pos.y > self.tuning.height {
            self.state.lives = self.state.lives.saturating_sub(1);
            log::debug!("breakout: ball lost, {} lives left", self.state.lives);
            if self.state.lives == 0 {
                self.end(Outcome::OutOfLives);
            } else {
                self.state.ball = launch_ball(&self.tuning);
            }
        }
    }

    fn reset(&mut self) {
        self.lifecycle.transition(LifecycleAction::Reset);
        self.state = BreakoutState::new(&self.tuning);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            lifecycle: self.lifecycle,
            score: self.state.score,
            level: 1,
            lives: Some(self.state.lives),
            outcome: self.state.outcome,
            player: None,
            view: View::Breakout(BreakoutView {
                width: self.tuning.width,
                height: self.tuning.height,
                ball: self.state.ball,
                paddle: self.state.paddle,
                blocks: self.state.blocks.clone(),
                blocks_left: self.blocks_left(),
            }),
        }
    }

    fn tick_interval_ms(&self) -> Option<u64> {
        Some(self.tuning.tick_ms)
    }

    fn key_profile(&self) -> KeyProfile {
        KeyProfile::HORIZONTAL
    }
}
