//! Two-paddle Pong
//!
//! The player holds the left paddle, the tracker AI the right one. A ball
//! leaving past a paddle scores for the other side and is relaunched from
//! the center; first to the target score wins.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::{Game, Snapshot, View};
use crate::catalog::GameId;
use crate::config::PongTuning;
use crate::sim::{
    Ball, Command, Direction, KeyProfile, Lifecycle, LifecycleAction, Outcome, Paddle, Side, Tracker, Walls,
    bounce_off_walls, jitter,
};

#[derive(Debug, Clone, PartialEq)]
struct PongState {
    ball: Ball,
    player: Paddle,
    ai: Paddle,
    player_score: u32,
    ai_score: u32,
    outcome: Option<Outcome>,
}

impl PongState {
    fn new(t: &PongTuning) -> Self {
        let paddle_size = Vec2::new(t.paddle_width, t.paddle_height);
        let paddle_y = (t.height - t.paddle_height) / 2.0;
        Self {
            ball: Ball::new(center(t), Vec2::splat(t.ball_speed), t.ball_size),
            player: Paddle::new(Vec2::new(0.0, paddle_y), paddle_size),
            ai: Paddle::new(Vec2::new(t.width - t.paddle_width, paddle_y), paddle_size),
            player_score: 0,
            ai_score: 0,
            outcome: None,
        }
    }
}

fn center(t: &PongTuning) -> Vec2 {
    Vec2::new(t.width / 2.0, t.height / 2.0)
}

/// Renderable view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PongView {
    pub width: f32,
    pub height: f32,
    pub ball: Ball,
    pub player: Paddle,
    pub ai: Paddle,
    pub player_score: u32,
    pub ai_score: u32,
}

pub struct Pong {
    tuning: PongTuning,
    tracker: Tracker,
    rng: Pcg32,
    lifecycle: Lifecycle,
    state: PongState,
}

impl Pong {
    pub fn new(tuning: PongTuning, seed: u64) -> Self {
        let tracker = Tracker {
            step: tuning.ai_step,
            deadzone: tuning.ai_deadzone,
            length: tuning.paddle_height,
            min: 0.0,
            max: tuning.height - tuning.paddle_height,
        };
        let state = PongState::new(&tuning);
        Self {
            tuning,
            tracker,
            rng: Pcg32::seed_from_u64(seed),
            lifecycle: Lifecycle::Idle,
            state,
        }
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.state.player_score, self.state.ai_score)
    }

    fn arena(&self) -> Vec2 {
        Vec2::new(self.tuning.width, self.tuning.height)
    }

    fn end(&mut self, winner: Side) {
        let outcome = Outcome::ScoreTarget { winner };
        self.state.outcome = Some(outcome);
        self.lifecycle.transition(LifecycleAction::End);
        log::info!(
            "pong over: {:?} wins {}-{}",
            winner,
            self.state.player_score,
            self.state.ai_score
        );
    }

    /// Award a point. Returns true when it ended the match.
    fn point(&mut self, scorer: Side) -> bool {
        let total = match scorer {
            Side::Player => {
                self.state.player_score += 1;
                self.state.player_score
            }
            Side::Ai => {
                self.state.ai_score += 1;
                self.state.ai_score
            }
        };
        log::debug!("pong point: {:?} ({})", scorer, total);
        if total >= self.tuning.target_score {
            self.end(scorer);
            return true;
        }

        // relaunch toward the side that just conceded
        let speed = self.tuning.ball_speed;
        let dx = match scorer {
            Side::Player => speed,
            Side::Ai => -speed,
        };
        self.state.ball.pos = center(&self.tuning);
        self.state.ball.vel = Vec2::new(dx, speed);
        false
    }
}

impl Game for Pong {
    fn id(&self) -> GameId {
        GameId::Pong
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn start(&mut self) {
        if self.lifecycle != Lifecycle::Idle {
            return;
        }
        self.state = PongState::new(&self.tuning);
        self.lifecycle.transition(LifecycleAction::Start);
    }

    fn handle_input(&mut self, command: Command) {
        if !self.lifecycle.is_running() {
            return;
        }
        let step = self.tuning.player_step;
        let delta = match command {
            Command::Move(Direction::Up) => Vec2::new(0.0, -step),
            Command::Move(Direction::Down) => Vec2::new(0.0, step),
            _ => return,
        };
        let arena = self.arena();
        self.state.player.nudge(delta, arena);
    }

    fn tick(&mut self) {
        if !self.lifecycle.is_running() {
            return;
        }
        let ball = self.state.ball;
        let bounce = bounce_off_walls(ball.next_pos(), ball.vel, ball.size, self.arena(), Walls::HORIZONTAL);
        let (pos, mut vel) = (bounce.pos, bounce.vel);

        let rect = ball.rect_at(pos);
        let hit_player = vel.x < 0.0 && self.state.player.rect().overlaps(&rect);
        let hit_ai = vel.x > 0.0 && self.state.ai.rect().overlaps(&rect);
        if hit_player || hit_ai {
            vel.x = -vel.x;
            vel.y += jitter(&mut self.rng, self.tuning.bounce_jitter);
        }
        self.state.ball.pos = pos;
        self.state.ball.vel = vel;

        let scored = if pos.x < 0.0 {
            Some(Side::Ai)
        } else if pos.x > self.tuning.width {
            Some(Side::Player)
        } else {
            None
        };
        if let Some(side) = scored {
            if self.point(side) {
                return;
            }
        }

        let target = self.state.ball.pos.y;
        self.state.ai.pos.y = self.tracker.follow(self.state.ai.pos.y, target);
    }

    fn reset(&mut self) {
        self.lifecycle.transition(LifecycleAction::Reset);
        self.state = PongState::new(&self.tuning);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            lifecycle: self.lifecycle,
            score: u64::from(self.state.player_score),
            level: 1,
            lives: None,
            outcome: self.state.outcome,
            player: None,
            view: View::Pong(PongView {
                width: self.tuning.width,
                height: self.tuning.height,
                ball: self.state.ball,
                player: self.state.player,
                ai: self.state.ai,
                player_score: self.state.player_score,
                ai_score: self.state.ai_score,
            }),
        }
    }

    fn tick_interval_ms(&self) -> Option<u64> {
        Some(self.tuning.tick_ms)
    }

    fn key_profile(&self) -> KeyProfile {
        KeyProfile::VERTICAL
    }
}
