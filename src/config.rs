//! Game tuning
//!
//! Every constant the simulation cores depend on lives here, one block per
//! game. All fields default to the classic values, so a partial JSON document
//! only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::Direction;

/// Block-stacking puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetrisTuning {
    pub width: usize,
    pub height: usize,
    /// Gravity interval at level 1
    pub base_interval_ms: u64,
    /// Interval reduction per level
    pub interval_step_ms: u64,
    /// Fastest gravity interval
    pub min_interval_ms: u64,
    /// Multiplied by lines cleared and the current level
    pub points_per_line: u64,
    pub lines_per_level: u32,
}

impl Default for TetrisTuning {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            base_interval_ms: 1000,
            interval_step_ms: 50,
            min_interval_ms: 100,
            points_per_line: 100,
            lines_per_level: 10,
        }
    }
}

impl TetrisTuning {
    /// Gravity interval for a level (levels start at 1)
    pub fn interval_for_level(&self, level: u32) -> u64 {
        let reduction = self.interval_step_ms.saturating_mul(u64::from(level.saturating_sub(1)));
        self.base_interval_ms.saturating_sub(reduction).max(self.min_interval_ms)
    }
}

/// Grid snake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    /// Square grid edge length
    pub size: usize,
    pub start: (usize, usize),
    pub initial_food: (usize, usize),
    pub initial_heading: Direction,
    pub base_interval_ms: u64,
    pub interval_step_ms: u64,
    pub min_interval_ms: u64,
    pub points_per_food: u64,
    /// Speed up each time the score reaches a multiple of this
    pub speedup_every: u64,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            size: 20,
            start: (10, 10),
            initial_food: (5, 5),
            initial_heading: Direction::Right,
            base_interval_ms: 150,
            interval_step_ms: 10,
            min_interval_ms: 50,
            points_per_food: 10,
            speedup_every: 50,
        }
    }
}

/// Two-paddle Pong against the tracker AI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongTuning {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub ball_size: f32,
    /// Launch speed on each axis
    pub ball_speed: f32,
    /// Player paddle movement per key press
    pub player_step: f32,
    pub ai_step: f32,
    pub ai_deadzone: f32,
    pub target_score: u32,
    pub tick_ms: u64,
    /// Random vertical perturbation on paddle hits, +/-
    pub bounce_jitter: f32,
}

impl Default for PongTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            paddle_width: 10.0,
            paddle_height: 100.0,
            ball_size: 10.0,
            ball_speed: 4.0,
            player_step: 20.0,
            ai_step: 4.0,
            ai_deadzone: 10.0,
            target_score: 11,
            tick_ms: 16,
            bounce_jitter: 1.0,
        }
    }
}

/// Single-paddle Breakout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutTuning {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between the paddle and the bottom edge
    pub paddle_margin: f32,
    pub ball_size: f32,
    pub ball_speed: f32,
    /// Ball (re)launch point
    pub ball_start: (f32, f32),
    pub block_width: f32,
    pub block_height: f32,
    pub block_rows: usize,
    pub block_cols: usize,
    pub block_top: f32,
    pub lives: u8,
    pub points_per_block: u64,
    pub player_step: f32,
    pub tick_ms: u64,
    /// Horizontal velocity spread across the paddle face
    pub english: f32,
}

impl Default for BreakoutTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            paddle_width: 100.0,
            paddle_height: 10.0,
            paddle_margin: 20.0,
            ball_size: 8.0,
            ball_speed: 4.0,
            ball_start: (400.0, 500.0),
            block_width: 80.0,
            block_height: 20.0,
            block_rows: 5,
            block_cols: 10,
            block_top: 50.0,
            lives: 3,
            points_per_block: 10,
            player_step: 20.0,
            tick_ms: 16,
            english: 8.0,
        }
    }
}

/// Tic Tac Toe against the random picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicTacToeTuning {
    /// Pause before the AI reply
    pub ai_delay_ms: u64,
}

impl Default for TicTacToeTuning {
    fn default() -> Self {
        Self { ai_delay_ms: 500 }
    }
}

/// Complete tuning for the cabinet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed RNG seed; `None` draws one per launch
    pub seed: Option<u64>,
    pub tetris: TetrisTuning,
    pub snake: SnakeTuning,
    pub pong: PongTuning,
    pub breakout: BreakoutTuning,
    pub tictactoe: TicTacToeTuning,
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tetris;
        if t.width < 4 || t.height < 4 {
            return Err(ConfigError::invalid("tetris.width/height", "board must be at least 4x4"));
        }
        if t.min_interval_ms == 0 || t.min_interval_ms > t.base_interval_ms {
            return Err(ConfigError::invalid(
                "tetris.min_interval_ms",
                "must be non-zero and not above base_interval_ms",
            ));
        }
        if t.lines_per_level == 0 {
            return Err(ConfigError::invalid("tetris.lines_per_level", "must be non-zero"));
        }

        let s = &self.snake;
        if s.size < 2 {
            return Err(ConfigError::invalid("snake.size", "grid must be at least 2x2"));
        }
        if s.start.0 >= s.size || s.start.1 >= s.size {
            return Err(ConfigError::invalid("snake.start", "outside the grid"));
        }
        if s.initial_food.0 >= s.size || s.initial_food.1 >= s.size || s.initial_food == s.start {
            return Err(ConfigError::invalid("snake.initial_food", "outside the grid or on the snake"));
        }
        if s.min_interval_ms == 0 || s.min_interval_ms > s.base_interval_ms {
            return Err(ConfigError::invalid(
                "snake.min_interval_ms",
                "must be non-zero and not above base_interval_ms",
            ));
        }
        if s.speedup_every == 0 {
            return Err(ConfigError::invalid("snake.speedup_every", "must be non-zero"));
        }

        let p = &self.pong;
        if p.tick_ms == 0 {
            return Err(ConfigError::invalid("pong.tick_ms", "must be non-zero"));
        }
        if p.paddle_height >= p.height || p.paddle_width * 2.0 >= p.width || p.ball_size <= 0.0 {
            return Err(ConfigError::invalid("pong.paddle", "paddles and ball must fit the arena"));
        }
        if p.target_score == 0 {
            return Err(ConfigError::invalid("pong.target_score", "must be non-zero"));
        }

        let b = &self.breakout;
        if b.tick_ms == 0 {
            return Err(ConfigError::invalid("breakout.tick_ms", "must be non-zero"));
        }
        if b.paddle_width >= b.width || b.paddle_height + b.paddle_margin >= b.height || b.ball_size <= 0.0 {
            return Err(ConfigError::invalid("breakout.paddle", "paddle and ball must fit the arena"));
        }
        if b.block_cols as f32 * b.block_width > b.width
            || b.block_top + b.block_rows as f32 * b.block_height > b.height - b.paddle_margin - b.paddle_height
        {
            return Err(ConfigError::invalid("breakout.blocks", "block grid does not fit the arena"));
        }
        if b.block_rows == 0 || b.block_cols == 0 {
            return Err(ConfigError::invalid("breakout.blocks", "need at least one block"));
        }
        if b.lives == 0 {
            return Err(ConfigError::invalid("breakout.lives", "must be non-zero"));
        }

        Ok(())
    }
}
