//! The five game instances and the contract the host drives them through

pub mod breakout;
pub mod pong;
pub mod snake;
pub mod tetris;
pub mod tictactoe;

use serde::Serialize;

use crate::catalog::GameId;
use crate::sim::{Command, Direction, InputTiming, KeyProfile, Lifecycle, Outcome};

pub use breakout::{Breakout, BreakoutView};
pub use pong::{Pong, PongView};
pub use snake::{Snake, SnakeView};
pub use tetris::{Tetris, TetrisView};
pub use tictactoe::{TicTacToe, TicTacToeView};

/// Per-game public contract consumed by the catalog/host.
///
/// `handle_input` and `tick` are no-ops unless the game is Running; terminal
/// conditions move the game to GameOver inside `tick` (or inside the move that
/// caused them for turn-based play).
pub trait Game {
    fn id(&self) -> GameId;

    fn lifecycle(&self) -> Lifecycle;

    /// Idle -> Running with all state at defaults
    fn start(&mut self);

    /// Apply one player command
    fn handle_input(&mut self, command: Command);

    /// Advance one fixed step
    fn tick(&mut self);

    /// Any state -> Idle with defaults restored
    fn reset(&mut self);

    /// Immutable copy of everything a renderer needs
    fn snapshot(&self) -> Snapshot;

    /// Current tick interval, `None` for games without a clock
    fn tick_interval_ms(&self) -> Option<u64>;

    fn key_profile(&self) -> KeyProfile;

    fn input_timing(&self) -> InputTiming {
        InputTiming::Immediate
    }

    /// Direction of the last applied grid move, for the router's reversal guard
    fn heading(&self) -> Option<Direction> {
        None
    }

    /// Delay before `run_deferred` should be called, while one is wanted
    fn deferred_delay_ms(&self) -> Option<u64> {
        None
    }

    /// Perform the pending deferred action (AI reply)
    fn run_deferred(&mut self) {}
}

/// Renderable state of any game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub lifecycle: Lifecycle,
    pub score: u64,
    pub level: u32,
    pub lives: Option<u8>,
    pub outcome: Option<Outcome>,
    /// Display name of the signed-in player, filled in by the host
    pub player: Option<String>,
    pub view: View,
}

/// Game-specific part of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum View {
    Tetris(TetrisView),
    Snake(SnakeView),
    Pong(PongView),
    Breakout(BreakoutView),
    TicTacToe(TicTacToeView),
}
