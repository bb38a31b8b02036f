//! Arcade Hub - simulation cores for five arcade mini-games
//!
//! Core modules:
//! - `sim`: Deterministic building blocks (collision, boards, physics, AI, lifecycle, input, clock)
//! - `games`: Snake, Tic Tac Toe, Tetris, Pong and Breakout behind one `Game` trait
//! - `catalog`: The selection screen's fixed game list
//! - `session`: Host driver tying a game to its input router and scheduler
//! - `identity`: In-memory player widget
//! - `config`: Data-driven game tuning
//! - `platform`: Browser glue (wasm32 only)

pub mod catalog;
pub mod config;
pub mod error;
pub mod games;
pub mod identity;
pub mod platform;
pub mod session;
pub mod sim;

pub use catalog::{CATALOG, CatalogEntry, GameId};
pub use config::GameConfig;
pub use error::{ConfigError, UnknownGame};
pub use games::{Game, Snapshot, View};
pub use identity::{Identity, IdentitySlot, ProfileForm};
pub use session::{Cabinet, Session};
