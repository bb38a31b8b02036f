//! Game catalog
//!
//! The fixed, ordered list of games shown on the selection screen, and the
//! factory that turns a catalog id into a live game instance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::UnknownGame;
use crate::games::{Breakout, Game, Pong, Snake, Tetris, TicTacToe};

/// Stable catalog identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Snake,
    TicTacToe,
    Tetris,
    Pong,
    Breakout,
}

impl GameId {
    pub fn as_str(self) -> &'static str {
        match self {
            GameId::Snake => "snake",
            GameId::TicTacToe => "tictactoe",
            GameId::Tetris => "tetris",
            GameId::Pong => "pong",
            GameId::Breakout => "breakout",
        }
    }

    /// The catalog entry for this id
    pub fn entry(self) -> &'static CatalogEntry {
        let index = match self {
            GameId::Snake => 0,
            GameId::TicTacToe => 1,
            GameId::Tetris => 2,
            GameId::Pong => 3,
            GameId::Breakout => 4,
        };
        &CATALOG[index]
    }

    /// Build a fresh, Idle instance of the game
    pub fn launch(self, config: &GameConfig, seed: u64) -> Box<dyn Game> {
        log::debug!("launching {} (seed {})", self, seed);
        match self {
            GameId::Snake => Box::new(Snake::new(config.snake.clone(), seed)),
            GameId::TicTacToe => Box::new(TicTacToe::new(config.tictactoe.clone(), seed)),
            GameId::Tetris => Box::new(Tetris::new(config.tetris.clone(), seed)),
            GameId::Pong => Box::new(Pong::new(config.pong.clone(), seed)),
            GameId::Breakout => Box::new(Breakout::new(config.breakout.clone())),
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameId {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .map(|e| e.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownGame(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Arcade,
    Strategy,
    Puzzle,
}

/// One card on the selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: GameId,
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub category: Category,
}

/// All games, in display order
pub static CATALOG: [CatalogEntry; 5] = [
    CatalogEntry {
        id: GameId::Snake,
        name: "Snake",
        description: "Classic snake game - eat food to grow longer",
        difficulty: Difficulty::Easy,
        category: Category::Arcade,
    },
    CatalogEntry {
        id: GameId::TicTacToe,
        name: "Tic Tac Toe",
        description: "Strategic X and O game against AI",
        difficulty: Difficulty::Easy,
        category: Category::Strategy,
    },
    CatalogEntry {
        id: GameId::Tetris,
        name: "Tetris",
        description: "Block-stacking puzzle game",
        difficulty: Difficulty::Medium,
        category: Category::Puzzle,
    },
    CatalogEntry {
        id: GameId::Pong,
        name: "Pong",
        description: "Classic paddle and ball game",
        difficulty: Difficulty::Medium,
        category: Category::Arcade,
    },
    CatalogEntry {
        id: GameId::Breakout,
        name: "Breakout",
        description: "Break all the blocks with your paddle",
        difficulty: Difficulty::Hard,
        category: Category::Arcade,
    },
];

/// Look an entry up by its string id
pub fn find(id: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.id.as_str() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Lifecycle;

    #[test]
    fn test_catalog_order() {
        let ids: Vec<&str> = CATALOG.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["snake", "tictactoe", "tetris", "pong", "breakout"]);
    }

    #[test]
    fn test_find_by_id() {
        let entry = find("tictactoe").expect("listed");
        assert_eq!(entry.name, "Tic Tac Toe");
        assert_eq!(entry.difficulty, Difficulty::Easy);
        assert_eq!(entry.category, Category::Strategy);
        assert!(find("minesweeper").is_none());
    }

    #[test]
    fn test_parse_round_trip() {
        for entry in &CATALOG {
            assert_eq!(entry.id.as_str().parse::<GameId>(), Ok(entry.id));
            assert_eq!(entry.id.entry(), entry);
        }
        let err = "chess".parse::<GameId>().unwrap_err();
        assert_eq!(err.to_string(), "unknown game `chess`");
    }

    #[test]
    fn test_serde_ids_match_catalog_ids() {
        for entry in &CATALOG {
            let json = serde_json::to_string(&entry.id).expect("serializes");
            assert_eq!(json, format!("\"{}\"", entry.id.as_str()));
        }
    }

    #[test]
    fn test_launch_builds_idle_game() {
        let config = GameConfig::default();
        for entry in &CATALOG {
            let game = entry.id.launch(&config, 7);
            assert_eq!(game.id(), entry.id);
            assert_eq!(game.lifecycle(), Lifecycle::Idle);
        }
    }
}
