//! Game lifecycle state machine
//!
//! Every game instance wraps its update function in Idle → Running → GameOver,
//! with Reset returning to Idle from anywhere.

use serde::{Deserialize, Serialize};

/// Lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Nothing running, state at defaults
    #[default]
    Idle,
    /// Ticking, input accepted
    Running,
    /// Terminal until reset
    GameOver,
}

/// Actions that drive lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleAction {
    Start,
    End,
    Reset,
}

/// Result of a transition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub success: bool,
    pub from: Lifecycle,
    pub to: Lifecycle,
    pub action: LifecycleAction,
}

impl Lifecycle {
    /// Next state for an action, if the transition is valid
    pub fn next(self, action: LifecycleAction) -> Option<Lifecycle> {
        match (self, action) {
            (Lifecycle::Idle, LifecycleAction::Start) => Some(Lifecycle::Running),
            (Lifecycle::Running, LifecycleAction::End) => Some(Lifecycle::GameOver),
            (_, LifecycleAction::Reset) => Some(Lifecycle::Idle),
            _ => None,
        }
    }

    /// Attempt a transition in place. Invalid transitions leave the state unchanged.
    pub fn transition(&mut self, action: LifecycleAction) -> Transition {
        let from = *self;
        match from.next(action) {
            Some(to) => {
                *self = to;
                if from != to {
                    log::info!("lifecycle {:?} -> {:?} ({:?})", from, to, action);
                }
                Transition {
                    success: true,
                    from,
                    to,
                    action,
                }
            }
            None => Transition {
                success: false,
                from,
                to: from,
                action,
            },
        }
    }

    pub fn is_running(self) -> bool {
        self == Lifecycle::Running
    }

    pub fn is_over(self) -> bool {
        self == Lifecycle::GameOver
    }
}

/// Side of a two-player paddle game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

/// Tic Tac Toe symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// No room left: a piece could not spawn, or food has nowhere to go
    BoardFull,
    /// Grid actor ran into a wall or itself
    Collision,
    /// A side reached the target score
    ScoreTarget { winner: Side },
    /// Every destructible block is gone
    Cleared,
    /// Lives reached zero
    OutOfLives,
    /// Three in a row
    Won(Mark),
    /// Board full with no line
    Draw,
}

impl Outcome {
    /// Whether the human player came out on top
    pub fn player_won(self) -> bool {
        matches!(
            self,
            Outcome::Cleared | Outcome::ScoreTarget { winner: Side::Player } | Outcome::Won(Mark::X)
        )
    }
}
