//! Tic Tac Toe against a random-move AI
//!
//! X is the human and always moves first; O replies after a short thinking
//! delay that the host schedules through [`Game::deferred_delay_ms`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::{Game, Snapshot, View};
use crate::catalog::GameId;
use crate::config::TicTacToeTuning;
use crate::sim::{Command, KeyProfile, Lifecycle, LifecycleAction, Mark, Outcome, pick_empty_slot};

pub const CELLS: usize = 9;

type Cells = [Option<Mark>; CELLS];

/// Rows, columns, diagonals
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// First completed line and its owner
pub fn winning_line(cells: &Cells) -> Option<(Mark, [usize; 3])> {
    LINES.iter().find_map(|&[a, b, c]| match cells[a] {
        Some(mark) if cells[b] == Some(mark) && cells[c] == Some(mark) => Some((mark, [a, b, c])),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq)]
struct TicTacToeState {
    cells: Cells,
    next: Mark,
    ai_thinking: bool,
    outcome: Option<Outcome>,
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self {
            cells: [None; CELLS],
            next: Mark::X,
            ai_thinking: false,
            outcome: None,
        }
    }
}

/// Renderable view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicTacToeView {
    pub cells: Cells,
    pub next: Mark,
    pub ai_thinking: bool,
    pub winner: Option<Mark>,
    pub winning_line: Option<[usize; 3]>,
    pub draw: bool,
}

impl TicTacToeView {
    /// One-line status for the board header
    pub fn status(&self) -> String {
        if let Some(mark) = self.winner {
            format!("Winner: {mark:?}")
        } else if self.draw {
            "Game is a draw!".to_string()
        } else if self.ai_thinking {
            "AI is thinking...".to_string()
        } else {
            format!("Next player: {:?}", self.next)
        }
    }
}

pub struct TicTacToe {
    tuning: TicTacToeTuning,
    rng: Pcg32,
    lifecycle: Lifecycle,
    state: TicTacToeState,
}

impl TicTacToe {
    pub fn new(tuning: TicTacToeTuning, seed: u64) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            lifecycle: Lifecycle::Idle,
            state: TicTacToeState::default(),
        }
    }

    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.state.cells.get(index).copied().flatten()
    }

    pub fn ai_thinking(&self) -> bool {
        self.state.ai_thinking
    }

    /// Put `mark` on an empty cell and settle the result. Returns true if the game ended.
    fn place(&mut self, index: usize, mark: Mark) -> bool {
        self.state.cells[index] = Some(mark);
        self.state.next = mark.other();
        log::debug!("tictactoe: {:?} takes {}", mark, index);

        let outcome = match winning_line(&self.state.cells) {
            Some((winner, _)) => Outcome::Won(winner),
            None if self.state.cells.iter().all(Option::is_some) => Outcome::Draw,
            None => return false,
        };
        self.state.outcome = Some(outcome);
        self.state.ai_thinking = false;
        self.lifecycle.transition(LifecycleAction::End);
        log::info!("tictactoe over: {:?}", outcome);
        true
    }
}

impl Game for TicTacToe {
    fn id(&self) -> GameId {
        GameId::TicTacToe
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn start(&mut self) {
        if self.lifecycle != Lifecycle::Idle {
            return;
        }
        self.state = TicTacToeState::default();
        self.lifecycle.transition(LifecycleAction::Start);
    }

    fn handle_input(&mut self, command: Command) {
        if !self.lifecycle.is_running() || self.state.ai_thinking || self.state.next != Mark::X {
            return;
        }
        let Command::Select(index) = command else {
            return;
        };
        let index = usize::from(index);
        if self.cell(index).is_some() || index >= CELLS {
            return;
        }
        if !self.place(index, Mark::X) {
            self.state.ai_thinking = true;
        }
    }

    /// Turn-based: nothing moves on its own
    fn tick(&mut self) {}

    fn reset(&mut self) {
        self.lifecycle.transition(LifecycleAction::Reset);
        self.state = TicTacToeState::default();
    }

    fn snapshot(&self) -> Snapshot {
        let line = winning_line(&self.state.cells);
        Snapshot {
            lifecycle: self.lifecycle,
            score: 0,
            level: 1,
            lives: None,
            outcome: self.state.outcome,
            player: None,
            view: View::TicTacToe(TicTacToeView {
                cells: self.state.cells,
                next: self.state.next,
                ai_thinking: self.state.ai_thinking,
                winner: line.map(|(mark, _)| mark),
                winning_line: line.map(|(_, cells)| cells),
                draw: self.state.outcome == Some(Outcome::Draw),
            }),
        }
    }

    fn tick_interval_ms(&self) -> Option<u64> {
        None
    }

    fn key_profile(&self) -> KeyProfile {
        KeyProfile::CELLS
    }

    fn deferred_delay_ms(&self) -> Option<u64> {
        (self.lifecycle.is_running() && self.state.ai_thinking).then_some(self.tuning.ai_delay_ms)
    }

    fn run_deferred(&mut self) {
        if !self.lifecycle.is_running() || !self.state.ai_thinking {
            return;
        }
        self.state.ai_thinking = false;
        match pick_empty_slot(&self.state.cells, &mut self.rng) {
            Some(index) => {
                self.place(index, Mark::O);
            }
            None => log::warn!("tictactoe: AI turn with no empty cell"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> TicTacToe {
        let mut game = TicTacToe::new(TicTacToeTuning::default(), 5);
        game.start();
        game
    }

    fn board(layout: &str) -> Cells {
        let mut cells = [None; CELLS];
        for (i, ch) in layout.chars().filter(|c| !c.is_whitespace()).enumerate() {
            cells[i] = match ch {
                'X' => Some(Mark::X),
                'O' => Some(Mark::O),
                _ => None,
            };
        }
        cells
    }

    fn view(game: &TicTacToe) -> TicTacToeView {
        match game.snapshot().view {
            View::TicTacToe(view) => view,
            other => panic!("wrong view: {other:?}"),
        }
    }

    #[test]
    fn test_every_line_wins() {
        for line in LINES {
            let mut cells = [None; CELLS];
            for i in line {
                cells[i] = Some(Mark::O);
            }
            assert_eq!(winning_line(&cells), Some((Mark::O, line)));
        }
        assert_eq!(winning_line(&board("XOX XOO OXX")), None);
    }

    #[test]
    fn test_human_move_hands_turn_to_ai() {
        let mut game = running();
        game.handle_input(Command::Select(4));
        assert_eq!(game.cell(4), Some(Mark::X));
        assert!(game.ai_thinking());
        assert_eq!(game.deferred_delay_ms(), Some(500));
        assert_eq!(view(&game).status(), "AI is thinking...");

        // no moves while the AI is thinking
        game.handle_input(Command::Select(0));
        assert_eq!(game.cell(0), None);

        game.run_deferred();
        assert!(!game.ai_thinking());
        assert_eq!(game.state.cells.iter().filter(|c| **c == Some(Mark::O)).count(), 1);
        assert_eq!(game.cell(4), Some(Mark::X));
        assert_eq!(view(&game).status(), "Next player: X");
    }

    #[test]
    fn test_occupied_cell_is_ignored() {
        let mut game = running();
        game.state.cells = board("O.. ... ...");
        game.handle_input(Command::Select(0));
        assert_eq!(game.cell(0), Some(Mark::O));
        assert!(!game.ai_thinking());
    }

    #[test]
    fn test_human_win_ends_without_ai_reply() {
        let mut game = running();
        game.state.cells = board("XX. OO. ...");
        game.handle_input(Command::Select(2));
        assert_eq!(game.lifecycle(), Lifecycle::GameOver);
        assert_eq!(game.snapshot().outcome, Some(Outcome::Won(Mark::X)));
        assert_eq!(game.deferred_delay_ms(), None);

        let view = view(&game);
        assert_eq!(view.winning_line, Some([0, 1, 2]));
        assert_eq!(view.status(), "Winner: X");
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let mut game = running();
        game.state.cells = board("XOX XOO OX.");
        game.handle_input(Command::Select(8));
        assert_eq!(game.snapshot().outcome, Some(Outcome::Draw));
        assert!(view(&game).draw);
        assert_eq!(view(&game).status(), "Game is a draw!");
    }

    #[test]
    fn test_ai_can_win() {
        let mut game = running();
        game.state.cells = board("XOX OO. XXO");
        game.state.ai_thinking = true;
        game.state.next = Mark::O;
        game.run_deferred();
        assert_eq!(game.cell(5), Some(Mark::O));
        assert_eq!(game.snapshot().outcome, Some(Outcome::Won(Mark::O)));
        assert!(!Outcome::Won(Mark::O).player_won());
    }

    #[test]
    fn test_no_clock() {
        let game = running();
        assert_eq!(game.tick_interval_ms(), None);
        assert_eq!(game.key_profile(), KeyProfile::CELLS);
    }

    #[test]
    fn test_reset_cancels_ai_turn() {
        let mut game = running();
        game.handle_input(Command::Select(0));
        game.reset();
        assert!(!game.ai_thinking());
        assert_eq!(game.deferred_delay_ms(), None);
        game.run_deferred();
        assert_eq!(game.state.cells, [None; CELLS]);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut game = running();
        game.state.cells = board("XX. OO. ...");
        game.handle_input(Command::Select(2));
        assert_eq!(game.lifecycle(), Lifecycle::GameOver);

        game.reset();
        let once = game.snapshot();
        game.reset();
        assert_eq!(game.snapshot(), once);
        assert_eq!(once.lifecycle, Lifecycle::Idle);
        assert_eq!(once.outcome, None);
        assert_eq!(view(&game).status(), "Next player: X");
    }
}
