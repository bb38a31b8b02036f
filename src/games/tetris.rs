//! Block-stacking puzzle
//!
//! Each tick the active piece tries to fall one row. A piece that cannot fall
//! locks into the board, full rows clear, and a new piece spawns at the top
//! center. A spawn that does not fit ends the game.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::{Game, Snapshot, View};
use crate::catalog::GameId;
use crate::config::TetrisTuning;
use crate::sim::{
    Board, ColorId, Command, Direction, KeyProfile, Lifecycle, LifecycleAction, Outcome, Shape, fits, pick_uniform,
};

/// The seven one-sided tetrominoes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Spawn orientation
    pub fn shape(self) -> Shape {
        match self {
            PieceKind::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
            PieceKind::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            PieceKind::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
            PieceKind::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            PieceKind::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
            PieceKind::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
            PieceKind::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
        }
    }

    pub fn color(self) -> ColorId {
        ColorId(self as u8)
    }
}

/// The falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub color: ColorId,
    pub col: i32,
    pub row: i32,
}

impl Piece {
    /// New piece anchored at the top center of a board `board_width` wide
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let shape = kind.shape();
        let col = (board_width / 2) as i32 - (shape.width() / 2) as i32;
        Self {
            kind,
            color: kind.color(),
            shape,
            col,
            row: 0,
        }
    }

    pub fn fits(&self, board: &Board) -> bool {
        fits(board, &self.shape, self.col, self.row)
    }

    fn shifted(&self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
            ..self.clone()
        }
    }

    fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated_cw(),
            ..self.clone()
        }
    }

    /// Absolute board cells covered by the piece
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled()
            .map(|(dc, dr)| (self.col + dc as i32, self.row + dr as i32))
    }
}

/// Everything that changes while playing
#[derive(Debug, Clone, PartialEq)]
struct TetrisState {
    board: Board,
    active: Option<Piece>,
    score: u64,
    level: u32,
    lines: u32,
    outcome: Option<Outcome>,
}

impl TetrisState {
    fn new(tuning: &TetrisTuning) -> Self {
        Self {
            board: Board::new(tuning.width, tuning.height),
            active: None,
            score: 0,
            level: 1,
            lines: 0,
            outcome: None,
        }
    }
}

/// Renderable view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TetrisView {
    pub width: usize,
    pub height: usize,
    /// Locked cells with the active piece drawn on top
    pub cells: Vec<Vec<Option<ColorId>>>,
    pub active: Option<PieceKind>,
    pub lines: u32,
}

pub struct Tetris {
    tuning: TetrisTuning,
    rng: Pcg32,
    lifecycle: Lifecycle,
    state: TetrisState,
}

impl Tetris {
    pub fn new(tuning: TetrisTuning, seed: u64) -> Self {
        let state = TetrisState::new(&tuning);
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            lifecycle: Lifecycle::Idle,
            state,
        }
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.state.active.as_ref()
    }

    pub fn lines(&self) -> u32 {
        self.state.lines
    }

    fn end(&mut self, outcome: Outcome) {
        self.state.outcome = Some(outcome);
        self.lifecycle.transition(LifecycleAction::End);
        log::info!(
            "tetris over: {:?}, score {} level {} lines {}",
            outcome,
            self.state.score,
            self.state.level,
            self.state.lines
        );
    }

    fn spawn(&mut self) {
        let kind = pick_uniform(&PieceKind::ALL, &mut self.rng)
            .copied()
            .unwrap_or(PieceKind::I);
        let piece = Piece::spawn(kind, self.tuning.width);
        if piece.fits(&self.state.board) {
            self.state.active = Some(piece);
        } else {
            self.state.active = None;
            self.end(Outcome::BoardFull);
        }
    }

    /// Replace the active piece with `candidate` if it fits. Returns whether it moved.
    fn try_place(&mut self, candidate: Piece) -> bool {
        if candidate.fits(&self.state.board) {
            self.state.active = Some(candidate);
            true
        } else {
            false
        }
    }

    fn shift(&mut self, dcol: i32) {
        if let Some(piece) = &self.state.active {
            let candidate = piece.shifted(dcol, 0);
            self.try_place(candidate);
        }
    }

    fn rotate(&mut self) {
        if let Some(piece) = &self.state.active {
            let candidate = piece.rotated();
            self.try_place(candidate);
        }
    }

    /// One row down, locking if blocked
    fn step_down(&mut self) {
        let Some(piece) = &self.state.active else {
            return;
        };
        let candidate = piece.shifted(0, 1);
        if !self.try_place(candidate) {
            self.lock();
        }
    }

    fn hard_drop(&mut self) {
        let Some(mut piece) = self.state.active.take() else {
            return;
        };
        while fits(&self.state.board, &piece.shape, piece.col, piece.row + 1) {
            piece.row += 1;
        }
        self.state.active = Some(piece);
        self.lock();
    }

    /// Write the active piece into the board, clear lines, spawn the next piece
    fn lock(&mut self) {
        let Some(piece) = self.state.active.take() else {
            return;
        };
        self.state
            .board
            .stamp(&piece.shape, piece.col, piece.row, piece.color);

        let cleared = self.state.board.clear_full_rows();
        if cleared > 0 {
            self.state.score += u64::from(cleared) * self.tuning.points_per_line * u64::from(self.state.level);
            self.state.lines += cleared;
            let level = 1 + self.state.lines / self.tuning.lines_per_level;
            if level > self.state.level {
                log::info!("tetris level up: {} -> {}", self.state.level, level);
                self.state.level = level;
            }
            log::debug!("tetris cleared {cleared} line(s), score {}", self.state.score);
        }

        self.spawn();
    }
}

impl Game for Tetris {
    fn id(&self) -> GameId {
        GameId::Tetris
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn start(&mut self) {
        if self.lifecycle != Lifecycle::Idle {
            return;
        }
        self.state = TetrisState::new(&self.tuning);
        self.lifecycle.transition(LifecycleAction::Start);
        self.spawn();
    }

    fn handle_input(&mut self, command: Command) {
        if !self.lifecycle.is_running() {
            return;
        }
        match command {
            Command::Move(Direction::Left) => self.shift(-1),
            Command::Move(Direction::Right) => self.shift(1),
            Command::Move(Direction::Down) => self.step_down(),
            Command::Move(Direction::Up) => self.rotate(),
            Command::Action => self.hard_drop(),
            Command::Select(_) | Command::Start | Command::Restart => {}
        }
    }

    fn tick(&mut self) {
        if self.lifecycle.is_running() {
            self.step_down();
        }
    }

    fn reset(&mut self) {
        self.lifecycle.transition(LifecycleAction::Reset);
        self.state = TetrisState::new(&self.tuning);
    }

    fn snapshot(&self) -> Snapshot {
        let board = &self.state.board;
        let mut cells: Vec<Vec<Option<ColorId>>> = board.row_slices().map(|r| r.to_vec()).collect();
        if let Some(piece) = &self.state.active {
            for (c, r) in piece.cells() {
                if let Some(cell) = usize::try_from(r)
                    .ok()
                    .and_then(|r| cells.get_mut(r))
                    .and_then(|row| usize::try_from(c).ok().and_then(|c| row.get_mut(c)))
                {
                    *cell = Some(piece.color);
                }
            }
        }
        Snapshot {
            lifecycle: self.lifecycle,
            score: self.state.score,
            level: self.state.level,
            lives: None,
            outcome: self.state.outcome,
            player: None,
            view: View::Tetris(TetrisView {
                width: board.width(),
                height: board.height(),
                cells,
                active: self.state.active.as_ref().map(|p| p.kind),
                lines: self.state.lines,
            }),
        }
    }

    fn tick_interval_ms(&self) -> Option<u64> {
        Some(self.tuning.interval_for_level(self.state.level))
    }

    fn key_profile(&self) -> KeyProfile {
        KeyProfile::ARROWS_AND_ACTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(seed: u64) -> Tetris {
        let mut game = Tetris::new(TetrisTuning::default(), seed);
        game.start();
        game
    }

    /// Fill `row` except for the listed columns
    fn fill_row_except(game: &mut Tetris, row: usize, holes: &[usize]) {
        for col in 0..game.tuning.width {
            if !holes.contains(&col) {
                game.state.board.set(col, row, Some(ColorId(9)));
            }
        }
    }

    fn place(game: &mut Tetris, kind: PieceKind, col: i32, row: i32) {
        let mut piece = Piece::spawn(kind, game.tuning.width);
        piece.col = col;
        piece.row = row;
        game.state.active = Some(piece);
    }

    #[test]
    fn test_start_spawns_top_center() {
        let game = running(1);
        assert_eq!(game.lifecycle(), Lifecycle::Running);
        let piece = game.active().expect("piece spawned");
        assert_eq!(piece.row, 0);
        assert_eq!(piece.col, 5 - (piece.shape.width() / 2) as i32);
    }

    #[test]
    fn test_gravity_moves_piece_down() {
        let mut game = running(2);
        let row = game.active().map(|p| p.row);
        game.tick();
        assert_eq!(game.active().map(|p| p.row), row.map(|r| r + 1));
        assert!(game.board().empty_cells().len() == 200);
    }

    #[test]
    fn test_shift_rejected_at_wall() {
        let mut game = running(3);
        place(&mut game, PieceKind::O, 0, 5);
        game.handle_input(Command::Move(Direction::Left));
        assert_eq!(game.active().map(|p| p.col), Some(0));
        game.handle_input(Command::Move(Direction::Right));
        assert_eq!(game.active().map(|p| p.col), Some(1));
    }

    #[test]
    fn test_rotation_rejected_when_blocked() {
        let mut game = running(4);
        // Horizontal I at the bottom: rotating needs 4 rows
        place(&mut game, PieceKind::I, 3, 19);
        let before = game.active().cloned();
        game.handle_input(Command::Move(Direction::Up));
        assert_eq!(game.active().cloned(), before);

        place(&mut game, PieceKind::I, 3, 5);
        game.handle_input(Command::Move(Direction::Up));
        let piece = game.active().expect("active");
        assert_eq!((piece.shape.width(), piece.shape.height()), (1, 4));
    }

    #[test]
    fn test_lock_clears_full_row_and_scores() {
        let mut game = running(5);
        fill_row_except(&mut game, 19, &[0, 1, 2, 3]);
        game.state.board.set(9, 18, Some(ColorId(9)));
        place(&mut game, PieceKind::I, 0, 19);

        game.tick();

        let board = game.board();
        assert_eq!(board.height(), 20);
        assert_eq!(game.lines(), 1);
        assert_eq!(game.snapshot().score, 100);
        // the lone cell above the cleared row dropped into it
        assert_eq!(board.get(9, 19), Some(ColorId(9)));
        assert!(board.row(0).iter().all(Option::is_none));
        assert_eq!(game.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn test_score_scales_with_level() {
        let mut game = running(6);
        game.state.level = 3;
        game.state.lines = 20;
        fill_row_except(&mut game, 19, &[0, 1, 2, 3]);
        place(&mut game, PieceKind::I, 0, 10);
        game.handle_input(Command::Action);
        assert_eq!(game.lines(), 21);
        assert_eq!(game.snapshot().score, 300);
    }

    #[test]
    fn test_level_up_on_tenth_line() {
        let mut game = running(7);
        game.state.lines = 9;
        fill_row_except(&mut game, 19, &[0, 1, 2, 3]);
        place(&mut game, PieceKind::I, 0, 19);
        game.tick();
        assert_eq!(game.lines(), 10);
        assert_eq!(game.snapshot().level, 2);
        assert_eq!(game.tick_interval_ms(), Some(950));
    }

    #[test]
    fn test_no_level_change_without_crossing() {
        let mut game = running(8);
        game.state.lines = 3;
        fill_row_except(&mut game, 19, &[0, 1, 2, 3]);
        place(&mut game, PieceKind::I, 0, 19);
        game.tick();
        assert_eq!(game.snapshot().level, 1);
    }

    #[test]
    fn test_hard_drop_locks_immediately() {
        let mut game = running(9);
        place(&mut game, PieceKind::O, 4, 0);
        game.handle_input(Command::Action);
        assert_eq!(game.board().get(4, 19), Some(PieceKind::O.color()));
        assert_eq!(game.board().get(5, 18), Some(PieceKind::O.color()));
        // a fresh piece is falling again
        assert_eq!(game.active().map(|p| p.row), Some(0));
    }

    #[test]
    fn test_soft_drop_locks_when_blocked() {
        let mut game = running(10);
        place(&mut game, PieceKind::O, 0, 18);
        game.handle_input(Command::Move(Direction::Down));
        assert_eq!(game.board().get(0, 19), Some(PieceKind::O.color()));
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let mut game = running(11);
        for row in 0..2 {
            fill_row_except(&mut game, row, &[0]);
        }
        place(&mut game, PieceKind::O, 0, 2);
        game.handle_input(Command::Action);
        assert_eq!(game.lifecycle(), Lifecycle::GameOver);
        assert_eq!(game.snapshot().outcome, Some(Outcome::BoardFull));
        assert!(game.active().is_none());

        // input and ticks are ignored once over
        let before = game.snapshot();
        game.tick();
        game.handle_input(Command::Move(Direction::Left));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut game = running(12);
        game.tick();
        game.reset();
        let once = game.snapshot();
        game.reset();
        assert_eq!(game.snapshot(), once);
        assert_eq!(once.lifecycle, Lifecycle::Idle);
        assert_eq!(once.score, 0);
    }

    #[test]
    fn test_snapshot_overlays_active_piece() {
        let mut game = running(13);
        place(&mut game, PieceKind::T, 0, 0);
        let snap = game.snapshot();
        let View::Tetris(view) = snap.view else {
            panic!("wrong view");
        };
        assert_eq!(view.cells[0][1], Some(PieceKind::T.color()));
        assert_eq!(view.cells[1][0], Some(PieceKind::T.color()));
        assert_eq!(view.cells[0][0], None);
        assert_eq!(view.active, Some(PieceKind::T));
    }
}
