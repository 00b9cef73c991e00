//! Core game state and logic
//!
//! The controller owns the grid, the active and look-ahead pieces and the
//! score. It is driven by `update` once per frame and by discrete commands;
//! it never reads a clock itself, so callers pass the frame time in.

use crate::events::{Cue, EventSink, NullSink};
use crate::factory::PieceFactory;
use crate::grid::Grid;
use crate::kick;
use crate::piece::Piece;
use crate::score::Score;
use crate::snapshot::Snapshot;
use crate::tetromino::RotationDirection;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

/// Commands the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCW,
    RotateCCW,
    Pause,
    Restart,
    /// Leave the game; handled by the frontend, ignored here
    Quit,
}

/// The main game struct
pub struct Game {
    /// The playing field
    pub grid: Grid,
    /// Current falling piece
    pub current_piece: Option<Piece>,
    /// Look-ahead piece
    pub next_piece: Option<Piece>,
    /// Score, lines and level
    pub score: Score,
    /// Current lifecycle phase
    pub state: GameState,
    factory: PieceFactory,
    sink: Box<dyn EventSink>,
    /// Reference time of the last gravity tick; None until the next update
    /// re-anchors it
    last_fall: Option<Instant>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create a standard-size game with a random piece stream
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a standard-size game with a deterministic piece stream
    pub fn with_seed(seed: u64) -> Self {
        Self::with_grid(Grid::default(), seed)
    }

    /// Create a game on the given grid
    pub fn with_grid(grid: Grid, seed: u64) -> Self {
        let factory = PieceFactory::with_seed(grid.cols(), seed);
        let mut game = Self {
            grid,
            current_piece: None,
            next_piece: None,
            score: Score::new(),
            state: GameState::Playing,
            factory,
            sink: Box::new(NullSink),
            last_fall: None,
        };
        info!(
            "session start, grid={}x{}, seed={:016x}",
            game.grid.cols(),
            game.grid.rows(),
            seed
        );
        game.spawn_piece();
        game
    }

    /// Route cues to the given listener
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Time between gravity ticks at the current level
    pub fn gravity_interval(&self) -> Duration {
        self.score.gravity_interval()
    }

    /// Landing row of the active piece, for a preview
    pub fn ghost_row(&self) -> Option<i32> {
        self.current_piece
            .as_ref()
            .map(|piece| self.grid.drop_position(piece))
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            active: self.current_piece.as_ref(),
            next: self.next_piece.as_ref(),
            ghost_row: self.ghost_row(),
            score: self.score.points,
            level: self.score.level,
            lines: self.score.lines,
            state: self.state,
        }
    }

    /// Process a command. Returns whether it changed anything.
    pub fn process_action(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::SoftDrop => self.soft_drop(),
            Action::HardDrop => self.hard_drop(),
            Action::RotateCW => self.rotate(RotationDirection::Clockwise),
            Action::RotateCCW => self.rotate(RotationDirection::CounterClockwise),
            Action::Pause => self.toggle_pause(),
            Action::Restart => {
                self.restart();
                true
            }
            Action::Quit => false,
        }
    }

    /// Advance gravity (call every frame).
    ///
    /// At most one row per call, however late the call is.
    pub fn update(&mut self, now: Instant) {
        if self.state != GameState::Playing {
            return;
        }

        let Some(last_fall) = self.last_fall else {
            self.last_fall = Some(now);
            return;
        };

        if now.saturating_duration_since(last_fall) > self.gravity_interval() {
            self.last_fall = Some(now);
            self.gravity_step();
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn shift(&mut self, d_col: i32) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = &mut self.current_piece else {
            return false;
        };
        if !self.grid.is_valid_position(piece, d_col, 0) {
            return false;
        }
        piece.col += d_col;
        self.sink.emit(Cue::Move);
        true
    }

    /// Move down one row, scoring a point. Never locks.
    pub fn soft_drop(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = &mut self.current_piece else {
            return false;
        };
        if !self.grid.is_valid_position(piece, 0, 1) {
            return false;
        }
        piece.row += 1;
        self.score.add_soft_drop(1);
        self.sink.emit(Cue::SoftDrop);
        true
    }

    /// Drop to the landing row, scoring a point per row, then lock
    pub fn hard_drop(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = &mut self.current_piece else {
            return false;
        };

        let mut distance = 0;
        while self.grid.is_valid_position(piece, 0, 1) {
            piece.row += 1;
            distance += 1;
        }
        self.score.add_hard_drop(distance);
        self.sink.emit(Cue::HardDrop);
        self.lock_piece();
        true
    }

    /// Rotate with wall kicks; a rotation that fits nowhere is undone
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = &mut self.current_piece else {
            return false;
        };
        match kick::try_rotate(piece, direction, &self.grid) {
            Some(offset) => {
                if offset != 0 {
                    debug!("{} rotated {:?} with kick {:+}", piece.kind, direction, offset);
                }
                self.sink.emit(Cue::Rotate);
                true
            }
            None => false,
        }
    }

    /// Playing <-> Paused. Has no effect once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                debug!("paused");
            }
            GameState::Paused => {
                self.state = GameState::Playing;
                // Time spent paused must not count toward the next tick
                self.last_fall = None;
                debug!("resumed");
            }
            GameState::GameOver => return false,
        }
        self.sink.emit(Cue::Pause);
        true
    }

    /// Throw away the session and start a fresh one
    pub fn restart(&mut self) {
        info!(
            "restart, previous score={} lines={} level={}",
            self.score.points, self.score.lines, self.score.level
        );
        self.grid.reset();
        self.score = Score::new();
        self.state = GameState::Playing;
        self.current_piece = None;
        self.next_piece = None;
        self.last_fall = None;
        self.spawn_piece();
    }

    /// One gravity step: fall a row, or lock where the piece stands
    fn gravity_step(&mut self) {
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        if self.grid.is_valid_position(piece, 0, 1) {
            piece.row += 1;
        } else {
            self.lock_piece();
        }
    }

    /// Promote the look-ahead piece and draw a new one
    fn spawn_piece(&mut self) {
        let piece = match self.next_piece.take() {
            Some(piece) => piece,
            None => self.factory.next_piece(),
        };
        self.next_piece = Some(self.factory.next_piece());

        if !self.grid.is_valid_position(&piece, 0, 0) {
            debug!("{} cannot spawn", piece.kind);
            self.end_game();
            return;
        }
        self.current_piece = Some(piece);
    }

    /// Lock the current piece, clear and score rows, then spawn or end
    fn lock_piece(&mut self) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };

        self.grid.lock_piece(&piece);
        self.sink.emit(Cue::PieceLock);

        let lines = self.grid.clear_lines() as u32;
        let clear = self.score.add_clear(lines);
        match lines {
            0 => {}
            4 => self.sink.emit(Cue::TetrisClear),
            _ => self.sink.emit(Cue::LineClear),
        }
        debug!(
            "locked {} at ({}, {}), lines={} points={}",
            piece.kind, piece.col, piece.row, lines, clear.points
        );

        if let Some(level) = clear.new_level {
            info!("level up to {}, interval={:?}", level, self.gravity_interval());
            self.sink.emit(Cue::LevelUp);
        }

        if self.grid.is_game_over() {
            self.end_game();
            return;
        }

        self.spawn_piece();
    }

    fn end_game(&mut self) {
        self.state = GameState::GameOver;
        self.current_piece = None;
        info!(
            "game over, score={} lines={} level={}",
            self.score.points, self.score.lines, self.score.level
        );
        self.sink.emit(Cue::GameOver);
    }
}
