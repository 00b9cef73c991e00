//! Read-only view of a session for renderers

use crate::game::GameState;
use crate::grid::Grid;
use crate::piece::Piece;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    /// The falling piece, absent once the session is over
    pub active: Option<&'a Piece>,
    /// Look-ahead piece
    pub next: Option<&'a Piece>,
    /// Row the active piece would land on if hard-dropped
    pub ghost_row: Option<i32>,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub state: GameState,
}

impl Snapshot<'_> {
    /// Whether the ghost should be drawn: it only matters when below the piece
    pub fn ghost_visible(&self) -> bool {
        match (self.active, self.ghost_row) {
            (Some(piece), Some(row)) => row > piece.row,
            _ => false,
        }
    }
}
