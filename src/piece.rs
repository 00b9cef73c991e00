//! Active falling piece

use crate::tetromino::{PieceKind, RotationDirection, Shape};

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The kind of piece, doubling as its color tag
    pub kind: PieceKind,
    /// Current shape matrix (changes only through rotation)
    pub shape: Shape,
    /// Column of the shape's top-left corner
    pub col: i32,
    /// Row of the shape's top-left corner; row 0 is the top of the grid
    pub row: i32,
}

impl Piece {
    /// Create a piece centered horizontally on a grid `cols` wide, at row 0
    pub fn new(kind: PieceKind, cols: usize) -> Self {
        let shape = kind.shape();
        let col = (cols / 2) as i32 - shape.width().div_ceil(2) as i32;
        Self {
            kind,
            shape,
            col,
            row: 0,
        }
    }

    /// Absolute (col, row) grid coordinates of every filled cell, after an offset
    pub fn cells_at(&self, d_col: i32, d_row: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (col, row) = (self.col + d_col, self.row + d_row);
        self.shape
            .filled_cells()
            .map(move |(c, r)| (col + c, row + r))
    }

    /// Absolute (col, row) grid coordinates of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells_at(0, 0)
    }

    /// Replace the shape with its rotated form, returning the previous shape
    pub fn rotate(&mut self, direction: RotationDirection) -> Shape {
        let rotated = self.shape.rotated(direction);
        std::mem::replace(&mut self.shape, rotated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_position_is_centered() {
        // floor(10 / 2) - ceil(width / 2)
        assert_eq!(Piece::new(PieceKind::I, 10).col, 3);
        assert_eq!(Piece::new(PieceKind::O, 10).col, 4);
        assert_eq!(Piece::new(PieceKind::T, 10).col, 3);
        assert_eq!(Piece::new(PieceKind::T, 7).col, 1);
        assert!(PieceKind::all().iter().all(|&k| Piece::new(k, 10).row == 0));
    }

    #[test]
    fn test_cells_are_absolute() {
        let mut piece = Piece::new(PieceKind::O, 10);
        piece.row = 5;
        let mut cells: Vec<_> = piece.cells().collect();
        cells.sort();
        assert_eq!(cells, vec![(4, 5), (4, 6), (5, 5), (5, 6)]);
    }

    #[test]
    fn test_cells_at_applies_offset() {
        let piece = Piece::new(PieceKind::I, 10);
        let cells: Vec<_> = piece.cells_at(-1, 2).collect();
        assert_eq!(cells, vec![(2, 3), (3, 3), (4, 3), (5, 3)]);
    }

    #[test]
    fn test_rotate_returns_previous_shape() {
        let mut piece = Piece::new(PieceKind::T, 10);
        let before = piece.shape.clone();
        let previous = piece.rotate(RotationDirection::Clockwise);
        assert_eq!(previous, before);
        assert_ne!(piece.shape, before);
        assert_eq!(piece.col, 3);
    }
}
