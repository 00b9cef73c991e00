//! Grid representation and collision detection

use crate::piece::Piece;
use crate::tetromino::PieceKind;

/// Standard grid dimensions
pub const COLS: usize = 10;
pub const ROWS: usize = 20;
/// Rows at the top of the grid that end the game when occupied after a lock
pub const GAME_OVER_ROWS: usize = 2;

/// A cell on the grid - either empty or filled with a piece's color tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// The playing field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Stored as [row][col], row 0 is the top, rows grow downward
    cells: Vec<Vec<Cell>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(ROWS, COLS)
    }
}

impl Grid {
    /// Create an empty grid. Dimensions are fixed for the grid's lifetime.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![Cell::Empty; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at (col, row). Returns None if out of bounds.
    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        if col < 0 || row < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Set the cell at (col, row). Returns false if out of bounds.
    pub fn set(&mut self, col: i32, row: i32, cell: Cell) -> bool {
        if col < 0 || row < 0 {
            return false;
        }
        match self.cells.get_mut(row as usize).and_then(|r| r.get_mut(col as usize)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Row-major view of all cells, top row first
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|row| row.as_slice())
    }

    /// Check whether the piece fits after shifting it by the given offset.
    ///
    /// Cells above the grid (row < 0) never collide, so pieces may sit partly
    /// off the top.
    pub fn is_valid_position(&self, piece: &Piece, d_col: i32, d_row: i32) -> bool {
        piece.cells_at(d_col, d_row).all(|(col, row)| {
            if col < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
                return false;
            }
            row < 0 || self.cells[row as usize][col as usize].is_empty()
        })
    }

    /// Write the piece's color tag into the grid.
    ///
    /// Cells that would land above row 0 are dropped.
    pub fn lock_piece(&mut self, piece: &Piece) {
        for (col, row) in piece.cells() {
            if row >= 0 {
                self.set(col, row, Cell::Filled(piece.kind));
            }
        }
    }

    /// Remove complete rows and return how many were removed
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut row = self.rows;

        // Scan bottom to top. After removing a row the rows above shift down
        // into the same index, so it is examined again before moving up.
        while row > 0 {
            let index = row - 1;
            if self.is_line_full(index) {
                self.cells.remove(index);
                self.cells.insert(0, vec![Cell::Empty; self.cols]);
                cleared += 1;
            } else {
                row -= 1;
            }
        }

        cleared
    }

    /// Check if a row is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Whether anything has stacked into the top rows
    pub fn is_game_over(&self) -> bool {
        self.cells
            .iter()
            .take(GAME_OVER_ROWS)
            .any(|row| row.iter().any(|cell| cell.is_filled()))
    }

    /// The row the piece would come to rest on if dropped straight down
    pub fn drop_position(&self, piece: &Piece) -> i32 {
        let mut offset = 0;
        while self.is_valid_position(piece, 0, offset + 1) {
            offset += 1;
        }
        piece.row + offset
    }

    /// Check if the grid is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Empty every cell
    pub fn reset(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::Empty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::RotationDirection;

    fn fill_row(grid: &mut Grid, row: i32, kind: PieceKind) {
        for col in 0..grid.cols() as i32 {
            grid.set(col, row, Cell::Filled(kind));
        }
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::default();
        assert!(grid.is_empty());
        assert_eq!((grid.rows(), grid.cols()), (ROWS, COLS));
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = Grid::default();
        assert!(grid.set(5, 5, Cell::Filled(PieceKind::Z)));
        assert_eq!(grid.get(5, 5), Some(Cell::Filled(PieceKind::Z)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::default();
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(0, -1), None);
        assert_eq!(grid.get(COLS as i32, 0), None);
        assert_eq!(grid.get(0, ROWS as i32), None);
        assert!(!grid.set(0, ROWS as i32, Cell::Filled(PieceKind::I)));
    }

    #[test]
    fn test_valid_position_walls_and_floor() {
        let grid = Grid::default();
        let mut piece = Piece::new(PieceKind::O, COLS);
        assert!(grid.is_valid_position(&piece, 0, 0));

        piece.col = 0;
        assert!(!grid.is_valid_position(&piece, -1, 0));
        piece.col = COLS as i32 - 2;
        assert!(!grid.is_valid_position(&piece, 1, 0));

        piece.row = ROWS as i32 - 2;
        assert!(grid.is_valid_position(&piece, 0, 0));
        assert!(!grid.is_valid_position(&piece, 0, 1));
    }

    #[test]
    fn test_cells_above_grid_never_collide() {
        let mut grid = Grid::default();
        fill_row(&mut grid, 0, PieceKind::J);
        let mut piece = Piece::new(PieceKind::I, COLS);
        // The bar's filled row is the shape's second row
        piece.row = -2;
        assert!(grid.is_valid_position(&piece, 0, 0));
        assert!(!grid.is_valid_position(&piece, 0, 1));
    }

    #[test]
    fn test_occupied_cell_collides() {
        let mut grid = Grid::default();
        grid.set(5, 10, Cell::Filled(PieceKind::S));
        let mut piece = Piece::new(PieceKind::O, COLS);
        piece.row = 9;
        assert!(!grid.is_valid_position(&piece, 0, 0));
        assert!(grid.is_valid_position(&piece, -2, 0));
    }

    #[test]
    fn test_lock_drops_cells_above_grid() {
        let mut grid = Grid::default();
        let mut piece = Piece::new(PieceKind::J, COLS);
        piece.rotate(RotationDirection::Clockwise);
        // Rotated J occupies shape rows 0..3; shift so only the last row lands
        piece.row = -2;
        grid.lock_piece(&piece);

        let filled: usize = grid
            .rows_iter()
            .map(|row| row.iter().filter(|c| c.is_filled()).count())
            .sum();
        assert_eq!(filled, 1);
        assert_eq!(grid.get(4, 0), Some(Cell::Filled(PieceKind::J)));
        assert_eq!(grid.rows(), ROWS);
    }

    #[test]
    fn test_clear_single_line() {
        let mut grid = Grid::default();
        fill_row(&mut grid, ROWS as i32 - 1, PieceKind::I);
        grid.set(0, ROWS as i32 - 2, Cell::Filled(PieceKind::T));

        assert_eq!(grid.clear_lines(), 1);
        assert_eq!(grid.get(0, ROWS as i32 - 1), Some(Cell::Filled(PieceKind::T)));
        assert!(grid.get(0, ROWS as i32 - 2).is_some_and(|c| c.is_empty()));
    }

    #[test]
    fn test_clear_adjacent_rows_in_one_pass() {
        let mut grid = Grid::new(5, 4);
        grid.set(0, 0, Cell::Filled(PieceKind::S));
        grid.set(1, 1, Cell::Filled(PieceKind::Z));
        fill_row(&mut grid, 2, PieceKind::I);
        fill_row(&mut grid, 3, PieceKind::I);
        grid.set(3, 4, Cell::Filled(PieceKind::L));

        assert_eq!(grid.clear_lines(), 2);
        assert_eq!(grid.rows(), 5);
        // Two fresh empty rows on top, survivors keep their order
        assert!(grid.rows_iter().take(2).all(|row| row.iter().all(|c| c.is_empty())));
        assert_eq!(grid.get(0, 2), Some(Cell::Filled(PieceKind::S)));
        assert_eq!(grid.get(1, 3), Some(Cell::Filled(PieceKind::Z)));
        assert_eq!(grid.get(3, 4), Some(Cell::Filled(PieceKind::L)));
    }

    #[test]
    fn test_clear_separated_rows() {
        let mut grid = Grid::new(5, 3);
        fill_row(&mut grid, 1, PieceKind::O);
        grid.set(2, 2, Cell::Filled(PieceKind::T));
        fill_row(&mut grid, 3, PieceKind::O);
        fill_row(&mut grid, 4, PieceKind::O);

        assert_eq!(grid.clear_lines(), 3);
        assert_eq!(grid.get(2, 4), Some(Cell::Filled(PieceKind::T)));
        let filled: usize = grid
            .rows_iter()
            .map(|row| row.iter().filter(|c| c.is_filled()).count())
            .sum();
        assert_eq!(filled, 1);
    }

    #[test]
    fn test_game_over_band() {
        let mut grid = Grid::default();
        grid.set(3, 2, Cell::Filled(PieceKind::I));
        assert!(!grid.is_game_over());
        grid.set(3, 1, Cell::Filled(PieceKind::I));
        assert!(grid.is_game_over());
        grid.reset();
        grid.set(9, 0, Cell::Filled(PieceKind::I));
        assert!(grid.is_game_over());
    }

    #[test]
    fn test_drop_position() {
        let mut grid = Grid::default();
        let piece = Piece::new(PieceKind::O, COLS);
        assert_eq!(grid.drop_position(&piece), ROWS as i32 - 2);

        grid.set(4, 10, Cell::Filled(PieceKind::T));
        assert_eq!(grid.drop_position(&piece), 8);
        // Probing does not move the piece
        assert_eq!(piece.row, 0);
    }

    #[test]
    fn test_reset_empties_grid() {
        let mut grid = Grid::default();
        fill_row(&mut grid, 7, PieceKind::Z);
        grid.reset();
        assert!(grid.is_empty());
        assert_eq!(grid.rows(), ROWS);
    }
}
