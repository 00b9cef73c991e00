//! Piece catalog and shape matrices
//!
//! Seven fixed piece kinds, each with one canonical shape matrix. Rotation is a
//! pure matrix transform; the square never rotates.

use std::fmt;

/// The 7 piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I, // four-in-a-row bar
    O, // square
    T, // three-plus-one
    S, // skew
    Z, // skew (mirrored)
    J, // hook
    L, // hook (mirrored)
}

impl PieceKind {
    /// All kinds in catalog order
    pub fn all() -> [PieceKind; 7] {
        [
            PieceKind::I,
            PieceKind::O,
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
            PieceKind::J,
            PieceKind::L,
        ]
    }

    /// Fresh copy of the canonical shape matrix
    pub fn shape(&self) -> Shape {
        let rows: &[&[u8]] = match self {
            PieceKind::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            PieceKind::O => &[&[1, 1], &[1, 1]],
            PieceKind::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            PieceKind::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            PieceKind::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
            PieceKind::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            PieceKind::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
        };
        Shape::from_rows(rows)
    }

    /// Whether rotation is attempted at all for this kind
    pub fn rotates(&self) -> bool {
        !matches!(self, PieceKind::O)
    }

    /// Single-letter name, also used as the color tag in logs
    pub fn name(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// A rectangular matrix of filled/empty cells, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Shape {
    /// Build a shape from rows of 0/1 values. All rows must share one length.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        let cells = rows
            .iter()
            .flat_map(|row| row.iter().map(|&v| v != 0))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell at (col, row) within the matrix is filled
    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height && self.cells[row * self.width + col]
    }

    /// Iterate over the (col, row) offsets of every filled cell
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(|(i, _)| ((i % self.width) as i32, (i / self.width) as i32))
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Rotate 90 degrees in the given direction
    pub fn rotated(&self, direction: RotationDirection) -> Shape {
        match direction {
            RotationDirection::Clockwise => self.rotate_clockwise(),
            RotationDirection::CounterClockwise => self.rotate_counter_clockwise(),
        }
    }

    /// Rotate 90 degrees clockwise. Output is height x width.
    pub fn rotate_clockwise(&self) -> Shape {
        // new[r][c] = old[h - 1 - c][r]
        let (w, h) = (self.height, self.width);
        let mut cells = Vec::with_capacity(self.cells.len());
        for r in 0..h {
            for c in 0..w {
                cells.push(self.is_filled(r, self.height - 1 - c));
            }
        }
        Shape {
            width: w,
            height: h,
            cells,
        }
    }

    /// Rotate 90 degrees counter-clockwise. Output is height x width.
    pub fn rotate_counter_clockwise(&self) -> Shape {
        // new[r][c] = old[c][w - 1 - r]
        let (w, h) = (self.height, self.width);
        let mut cells = Vec::with_capacity(self.cells.len());
        for r in 0..h {
            for c in 0..w {
                cells.push(self.is_filled(self.width - 1 - r, c));
            }
        }
        Shape {
            width: w,
            height: h,
            cells,
        }
    }
}
