//! Wall kick resolution
//!
//! After a rotation collides, a short fixed list of horizontal nudges is tried
//! in order. The first nudge that fits is applied; if none fits the rotation is
//! undone entirely.

use crate::grid::Grid;
use crate::piece::Piece;
use crate::tetromino::RotationDirection;

/// Horizontal nudges tried after a rotation, in order
pub const WALL_KICKS: [i32; 5] = [0, -1, 1, -2, 2];

/// Rotate the piece in place, kicking it sideways if needed.
///
/// Returns the applied column offset, or None if the rotation was reverted.
/// The square is never rotated.
pub fn try_rotate(piece: &mut Piece, direction: RotationDirection, grid: &Grid) -> Option<i32> {
    if !piece.kind.rotates() {
        return None;
    }

    let original_shape = piece.rotate(direction);

    for kick in WALL_KICKS {
        if grid.is_valid_position(piece, kick, 0) {
            piece.col += kick;
            return Some(kick);
        }
    }

    piece.shape = original_shape;
    None
}
