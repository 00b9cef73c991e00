//! Piece factory
//!
//! Every spawn draws uniformly and independently among the seven kinds. There is
//! no shuffle bag, so droughts of a given kind are possible.

use crate::piece::Piece;
use crate::tetromino::PieceKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Produces randomized pieces for a grid of a given width
#[derive(Debug, Clone)]
pub struct PieceFactory {
    rng: ChaCha8Rng,
    cols: usize,
}

impl PieceFactory {
    /// Create a factory seeded from system entropy
    pub fn new(cols: usize) -> Self {
        Self::with_seed(cols, rand::random())
    }

    /// Create a deterministic factory (for tests and replays)
    pub fn with_seed(cols: usize, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            cols,
        }
    }

    /// Pick one of the seven kinds uniformly
    pub fn random_kind(&mut self) -> PieceKind {
        let kinds = PieceKind::all();
        kinds[self.rng.gen_range(0..kinds.len())]
    }

    /// Instantiate a fresh piece of the given kind at its spawn position
    pub fn create_piece(&self, kind: PieceKind) -> Piece {
        Piece::new(kind, self.cols)
    }

    /// Instantiate a piece of a random kind
    pub fn next_piece(&mut self) -> Piece {
        let kind = self.random_kind();
        self.create_piece(kind)
    }
}
