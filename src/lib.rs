//! STACKFALL - a falling-block puzzle engine
//!
//! The engine (`game`, `grid`, `piece`, ...) knows nothing about terminals or
//! sound. The front end feeds it `Action`s, advances it with `Game::update`,
//! draws from `Game::snapshot`, and listens for `Cue`s through an `EventSink`.

pub mod audio;
pub mod events;
pub mod factory;
pub mod game;
pub mod grid;
pub mod input;
pub mod kick;
pub mod piece;
pub mod score;
pub mod settings;
pub mod snapshot;
pub mod tetromino;
pub mod ui;

pub use events::{Cue, EventSink, NullSink};
pub use game::{Action, Game, GameState};
pub use grid::{Cell, Grid, COLS, ROWS};
pub use piece::Piece;
pub use snapshot::Snapshot;
pub use tetromino::{PieceKind, RotationDirection};
