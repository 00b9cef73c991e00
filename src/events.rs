//! Named cue events emitted by the game for an audio (or any other) listener

use std::cell::RefCell;
use std::rc::Rc;

/// Moments in play a listener may react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Move,
    Rotate,
    SoftDrop,
    HardDrop,
    PieceLock,
    LineClear,
    TetrisClear,
    LevelUp,
    Pause,
    GameOver,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Move => "move",
            Cue::Rotate => "rotate",
            Cue::SoftDrop => "soft-drop",
            Cue::HardDrop => "hard-drop",
            Cue::PieceLock => "piece-lock",
            Cue::LineClear => "line-clear",
            Cue::TetrisClear => "tetris-clear",
            Cue::LevelUp => "level-up",
            Cue::Pause => "pause",
            Cue::GameOver => "game-over",
        }
    }
}

/// Receives cues from the game. Implementations must return promptly.
pub trait EventSink {
    fn emit(&mut self, cue: Cue);
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _cue: Cue) {}
}

/// Records cues in order; clones share one log
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    cues: Rc<RefCell<Vec<Cue>>>,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every cue recorded so far
    pub fn drain(&self) -> Vec<Cue> {
        std::mem::take(&mut *self.cues.borrow_mut())
    }

    pub fn contains(&self, cue: Cue) -> bool {
        self.cues.borrow().contains(&cue)
    }
}

impl EventSink for CueLog {
    fn emit(&mut self, cue: Cue) {
        self.cues.borrow_mut().push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_log_shares_between_clones() {
        let log = CueLog::new();
        let mut sink: Box<dyn EventSink> = Box::new(log.clone());
        sink.emit(Cue::Move);
        sink.emit(Cue::PieceLock);
        assert!(log.contains(Cue::Move));
        assert_eq!(log.drain(), vec![Cue::Move, Cue::PieceLock]);
        assert!(log.drain().is_empty());
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(Cue::TetrisClear.name(), "tetris-clear");
        assert_eq!(Cue::GameOver.name(), "game-over");
    }
}
