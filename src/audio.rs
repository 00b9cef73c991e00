//! Sound effects for game cues
//!
//! Every cue is a short run of synthesized tones, so no asset files are needed.
//! Playback is handed to a detached `rodio` sink and never blocks the caller.

use crate::events::{Cue, EventSink};
use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::time::Duration;
use tracing::{debug, warn};

/// One tone in a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub freq: f32,
    pub ms: u64,
    pub volume: f32,
}

const fn note(freq: f32, ms: u64, volume: f32) -> Note {
    Note { freq, ms, volume }
}

const MOVE: &[Note] = &[note(200.0, 50, 0.15)];
const ROTATE: &[Note] = &[note(300.0, 80, 0.2)];
const SOFT_DROP: &[Note] = &[note(150.0, 100, 0.3)];
const HARD_DROP: &[Note] = &[note(150.0, 50, 0.3), note(100.0, 100, 0.3)];
const LINE_CLEAR: &[Note] = &[note(523.0, 80, 0.5), note(659.0, 80, 0.5), note(784.0, 150, 0.5)];
const TETRIS_CLEAR: &[Note] = &[
    note(523.0, 80, 0.5),
    note(659.0, 80, 0.5),
    note(784.0, 80, 0.5),
    note(1047.0, 200, 0.5),
];
const LEVEL_UP: &[Note] = &[
    note(392.0, 100, 0.5),
    note(523.0, 100, 0.5),
    note(659.0, 100, 0.5),
    note(784.0, 200, 0.5),
];
const PAUSE: &[Note] = &[note(220.0, 150, 0.3)];
const GAME_OVER: &[Note] = &[
    note(392.0, 150, 0.5),
    note(330.0, 150, 0.5),
    note(262.0, 150, 0.5),
    note(196.0, 400, 0.5),
];

/// Tones played for a cue; empty means silent
pub fn cue_notes(cue: Cue) -> &'static [Note] {
    match cue {
        Cue::Move => MOVE,
        Cue::Rotate => ROTATE,
        Cue::SoftDrop => SOFT_DROP,
        Cue::HardDrop => HARD_DROP,
        // The drop sound already covers the lock
        Cue::PieceLock => &[],
        Cue::LineClear => LINE_CLEAR,
        Cue::TetrisClear => TETRIS_CLEAR,
        Cue::LevelUp => LEVEL_UP,
        Cue::Pause => PAUSE,
        Cue::GameOver => GAME_OVER,
    }
}

/// Plays cues through the default output device
pub struct AudioSink {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    volume: f32,
}

impl AudioSink {
    /// Open the default output device. None if there is no usable device.
    pub fn new(volume: f32) -> Option<Self> {
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                warn!("audio disabled: {}", e);
                return None;
            }
        };
        Some(Self {
            _stream: stream,
            stream_handle,
            volume: volume.clamp(0.0, 1.0),
        })
    }
}

impl EventSink for AudioSink {
    fn emit(&mut self, cue: Cue) {
        let notes = cue_notes(cue);
        if notes.is_empty() || self.volume <= 0.0 {
            return;
        }
        let Ok(sink) = Sink::try_new(&self.stream_handle) else {
            debug!("no sink for {}", cue.name());
            return;
        };
        sink.set_volume(self.volume);
        for n in notes {
            sink.append(
                SineWave::new(n.freq)
                    .take_duration(Duration::from_millis(n.ms))
                    .amplify(n.volume),
            );
        }
        // Let it play and clean up automatically
        sink.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_audible_cue_is_short() {
        let cues = [
            Cue::Move,
            Cue::Rotate,
            Cue::SoftDrop,
            Cue::HardDrop,
            Cue::PieceLock,
            Cue::LineClear,
            Cue::TetrisClear,
            Cue::LevelUp,
            Cue::Pause,
            Cue::GameOver,
        ];
        for cue in cues {
            let total: u64 = cue_notes(cue).iter().map(|n| n.ms).sum();
            assert!(total <= 1000, "{} lasts {}ms", cue.name(), total);
            assert!(cue_notes(cue).iter().all(|n| n.volume > 0.0 && n.volume <= 1.0));
        }
    }

    #[test]
    fn test_tetris_sounds_different_from_single() {
        assert_ne!(cue_notes(Cue::TetrisClear), cue_notes(Cue::LineClear));
        assert!(cue_notes(Cue::PieceLock).is_empty());
    }
}
