//! Input handling with delayed key repeat
//!
//! Raw key events go in, discrete `Action`s come out. The controller keeps its
//! own set of held keys so operating-system auto-repeat is ignored, and runs one
//! repeat timer per repeatable key: a fixed delay, then a fixed interval while
//! the key stays held. It never touches the game; the caller forwards actions.

use crate::game::{Action, GameState};
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tracing::debug;

/// Delay before a held key starts repeating
pub const KEY_REPEAT_DELAY: Duration = Duration::from_millis(170);
/// Interval between repeats once repeating
pub const KEY_REPEAT_INTERVAL: Duration = Duration::from_millis(50);
/// Release timeout for terminals that never report key releases
pub const KEY_RELEASE_TIMEOUT: Duration = Duration::from_millis(100);

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate_cw: Vec<KeyCode>,
    pub rotate_ccw: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    /// Extra keys that restart once the game is over
    pub confirm: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into a KeyCode; unknown names map to None
    pub fn parse_key(s: &str) -> Option<KeyCode> {
        let key = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            s if s.chars().count() == 1 => KeyCode::Char(s.chars().next()?),
            _ => return None,
        };
        Some(key)
    }

    /// Parse a list of key strings, skipping the ones that do not parse
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let key = Self::parse_key(s);
                if key.is_none() {
                    debug!("ignoring unknown key binding {:?}", s);
                }
                key
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            hard_drop: Self::parse_keys(&settings.keys.hard_drop),
            rotate_cw: Self::parse_keys(&settings.keys.rotate_cw),
            rotate_ccw: Self::parse_keys(&settings.keys.rotate_ccw),
            pause: Self::parse_keys(&settings.keys.pause),
            restart: Self::parse_keys(&settings.keys.restart),
            confirm: Self::parse_keys(&settings.keys.confirm),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }

    /// In-play action for a key, and whether holding it repeats
    fn play_action(&self, code: KeyCode) -> Option<(Action, bool)> {
        if self.move_left.contains(&code) {
            Some((Action::MoveLeft, true))
        } else if self.move_right.contains(&code) {
            Some((Action::MoveRight, true))
        } else if self.soft_drop.contains(&code) {
            Some((Action::SoftDrop, true))
        } else if self.hard_drop.contains(&code) {
            Some((Action::HardDrop, false))
        } else if self.rotate_cw.contains(&code) {
            Some((Action::RotateCW, false))
        } else if self.rotate_ccw.contains(&code) {
            Some((Action::RotateCCW, false))
        } else {
            None
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Repeat schedule for one held key.
///
/// The first repeat lands one interval after the delay has elapsed, then one
/// every interval. Dropping the timer cancels it.
#[derive(Debug, Clone)]
struct RepeatTimer {
    action: Action,
    next_fire: Instant,
    interval: Duration,
}

impl RepeatTimer {
    fn start(action: Action, pressed_at: Instant, delay: Duration, interval: Duration) -> Self {
        Self {
            action,
            next_fire: pressed_at + delay + interval,
            interval,
        }
    }

    /// Consume the next tick if it is due at `now`
    fn fire_due(&mut self, now: Instant) -> Option<Instant> {
        if self.next_fire > now {
            return None;
        }
        let fired = self.next_fire;
        self.next_fire += self.interval;
        Some(fired)
    }
}

/// Translates key events into game actions
pub struct InputController {
    bindings: KeyBindings,
    /// Keys currently held down
    held: HashSet<KeyCode>,
    /// Last time each held key was reported (for the release timeout)
    last_seen: HashMap<KeyCode, Instant>,
    /// At most one timer per key
    repeats: HashMap<KeyCode, RepeatTimer>,
    delay: Duration,
    interval: Duration,
    release_timeout: Option<Duration>,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

impl InputController {
    pub fn new() -> Self {
        Self::with_bindings(KeyBindings::default(), KEY_REPEAT_DELAY, KEY_REPEAT_INTERVAL)
    }

    pub fn with_bindings(bindings: KeyBindings, delay: Duration, interval: Duration) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            last_seen: HashMap::new(),
            repeats: HashMap::new(),
            delay,
            // A zero interval would never finish catching up
            interval: interval.max(Duration::from_millis(1)),
            release_timeout: None,
        }
    }

    /// Create input controller from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_bindings(
            KeyBindings::from_settings(settings),
            Duration::from_millis(settings.gameplay.repeat_delay_ms),
            Duration::from_millis(settings.gameplay.repeat_interval_ms),
        )
    }

    /// Treat keys as released when not re-reported within `timeout`
    pub fn with_release_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.release_timeout = timeout;
        self
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&normalize_key(code))
    }

    /// Number of live repeat timers
    pub fn active_repeats(&self) -> usize {
        self.repeats.len()
    }

    /// Handle a key press event - returns immediate actions
    pub fn key_down(&mut self, key: KeyEvent, phase: GameState, now: Instant) -> Vec<Action> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Action::Quit];
        }

        let code = normalize_key(key.code);

        // Still held: this is the terminal's own auto-repeat
        if !self.held.insert(code) {
            self.last_seen.insert(code, now);
            return Vec::new();
        }
        self.last_seen.insert(code, now);

        let bindings = &self.bindings;
        if bindings.quit.contains(&code) {
            return vec![Action::Quit];
        }

        let restarts = match phase {
            GameState::GameOver => bindings.restart.contains(&code) || bindings.confirm.contains(&code),
            GameState::Playing | GameState::Paused => bindings.restart.contains(&code),
        };
        if restarts {
            self.clear();
            // Keep the trigger held so its auto-repeat does not restart again
            self.held.insert(code);
            self.last_seen.insert(code, now);
            return vec![Action::Restart];
        }

        match phase {
            GameState::GameOver => Vec::new(),
            GameState::Paused if bindings.pause.contains(&code) => vec![Action::Pause],
            GameState::Paused => Vec::new(),
            GameState::Playing if bindings.pause.contains(&code) => vec![Action::Pause],
            GameState::Playing => match bindings.play_action(code) {
                Some((action, repeats)) => {
                    if repeats {
                        let timer = RepeatTimer::start(action, now, self.delay, self.interval);
                        self.repeats.insert(code, timer);
                    }
                    vec![action]
                }
                None => Vec::new(),
            },
        }
    }

    /// Handle a key release event (may never arrive on some terminals)
    pub fn key_up(&mut self, key: KeyEvent) {
        self.release(normalize_key(key.code));
    }

    fn release(&mut self, code: KeyCode) {
        self.held.remove(&code);
        self.last_seen.remove(&code);
        self.repeats.remove(&code);
    }

    /// The window lost focus: every key counts as released
    pub fn focus_lost(&mut self) {
        debug!("focus lost, dropping {} held keys", self.held.len());
        self.clear();
    }

    /// Drop all held keys and cancel every repeat timer
    pub fn clear(&mut self) {
        self.held.clear();
        self.last_seen.clear();
        self.repeats.clear();
    }

    /// Collect repeat actions that came due by `now` (call every frame).
    ///
    /// Actions are ordered by when they were due. Nothing is emitted outside
    /// `Playing`, but timers keep their schedule.
    pub fn poll(&mut self, now: Instant, phase: GameState) -> Vec<Action> {
        if let Some(timeout) = self.release_timeout {
            let stale: Vec<KeyCode> = self
                .last_seen
                .iter()
                .filter(|(_, seen)| now.saturating_duration_since(**seen) > timeout)
                .map(|(code, _)| *code)
                .collect();
            for code in stale {
                self.release(code);
            }
        }

        let mut due: Vec<(Instant, Action)> = Vec::new();
        for timer in self.repeats.values_mut() {
            while let Some(at) = timer.fire_due(now) {
                due.push((at, timer.action));
            }
        }

        if phase != GameState::Playing {
            return Vec::new();
        }
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, action)| action).collect()
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
