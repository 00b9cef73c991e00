//! STACKFALL - terminal front end
//!
//! Owns the terminal, the clock and the audio device; everything else lives in
//! the library.

use crossterm::{
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use stackfall::audio::AudioSink;
use stackfall::game::{Action, Game};
use stackfall::input::{InputController, KEY_RELEASE_TIMEOUT};
use stackfall::settings::Settings;
use stackfall::ui;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the stackfall temp directory, creating it if needed
fn stackfall_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("stackfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    let log_dir = stackfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stackfall=debug")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "STACKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    if !Settings::exists() {
        // Write the defaults out so there is a file to edit
        if let Err(e) = settings.save() {
            tracing::warn!("could not write default settings: {}", e);
        }
    }

    // Audio is optional - the game runs silent without a device
    let mut game = match AudioSink::new(settings.sfx_gain()) {
        Some(sink) => Game::new().with_sink(sink),
        None => Game::new(),
    };

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableFocusChange)?;

    // Without release events, fall back to treating silent keys as released
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    tracing::info!("keyboard release events: {}", enhanced);

    let mut input = InputController::from_settings(&settings)
        .with_release_timeout((!enhanced).then_some(KEY_RELEASE_TIMEOUT));

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut game, &mut input, &settings);

    // Restore terminal
    if enhanced {
        execute!(stdout(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableFocusChange)?;

    if let Err(e) = &result {
        tracing::error!("exiting with error: {}", e);
    }

    println!("\nThanks for playing STACKFALL!");
    println!("Final Score: {}", game.score.points);
    println!("Level: {} | Lines: {}", game.score.level, game.score.lines);

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    input: &mut InputController,
    settings: &Settings,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| ui::render_game(frame, &game.snapshot(), settings))?;

        // Drain every pending event before advancing the clock
        let mut timeout = FRAME_DURATION;
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            let actions = match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        input.key_down(key, game.state, Instant::now())
                    }
                    KeyEventKind::Release => {
                        input.key_up(key);
                        Vec::new()
                    }
                },
                Event::FocusLost => {
                    input.focus_lost();
                    Vec::new()
                }
                _ => Vec::new(),
            };
            if apply(game, actions) {
                tracing::info!("quit requested");
                return Ok(());
            }
        }

        let now = Instant::now();
        let repeats = input.poll(now, game.state);
        if apply(game, repeats) {
            return Ok(());
        }
        game.update(now);
    }
}

/// Feed actions to the game in order. Returns true on quit.
fn apply(game: &mut Game, actions: Vec<Action>) -> bool {
    for action in actions {
        if action == Action::Quit {
            return true;
        }
        game.process_action(action);
    }
    false
}
