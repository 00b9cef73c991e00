//! Terminal UI rendering with ratatui
//!
//! Draws from a `Snapshot` only; nothing here can change the game.

use crate::game::GameState;
use crate::grid::Cell;
use crate::piece::Piece;
use crate::settings::Settings;
use crate::snapshot::Snapshot;
use crate::tetromino::PieceKind;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::collections::HashSet;

const EMPTY: &str = "  ";

/// Width of the side panel (next piece + stats)
const PANEL_WIDTH: u16 = 16;

/// Terminal color for a piece's color tag
pub fn piece_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => Color::Cyan,
        PieceKind::O => Color::Yellow,
        PieceKind::T => Color::Magenta,
        PieceKind::S => Color::Green,
        PieceKind::Z => Color::Red,
        PieceKind::J => Color::Blue,
        PieceKind::L => Color::Rgb(255, 165, 0), // Orange
    }
}

/// Render one frame of the game
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot<'_>, settings: &Settings) {
    let area = frame.area();
    let board_width = snapshot.grid.cols() as u16 * 2 + 2;
    let board_height = snapshot.grid.rows() as u16 + 2;

    let game_area = center_rect(area, board_width + PANEL_WIDTH, board_height);

    // Main layout: board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_width),
            Constraint::Length(PANEL_WIDTH),
        ])
        .split(game_area);

    render_board(frame, main_layout[0], snapshot, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Next piece
            Constraint::Min(8),    // Stats
        ])
        .split(main_layout[1]);

    render_next(frame, right_layout[0], snapshot.next, settings);
    render_stats(frame, right_layout[1], snapshot);

    match snapshot.state {
        GameState::Paused => render_overlay(frame, area, "PAUSED", "Press P to resume"),
        GameState::GameOver => render_overlay(frame, area, "GAME OVER", "Enter or R to restart"),
        GameState::Playing => {}
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the grid with the active piece and its landing preview
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot<'_>, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();

    let block = Block::default()
        .title(" STACKFALL ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active: HashSet<(i32, i32)> = snapshot
        .active
        .map(|piece| piece.cells().collect())
        .unwrap_or_default();

    let ghost: HashSet<(i32, i32)> = match (snapshot.active, snapshot.ghost_row) {
        (Some(piece), Some(row)) if settings.visual.show_ghost && snapshot.ghost_visible() => {
            piece.cells_at(0, row - piece.row).collect()
        }
        _ => HashSet::new(),
    };
    let active_color = snapshot.active.map(|piece| piece_color(piece.kind));

    let mut lines: Vec<Line> = Vec::new();
    for (row, cells) in snapshot.grid.rows_iter().enumerate() {
        let mut spans = Vec::new();
        for (col, cell) in cells.iter().enumerate() {
            let pos = (col as i32, row as i32);
            let span = match (active_color, cell) {
                (Some(color), _) if active.contains(&pos) => {
                    Span::styled(block_char, Style::default().fg(color))
                }
                (Some(color), Cell::Empty) if ghost.contains(&pos) => {
                    Span::styled(ghost_char, Style::default().fg(color).dim())
                }
                (_, Cell::Filled(kind)) => {
                    Span::styled(block_char, Style::default().fg(piece_color(*kind)))
                }
                _ => Span::raw(EMPTY),
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the look-ahead piece
fn render_next(frame: &mut Frame, area: Rect, next: Option<&Piece>, settings: &Settings) {
    let (block_char, _) = settings.visual.block_chars();
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(piece) = next else {
        return;
    };
    let color = piece_color(piece.kind);
    let shape = &piece.shape;

    // Skip blank rows so every piece sits at the top of the box
    let lines: Vec<Line> = (0..shape.height())
        .filter(|&r| (0..shape.width()).any(|c| shape.is_filled(c, r)))
        .map(|r| {
            let spans: Vec<Span> = (0..shape.width())
                .map(|c| {
                    if shape.is_filled(c, r) {
                        Span::styled(block_char, Style::default().fg(color))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_stats(frame: &mut Frame, area: Rect, snapshot: &Snapshot<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(Color::Gray)));

    let lines = vec![
        label("SCORE"),
        Line::from(Span::styled(
            snapshot.score.to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        label("LEVEL"),
        Line::from(Span::styled(
            snapshot.level.to_string(),
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        label("LINES"),
        Line::from(Span::styled(
            snapshot.lines.to_string(),
            Style::default().fg(Color::Green),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 26u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
