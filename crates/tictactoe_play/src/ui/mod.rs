//! Screen layout.

mod board;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tictactoe_core::{KeyValueStore, Outcome, Player};

use crate::app::App;

/// Draws the whole screen.
pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(13),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new("Tic Tac Toe")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    let snapshot = app.snapshot();
    board::render_board(f, chunks[1], snapshot.board(), app.cursor());
    render_turn(f, chunks[2], snapshot.turn());

    let message = Paragraph::new(app.message().unwrap_or_default())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(message, chunks[3]);

    let help = Paragraph::new("1-9 / arrows + Enter: place   r: reset   q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[4]);

    if app.outcome().is_over() {
        render_result(f, f.area(), app.outcome(), app.celebration_frames());
    }
}

/// Both marks side by side, the one to move highlighted.
fn render_turn(f: &mut Frame, area: Rect, turn: Player) {
    let mark = |player: Player| {
        let style = if player == turn {
            Style::default()
                .fg(Color::Black)
                .bg(mark_color(player))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!("  {}  ", player), style)
    };
    let line = Line::from(vec![mark(Player::X), Span::raw("   "), mark(Player::O)]);
    let paragraph = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(paragraph, area);
}

fn render_result(f: &mut Frame, area: Rect, outcome: Outcome, frames: u8) {
    let popup = board::center_rect(area, 30, 5);
    let (text, color) = match outcome {
        Outcome::Won(player) => (format!("{} wins!", player), mark_color(player)),
        _ => ("Draw!".to_string(), Color::White),
    };
    // Alternate colors while the celebration runs.
    let style = if frames % 2 == 1 {
        Style::default().fg(Color::Black).bg(color)
    } else {
        Style::default().fg(color)
    };
    let body = vec![
        Line::from(Span::styled(text, style.add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("press r to play again", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Game over ")),
        popup,
    );
}

fn mark_color(player: Player) -> Color {
    match player {
        Player::X => Color::Blue,
        Player::O => Color::Red,
    }
}
