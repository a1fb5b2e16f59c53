use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{Cell, GameState, Session, Tetromino};

/// How a single grid cell should be drawn this frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellView {
    Empty,
    Ghost(Tetromino),
    Active(Tetromino),
    Taken(Tetromino),
    Highlight,
}

/// Flattens engine state into per-cell draw instructions, row by row.
pub fn board_view(session: &Session) -> Vec<CellView> {
    let game = &session.game;
    let mut view: Vec<CellView> = (0..BOARD_WIDTH * BOARD_HEIGHT)
        .map(|i| match game.board[i] {
            Cell::Taken(_) if game.is_highlighted(i) => CellView::Highlight,
            Cell::Taken(kind) => CellView::Taken(kind),
            Cell::Empty => CellView::Empty,
        })
        .collect();

    if game.game_state == GameState::Idle {
        return view;
    }

    // Ghost first so the falling piece draws over it
    if game.game_state == GameState::Running {
        if let Some(ghost) = game.landing_piece() {
            for i in ghost.cells() {
                if let Some(slot) = usize::try_from(i).ok().and_then(|i| view.get_mut(i)) {
                    if *slot == CellView::Empty {
                        *slot = CellView::Ghost(ghost.kind);
                    }
                }
            }
        }
    }

    if let Some(piece) = &game.current_piece {
        for i in piece.cells() {
            if let Some(slot) = usize::try_from(i).ok().and_then(|i| view.get_mut(i)) {
                *slot = CellView::Active(piece.kind);
            }
        }
    }
    view
}

pub fn ui(f: &mut Frame, session: &Session) {
    let size = f.size();

    let board_height = BOARD_HEIGHT as u16 + 2;
    let board_width = BOARD_WIDTH as u16 * 2 + 2;

    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(board_height),
            Constraint::Min(1),
        ])
        .split(size);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(18),
            Constraint::Length(board_width),
            Constraint::Length(18),
            Constraint::Min(1),
        ])
        .split(vertical_chunks[1]);

    let stats_area = horizontal_chunks[1];
    let board_area = horizontal_chunks[2];
    let help_area = horizontal_chunks[3];

    render_board(f, session, board_area);
    render_stats(f, session, stats_area);
    render_help(f, help_area);

    match session.game.game_state {
        GameState::Idle => render_ready_overlay(f, board_area),
        GameState::Paused => render_paused_overlay(f, board_area),
        GameState::GameOver => render_game_over_overlay(f, session, board_area),
        GameState::Running => {}
    }
}

fn render_board(f: &mut Frame, session: &Session, area: Rect) {
    let view = board_view(session);

    let board_lines: Vec<Line> = view
        .chunks(BOARD_WIDTH)
        .enumerate()
        .map(|(y, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(x, cell)| match *cell {
                    CellView::Empty => {
                        if (x + y) % 2 == 0 {
                            Span::styled("░░", Style::default().fg(Color::DarkGray))
                        } else {
                            Span::raw("  ")
                        }
                    }
                    CellView::Ghost(kind) => Span::styled("▒▒", Style::default().fg(kind.color())),
                    CellView::Active(kind) | CellView::Taken(kind) => {
                        Span::styled("██", Style::default().fg(kind.color()))
                    }
                    CellView::Highlight => Span::styled(
                        "██",
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let board_widget = Paragraph::new(board_lines)
        .block(Block::default().borders(Borders::ALL).title("blockfall"));

    f.render_widget(board_widget, area);
}

fn render_stats(f: &mut Frame, session: &Session, area: Rect) {
    let stats_text = vec![
        Line::from(vec![Span::styled("SCORE", Style::default().fg(Color::Cyan))]),
        Line::from(vec![Span::raw(session.game.score.to_string())]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::styled("BEST", Style::default().fg(Color::Cyan))]),
        Line::from(vec![Span::raw(session.high_score().to_string())]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::styled("DROP", Style::default().fg(Color::Cyan))]),
        Line::from(vec![Span::raw(format!("{}ms", session.drop_interval().as_millis()))]),
    ];

    let stats_widget = Paragraph::new(stats_text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    f.render_widget(stats_widget, area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from("←/→  move"),
        Line::from("↑    rotate"),
        Line::from("↓    drop"),
        Line::from("SPC  step"),
        Line::from(""),
        Line::from("S    start"),
        Line::from("P    pause"),
        Line::from("R    restart"),
        Line::from("Q    quit"),
    ];

    let help_widget = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Keys"));

    f.render_widget(help_widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn render_ready_overlay(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(80, 30, area);
    f.render_widget(Clear, popup_area);

    let ready_text = vec![
        Line::from(""),
        Line::from(vec![Span::styled("BLOCKFALL", Style::default().fg(Color::Cyan))]),
        Line::from(""),
        Line::from("Press S to start"),
    ];

    let ready_widget = Paragraph::new(ready_text)
        .block(Block::default().borders(Borders::ALL).title("Ready"))
        .alignment(Alignment::Center);

    f.render_widget(ready_widget, popup_area);
}

fn render_paused_overlay(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 20, area);
    f.render_widget(Clear, popup_area);

    let paused_text = vec![
        Line::from(""),
        Line::from(vec![Span::styled("PAUSED", Style::default().fg(Color::Yellow))]),
        Line::from("P to resume"),
    ];

    let paused_widget = Paragraph::new(paused_text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    f.render_widget(paused_widget, popup_area);
}

fn render_game_over_overlay(f: &mut Frame, session: &Session, area: Rect) {
    let popup_area = centered_rect(90, 40, area);
    f.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled("Game Over!", Style::default().fg(Color::Red))]),
        Line::from(""),
        Line::from(format!("Score: {}", session.game.score)),
    ];
    if session.is_new_high_score() {
        lines.push(Line::from(vec![Span::styled(
            "New high score!",
            Style::default().fg(Color::Green),
        )]));
    } else {
        lines.push(Line::from(format!("Best: {}", session.high_score())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("R to restart"));
    lines.push(Line::from("Q to quit"));

    let game_over_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Finished"))
        .alignment(Alignment::Center);

    f.render_widget(game_over_widget, popup_area);
}
