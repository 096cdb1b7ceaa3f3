//! Stateless UI rendering for the N×N board.

use super::app::App;
use growing_tictactoe::{Board, GameStatus, Mark, SessionView, Square};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const CELL_WIDTH: usize = 3;

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let view = app.view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(3),    // Board
            Constraint::Length(3), // Status
            Constraint::Length(1), // Chances
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new(format!(
        "Growing Tic-Tac-Toe - {0}x{0}, {1} in a row",
        view.board.size(),
        view.board.win_length()
    ))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], &view.board, app.cursor(), view.status);

    let status = match (app.notice(), &view.crash_reason) {
        (_, Some(reason)) if view.status == GameStatus::Crashed => {
            format!("{} ({})", view.status_line(), reason)
        }
        (Some(notice), _) => format!("{} - {}", view.status_line(), notice),
        _ => view.status_line(),
    };
    let status = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let chances = view
        .chances
        .map_or_else(String::new, |c| format!("Your chances: {}", c));
    frame.render_widget(
        Paragraph::new(chances).alignment(Alignment::Center),
        chunks[3],
    );

    frame.render_widget(
        Paragraph::new(help_text(view))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        chunks[4],
    );
}

fn help_text(view: &SessionView) -> &'static str {
    match view.status {
        GameStatus::Draw => "c: continue on a larger board   r: restart   q: quit",
        GameStatus::Won | GameStatus::Lost | GameStatus::Crashed => "r: restart   q: quit",
        _ => "arrows: move   enter/space: play   r: restart   q: quit",
    }
}

fn draw_board(
    frame: &mut Frame,
    area: Rect,
    board: &Board,
    cursor: (usize, usize),
    status: GameStatus,
) {
    let lines = board_lines(board, cursor, status == GameStatus::AwaitingLocalMove);
    let width = board.size() * (CELL_WIDTH + 1);
    let height = lines.len();
    let board_area = center_rect(area, width as u16, height as u16);

    frame.render_widget(Paragraph::new(lines), board_area);
}

/// Grid lines with marks, won cells and the cursor highlighted.
fn board_lines(board: &Board, cursor: (usize, usize), show_cursor: bool) -> Vec<Line<'static>> {
    let size = board.size();
    let won = board.won_line().unwrap_or_default();
    let separator = vec!["─".repeat(CELL_WIDTH); size].join("┼");
    let mut lines = Vec::with_capacity(size * 2);

    for y in 0..size {
        let mut spans = Vec::with_capacity(size * 2);
        for x in 0..size {
            let index = x + y * size;
            let square = board.get(index).unwrap_or_default();
            let (symbol, mut style) = match square {
                Square::Empty => ("   ", Style::default().fg(Color::DarkGray)),
                Square::Occupied(Mark::X) => {
                    (" X ", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
                }
                Square::Occupied(Mark::O) => {
                    (" O ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                }
            };
            if won.contains(&index) {
                style = style.fg(Color::LightRed).add_modifier(Modifier::REVERSED);
            }
            if show_cursor && (x, y) == cursor {
                style = style.bg(Color::White).fg(Color::Black);
            }

            spans.push(Span::styled(symbol, style));
            if x + 1 < size {
                spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            }
        }
        lines.push(Line::from(spans));
        if y + 1 < size {
            lines.push(Line::styled(
                separator.clone(),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    lines
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
