use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, CIRCUIT};
use crate::panels;
use crate::widgets::{help_modal, status_bar};

/// Master render function: header, three race columns, status bar, then
/// any overlay.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(0),    // race columns
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_columns(frame, app, chunks[1]);
    status_bar::render(frame, app, chunks[2]);

    if app.detail_open {
        if let Some(ticket) = app.selected_ticket() {
            panels::detail::render(frame, ticket);
        }
    }
    if app.show_help {
        help_modal::render(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = vec![
        Span::styled(
            " STRAT",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "OS",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  PIT WALL", Style::default().fg(Color::DarkGray)),
    ];
    let right = format!("SESSION {}  CIRCUIT {} ", app.session_time(), CIRCUIT);

    let title_len: usize = title.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize)
        .saturating_sub(title_len + right.len())
        .max(1);

    let mut spans = title;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(right, Style::default().fg(Color::Cyan)));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

fn render_columns(frame: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(area);

    panels::telemetry::render(frame, app, cols[0]);

    let center = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(9)])
        .split(cols[1]);
    panels::track::render(frame, app, center[0]);
    panels::comms::render(frame, app, center[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(cols[2]);
    panels::strategy::render(frame, app, right[0]);
    panels::standings::render(frame, app, right[1]);
}
