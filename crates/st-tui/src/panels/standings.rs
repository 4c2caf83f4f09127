use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use st_core::roster::driver_standings;

use crate::app::App;

/// Driver standings: delivered points per assignee.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Row> = driver_standings(&app.tickets)
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            Row::new(vec![
                Cell::from(format!("P{}", i + 1)).style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::ITALIC),
                ),
                Cell::from(s.driver),
                Cell::from(format!("{}pts", s.points)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(6),
        ],
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Driver Standings ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(table, area);
}
