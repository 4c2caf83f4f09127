use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use st_core::types::Ticket;

use crate::widgets::help_modal::centered_rect;

/// Car telemetry overlay for one ticket.
pub fn render(frame: &mut Frame, ticket: &Ticket) {
    let area = centered_rect(50, 50, frame.area());
    frame.render_widget(Clear, area);

    let border = if ticket.is_blocked { Color::Yellow } else { Color::Cyan };
    let (condition, condition_color) = if ticket.is_blocked {
        ("MECHANICAL FAILURE", Color::Yellow)
    } else {
        ("OPTIMAL", Color::Green)
    };

    let lines = vec![
        Line::from(Span::styled(
            ticket.summary.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("STATUS", ticket.status.to_string(), Color::White),
        field("AGE", format!("{} Days", ticket.age_days), Color::White),
        field("STORY POINTS", format!("{} pts", ticket.points), Color::White),
        field("CONDITION", condition.to_string(), condition_color),
        Line::from(""),
        Line::from(Span::styled(
            "[esc] close telemetry",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} / {} ", ticket.key, ticket.assignee))
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(card, area);
}

fn field(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<14}"), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}
