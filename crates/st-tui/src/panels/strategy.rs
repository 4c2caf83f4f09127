use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use st_core::types::{AiStrategy, PriorityLevel};

use crate::app::{App, StrategyPanel};

/// Race strategy card: spinner text while loading, the briefing once it
/// arrives, and an offline banner with a retry hint after a failure.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let critical = app
        .strategy
        .strategy()
        .is_some_and(|s| s.priority_level == PriorityLevel::Critical);
    let accent = if critical { Color::Magenta } else { Color::Cyan };

    let lines = match &app.strategy {
        StrategyPanel::Loading => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  AI PROCESSING TELEMETRY...",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
            )),
        ],
        StrategyPanel::Ready(strategy) => briefing(strategy, accent),
        StrategyPanel::Offline { strategy, reason } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    "PIT WALL OFFLINE",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    reason.clone(),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "[r] retry",
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(""),
            ];
            lines.extend(briefing(strategy, accent));
            lines
        }
    };

    let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Race Strategy ")
            .border_style(Style::default().fg(accent)),
    );
    frame.render_widget(card, area);
}

fn briefing(strategy: &AiStrategy, accent: Color) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            strategy.analysis.clone(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "STRATEGIC PIT INSTRUCTIONS:",
            Style::default().fg(Color::Cyan),
        )),
    ];
    lines.extend(strategy.recommendations.iter().map(|rec| {
        Line::from(vec![
            Span::styled("\u{25b6} ", Style::default().fg(Color::Cyan)),
            Span::styled(rec.clone(), Style::default().fg(Color::Gray)),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("MISSION STATUS: {}", strategy.priority_level),
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    )));
    lines
}
