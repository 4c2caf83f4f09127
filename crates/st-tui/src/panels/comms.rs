use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use st_core::types::Severity;

use crate::app::App;

/// Team radio: the capped feed log, newest first.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .log
        .iter()
        .map(|entry| {
            let color = severity_color(entry.severity);
            let ts = entry.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S");
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{ts}] "), Style::default().fg(Color::Cyan)),
                Span::styled(entry.message.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::TOP)
            .title(" Team Radio / Audit Logs ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, area);
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Gray,
        Severity::Warn => Color::Yellow,
        Severity::Error => Color::Red,
    }
}
