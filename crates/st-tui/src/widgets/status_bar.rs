use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;

/// Bottom line: uplink state and ping on the left, key hints on the right.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let (uplink, uplink_color) = match (app.stats.connected, app.live) {
        (true, _) => ("ACTIVE", Color::Green),
        (false, true) => ("LINKING", Color::Yellow),
        (false, false) => ("OFFLINE", Color::Red),
    };

    let left = vec![
        Span::raw(" UPLINK: "),
        Span::styled(uplink, Style::default().fg(uplink_color)),
        Span::raw(format!(
            "  PING: {}ms  LOSS: {:.2}%  EXPORT: {}",
            app.stats.ping_ms, app.stats.packet_loss_percent, app.export_filter
        )),
    ];
    let right = "[space] Live  [f] Filter  [?] Help  [q] Quit ";

    // Pad the middle so the hints sit flush right.
    let left_len: usize = left.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize)
        .saturating_sub(left_len + right.len())
        .max(1);

    let mut spans = left;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(right, Style::default().fg(Color::Yellow)));

    let bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(bar, area);
}
