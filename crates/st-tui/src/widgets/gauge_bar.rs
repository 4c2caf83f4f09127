use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Horizontal meter: ` FUEL [████████░░░░░░] 66% `.
///
/// The filled part uses `color`, the rest is dark gray. Nothing is drawn
/// when the area is too narrow for at least one cell of bar.
pub fn render_gauge(frame: &mut Frame, area: Rect, label: &str, value: u8, color: Color) {
    if area.height == 0 {
        return;
    }
    let value = value.min(100);
    let pct_text = format!(" {value:>3}%");
    let label_display = format!(" {label}");
    let overhead = label_display.chars().count() + 2 + 1 + pct_text.len();
    let bar_width = (area.width as usize).saturating_sub(overhead);
    if bar_width == 0 {
        return;
    }

    let (filled, empty) = split_bar(bar_width, value);
    let line = Line::from(vec![
        Span::styled(label_display, Style::default().fg(Color::White)),
        Span::raw(" ["),
        Span::styled("\u{2588}".repeat(filled), Style::default().fg(color)),
        Span::styled("\u{2591}".repeat(empty), Style::default().fg(Color::DarkGray)),
        Span::raw("]"),
        Span::styled(pct_text, Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Segmented rev counter: `segments` blocks, the first `active` lit, the
/// top quarter in red.
pub fn render_segments(frame: &mut Frame, area: Rect, segments: usize, active: usize) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let redline = segments - segments / 4;
    let spans: Vec<Span> = (0..segments)
        .map(|i| {
            let style = if i >= active {
                Style::default().fg(Color::DarkGray)
            } else if i >= redline {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Cyan)
            };
            let glyph = if i < active { "\u{2588}" } else { "\u{2591}" };
            Span::styled(glyph, style)
        })
        .collect();
    let mut line = vec![Span::raw(" ")];
    line.extend(spans);
    frame.render_widget(Paragraph::new(Line::from(line)), area);
}

/// Filled and empty cell counts for a bar of `width` at `value` percent.
fn split_bar(width: usize, value: u8) -> (usize, usize) {
    let filled = width * usize::from(value.min(100)) / 100;
    (filled, width - filled)
}
