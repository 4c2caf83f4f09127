use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use st_core::roster::{track_progress, ViewFilter};
use st_core::types::{Ticket, TicketStatus};

use crate::app::App;

/// Width of the key column left of each lane.
const KEY_COLUMN: usize = 8;

const SECTORS: [(&str, f64); 4] = [
    ("GRID", 0.10),
    ("SECTOR 1", 0.40),
    ("PIT LANE", 0.75),
    ("SECTOR 2", 0.95),
];

/// Center column: filter bar above the lap chart.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_filter_bar(frame, app, chunks[0]);
    render_track(frame, app, chunks[1]);
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for filter in ViewFilter::ALL {
        let label = format!(" {} ", filter.label().to_uppercase());
        let style = if filter == app.view_filter {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("[f]", Style::default().fg(Color::DarkGray)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_track(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Track ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    // Two columns for the highlight symbol, one for the age badge gap.
    let lane_width = (inner.width as usize).saturating_sub(KEY_COLUMN + 2 + 5);

    let header = Paragraph::new(Line::from(Span::styled(
        sector_header(lane_width),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(header, Rect { height: 1, ..inner });

    let visible = app.visible_tickets();
    let list_area = Rect {
        y: inner.y + 1,
        height: inner.height.saturating_sub(1),
        ..inner
    };
    if visible.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "  NO CARS MATCH THIS FILTER",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(empty, list_area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|t| ListItem::new(car_line(t, lane_width)))
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(app.selected_index());
    frame.render_stateful_widget(list, list_area, &mut state);
}

/// Sector names laid out at their lap positions. A label near the end of
/// the lane may run past it; the frame clips it.
fn sector_header(lane_width: usize) -> String {
    let longest = SECTORS.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    let mut row = vec![' '; KEY_COLUMN + 2 + lane_width + longest];
    for (name, at) in SECTORS {
        let start = (KEY_COLUMN + 2 + lane_slot(at, lane_width)).min(row.len());
        for (i, ch) in name.chars().enumerate() {
            if let Some(cell) = row.get_mut(start + i) {
                *cell = ch;
            }
        }
    }
    row.into_iter().collect::<String>().trim_end().to_string()
}

/// Column of a car `progress` of the way round a lane of `width` cells.
pub fn lane_slot(progress: f64, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    ((progress.clamp(0.0, 1.0) * (width - 1) as f64).round()) as usize
}

pub fn car_color(ticket: &Ticket) -> Color {
    if ticket.is_blocked {
        Color::Yellow
    } else if ticket.status == TicketStatus::Done {
        Color::Green
    } else {
        Color::Magenta
    }
}

fn car_line(ticket: &Ticket, lane_width: usize) -> Line<'static> {
    let color = car_color(ticket);
    let slot = lane_slot(track_progress(ticket.status), lane_width);
    let glyph = if ticket.is_blocked { "\u{2691}" } else { "\u{25cf}" }; // ⚑ ●

    let mut spans = vec![
        Span::styled(
            format!("{:<width$}", ticket.key, width = KEY_COLUMN),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled("\u{00b7}".repeat(slot), Style::default().fg(Color::DarkGray)),
        Span::styled(glyph, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(
            "\u{00b7}".repeat(lane_width.saturating_sub(slot + 1)),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    // Age badge: yellow past five days, red past ten.
    if ticket.age_days > 5 {
        let badge = if ticket.age_days > 10 { Color::Red } else { Color::Yellow };
        spans.push(Span::styled(
            format!(" {}d", ticket.age_days),
            Style::default().fg(badge),
        ));
    }
    Line::from(spans)
}
