use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use st_core::roster::driver_standings;
use st_core::telemetry::tyre_advisory;

use crate::app::App;
use crate::widgets::gauge_bar;

const REV_SEGMENTS: usize = 20;

/// Left column: fuel, tyres, engine, DRS.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // fuel
            Constraint::Length(5), // tyres
            Constraint::Length(4), // engine
            Constraint::Length(3), // DRS / flags
            Constraint::Min(0),
        ])
        .split(area);

    render_fuel(frame, app, chunks[0]);
    render_tyres(frame, app, chunks[1]);
    render_engine(frame, app, chunks[2]);
    render_drs(frame, app, chunks[3]);
}

fn card(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(Style::default().fg(color))
}

fn render_fuel(frame: &mut Frame, app: &App, area: Rect) {
    let block = card("Fuel Load", Color::Cyan);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let t = &app.telemetry;
    gauge_bar::render_gauge(
        frame,
        Rect { height: 1, ..inner },
        "FUEL",
        t.fuel_level,
        Color::Cyan,
    );
    if inner.height > 1 {
        let caption = Paragraph::new(Line::from(Span::styled(
            format!(" {}/{} laps complete", t.done_count, t.total),
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(caption, Rect { y: inner.y + 1, height: 1, ..inner });
    }
}

fn render_tyres(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.telemetry;
    let color = if t.tyres_hot() { Color::Magenta } else { Color::Cyan };
    let block = card("Tyre Degradation", color);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    gauge_bar::render_gauge(frame, Rect { height: 1, ..inner }, "WEAR", t.tyre_wear, color);
    if inner.height > 1 {
        let advisory = Paragraph::new(Span::styled(
            tyre_advisory(t.tyre_wear),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ))
        .wrap(Wrap { trim: true });
        frame.render_widget(
            advisory,
            Rect {
                y: inner.y + 1,
                height: inner.height - 1,
                ..inner
            },
        );
    }
}

fn render_engine(frame: &mut Frame, app: &App, area: Rect) {
    let block = card("Engine Performance", Color::Cyan);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let velocity: u32 = driver_standings(&app.tickets).iter().map(|s| s.points).sum();
    let active = (velocity.min(100) as usize) * REV_SEGMENTS / 100;
    gauge_bar::render_segments(frame, Rect { height: 1, ..inner }, REV_SEGMENTS, active);
    if inner.height > 1 {
        let caption = Paragraph::new(Span::styled(
            format!(" VEL: {velocity} pts  LAP: {:.1}d", app.telemetry.avg_lap_time),
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(caption, Rect { y: inner.y + 1, height: 1, ..inner });
    }
}

fn render_drs(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.telemetry;
    let mut spans = Vec::new();
    if t.drs_enabled {
        spans.push(Span::styled(
            "DRS ENABLED",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled("DRS LOCKED", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::raw("  "));
    let flag_color = if t.yellow_flags > 0 { Color::Yellow } else { Color::DarkGray };
    spans.push(Span::styled(
        format!("FLAGS: {}", t.yellow_flags),
        Style::default().fg(flag_color),
    ));

    let border = if t.drs_enabled { Color::Green } else { Color::DarkGray };
    let badge = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(border)));
    frame.render_widget(badge, area);
}
