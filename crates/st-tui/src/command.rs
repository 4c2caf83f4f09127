//! Pipe commands for headless mode.
//!
//! Lines on stdin are either plain words (`filter`, `select 2`) or JSON
//! objects (`{"cmd":"select","args":[2]}`). Queries answer with a JSON
//! string; actions may hand an [`Intent`] back to the runtime.

use chrono::NaiveDate;
use serde_json::json;

use crate::app::{App, Intent, StrategyPanel};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Connect,
    Disconnect,
    Filter,
    ExportFilter,
    Export,
    Select(usize),
    Up,
    Down,
    Retry,
    QueryState,
    QuerySelected,
    Quit,
}

/// What running a command produced.
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    /// Serialized answer for queries.
    pub reply: Option<String>,
    pub intent: Option<Intent>,
}

/// Parse a plain-text command. A leading `:` is accepted.
pub fn parse_command(input: &str) -> Option<AppCommand> {
    let input = input.trim();
    let input = input.strip_prefix(':').unwrap_or(input);
    let mut parts = input.splitn(2, ' ');
    let verb = parts.next()?.trim();
    let arg = parts.next().map(str::trim);

    match verb {
        "connect" | "live" => Some(AppCommand::Connect),
        "disconnect" | "pause" => Some(AppCommand::Disconnect),
        "filter" | "f" => Some(AppCommand::Filter),
        "export_filter" | "x" => Some(AppCommand::ExportFilter),
        "export" | "e" => Some(AppCommand::Export),
        "select" | "sel" => Some(AppCommand::Select(arg?.parse().ok()?)),
        "up" | "k" => Some(AppCommand::Up),
        "down" | "j" => Some(AppCommand::Down),
        "retry" | "r" => Some(AppCommand::Retry),
        "query" => match arg? {
            "state" => Some(AppCommand::QueryState),
            "selected" => Some(AppCommand::QuerySelected),
            _ => None,
        },
        "state" => Some(AppCommand::QueryState),
        "quit" | "q" => Some(AppCommand::Quit),
        _ => None,
    }
}

/// Parse `{"cmd": "...", "args": [...]}`.
pub fn parse_json_command(json: &str) -> Option<AppCommand> {
    let v: serde_json::Value = serde_json::from_str(json).ok()?;
    let cmd = v.get("cmd")?.as_str()?;
    match cmd {
        "select" => {
            let idx = v.get("args")?.as_array()?.first()?.as_u64()?;
            Some(AppCommand::Select(usize::try_from(idx).ok()?))
        }
        "query_state" => Some(AppCommand::QueryState),
        "query_selected" => Some(AppCommand::QuerySelected),
        other => parse_command(other).filter(|c| !matches!(c, AppCommand::Select(_))),
    }
}

pub fn execute_command(app: &mut App, cmd: AppCommand, today: NaiveDate) -> Outcome {
    let mut out = Outcome::default();
    match cmd {
        AppCommand::Connect => {
            if !app.live {
                out.intent = Some(app.toggle_live());
            }
        }
        AppCommand::Disconnect => {
            if app.live {
                out.intent = Some(app.toggle_live());
            }
        }
        AppCommand::Filter => app.cycle_filter(),
        AppCommand::ExportFilter => app.cycle_export_filter(),
        AppCommand::Export => {
            let dir = app.export_dir.clone();
            let path = app.export(&dir, today);
            out.reply = Some(
                json!({
                    "event": "exported",
                    "ok": path.is_some(),
                    "path": path.map(|p| p.display().to_string()),
                })
                .to_string(),
            );
        }
        AppCommand::Select(idx) => {
            app.select_at(idx);
        }
        AppCommand::Up => app.select_prev(),
        AppCommand::Down => app.select_next(),
        AppCommand::Retry => {
            app.request_retry();
            out.intent = Some(Intent::RetryAdvisor);
        }
        AppCommand::QueryState => out.reply = Some(state_json(app).to_string()),
        AppCommand::QuerySelected => {
            out.reply = Some(
                json!({
                    "event": "selected",
                    "index": app.selected_index(),
                    "ticket": app.selected_ticket(),
                })
                .to_string(),
            );
        }
        AppCommand::Quit => app.should_quit = true,
    }
    out
}

fn state_json(app: &App) -> serde_json::Value {
    let strategy = match &app.strategy {
        StrategyPanel::Loading => json!({ "state": "loading" }),
        StrategyPanel::Ready(s) => json!({ "state": "ready", "strategy": s }),
        StrategyPanel::Offline { strategy, reason } => {
            json!({ "state": "offline", "strategy": strategy, "reason": reason })
        }
    };
    json!({
        "event": "state",
        "live": app.live,
        "tickets": app.tickets.len(),
        "visible": app.visible_tickets().len(),
        "filter": app.view_filter.label(),
        "export_filter": app.export_filter.to_string(),
        "telemetry": app.telemetry,
        "stats": app.stats,
        "strategy": strategy,
        "log": app.log.iter().map(|e| &e.message).collect::<Vec<_>>(),
    })
}
