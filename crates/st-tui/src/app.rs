use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use st_advisor::Advice;
use st_core::export::write_export;
use st_core::feed_log::FeedLog;
use st_core::roster::{ExportFilter, ViewFilter};
use st_core::telemetry::RaceTelemetry;
use st_core::types::{AiStrategy, FeedEvent, LogEntry, NetStats, Ticket};

/// Circuit name shown in the header.
pub const CIRCUIT: &str = "CLOUD-SPRINT-04";

/// Date stamped on export file names, in UTC.
pub fn export_date() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

// ---------------------------------------------------------------------------
// Strategy panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyPanel {
    /// Waiting for the advisor.
    Loading,
    Ready(AiStrategy),
    /// The advisor failed; the fallback briefing is shown with a retry hint.
    Offline { strategy: AiStrategy, reason: String },
}

impl StrategyPanel {
    pub fn strategy(&self) -> Option<&AiStrategy> {
        match self {
            StrategyPanel::Loading => None,
            StrategyPanel::Ready(s) => Some(s),
            StrategyPanel::Offline { strategy, .. } => Some(strategy),
        }
    }
}

/// Something the dashboard asks the runtime to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Connect,
    Disconnect,
    /// Ask the advisor now instead of waiting for the debounce.
    RetryAdvisor,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Dashboard state. Owns everything the screen shows; knows nothing about
/// the terminal or the feed's timers.
pub struct App {
    pub should_quit: bool,
    pub show_help: bool,

    // Race data
    pub tickets: Vec<Ticket>,
    pub telemetry: RaceTelemetry,
    pub log: FeedLog,
    pub stats: NetStats,
    pub strategy: StrategyPanel,

    // Controls
    /// Whether the user wants the uplink open.
    pub live: bool,
    pub view_filter: ViewFilter,
    pub export_filter: ExportFilter,
    /// Id of the selected car. Survives feed updates that reorder or
    /// refilter the track.
    pub selected_id: Option<String>,
    pub detail_open: bool,

    pub export_dir: PathBuf,
    pub started_at: Instant,
}

impl App {
    pub fn new(tickets: Vec<Ticket>, log_capacity: usize, export_dir: impl Into<PathBuf>) -> Self {
        let telemetry = RaceTelemetry::derive(&tickets);
        let selected_id = tickets.first().map(|t| t.id.clone());
        Self {
            should_quit: false,
            show_help: false,
            tickets,
            telemetry,
            log: FeedLog::new(log_capacity),
            stats: NetStats::default(),
            strategy: StrategyPanel::Loading,
            live: false,
            view_filter: ViewFilter::All,
            export_filter: ExportFilter::All,
            selected_id,
            detail_open: false,
            export_dir: export_dir.into(),
            started_at: Instant::now(),
        }
    }

    /// Fold one feed event into the dashboard. Returns `true` when the
    /// ticket list changed, so the caller can re-arm the advisor.
    pub fn apply_event(&mut self, event: FeedEvent) -> bool {
        match event {
            FeedEvent::Data(tickets) => {
                self.telemetry = RaceTelemetry::derive(&tickets);
                self.tickets = tickets;
                self.retain_selection();
                true
            }
            FeedEvent::Log(entry) => {
                self.log.push(entry);
                false
            }
            FeedEvent::Stats(stats) => {
                self.stats = stats;
                false
            }
        }
    }

    /// Flip the live switch and return what the feed should do.
    pub fn toggle_live(&mut self) -> Intent {
        self.live = !self.live;
        if self.live {
            Intent::Connect
        } else {
            Intent::Disconnect
        }
    }

    pub fn cycle_filter(&mut self) {
        self.view_filter = self.view_filter.cycle();
        self.select_at(0);
    }

    pub fn cycle_export_filter(&mut self) {
        self.export_filter = self.export_filter.cycle();
    }

    /// Tickets shown on the track under the current filter.
    pub fn visible_tickets(&self) -> Vec<&Ticket> {
        self.tickets
            .iter()
            .filter(|t| self.view_filter.matches(t))
            .collect()
    }

    /// Position of the selected car on the filtered track.
    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected_id.as_deref()?;
        self.visible_tickets().iter().position(|t| t.id == id)
    }

    pub fn selected_ticket(&self) -> Option<&Ticket> {
        let id = self.selected_id.as_deref()?;
        self.visible_tickets().into_iter().find(|t| t.id == id)
    }

    /// Select the car at `index` on the filtered track. Returns `false` when
    /// `index` is past the end; an empty track clears the selection.
    pub fn select_at(&mut self, index: usize) -> bool {
        let visible = self.visible_tickets();
        if visible.is_empty() {
            self.selected_id = None;
            self.detail_open = false;
            return false;
        }
        match visible.get(index).map(|t| t.id.clone()) {
            Some(id) => {
                self.selected_id = Some(id);
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible_tickets().len();
        match self.selected_index() {
            Some(i) if i + 1 < len => {
                self.select_at(i + 1);
            }
            Some(_) => {}
            None => {
                self.select_at(0);
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.selected_index() {
            Some(i) => {
                self.select_at(i.saturating_sub(1));
            }
            None => {
                self.select_at(0);
            }
        }
    }

    pub fn open_detail(&mut self) {
        self.detail_open = self.selected_ticket().is_some();
    }

    pub fn close_detail(&mut self) {
        self.detail_open = false;
    }

    /// Write the CSV for the current export filter into `dir`. The outcome
    /// lands in the comms log either way.
    pub fn export(&mut self, dir: &Path, today: NaiveDate) -> Option<PathBuf> {
        match write_export(dir, &self.tickets, self.export_filter, today) {
            Ok(path) => {
                self.log.push(LogEntry::info(format!(
                    "TELEMETRY EXPORTED ({}) TO {}",
                    self.export_filter,
                    path.display()
                )));
                Some(path)
            }
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                self.log.push(LogEntry::error(format!("EXPORT FAILED: {e}")));
                None
            }
        }
    }

    pub fn apply_advice(&mut self, advice: Advice) {
        self.strategy = match advice.error {
            None => StrategyPanel::Ready(advice.strategy),
            Some(reason) => StrategyPanel::Offline {
                strategy: advice.strategy,
                reason,
            },
        };
    }

    pub fn request_retry(&mut self) {
        self.strategy = StrategyPanel::Loading;
    }

    /// `HH:MM:SS` since the dashboard started.
    pub fn session_time(&self) -> String {
        let secs = self.started_at.elapsed().as_secs();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Option<Intent> {
        // Help modal intercepts Esc and ?
        if self.show_help {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc => self.show_help = false,
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }

            KeyCode::Char(' ') => return Some(self.toggle_live()),
            KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char('x') => self.cycle_export_filter(),
            KeyCode::Char('e') => {
                let dir = self.export_dir.clone();
                self.export(&dir, export_date());
            }

            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Enter => self.open_detail(),
            KeyCode::Esc => self.close_detail(),

            KeyCode::Char('r') => {
                self.request_retry();
                return Some(Intent::RetryAdvisor);
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
        None
    }

    /// Keep the selection on the same car. If that car left the filter the
    /// selection is dropped and its detail overlay closed.
    fn retain_selection(&mut self) {
        if self.selected_id.is_some() && self.selected_ticket().is_none() {
            self.selected_id = None;
            self.detail_open = false;
        }
    }
}
