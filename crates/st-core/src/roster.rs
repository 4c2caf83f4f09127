//! Views over the ticket roster: track-map filters, export filters, track
//! positions and the driver standings table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{ParseStatusError, Ticket, TicketStatus};

// ---------------------------------------------------------------------------
// ViewFilter
// ---------------------------------------------------------------------------

/// Filter applied to the track map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewFilter {
    #[default]
    All,
    Blocked,
    InProgress,
    Done,
}

impl ViewFilter {
    pub const ALL: [ViewFilter; 4] = [
        ViewFilter::All,
        ViewFilter::Blocked,
        ViewFilter::InProgress,
        ViewFilter::Done,
    ];

    pub fn matches(self, ticket: &Ticket) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Blocked => ticket.is_blocked,
            ViewFilter::InProgress => ticket.status == TicketStatus::InProgress,
            ViewFilter::Done => ticket.status == TicketStatus::Done,
        }
    }

    /// The next filter in button order, wrapping around.
    pub fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewFilter::All => "All",
            ViewFilter::Blocked => "Blocked",
            ViewFilter::InProgress => "In Progress",
            ViewFilter::Done => "Done",
        }
    }
}

// ---------------------------------------------------------------------------
// ExportFilter
// ---------------------------------------------------------------------------

/// Filter applied to the CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFilter {
    #[default]
    All,
    Status(TicketStatus),
    Blocked,
}

impl ExportFilter {
    /// Every option in menu order.
    pub fn options() -> Vec<ExportFilter> {
        let mut out = vec![ExportFilter::All];
        out.extend(TicketStatus::ALL.into_iter().map(ExportFilter::Status));
        out.push(ExportFilter::Blocked);
        out
    }

    pub fn matches(self, ticket: &Ticket) -> bool {
        match self {
            ExportFilter::All => true,
            ExportFilter::Status(status) => ticket.status == status,
            ExportFilter::Blocked => ticket.is_blocked,
        }
    }

    pub fn cycle(self) -> Self {
        let options = Self::options();
        let idx = options.iter().position(|f| *f == self).unwrap_or(0);
        options[(idx + 1) % options.len()]
    }
}

impl fmt::Display for ExportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFilter::All => write!(f, "ALL"),
            ExportFilter::Status(status) => write!(f, "{status}"),
            ExportFilter::Blocked => write!(f, "BLOCKED"),
        }
    }
}

impl FromStr for ExportFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(ExportFilter::All),
            "BLOCKED" => Ok(ExportFilter::Blocked),
            _ => s.parse().map(ExportFilter::Status),
        }
    }
}

// ---------------------------------------------------------------------------
// Track positions
// ---------------------------------------------------------------------------

/// Fraction of a lap a ticket has covered at `status`.
pub fn track_progress(status: TicketStatus) -> f64 {
    match status {
        TicketStatus::Backlog => 0.10,
        TicketStatus::InProgress => 0.40,
        TicketStatus::QaReview => 0.75,
        TicketStatus::Done => 0.95,
    }
}

// ---------------------------------------------------------------------------
// Driver standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub driver: String,
    pub points: u32,
}

/// Points delivered (DONE tickets) per assignee, best first. Every assignee
/// on the roster appears, ties broken by name.
pub fn driver_standings(tickets: &[Ticket]) -> Vec<Standing> {
    let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
    for ticket in tickets {
        let entry = totals.entry(ticket.assignee.as_str()).or_insert(0);
        if ticket.status == TicketStatus::Done {
            *entry = entry.saturating_add(ticket.points);
        }
    }

    let mut standings: Vec<Standing> = totals
        .into_iter()
        .map(|(driver, points)| Standing {
            driver: driver.to_string(),
            points,
        })
        .collect();
    // BTreeMap iteration is name-ordered; a stable sort keeps that for ties.
    standings.sort_by(|a, b| b.points.cmp(&a.points));
    standings
}
