use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TicketStatus
// ---------------------------------------------------------------------------

/// Lifecycle stage of a ticket. Variants are declared in lifecycle order, so
/// the derived `Ord` is the race order: BACKLOG < IN_PROGRESS < QA_REVIEW < DONE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Backlog,
    InProgress,
    QaReview,
    Done,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Backlog,
        TicketStatus::InProgress,
        TicketStatus::QaReview,
        TicketStatus::Done,
    ];

    /// The next stage along the fixed sequence, or `None` at `Done`.
    pub fn next(self) -> Option<TicketStatus> {
        match self {
            TicketStatus::Backlog => Some(TicketStatus::InProgress),
            TicketStatus::InProgress => Some(TicketStatus::QaReview),
            TicketStatus::QaReview => Some(TicketStatus::Done),
            TicketStatus::Done => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Backlog => "BACKLOG",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::QaReview => "QA_REVIEW",
            TicketStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ticket status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for TicketStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// A tracked unit of work. Field names serialize in camelCase so the JSON
/// embedded in advisor prompts matches the feed's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub assignee: String,
    pub status: TicketStatus,
    pub is_blocked: bool,
    pub age_days: u32,
    pub points: u32,
}

impl Ticket {
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        summary: impl Into<String>,
        assignee: impl Into<String>,
        status: TicketStatus,
    ) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            summary: summary.into(),
            assignee: assignee.into(),
            status,
            is_blocked: false,
            age_days: 0,
            points: 0,
        }
    }

    pub fn blocked(mut self, is_blocked: bool) -> Self {
        self.is_blocked = is_blocked;
        self
    }

    pub fn aged(mut self, age_days: u32) -> Self {
        self.age_days = age_days;
        self
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }
}

// ---------------------------------------------------------------------------
// Feed log / connection stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            timestamp: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warn)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }
}

/// Connection statistics reported by the feed.
///
/// `packet_loss_percent` is the configured loss rate, not a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetStats {
    pub ping_ms: u32,
    pub packet_loss_percent: f64,
    pub connected: bool,
}

impl Default for NetStats {
    fn default() -> Self {
        Self {
            ping_ms: 0,
            packet_loss_percent: 0.0,
            connected: false,
        }
    }
}

/// One event from the live feed, in the order it was delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum FeedEvent {
    Data(Vec<Ticket>),
    Log(LogEntry),
    Stats(NetStats),
}

// ---------------------------------------------------------------------------
// AI strategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityLevel {
    Critical,
    Stable,
    Optimal,
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityLevel::Critical => write!(f, "CRITICAL"),
            PriorityLevel::Stable => write!(f, "STABLE"),
            PriorityLevel::Optimal => write!(f, "OPTIMAL"),
        }
    }
}

pub const FALLBACK_ANALYSIS: &str =
    "COMMUNICATION BREAKDOWN. THE PIT WALL IS OFFLINE. PROCEED WITH CAUTION.";
pub const FALLBACK_RECOMMENDATIONS: [&str; 2] =
    ["Check manual logs", "Awaiting telemetry restoration"];

/// Narrative race briefing produced by the strategy advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiStrategy {
    pub analysis: String,
    pub recommendations: Vec<String>,
    pub priority_level: PriorityLevel,
}

impl AiStrategy {
    /// The fixed briefing shown whenever the advisor cannot be reached or
    /// returns something unusable.
    pub fn fallback() -> Self {
        Self {
            analysis: FALLBACK_ANALYSIS.to_string(),
            recommendations: FALLBACK_RECOMMENDATIONS
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
            priority_level: PriorityLevel::Critical,
        }
    }
}
