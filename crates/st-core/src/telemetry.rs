//! Race telemetry derived from the ticket list.
//!
//! Everything here is a pure function of the current tickets; nothing is
//! cached between updates.

use serde::{Deserialize, Serialize};

use crate::types::{Ticket, TicketStatus};

/// Age (in days) at which a ticket counts as fully worn.
pub const TYRE_LIFE_DAYS: f64 = 14.0;
/// Minimum completed tickets for DRS.
pub const DRS_DONE_THRESHOLD: usize = 2;
/// Lap time shown on the dashboard; a display constant, not a measurement.
pub const AVG_LAP_TIME: f64 = 4.2;
/// Wear above which the pit wall calls the car in.
pub const BOX_BOX_WEAR: u8 = 60;
/// Wear above which the gauge is highlighted.
pub const HOT_TYRE_WEAR: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceTelemetry {
    /// Share of tickets at DONE, 0..=100.
    pub fuel_level: u8,
    /// Age of the oldest ticket relative to [`TYRE_LIFE_DAYS`], 0..=100.
    pub tyre_wear: u8,
    pub drs_enabled: bool,
    pub yellow_flags: usize,
    pub avg_lap_time: f64,
    pub done_count: usize,
    pub total: usize,
}

impl RaceTelemetry {
    /// Derive the dashboard metrics from `tickets`.
    ///
    /// Total over every list: an empty list yields zero fuel and zero wear.
    pub fn derive(tickets: &[Ticket]) -> Self {
        let total = tickets.len();
        let done_count = tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Done)
            .count();
        let yellow_flags = tickets.iter().filter(|t| t.is_blocked).count();

        let (fuel_level, tyre_wear) = if total == 0 {
            (0, 0)
        } else {
            let fuel = (100.0 * done_count as f64 / total as f64).round();
            let max_age = tickets.iter().map(|t| t.age_days).max().unwrap_or(0);
            let wear = (100.0 * f64::from(max_age) / TYRE_LIFE_DAYS)
                .round()
                .min(100.0);
            (fuel as u8, wear as u8)
        };

        Self {
            fuel_level,
            tyre_wear,
            drs_enabled: done_count >= DRS_DONE_THRESHOLD,
            yellow_flags,
            avg_lap_time: AVG_LAP_TIME,
            done_count,
            total,
        }
    }

    pub fn tyres_hot(&self) -> bool {
        self.tyre_wear > HOT_TYRE_WEAR
    }
}

/// Pit-wall call for the given tyre wear.
pub fn tyre_advisory(tyre_wear: u8) -> &'static str {
    if tyre_wear > BOX_BOX_WEAR {
        "BOX BOX BOX! Heavy technical debt detected."
    } else {
        "Tyres holding. Optimal performance maintained."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: &str, status: TicketStatus, age: u32) -> Ticket {
        Ticket::new(id, format!("ST-{id}"), "s", "a", status).aged(age)
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 1 of 8 done -> 12.5% -> 13
        let mut tickets = vec![ticket("1", TicketStatus::Done, 0)];
        for i in 2..=8 {
            tickets.push(ticket(&i.to_string(), TicketStatus::Backlog, 0));
        }
        assert_eq!(RaceTelemetry::derive(&tickets).fuel_level, 13);
    }

    #[test]
    fn advisory_threshold_is_exclusive() {
        assert!(tyre_advisory(60).starts_with("Tyres holding"));
        assert!(tyre_advisory(61).starts_with("BOX BOX BOX"));
    }

    #[test]
    fn hot_tyres_above_seventy() {
        let mut t = RaceTelemetry::derive(&[]);
        t.tyre_wear = 70;
        assert!(!t.tyres_hot());
        t.tyre_wear = 71;
        assert!(t.tyres_hot());
    }
}
