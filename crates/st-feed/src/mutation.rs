//! Per-tick mutation policy.
//!
//! A delivery picks one ticket and a roll in `[0, 1)`. The roll falls into
//! exactly one band; the first matching band wins:
//!
//! | band | effect |
//! |---|---|
//! | `[0, 0.15)` | toggle `is_blocked` |
//! | `[0.15, 0.35)` | advance status one step, only when unblocked and not terminal |
//! | `[0.35, 0.45)` | age by one day |
//! | `[0.45, 1)` | nothing |
//!
//! A blocked or finished ticket rolling into the advance band is left
//! untouched; it does not fall through to the ageing band.

use st_core::types::{LogEntry, Ticket, TicketStatus};

pub const BLOCK_TOGGLE_BAND_END: f64 = 0.15;
pub const ADVANCE_BAND_END: f64 = 0.35;
pub const AGE_BAND_END: f64 = 0.45;
/// Ages strictly above this raise a critical-wear warning.
pub const CRITICAL_WEAR_DAYS: u32 = 10;

/// What a single delivery did to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Blocked { key: String },
    Cleared { key: String },
    Advanced { key: String, to: TicketStatus },
    Aged { key: String, age_days: u32 },
    Unchanged,
}

impl Mutation {
    /// Feed log lines announcing this mutation, in emission order.
    pub fn log_entries(&self) -> Vec<LogEntry> {
        match self {
            Mutation::Blocked { key } => {
                vec![LogEntry::warn(format!("Unit {key} REPORTING MECHANICAL FAILURE"))]
            }
            Mutation::Cleared { key } => {
                vec![LogEntry::info(format!("Unit {key} CLEAR OF BLOCKAGE"))]
            }
            Mutation::Advanced { key, to } => {
                vec![LogEntry::info(format!("Unit {key} ADVANCING TO SECTOR {to}"))]
            }
            Mutation::Aged { key, age_days } if *age_days > CRITICAL_WEAR_DAYS => {
                vec![LogEntry::warn(format!("CRITICAL WEAR ON UNIT {key}"))]
            }
            Mutation::Aged { .. } | Mutation::Unchanged => Vec::new(),
        }
    }
}

/// Apply the band selected by `roll` to `tickets[index]`.
///
/// An out-of-range index (including any index into an empty grid) is a
/// no-op.
pub fn apply_mutation(tickets: &mut [Ticket], index: usize, roll: f64) -> Mutation {
    let Some(ticket) = tickets.get_mut(index) else {
        return Mutation::Unchanged;
    };

    if roll < BLOCK_TOGGLE_BAND_END {
        ticket.is_blocked = !ticket.is_blocked;
        let key = ticket.key.clone();
        if ticket.is_blocked {
            Mutation::Blocked { key }
        } else {
            Mutation::Cleared { key }
        }
    } else if roll < ADVANCE_BAND_END {
        if ticket.is_blocked {
            return Mutation::Unchanged;
        }
        match ticket.status.next() {
            Some(next) => {
                ticket.status = next;
                Mutation::Advanced {
                    key: ticket.key.clone(),
                    to: next,
                }
            }
            None => Mutation::Unchanged,
        }
    } else if roll < AGE_BAND_END {
        ticket.age_days = ticket.age_days.saturating_add(1);
        Mutation::Aged {
            key: ticket.key.clone(),
            age_days: ticket.age_days,
        }
    } else {
        Mutation::Unchanged
    }
}
