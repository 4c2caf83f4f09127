use crate::types::{Ticket, TicketStatus};

/// The demo grid the dashboard starts with.
pub fn demo_tickets() -> Vec<Ticket> {
    vec![
        Ticket::new("1", "ST-101", "Refactor Auth Provider", "Max V.", TicketStatus::Done)
            .aged(2)
            .with_points(5),
        Ticket::new("2", "ST-102", "Database Migration", "Lewis H.", TicketStatus::QaReview)
            .blocked(true)
            .aged(12)
            .with_points(8),
        Ticket::new("3", "ST-103", "Cyber UI Components", "Lando N.", TicketStatus::InProgress)
            .aged(4)
            .with_points(3),
        Ticket::new("4", "ST-104", "Jira Integration Layer", "Charles L.", TicketStatus::InProgress)
            .aged(1)
            .with_points(5),
        Ticket::new("5", "ST-105", "Analytics Dashboard", "Oscar P.", TicketStatus::Backlog)
            .with_points(13),
        Ticket::new("6", "ST-106", "Hotfix: Memory Leak", "Fernando A.", TicketStatus::InProgress)
            .blocked(true)
            .aged(7)
            .with_points(2),
        Ticket::new("7", "ST-107", "Security Audit", "George R.", TicketStatus::Done)
            .aged(5)
            .with_points(8),
    ]
}
