use st_core::seed::demo_tickets;
use st_core::telemetry::RaceTelemetry;
use st_core::types::{Ticket, TicketStatus};

fn ticket(id: &str, status: TicketStatus) -> Ticket {
    Ticket::new(id, format!("ST-{id}"), "summary", "driver", status)
}

fn grid(done: usize, other: usize) -> Vec<Ticket> {
    let mut tickets = Vec::new();
    for i in 0..done {
        tickets.push(ticket(&format!("d{i}"), TicketStatus::Done));
    }
    for i in 0..other {
        tickets.push(ticket(&format!("o{i}"), TicketStatus::InProgress));
    }
    tickets
}

#[test]
fn empty_list_is_all_zero() {
    let t = RaceTelemetry::derive(&[]);
    assert_eq!(t.fuel_level, 0);
    assert_eq!(t.tyre_wear, 0);
    assert!(!t.drs_enabled);
    assert_eq!(t.yellow_flags, 0);
    assert_eq!(t.total, 0);
}

#[test]
fn fuel_matches_rounded_done_share() {
    for total in 1..=12usize {
        for done in 0..=total {
            let t = RaceTelemetry::derive(&grid(done, total - done));
            let expected = (100.0 * done as f64 / total as f64).round() as u8;
            assert_eq!(t.fuel_level, expected, "done={done} total={total}");
            assert!(t.fuel_level <= 100);
        }
    }
}

#[test]
fn tyre_wear_tracks_oldest_ticket_and_caps() {
    let cases = [(0, 0), (7, 50), (1, 7), (13, 93), (14, 100), (30, 100)];
    for (age, expected) in cases {
        let tickets = vec![
            ticket("1", TicketStatus::Backlog).aged(0),
            ticket("2", TicketStatus::Backlog).aged(age),
        ];
        assert_eq!(RaceTelemetry::derive(&tickets).tyre_wear, expected, "age={age}");
    }
}

#[test]
fn drs_boundary_at_two_done() {
    assert!(!RaceTelemetry::derive(&grid(0, 3)).drs_enabled);
    assert!(!RaceTelemetry::derive(&grid(1, 3)).drs_enabled);
    assert!(RaceTelemetry::derive(&grid(2, 3)).drs_enabled);
    assert!(RaceTelemetry::derive(&grid(3, 0)).drs_enabled);
}

#[test]
fn yellow_flags_count_blocked_at_any_status() {
    let tickets = vec![
        ticket("1", TicketStatus::Backlog).blocked(true),
        ticket("2", TicketStatus::Done).blocked(true),
        ticket("3", TicketStatus::QaReview),
    ];
    assert_eq!(RaceTelemetry::derive(&tickets).yellow_flags, 2);
}

#[test]
fn demo_grid_telemetry() {
    let t = RaceTelemetry::derive(&demo_tickets());
    // 2 of 7 done -> 28.57 -> 29; oldest is 12 days -> 85.7 -> 86.
    assert_eq!(t.fuel_level, 29);
    assert_eq!(t.tyre_wear, 86);
    assert!(t.drs_enabled);
    assert_eq!(t.yellow_flags, 2);
    assert_eq!(t.total, 7);
}
