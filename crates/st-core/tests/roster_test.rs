use st_core::roster::{driver_standings, ViewFilter};
use st_core::seed::demo_tickets;
use st_core::types::{Ticket, TicketStatus};

#[test]
fn view_filters_partition_demo_grid() {
    let tickets = demo_tickets();
    let count = |f: ViewFilter| tickets.iter().filter(|t| f.matches(t)).count();
    assert_eq!(count(ViewFilter::All), 7);
    assert_eq!(count(ViewFilter::Blocked), 2);
    assert_eq!(count(ViewFilter::InProgress), 3);
    assert_eq!(count(ViewFilter::Done), 2);
}

#[test]
fn standings_rank_delivered_points() {
    let tickets = vec![
        Ticket::new("1", "A", "", "Lando N.", TicketStatus::Done).with_points(3),
        Ticket::new("2", "B", "", "Max V.", TicketStatus::Done).with_points(5),
        Ticket::new("3", "C", "", "Lando N.", TicketStatus::Done).with_points(4),
        Ticket::new("4", "D", "", "Oscar P.", TicketStatus::InProgress).with_points(13),
        Ticket::new("5", "E", "", "Alex A.", TicketStatus::Backlog).with_points(1),
    ];
    let standings = driver_standings(&tickets);
    let order: Vec<(&str, u32)> = standings
        .iter()
        .map(|s| (s.driver.as_str(), s.points))
        .collect();
    assert_eq!(
        order,
        vec![("Lando N.", 7), ("Max V.", 5), ("Alex A.", 0), ("Oscar P.", 0)]
    );
}

#[test]
fn standings_empty_roster() {
    assert!(driver_standings(&[]).is_empty());
}
