use st_core::types::{AiStrategy, FeedEvent, LogEntry, PriorityLevel, Severity, Ticket, TicketStatus};

#[test]
fn status_order_follows_lifecycle() {
    assert!(TicketStatus::Backlog < TicketStatus::InProgress);
    assert!(TicketStatus::InProgress < TicketStatus::QaReview);
    assert!(TicketStatus::QaReview < TicketStatus::Done);
}

#[test]
fn status_next_walks_forward_and_stops() {
    assert_eq!(TicketStatus::Backlog.next(), Some(TicketStatus::InProgress));
    assert_eq!(TicketStatus::InProgress.next(), Some(TicketStatus::QaReview));
    assert_eq!(TicketStatus::QaReview.next(), Some(TicketStatus::Done));
    assert_eq!(TicketStatus::Done.next(), None);
    assert!(TicketStatus::Done.is_terminal());
    assert!(!TicketStatus::Backlog.is_terminal());
}

#[test]
fn status_parses_loosely() {
    assert_eq!("in progress".parse::<TicketStatus>().unwrap(), TicketStatus::InProgress);
    assert_eq!("QA-REVIEW".parse::<TicketStatus>().unwrap(), TicketStatus::QaReview);
    assert_eq!("done".parse::<TicketStatus>().unwrap(), TicketStatus::Done);
    let err = "parked".parse::<TicketStatus>().unwrap_err();
    assert!(err.to_string().contains("parked"));
}

#[test]
fn ticket_serializes_with_feed_field_names() {
    let t = Ticket::new("1", "ST-1", "Fix", "Max V.", TicketStatus::QaReview)
        .blocked(true)
        .aged(3)
        .with_points(5);
    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(json["status"], "QA_REVIEW");
    assert_eq!(json["isBlocked"], true);
    assert_eq!(json["ageDays"], 3);
    assert_eq!(json["points"], 5);

    let back: Ticket = serde_json::from_value(json).unwrap();
    assert_eq!(back, t);
}

#[test]
fn strategy_deserializes_advisor_shape() {
    let json = r#"{
        "analysis": "Hold position.",
        "recommendations": ["Box on lap 12"],
        "priorityLevel": "STABLE"
    }"#;
    let s: AiStrategy = serde_json::from_str(json).unwrap();
    assert_eq!(s.priority_level, PriorityLevel::Stable);
    assert_eq!(s.recommendations, vec!["Box on lap 12".to_string()]);
}

#[test]
fn fallback_strategy_is_critical_with_guidance() {
    let s = AiStrategy::fallback();
    assert_eq!(s.priority_level, PriorityLevel::Critical);
    assert!(s.analysis.contains("PIT WALL IS OFFLINE"));
    assert!(!s.recommendations.is_empty());
}

#[test]
fn feed_event_is_tagged() {
    let ev = FeedEvent::Log(LogEntry::warn("WARN: TELEMETRY PACKET DROPPED"));
    let json = serde_json::to_value(&ev).unwrap();
    assert_eq!(json["event"], "log");
    assert_eq!(json["payload"]["severity"], "warn");
    assert_eq!(Severity::Error.to_string(), "error");
}
