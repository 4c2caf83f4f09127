use std::sync::{Arc, Mutex};
use std::time::Duration;

use st_core::seed::demo_tickets;
use st_core::types::{FeedEvent, Severity, Ticket, TicketStatus};
use st_feed::{messages, ConnectionState, FeedParams, TelemetryFeed};

fn params() -> FeedParams {
    FeedParams {
        handshake: Duration::from_millis(800),
        tick_interval: Duration::from_millis(3000),
        base_latency: Duration::from_millis(120),
        jitter: Duration::from_millis(200),
        packet_loss_chance: 0.0,
        dropped_ping_ms: 999,
    }
}

/// Records every broadcast, across all three channels, in arrival order.
fn record(feed: &TelemetryFeed) -> Arc<Mutex<Vec<FeedEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    feed.on_data(move |t| sink.lock().unwrap().push(FeedEvent::Data(t.to_vec())));
    let sink = Arc::clone(&events);
    feed.on_log(move |e| sink.lock().unwrap().push(FeedEvent::Log(e.clone())));
    let sink = Arc::clone(&events);
    feed.on_stats(move |s| sink.lock().unwrap().push(FeedEvent::Stats(*s)));
    events
}

fn log_messages(events: &Arc<Mutex<Vec<FeedEvent>>>) -> Vec<String> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            FeedEvent::Log(entry) => Some(entry.message.clone()),
            _ => None,
        })
        .collect()
}

fn data_count(events: &Arc<Mutex<Vec<FeedEvent>>>) -> usize {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, FeedEvent::Data(_)))
        .count()
}

#[tokio::test(start_paused = true)]
async fn nothing_happens_before_connect() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 1);
    let events = record(&feed);

    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(feed.state(), ConnectionState::Disconnected);
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn connect_completes_after_handshake() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 1);
    let events = record(&feed);

    feed.connect();
    assert_eq!(feed.state(), ConnectionState::Connecting);

    tokio::time::sleep(Duration::from_millis(799)).await;
    assert_eq!(feed.state(), ConnectionState::Connecting);
    assert!(events.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(feed.state(), ConnectionState::Connected);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    match &events[0] {
        FeedEvent::Log(entry) => {
            assert_eq!(entry.message, messages::UPLINK_ESTABLISHED);
            assert_eq!(entry.severity, Severity::Info);
        }
        other => panic!("expected log, got {other:?}"),
    }
    match &events[1] {
        FeedEvent::Stats(stats) => {
            assert!(stats.connected);
            assert!((120..320).contains(&stats.ping_ms));
            assert!(stats.packet_loss_percent.abs() < f64::EPSILON);
        }
        other => panic!("expected stats, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn double_connect_has_one_handshake() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 2);
    let events = record(&feed);

    feed.connect();
    feed.connect();
    tokio::time::sleep(Duration::from_millis(900)).await;
    feed.connect();
    tokio::time::sleep(Duration::from_millis(900)).await;

    let established = log_messages(&events)
        .iter()
        .filter(|m| m.as_str() == messages::UPLINK_ESTABLISHED)
        .count();
    assert_eq!(established, 1);
}

#[tokio::test(start_paused = true)]
async fn disconnect_during_handshake_wins() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 3);
    let events = record(&feed);

    feed.connect();
    tokio::time::sleep(Duration::from_millis(400)).await;
    feed.disconnect();
    let cut = events.lock().unwrap().len();

    tokio::time::sleep(Duration::from_secs(20)).await;

    assert_eq!(feed.state(), ConnectionState::Disconnected);
    let events = events.lock().unwrap();
    assert!(events[cut..].is_empty(), "nothing after disconnect: {:?}", &events[cut..]);
    assert!(events.iter().all(|e| !matches!(e, FeedEvent::Stats(s) if s.connected)));
    assert!(events
        .iter()
        .any(|e| matches!(e, FeedEvent::Log(l) if l.message == messages::UPLINK_SEVERED && l.severity == Severity::Error)));
}

#[tokio::test(start_paused = true)]
async fn reconnect_after_aborted_handshake() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 4);
    let events = record(&feed);

    feed.connect();
    tokio::time::sleep(Duration::from_millis(300)).await;
    feed.disconnect();
    feed.connect();
    // The first handshake timer fires at 800ms and must be ignored; the
    // second completes at 300 + 800.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(feed.state(), ConnectionState::Connecting);
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(feed.state(), ConnectionState::Connected);

    let established = log_messages(&events)
        .iter()
        .filter(|m| m.as_str() == messages::UPLINK_ESTABLISHED)
        .count();
    assert_eq!(established, 1);
}

#[tokio::test(start_paused = true)]
async fn disconnect_when_idle_is_silent() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 5);
    let events = record(&feed);
    feed.disconnect();
    feed.disconnect();
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn ticks_deliver_after_period_plus_latency() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 6);
    let events = record(&feed);

    feed.connect();
    tokio::time::sleep(Duration::from_millis(800)).await;
    // First tick at 800 + 3000; its delivery lands 120..320ms later.
    tokio::time::sleep(Duration::from_millis(3000 + 119)).await;
    assert_eq!(data_count(&events), 0);
    tokio::time::sleep(Duration::from_millis(202)).await;
    assert_eq!(data_count(&events), 1);

    tokio::time::sleep(Duration::from_millis(3000 * 3)).await;
    assert_eq!(data_count(&events), 4);

    // Each delivery ends with a latency echo.
    let events = events.lock().unwrap();
    let last = events.last().unwrap();
    match last {
        FeedEvent::Stats(stats) => {
            assert!(stats.connected);
            assert!((120..320).contains(&stats.ping_ms));
        }
        other => panic!("expected trailing stats, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn lost_packets_spike_ping_and_skip_data() {
    let mut p = params();
    p.packet_loss_chance = 1.0;
    let feed = TelemetryFeed::seeded(&demo_tickets(), p, 7);
    let events = record(&feed);

    feed.connect();
    tokio::time::sleep(Duration::from_millis(800 + 3000 * 3 + 500)).await;

    assert_eq!(data_count(&events), 0);
    let dropped = log_messages(&events)
        .iter()
        .filter(|m| m.as_str() == messages::PACKET_DROPPED)
        .count();
    assert_eq!(dropped, 3);

    let spikes = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, FeedEvent::Stats(s) if s.ping_ms == 999))
        .count();
    assert_eq!(spikes, 3);
    assert_eq!(feed.tickets(), demo_tickets());
}

#[tokio::test(start_paused = true)]
async fn disconnect_stops_the_tick_loop() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 8);
    let events = record(&feed);

    feed.connect();
    tokio::time::sleep(Duration::from_millis(800 + 3000 + 400)).await;
    assert_eq!(data_count(&events), 1);

    feed.disconnect();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(data_count(&events), 1);
    assert_eq!(feed.state(), ConnectionState::Disconnected);

    let last_stats = events
        .lock()
        .unwrap()
        .iter()
        .rev()
        .find_map(|e| match e {
            FeedEvent::Stats(s) => Some(*s),
            _ => None,
        })
        .unwrap();
    assert!(!last_stats.connected);
}

#[tokio::test(start_paused = true)]
async fn in_flight_delivery_still_lands_after_disconnect() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 9);
    let events = record(&feed);

    feed.connect();
    // Tick fires at 3800; delivery is pending for at least 120ms.
    tokio::time::sleep(Duration::from_millis(800 + 3000 + 50)).await;
    assert_eq!(data_count(&events), 0);
    feed.disconnect();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(data_count(&events), 1);
    let last = events.lock().unwrap().last().cloned().unwrap();
    assert!(matches!(last, FeedEvent::Stats(s) if !s.connected));
}

#[tokio::test(start_paused = true)]
async fn seed_list_is_copied() {
    let mut seed = demo_tickets();
    let feed = TelemetryFeed::seeded(&seed, params(), 10);
    seed[0].status = TicketStatus::Backlog;
    seed.clear();

    assert_eq!(feed.tickets(), demo_tickets());
}

#[tokio::test(start_paused = true)]
async fn observers_run_in_registration_order() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 11);
    let order = Arc::new(Mutex::new(Vec::new()));
    for id in 0..3 {
        let order = Arc::clone(&order);
        feed.on_log(move |_| order.lock().unwrap().push(id));
    }

    feed.connect();
    tokio::time::sleep(Duration::from_millis(801)).await;

    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn same_seed_same_race() {
    async fn run(seed: u64) -> Vec<Ticket> {
        let mut p = params();
        p.packet_loss_chance = 0.05;
        let feed = TelemetryFeed::seeded(&demo_tickets(), p, seed);
        feed.connect();
        tokio::time::sleep(Duration::from_millis(800 + 3000 * 40 + 400)).await;
        feed.disconnect();
        feed.tickets()
    }

    assert_eq!(run(42).await, run(42).await);
}

#[tokio::test(start_paused = true)]
async fn statuses_never_regress_over_a_long_race() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 12);
    let snapshots = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&snapshots);
    feed.on_data(move |t| sink.lock().unwrap().push(t.to_vec()));

    feed.connect();
    tokio::time::sleep(Duration::from_millis(800 + 3000 * 200 + 400)).await;

    let snapshots = snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 200);
    let mut previous = demo_tickets();
    for snap in snapshots.iter() {
        assert_eq!(snap.len(), previous.len());
        for (before, after) in previous.iter().zip(snap) {
            assert_eq!(before.id, after.id);
            assert!(after.status >= before.status);
            assert!(after.age_days >= before.age_days);
            assert_eq!(after.points, before.points);
        }
        previous = snap.clone();
    }
}

#[tokio::test(start_paused = true)]
async fn empty_grid_still_broadcasts() {
    let feed = TelemetryFeed::seeded(&[], params(), 13);
    let events = record(&feed);

    feed.connect();
    tokio::time::sleep(Duration::from_millis(800 + 3000 + 400)).await;

    assert_eq!(data_count(&events), 1);
    assert!(feed.tickets().is_empty());
}

#[test]
fn connect_outside_runtime_is_ignored() {
    let feed = TelemetryFeed::seeded(&demo_tickets(), params(), 14);
    feed.connect();
    assert_eq!(feed.state(), ConnectionState::Disconnected);
}
