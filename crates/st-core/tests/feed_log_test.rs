use st_core::feed_log::{FeedLog, DEFAULT_LOG_CAPACITY};
use st_core::types::LogEntry;

#[test]
fn newest_entry_comes_first() {
    let mut log = FeedLog::default();
    log.push(LogEntry::info("first"));
    log.push(LogEntry::info("second"));

    let messages: Vec<&str> = log.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["second", "first"]);
    assert_eq!(log.latest().unwrap().message, "second");
}

#[test]
fn keeps_only_the_most_recent_fifteen() {
    let mut log = FeedLog::default();
    for i in 0..40 {
        log.push(LogEntry::info(format!("msg {i}")));
    }
    assert_eq!(log.len(), DEFAULT_LOG_CAPACITY);
    assert_eq!(log.iter().next().unwrap().message, "msg 39");
    assert_eq!(log.iter().last().unwrap().message, "msg 25");
}

#[test]
fn zero_capacity_is_clamped() {
    let mut log = FeedLog::new(0);
    assert_eq!(log.capacity(), 1);
    log.push(LogEntry::info("a"));
    log.push(LogEntry::info("b"));
    assert_eq!(log.len(), 1);
    assert_eq!(log.latest().unwrap().message, "b");
}
