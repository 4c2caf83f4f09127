use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use st_core::types::{LogEntry, NetStats, Severity, Ticket};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::messages;
use crate::mutation::apply_mutation;
use crate::params::FeedParams;

type DataCallback = Arc<dyn Fn(&[Ticket]) + Send + Sync>;
type LogCallback = Arc<dyn Fn(&LogEntry) + Send + Sync>;
type StatsCallback = Arc<dyn Fn(&NetStats) + Send + Sync>;

/// Connection lifecycle of the simulated uplink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// A simulated push feed of ticket changes.
///
/// Cloning is cheap and every clone drives the same feed. Timers run on the
/// ambient Tokio runtime; `connect()` outside a runtime is logged and
/// ignored. Spawned timers hold only a weak reference, so dropping the last
/// handle winds the feed down.
///
/// Callbacks run while the feed serialises its broadcasts. They may read
/// [`state`](Self::state) or [`tickets`](Self::tickets) but must not call
/// `connect`/`disconnect` synchronously; forward to a channel instead.
#[derive(Clone)]
pub struct TelemetryFeed {
    inner: Arc<Inner>,
}

struct Inner {
    params: FeedParams,
    /// Held across every state-transition-plus-broadcast so observers never
    /// see a broadcast that contradicts a transition that already returned.
    emission: Mutex<()>,
    state: Mutex<FeedState>,
    subscribers: Mutex<Subscribers>,
}

struct FeedState {
    tickets: Vec<Ticket>,
    connection: ConnectionState,
    /// Bumped on every connect/disconnect; stale timers compare against it.
    generation: u64,
    rng: Box<dyn RngCore + Send>,
    tick_task: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Subscribers {
    data: Vec<DataCallback>,
    log: Vec<LogCallback>,
    stats: Vec<StatsCallback>,
}

/// Outcome of a tick, decided under the state lock.
enum TickOutcome {
    Dropped,
    Delayed(f64),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TelemetryFeed {
    /// Build a feed over a private copy of `seed`, using an entropy-seeded
    /// random source.
    pub fn new(seed: &[Ticket], params: FeedParams) -> Self {
        Self::with_rng(seed, params, StdRng::from_entropy())
    }

    /// Build a feed whose random draws are reproducible from `rng_seed`.
    pub fn seeded(seed: &[Ticket], params: FeedParams, rng_seed: u64) -> Self {
        Self::with_rng(seed, params, StdRng::seed_from_u64(rng_seed))
    }

    /// Build a feed that draws every random decision from `rng`.
    pub fn with_rng(seed: &[Ticket], params: FeedParams, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                params,
                emission: Mutex::new(()),
                state: Mutex::new(FeedState {
                    tickets: seed.to_vec(),
                    connection: ConnectionState::Disconnected,
                    generation: 0,
                    rng: Box::new(rng),
                    tick_task: None,
                }),
                subscribers: Mutex::new(Subscribers::default()),
            }),
        }
    }

    pub fn params(&self) -> &FeedParams {
        &self.inner.params
    }

    pub fn state(&self) -> ConnectionState {
        lock(&self.inner.state).connection
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Snapshot of the feed's private ticket grid.
    pub fn tickets(&self) -> Vec<Ticket> {
        lock(&self.inner.state).tickets.clone()
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Observe grid snapshots. Observers are called in registration order.
    pub fn on_data(&self, cb: impl Fn(&[Ticket]) + Send + Sync + 'static) {
        lock(&self.inner.subscribers).data.push(Arc::new(cb));
    }

    /// Observe feed log lines.
    pub fn on_log(&self, cb: impl Fn(&LogEntry) + Send + Sync + 'static) {
        lock(&self.inner.subscribers).log.push(Arc::new(cb));
    }

    /// Observe connection stats.
    pub fn on_stats(&self, cb: impl Fn(&NetStats) + Send + Sync + 'static) {
        lock(&self.inner.subscribers).stats.push(Arc::new(cb));
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Start the handshake. A no-op unless the feed is disconnected.
    pub fn connect(&self) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = %e, "connect() called outside a tokio runtime; staying disconnected");
                return;
            }
        };

        let generation = {
            let mut st = lock(&self.inner.state);
            if st.connection != ConnectionState::Disconnected {
                debug!(state = ?st.connection, "connect ignored");
                return;
            }
            st.connection = ConnectionState::Connecting;
            st.generation += 1;
            st.generation
        };
        debug!(generation, "handshake started");

        let weak = Arc::downgrade(&self.inner);
        let delay = self.inner.params.handshake;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                TelemetryFeed { inner }.complete_handshake(generation);
            }
        });
    }

    /// Sever the uplink and stop the tick loop. A no-op when already
    /// disconnected. Deliveries already scheduled by earlier ticks are not
    /// retracted.
    pub fn disconnect(&self) {
        let _emission = lock(&self.inner.emission);
        let (tick_task, ping) = {
            let mut st = lock(&self.inner.state);
            // Already down: no repeat "UPLINK SEVERED." log or stats.
            if st.connection == ConnectionState::Disconnected {
                return;
            }
            st.connection = ConnectionState::Disconnected;
            st.generation += 1;
            let ping = self.jittered_ping(&mut st);
            (st.tick_task.take(), ping)
        };
        if let Some(task) = tick_task {
            task.abort();
        }

        self.broadcast_log(&LogEntry::error(messages::UPLINK_SEVERED));
        self.broadcast_stats(ping, false);
    }

    fn complete_handshake(&self, generation: u64) {
        let _emission = lock(&self.inner.emission);
        let ping = {
            let mut st = lock(&self.inner.state);
            if st.generation != generation || st.connection != ConnectionState::Connecting {
                debug!(generation, "stale handshake discarded");
                return;
            }
            st.connection = ConnectionState::Connected;
            let weak = Arc::downgrade(&self.inner);
            let period = self.inner.params.tick_interval;
            st.tick_task = Some(tokio::spawn(run_ticks(weak, generation, period)));
            self.jittered_ping(&mut st)
        };

        self.broadcast_log(&LogEntry::info(messages::UPLINK_ESTABLISHED));
        self.broadcast_stats(ping, true);
    }

    // -----------------------------------------------------------------------
    // Tick loop
    // -----------------------------------------------------------------------

    /// Run one tick. Returns `false` once the tick's generation is stale.
    fn tick(&self, generation: u64) -> bool {
        let _emission = lock(&self.inner.emission);
        let outcome = {
            let mut st = lock(&self.inner.state);
            if st.generation != generation || st.connection != ConnectionState::Connected {
                return false;
            }
            let params = &self.inner.params;
            if st.rng.gen::<f64>() < params.packet_loss_chance {
                TickOutcome::Dropped
            } else {
                let jitter_ms = st.rng.gen::<f64>() * params.jitter.as_secs_f64() * 1000.0;
                TickOutcome::Delayed(params.base_latency.as_secs_f64() * 1000.0 + jitter_ms)
            }
        };

        match outcome {
            TickOutcome::Dropped => {
                self.broadcast_log(&LogEntry::warn(messages::PACKET_DROPPED));
                self.broadcast_stats(self.inner.params.dropped_ping_ms, true);
            }
            TickOutcome::Delayed(latency_ms) => {
                let weak = Arc::downgrade(&self.inner);
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs_f64(latency_ms / 1000.0)).await;
                    if let Some(inner) = weak.upgrade() {
                        TelemetryFeed { inner }.deliver(latency_ms);
                    }
                });
            }
        }
        true
    }

    /// Land a delayed tick: mutate one ticket, then broadcast its log lines,
    /// the grid and the latency echo.
    fn deliver(&self, latency_ms: f64) {
        let _emission = lock(&self.inner.emission);
        let (mutation, snapshot, connected) = {
            let mut st = lock(&self.inner.state);
            let len = st.tickets.len();
            let mutation = if len == 0 {
                crate::Mutation::Unchanged
            } else {
                let index = st.rng.gen_range(0..len);
                let roll = st.rng.gen::<f64>();
                apply_mutation(&mut st.tickets, index, roll)
            };
            (
                mutation,
                st.tickets.clone(),
                st.connection == ConnectionState::Connected,
            )
        };

        debug!(?mutation, latency_ms, "delivery landed");
        for entry in mutation.log_entries() {
            self.broadcast_log(&entry);
        }
        self.broadcast_data(&snapshot);
        self.broadcast_stats(latency_ms.floor() as u32, connected);
    }

    fn jittered_ping(&self, st: &mut FeedState) -> u32 {
        let params = &self.inner.params;
        let ms = params.base_latency.as_secs_f64() * 1000.0
            + st.rng.gen::<f64>() * params.jitter.as_secs_f64() * 1000.0;
        ms.floor() as u32
    }

    // -----------------------------------------------------------------------
    // Broadcast
    // -----------------------------------------------------------------------

    fn broadcast_data(&self, tickets: &[Ticket]) {
        let observers = lock(&self.inner.subscribers).data.clone();
        for cb in observers {
            cb(tickets);
        }
    }

    fn broadcast_log(&self, entry: &LogEntry) {
        match entry.severity {
            Severity::Info => info!(feed_message = %entry.message, "feed"),
            Severity::Warn => warn!(feed_message = %entry.message, "feed"),
            Severity::Error => error!(feed_message = %entry.message, "feed"),
        }
        let observers = lock(&self.inner.subscribers).log.clone();
        for cb in observers {
            cb(entry);
        }
    }

    fn broadcast_stats(&self, ping_ms: u32, connected: bool) {
        let stats = NetStats {
            ping_ms,
            packet_loss_percent: self.inner.params.packet_loss_percent(),
            connected,
        };
        let observers = lock(&self.inner.subscribers).stats.clone();
        for cb in observers {
            cb(&stats);
        }
    }
}

async fn run_ticks(feed: Weak<Inner>, generation: u64, period: Duration) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let Some(inner) = feed.upgrade() else {
            break;
        };
        if !(TelemetryFeed { inner }).tick(generation) {
            break;
        }
    }
    debug!(generation, "tick loop stopped");
}
