use std::time::Duration;

use st_core::config::FeedConfig;

/// Timing and loss parameters of a [`TelemetryFeed`](crate::TelemetryFeed).
#[derive(Debug, Clone, PartialEq)]
pub struct FeedParams {
    /// Delay between `connect()` and the connected transition.
    pub handshake: Duration,
    /// Period of the tick loop.
    pub tick_interval: Duration,
    /// Minimum simulated propagation delay of a delivery.
    pub base_latency: Duration,
    /// Upper bound (exclusive) of the uniform jitter added to `base_latency`.
    pub jitter: Duration,
    /// Probability in `[0, 1]` that a tick's packet is dropped.
    pub packet_loss_chance: f64,
    /// Ping reported when a packet is dropped.
    pub dropped_ping_ms: u32,
}

impl Default for FeedParams {
    fn default() -> Self {
        Self::from(&FeedConfig::default())
    }
}

impl From<&FeedConfig> for FeedParams {
    fn from(cfg: &FeedConfig) -> Self {
        Self {
            handshake: Duration::from_millis(cfg.handshake_ms),
            tick_interval: Duration::from_millis(cfg.tick_interval_ms.max(1)),
            base_latency: Duration::from_millis(cfg.base_latency_ms),
            jitter: Duration::from_millis(cfg.jitter_ms),
            packet_loss_chance: cfg.packet_loss_chance.clamp(0.0, 1.0),
            dropped_ping_ms: cfg.dropped_ping_ms,
        }
    }
}

impl FeedParams {
    /// Nominal loss rate as a percentage, as reported in stats.
    pub fn packet_loss_percent(&self) -> f64 {
        self.packet_loss_chance * 100.0
    }
}
