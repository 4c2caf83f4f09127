//! Simulated live telemetry feed.
//!
//! There is no transport here: [`TelemetryFeed`] owns a private copy of the
//! ticket grid and, while connected, mutates it on a fixed tick, delaying
//! each broadcast by a jittered latency and occasionally dropping a packet.
//! Observers subscribe to three channels (data, log, stats).

pub mod mutation;
pub mod params;
pub mod simulator;

pub use mutation::{apply_mutation, Mutation};
pub use params::FeedParams;
pub use simulator::{ConnectionState, TelemetryFeed};

/// Log texts emitted by the feed.
pub mod messages {
    pub const UPLINK_ESTABLISHED: &str = "UPLINK ESTABLISHED. HANDSHAKE COMPLETE.";
    pub const UPLINK_SEVERED: &str = "UPLINK SEVERED.";
    pub const PACKET_DROPPED: &str = "WARN: TELEMETRY PACKET DROPPED";
}
