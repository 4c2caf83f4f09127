pub mod config;
pub mod export;
pub mod feed_log;
pub mod roster;
pub mod seed;
pub mod telemetry;
pub mod types;
