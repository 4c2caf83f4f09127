pub mod comms;
pub mod detail;
pub mod standings;
pub mod strategy;
pub mod telemetry;
pub mod track;
