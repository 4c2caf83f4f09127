//! Logging setup shared by the stratos binaries.
//!
//! Every crate in the workspace logs through `tracing`; this crate installs
//! the process-wide subscriber. Human-readable output is the default, JSON is
//! available for log shippers, and the file variant keeps the terminal free
//! while the dashboard owns it.

pub mod logging;
