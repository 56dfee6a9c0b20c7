//! Latency Core - domain logic for hardware latency testing
//!
//! This crate contains the computation layer with zero UI dependencies:
//! marker/CSV ingestion, start/end marker pairing, statistics, session
//! diffs and versioned persistence of comparison state.

pub mod config;
pub mod diff;
pub mod import;
pub mod latency;
pub mod logging;
pub mod manual;
pub mod models;
pub mod parser;
pub mod stats;
pub mod storage;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
