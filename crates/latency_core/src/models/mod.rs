//! Data models for latency testing.
//!
//! This module contains the core data structures shared across the crate:
//! - Enums for dataset provenance and comparison mode
//! - Marker events (the input timeline of a test run)
//! - Execution sessions and their per-module latencies
//! - Device profiles used for traceability

mod device;
mod enums;
mod markers;
mod session;

pub use device::{build_traceability_summary, DeviceProfile};
pub use enums::{ComparisonMode, DatasetSource};
pub use markers::MarkerEvent;
pub use session::{
    decode_execution_key, encode_execution_key, ExecutionKey, ExecutionSession, ModuleLatency,
    SessionCollection,
};
