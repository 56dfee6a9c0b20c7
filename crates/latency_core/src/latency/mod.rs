//! Latency derivation from a marker timeline.
//!
//! Markers are sorted by timestamp and folded through a small per-module
//! state machine: a start marker arms the module's pending slot, the next
//! end marker for that module produces a sample (`end - start`) and disarms
//! it. A module cursor decides which module each marker belongs to.

mod derivation;
mod vocabulary;

pub use derivation::{
    derive, derive_module_latencies, extract_axis_from_text, DerivationOutcome, UNSPECIFIED_AXIS,
    UNSPECIFIED_MODULE,
};
pub use vocabulary::{MarkerRole, MarkerVocabulary};
