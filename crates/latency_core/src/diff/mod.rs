//! Session comparison.
//!
//! - `engine`: baseline/candidate diff over module stats
//! - `status`: what a comparison panel should show for the current inputs
//! - `order`: display ordering of module keys
//! - `axis`: axis-keyed summaries and per-axis grouping of direction rows

mod axis;
mod engine;
mod order;
mod status;
mod types;

pub use axis::{
    axis_aggregate, compute_axis_diff, AxisDiff, AxisPair, AxisSessionSummary, DEFAULT_AXES,
    DEFAULT_AXIS_KEYS,
};
pub use engine::compute_session_diff;
pub use order::compare_keys;
pub use status::{
    derive_session_diff_status, DiffSelection, DiffStatus, DiffStatusInput, DiffStatusReport,
};
pub use types::{DeviceDiff, ModuleDiffRow, SessionDiffData, SessionSummary, StatDelta};
