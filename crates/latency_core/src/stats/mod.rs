//! Statistics over latency samples.
//!
//! All functions are pure - no I/O, no side effects.
//!
//! - `summary`: min/avg/max/count over a sample set, display formatting
//! - `outliers`: Tukey IQR outlier detection over labelled latency pairs
//! - `requirements`: threshold templates evaluated against measured stats

mod outliers;
mod requirements;
mod summary;

pub use outliers::{detect_outliers, tukey_bounds, LatencyPair, TukeyBounds};
pub use requirements::{
    describe_template_revision, evaluate_requirements, RequirementEvaluation,
    RequirementTemplate, RequirementThreshold,
};
pub use summary::{compute_stats, describe_delta, format_ms, StatsResult};
