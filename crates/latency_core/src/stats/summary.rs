//! Summary statistics for a set of latency samples.

use serde::{Deserialize, Serialize};

/// Placeholder shown for a missing value.
const MISSING: &str = "—";

/// Min/avg/max/count of a sample set.
///
/// All metrics are `None` (and `total` is 0) for an empty sample set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsResult {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
    /// Number of samples.
    #[serde(default)]
    pub total: usize,
}

impl StatsResult {
    /// Check if the stats were computed from at least one sample.
    pub fn has_samples(&self) -> bool {
        self.total > 0
    }
}

/// Compute min/avg/max over the samples.
///
/// Never divides by zero: empty input yields all-`None` stats.
pub fn compute_stats(samples: &[f64]) -> StatsResult {
    if samples.is_empty() {
        return StatsResult::default();
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = samples.iter().sum::<f64>() / samples.len() as f64;

    StatsResult {
        min: Some(min),
        avg: Some(avg),
        max: Some(max),
        total: samples.len(),
    }
}

/// Format a millisecond value with two decimals, e.g. `12.35 ms`.
pub fn format_ms(value: Option<f64>) -> String {
    match value.filter(|v| !v.is_nan()) {
        Some(v) => format!("{:.2} ms", v),
        None => MISSING.to_string(),
    }
}

/// Format a delta with an explicit sign for positive values, e.g. `+1.00 ms`.
pub fn describe_delta(value: Option<f64>) -> String {
    match value.filter(|v| !v.is_nan()) {
        Some(v) if v > 0.0 => format!("+{:.2} ms", v),
        Some(v) => format!("{:.2} ms", v),
        None => MISSING.to_string(),
    }
}
