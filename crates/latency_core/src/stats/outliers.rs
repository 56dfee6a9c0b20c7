//! Tukey IQR outlier detection over labelled latency pairs.

use serde::{Deserialize, Serialize};

/// Tukey fence multiplier.
const IQR_MULTIPLIER: f64 = 1.5;

/// A latency measured between two labelled timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyPair {
    /// Latency in milliseconds (`to - from`).
    pub value: f64,
    /// Label of the earlier timestamp.
    pub from: String,
    /// Label of the later timestamp.
    pub to: String,
}

impl LatencyPair {
    pub fn new(value: f64, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            value,
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Quartiles and fences of a sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TukeyBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl TukeyBounds {
    /// Check if a value lies strictly outside the fences.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Compute quartiles and fences.
///
/// Q1/Q3 are taken at the sorted indices `floor(n * 0.25)` and
/// `floor(n * 0.75)`. Returns `None` for an empty set.
pub fn tukey_bounds(values: &[f64]) -> Option<TukeyBounds> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let q1 = sorted[(n as f64 * 0.25).floor() as usize];
    let q3 = sorted[((n as f64 * 0.75).floor() as usize).min(n - 1)];
    let iqr = q3 - q1;

    Some(TukeyBounds {
        q1,
        q3,
        lower: q1 - IQR_MULTIPLIER * iqr,
        upper: q3 + IQR_MULTIPLIER * iqr,
    })
}

/// Return the pairs whose value lies strictly outside the Tukey fences.
///
/// Input order is preserved.
pub fn detect_outliers(pairs: &[LatencyPair]) -> Vec<LatencyPair> {
    let values: Vec<f64> = pairs.iter().map(|p| p.value).collect();
    let Some(bounds) = tukey_bounds(&values) else {
        return Vec::new();
    };

    pairs
        .iter()
        .filter(|p| bounds.is_outlier(p.value))
        .cloned()
        .collect()
}
