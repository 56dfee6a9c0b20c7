//! Manual timestamp entry for a single execution.
//!
//! Timestamps are typed or pasted in as seconds (`12.345`). Latencies are the
//! differences between consecutive timestamps in time order, independent of
//! marker names.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::{parse_delimited_line, parse_seconds_to_ms};
use crate::stats::{compute_stats, detect_outliers, LatencyPair, StatsResult};

/// Label given to pasted rows without one.
pub const DEFAULT_LABEL: &str = "TagOff";

/// One hand-entered timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampEntry {
    pub id: String,
    /// Seconds with a millisecond part, as typed.
    pub time: String,
    pub label: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub stage: String,
}

impl TimestampEntry {
    /// Parsed time in milliseconds, if the entry has one.
    pub fn time_ms(&self) -> Option<f64> {
        parse_seconds_to_ms(&self.time)
    }
}

/// Parse tab-separated rows (`time`, `label`, `note`, `stage`).
pub fn parse_pasted_rows(text: &str) -> Vec<TimestampEntry> {
    parse_pasted_rows_at(text, Utc::now())
}

/// Parse tab-separated rows, deriving entry ids from `now`.
///
/// Blank lines are skipped. A missing or empty label becomes
/// [`DEFAULT_LABEL`].
pub fn parse_pasted_rows_at(text: &str, now: DateTime<Utc>) -> Vec<TimestampEntry> {
    let stamp = now.timestamp_millis();

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            let mut parts = parse_delimited_line(line, '\t').into_iter();
            let mut next = || parts.next().unwrap_or_default();

            let time = next();
            let label = next();
            TimestampEntry {
                id: format!("{}-{}", stamp, index),
                time,
                label: if label.is_empty() {
                    DEFAULT_LABEL.to_string()
                } else {
                    label
                },
                note: next(),
                stage: next(),
            }
        })
        .collect()
}

/// Latencies between consecutive entries in time order.
///
/// Entries without a parseable time are ignored; ties keep input order.
pub fn consecutive_latencies(entries: &[TimestampEntry]) -> Vec<LatencyPair> {
    let mut timed: Vec<(f64, &TimestampEntry)> = entries
        .iter()
        .filter_map(|entry| entry.time_ms().map(|ms| (ms, entry)))
        .collect();
    timed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    timed
        .windows(2)
        .map(|pair| {
            let (from_ms, from) = pair[0];
            let (to_ms, to) = pair[1];
            LatencyPair::new(to_ms - from_ms, &from.label, &to.label)
        })
        .collect()
}

/// Stats and Tukey outliers of one execution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecutionStatistics {
    pub stats: StatsResult,
    pub outliers: Vec<LatencyPair>,
}

/// Summarize consecutive latencies.
pub fn execution_statistics(pairs: &[LatencyPair]) -> ExecutionStatistics {
    let values: Vec<f64> = pairs.iter().map(|p| p.value).collect();
    ExecutionStatistics {
        stats: compute_stats(&values),
        outliers: detect_outliers(pairs),
    }
}

/// Optional pass/fail threshold on the maximum latency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassCriteria {
    pub enabled: bool,
    pub max_latency_ms: f64,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            enabled: false,
            max_latency_ms: 100.0,
        }
    }
}

/// Verdict of [`PassCriteria::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    NoCriteria,
    Pass,
    Fail,
}

impl PassCriteria {
    /// Evaluate stats against the criteria.
    ///
    /// An enabled criterion fails when there are no samples.
    pub fn evaluate(&self, stats: &StatsResult) -> PassOutcome {
        if !self.enabled {
            return PassOutcome::NoCriteria;
        }
        match stats.max {
            Some(max) if stats.has_samples() && max <= self.max_latency_ms => PassOutcome::Pass,
            _ => PassOutcome::Fail,
        }
    }
}
