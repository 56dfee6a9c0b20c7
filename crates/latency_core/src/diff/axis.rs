//! Axis-keyed session summaries.
//!
//! Older comparisons keyed stats by direction (`X+`, `X-`, ...) and called the
//! device a "hardware" summary. They convert into the module-keyed shape, and
//! direction pairs can be grouped back per physical axis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::engine::compute_session_diff;
use super::order::sort_keys;
use super::types::{ModuleDiffRow, SessionDiffData, SessionSummary};
use crate::models::DatasetSource;
use crate::stats::StatsResult;

/// Direction keys compared when the caller names none.
pub const DEFAULT_AXIS_KEYS: [&str; 6] = ["X+", "X-", "Y+", "Y-", "Z+", "Z-"];

/// Physical axes grouped by [`axis_aggregate`].
pub const DEFAULT_AXES: [&str; 3] = ["X", "Y", "Z"];

/// Session summary keyed by axis direction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSessionSummary {
    pub test_case_id: String,
    pub execution_id: String,
    #[serde(default)]
    pub test_case_name: String,
    #[serde(default)]
    pub execution_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_source: Option<DatasetSource>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub hardware_summary: Option<String>,
    #[serde(default)]
    pub axis_stats: BTreeMap<String, StatsResult>,
}

impl From<AxisSessionSummary> for SessionSummary {
    fn from(axis: AxisSessionSummary) -> Self {
        Self {
            test_case_id: axis.test_case_id,
            execution_id: axis.execution_id,
            test_case_name: axis.test_case_name,
            execution_name: axis.execution_name,
            dataset_source: axis.dataset_source,
            fps: axis.fps,
            device_summary: axis.hardware_summary,
            module_stats: axis.axis_stats,
        }
    }
}

/// The `+` and `-` direction rows of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisPair {
    pub plus: Option<ModuleDiffRow>,
    pub minus: Option<ModuleDiffRow>,
}

/// Axis-keyed diff plus its per-axis grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisDiff {
    pub diff: SessionDiffData,
    pub aggregate: BTreeMap<String, AxisPair>,
}

/// Group direction rows per axis.
///
/// An axis appears only if at least one of its directions has a row.
pub fn axis_aggregate(diff: &SessionDiffData, axes: &[&str]) -> BTreeMap<String, AxisPair> {
    axes.iter()
        .filter_map(|axis| {
            let plus = diff.row(&format!("{}+", axis)).cloned();
            let minus = diff.row(&format!("{}-", axis)).cloned();
            (plus.is_some() || minus.is_some())
                .then(|| (axis.to_string(), AxisPair { plus, minus }))
        })
        .collect()
}

/// Compare two axis-keyed summaries.
///
/// Without `axis_keys` the six default directions are compared, in
/// display order (`X-` before `X+`).
pub fn compute_axis_diff(
    baseline: Option<&AxisSessionSummary>,
    candidate: Option<&AxisSessionSummary>,
    axis_keys: Option<&[String]>,
) -> Option<AxisDiff> {
    let baseline = SessionSummary::from(baseline?.clone());
    let candidate = SessionSummary::from(candidate?.clone());

    let mut keys: Vec<String> = match axis_keys {
        Some(keys) => keys.to_vec(),
        None => DEFAULT_AXIS_KEYS.iter().map(|k| k.to_string()).collect(),
    };
    sort_keys(&mut keys);

    let diff = compute_session_diff(Some(&baseline), Some(&candidate), Some(&keys))?;
    let aggregate = axis_aggregate(&diff, &DEFAULT_AXES);
    Some(AxisDiff { diff, aggregate })
}
