//! Diff data shapes.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{DatasetSource, ExecutionSession};
use crate::stats::StatsResult;

/// The per-session view the diff engine compares.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
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
    /// Device description compared across sessions.
    #[serde(default)]
    pub device_summary: Option<String>,
    /// Stats per module key.
    #[serde(default)]
    pub module_stats: BTreeMap<String, StatsResult>,
}

impl SessionSummary {
    /// Build a summary from a stored session.
    ///
    /// The device profile id stands in for the device summary.
    pub fn from_session(session: &ExecutionSession) -> Self {
        let module_stats = session
            .latencies
            .iter()
            .map(|l| (l.module_under_test.clone(), l.stats))
            .collect();

        Self {
            test_case_id: session.test_case_id.clone(),
            execution_id: session.execution_id.clone(),
            test_case_name: session.name.clone(),
            execution_name: session.execution_id.clone(),
            dataset_source: Some(session.dataset_source),
            fps: Some(session.fps),
            device_summary: Some(session.device_profile_id.clone()),
            module_stats,
        }
    }

    /// Replace the device summary (e.g. with a profile label).
    pub fn with_device_summary(mut self, summary: impl Into<String>) -> Self {
        self.device_summary = Some(summary.into());
        self
    }
}

/// Candidate minus baseline per metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatDelta {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

/// Device summaries of both sides when they differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDiff {
    pub baseline: Option<String>,
    pub candidate: Option<String>,
}

/// One compared module key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDiffRow {
    pub module_key: String,
    pub baseline_stats: Option<StatsResult>,
    pub candidate_stats: Option<StatsResult>,
    pub delta: StatDelta,
    pub fps_delta: Option<f64>,
    pub device_diff: Option<DeviceDiff>,
}

/// Result of comparing two sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDiffData {
    pub baseline: SessionSummary,
    pub candidate: SessionSummary,
    /// Rows in key order.
    pub modules: Vec<ModuleDiffRow>,
    /// Rows by module key.
    pub module_map: HashMap<String, ModuleDiffRow>,
    pub fps_delta: Option<f64>,
    pub device_differs: bool,
}

impl SessionDiffData {
    /// Look up the row for a module key.
    pub fn row(&self, module_key: &str) -> Option<&ModuleDiffRow> {
        self.module_map.get(module_key)
    }

    /// Check if no module keys were compared.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Index ordered rows by module key.
pub(crate) fn index_rows(rows: &[ModuleDiffRow]) -> HashMap<String, ModuleDiffRow> {
    rows.iter()
        .map(|row| (row.module_key.clone(), row.clone()))
        .collect()
}
