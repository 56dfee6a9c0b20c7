//! Diff status for the comparison panel.
//!
//! Pure function - no I/O, no side effects. Checks run in a fixed order and
//! earlier checks mask later ones.

use serde::{Deserialize, Serialize};

use super::types::SessionDiffData;
use crate::models::ExecutionKey;

const IDLE_MESSAGE: &str = "Select a baseline and candidate dataset to calculate differences.";
const LOADING_SESSIONS_MESSAGE: &str = "Loading session data…";
const BOTH_MISSING_MESSAGE: &str =
    "Selected sessions are no longer available. Choose a new baseline and candidate.";
const BASELINE_MISSING_MESSAGE: &str =
    "The baseline session is no longer available. Pick another dataset.";
const CANDIDATE_MISSING_MESSAGE: &str =
    "The candidate session is no longer available. Pick another dataset.";
const CALCULATING_MESSAGE: &str = "Calculating session deltas…";
const NO_COMPARABLE_MESSAGE: &str =
    "No comparable module measurements were detected between the selected sessions.";

/// Baseline/candidate choice. Either side may be unset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffSelection {
    pub baseline: Option<ExecutionKey>,
    pub candidate: Option<ExecutionKey>,
}

impl DiffSelection {
    pub fn new(baseline: ExecutionKey, candidate: ExecutionKey) -> Self {
        Self {
            baseline: Some(baseline),
            candidate: Some(candidate),
        }
    }

    /// Check if both sides are chosen.
    pub fn is_complete(&self) -> bool {
        self.baseline.is_some() && self.candidate.is_some()
    }
}

/// Inputs to [`derive_session_diff_status`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffStatusInput<'a> {
    pub selection: Option<&'a DiffSelection>,
    pub diff_data: Option<&'a SessionDiffData>,
    pub baseline_available: bool,
    pub candidate_available: bool,
    pub has_executions: bool,
}

/// Coarse state of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    Idle,
    Loading,
    Error,
    Ready,
}

/// Status plus the message to show for it (empty when ready).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStatusReport {
    pub status: DiffStatus,
    pub message: String,
}

impl DiffStatusReport {
    fn new(status: DiffStatus, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

/// Derive the status of a comparison.
///
/// Precedence: incomplete selection, sessions not loaded, both sides gone,
/// one side gone, diff pending, diff without rows, ready.
pub fn derive_session_diff_status(input: &DiffStatusInput<'_>) -> DiffStatusReport {
    if !input.selection.is_some_and(DiffSelection::is_complete) {
        return DiffStatusReport::new(DiffStatus::Idle, IDLE_MESSAGE);
    }
    if !input.has_executions {
        return DiffStatusReport::new(DiffStatus::Loading, LOADING_SESSIONS_MESSAGE);
    }
    let missing = match (input.baseline_available, input.candidate_available) {
        (false, false) => Some(BOTH_MISSING_MESSAGE),
        (false, true) => Some(BASELINE_MISSING_MESSAGE),
        (true, false) => Some(CANDIDATE_MISSING_MESSAGE),
        (true, true) => None,
    };
    if let Some(message) = missing {
        return DiffStatusReport::new(DiffStatus::Error, message);
    }
    match input.diff_data {
        None => DiffStatusReport::new(DiffStatus::Loading, CALCULATING_MESSAGE),
        Some(diff) if diff.is_empty() => {
            DiffStatusReport::new(DiffStatus::Error, NO_COMPARABLE_MESSAGE)
        }
        Some(_) => DiffStatusReport::new(DiffStatus::Ready, ""),
    }
}
