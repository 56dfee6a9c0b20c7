//! Requirement templates: latency thresholds checked against measured stats.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::summary::StatsResult;

/// Upper latency bound for one module/axis key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementThreshold {
    /// Module or axis key the threshold applies to.
    pub axis: String,
    /// Maximum allowed latency in milliseconds.
    pub max_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A named, revisioned set of thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub thresholds: Vec<RequirementThreshold>,
    pub revision: u32,
}

/// Outcome of checking one threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementEvaluation {
    pub axis: String,
    pub measured: StatsResult,
    pub threshold: RequirementThreshold,
    pub passed: bool,
}

/// Evaluate every threshold of the template against the measured stats.
///
/// The worst available metric is compared (max, then avg, then min). A key
/// without any measurement fails.
pub fn evaluate_requirements(
    stats_by_key: &HashMap<String, StatsResult>,
    template: &RequirementTemplate,
) -> Vec<RequirementEvaluation> {
    template
        .thresholds
        .iter()
        .map(|threshold| {
            let measured = stats_by_key
                .get(&threshold.axis)
                .copied()
                .unwrap_or_default();
            let value = measured.max.or(measured.avg).or(measured.min);
            let passed = value.is_some_and(|v| v <= threshold.max_ms);

            RequirementEvaluation {
                axis: threshold.axis.clone(),
                measured,
                threshold: threshold.clone(),
                passed,
            }
        })
        .collect()
}

/// Short revision description, e.g. `Rev 3 · 2 thresholds`.
pub fn describe_template_revision(template: &RequirementTemplate) -> String {
    format!(
        "Rev {} · {} thresholds",
        template.revision,
        template.thresholds.len()
    )
}
