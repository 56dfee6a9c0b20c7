//! Marker events: named, timestamped occurrences in a test run.

use serde::{Deserialize, Serialize};

/// A single marker on the test-run timeline.
///
/// Events are immutable once created. Ordering is by `timestamp_ms`, ties
/// broken by input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerEvent {
    /// Marker name (e.g. `TagOff`, `MotionStart X+`).
    pub name: String,
    /// Position on the timeline in milliseconds.
    pub timestamp_ms: f64,
    /// Axis label, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<String>,
    /// Marker color as exported by the editing tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Free-text comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Explicit module-under-test tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_under_test: Option<String>,
}

impl MarkerEvent {
    /// Create a marker with just a name and timestamp.
    pub fn new(name: impl Into<String>, timestamp_ms: f64) -> Self {
        Self {
            name: name.into(),
            timestamp_ms,
            axis: None,
            color: None,
            comment: None,
            module_under_test: None,
        }
    }

    /// Set the axis.
    pub fn with_axis(mut self, axis: impl Into<String>) -> Self {
        self.axis = Some(axis.into());
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the explicit module under test.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module_under_test = Some(module.into());
        self
    }

    /// Whether the timestamp is usable (finite and non-negative).
    pub fn has_valid_timestamp(&self) -> bool {
        self.timestamp_ms.is_finite() && self.timestamp_ms >= 0.0
    }
}
