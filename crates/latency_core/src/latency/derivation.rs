//! Start/end marker pairing.
//!
//! The pass is a fold over the sorted markers. The accumulator carries the
//! module cursor, one pending start per module key, the samples collected so
//! far and the shared warning list.

use std::cmp::Ordering;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::vocabulary::{MarkerRole, MarkerVocabulary};
use crate::models::{MarkerEvent, ModuleLatency};
use crate::stats::compute_stats;

/// Cursor value when no module could be determined.
pub const UNSPECIFIED_MODULE: &str = "Unspecified module";

/// Axis key when a marker name carries no axis token.
pub const UNSPECIFIED_AXIS: &str = "Unspecified";

static AXIS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([XYZ])([+-])?").expect("axis pattern is valid"));

/// Result of a derivation pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivationOutcome {
    /// One entry per module key that produced at least one sample,
    /// in order of first sample.
    pub modules: Vec<ModuleLatency>,
    /// Orphan end-marker warnings for the whole pass.
    pub warnings: Vec<String>,
}

/// Derive per-module latencies with the default vocabulary.
pub fn derive_module_latencies(markers: &[MarkerEvent]) -> Vec<ModuleLatency> {
    derive(markers, &MarkerVocabulary::default()).modules
}

/// Derive per-module latencies.
///
/// Markers without a usable timestamp are dropped, the rest are sorted by
/// timestamp (ties keep input order) and paired per module:
/// - a start marker (re)arms the module's pending start; an unconsumed
///   earlier start is silently replaced
/// - an end marker with an armed start yields `end - start` (negative values
///   are kept as-is) and disarms
/// - an end marker with nothing armed adds a warning and no sample
pub fn derive(markers: &[MarkerEvent], vocabulary: &MarkerVocabulary) -> DerivationOutcome {
    let mut sorted: Vec<&MarkerEvent> = markers.iter().filter(|m| m.has_valid_timestamp()).collect();
    sorted.sort_by(|a, b| {
        a.timestamp_ms
            .partial_cmp(&b.timestamp_ms)
            .unwrap_or(Ordering::Equal)
    });

    let state = sorted
        .into_iter()
        .fold(DerivationState::default(), |state, marker| {
            state.step(marker, vocabulary)
        });

    let outcome = state.finish();
    tracing::debug!(
        modules = outcome.modules.len(),
        warnings = outcome.warnings.len(),
        "Derived module latencies"
    );
    outcome
}

/// Extract an axis token (`X`, `Y+`, `Z-`, ...) from free text.
///
/// Returns [`UNSPECIFIED_AXIS`] if the text has no axis letter.
pub fn extract_axis_from_text(text: &str) -> String {
    let Some(caps) = AXIS_PATTERN.captures(text) else {
        return UNSPECIFIED_AXIS.to_string();
    };

    let axis = caps[1].to_uppercase();
    match caps.get(2) {
        Some(direction) => format!("{}{}", axis, direction.as_str()),
        None => axis,
    }
}

/// Accumulator threaded through the fold.
#[derive(Debug, Default)]
struct DerivationState {
    cursor: String,
    /// Armed start timestamp per module key.
    pending_starts: HashMap<String, f64>,
    /// Samples per module key, in discovery order.
    by_module: Vec<(String, Vec<f64>)>,
    warnings: Vec<String>,
}

impl DerivationState {
    fn step(mut self, marker: &MarkerEvent, vocabulary: &MarkerVocabulary) -> Self {
        self.cursor = next_module_key(marker, &self.cursor, vocabulary);
        let module = if self.cursor.is_empty() {
            UNSPECIFIED_MODULE.to_string()
        } else {
            self.cursor.clone()
        };

        match vocabulary.classify(&marker.name) {
            MarkerRole::Start => {
                self.pending_starts.insert(module, marker.timestamp_ms);
            }
            MarkerRole::End => match self.pending_starts.remove(&module) {
                Some(start_ms) => self.push_sample(module, marker.timestamp_ms - start_ms),
                None => {
                    tracing::debug!(marker = %marker.name, module = %module, "Orphan end marker");
                    self.warnings.push(format!(
                        "Found {} without a preceding start marker for {}.",
                        marker.name, module
                    ));
                }
            },
            MarkerRole::Other => {}
        }

        self
    }

    fn push_sample(&mut self, module: String, latency_ms: f64) {
        match self.by_module.iter_mut().find(|(key, _)| *key == module) {
            Some((_, samples)) => samples.push(latency_ms),
            None => self.by_module.push((module, vec![latency_ms])),
        }
    }

    fn finish(self) -> DerivationOutcome {
        let warnings = self.warnings;
        let modules = self
            .by_module
            .into_iter()
            .map(|(module_under_test, samples)| ModuleLatency {
                module_under_test,
                stats: compute_stats(&samples),
                samples,
                warnings: warnings.clone(),
            })
            .collect();

        DerivationOutcome { modules, warnings }
    }
}

/// Decide the module key for a marker given the current cursor.
///
/// Priority: module-color marker (comment, then name), explicit module,
/// comment, existing cursor, axis field, axis token in the name.
fn next_module_key(marker: &MarkerEvent, current: &str, vocabulary: &MarkerVocabulary) -> String {
    let trimmed = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if vocabulary.is_module_color(marker.color.as_deref()) {
        if let Some(comment) = trimmed(&marker.comment) {
            return comment;
        }
        let name = marker.name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
        if !current.is_empty() {
            return current.to_string();
        }
        return UNSPECIFIED_MODULE.to_string();
    }

    if let Some(module) = marker.module_under_test.as_deref().filter(|m| !m.is_empty()) {
        return module.to_string();
    }
    if let Some(comment) = trimmed(&marker.comment) {
        return comment;
    }
    if !current.is_empty() && current != UNSPECIFIED_MODULE {
        return current.to_string();
    }
    if let Some(axis) = marker.axis.as_deref().filter(|a| !a.is_empty()) {
        return axis.to_string();
    }
    if !current.is_empty() {
        return current.to_string();
    }
    extract_axis_from_text(&marker.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_marker(comment: &str, t: f64) -> MarkerEvent {
        MarkerEvent::new("Metadata", t)
            .with_color("Yellow")
            .with_comment(comment)
    }

    fn find<'a>(modules: &'a [ModuleLatency], key: &str) -> &'a ModuleLatency {
        modules
            .iter()
            .find(|m| m.module_under_test == key)
            .unwrap_or_else(|| panic!("module {} not derived", key))
    }

    #[test]
    fn module_markers_set_the_active_module() {
        let markers = vec![
            module_marker("Input", 0.0),
            MarkerEvent::new("TagOff", 5.0),
            MarkerEvent::new("MotionStart", 55.0),
            module_marker("Output", 60.0),
            MarkerEvent::new("TagOff", 65.0),
            MarkerEvent::new("MotionStart", 115.0),
        ];

        let modules = derive_module_latencies(&markers);

        assert_eq!(modules.len(), 2);
        assert_eq!(find(&modules, "Input").samples, vec![50.0]);
        assert_eq!(find(&modules, "Output").samples, vec![50.0]);
        assert_eq!(find(&modules, "Input").stats.avg, Some(50.0));
    }

    #[test]
    fn falls_back_to_comment_without_module_marker() {
        let markers = vec![
            MarkerEvent::new("TagOff X+", 0.0).with_comment("Legacy axis path"),
            MarkerEvent::new("MotionStart X+", 20.0),
        ];

        let modules = derive_module_latencies(&markers);
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].module_under_test, "Legacy axis path");
        assert_eq!(modules[0].samples, vec![20.0]);
    }

    #[test]
    fn orphan_end_marker_warns_once_without_sample() {
        let markers = vec![MarkerEvent::new("MotionStart", 10.0).with_module("Input")];

        let outcome = derive(&markers, &MarkerVocabulary::default());

        assert!(outcome.modules.is_empty());
        assert_eq!(
            outcome.warnings,
            vec!["Found MotionStart without a preceding start marker for Input.".to_string()]
        );
    }

    #[test]
    fn warnings_are_shared_across_modules() {
        let markers = vec![
            MarkerEvent::new("MotionStart", 0.0).with_module("A"),
            MarkerEvent::new("TagOff", 10.0).with_module("B"),
            MarkerEvent::new("MotionStart", 30.0).with_module("B"),
        ];

        let outcome = derive(&markers, &MarkerVocabulary::default());
        assert_eq!(outcome.modules.len(), 1);
        assert_eq!(outcome.modules[0].warnings, outcome.warnings);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn last_start_wins() {
        let markers = vec![
            MarkerEvent::new("TagOff", 0.0).with_module("A"),
            MarkerEvent::new("TagOff", 10.0).with_module("A"),
            MarkerEvent::new("MotionStart", 25.0).with_module("A"),
        ];

        let outcome = derive(&markers, &MarkerVocabulary::default());
        assert_eq!(outcome.modules[0].samples, vec![15.0]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn end_consumes_pending_start() {
        let markers = vec![
            MarkerEvent::new("TagOff", 0.0).with_module("A"),
            MarkerEvent::new("MotionStart", 10.0).with_module("A"),
            MarkerEvent::new("MotionStart", 20.0).with_module("A"),
        ];

        let outcome = derive(&markers, &MarkerVocabulary::default());
        assert_eq!(outcome.modules[0].samples, vec![10.0]);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn sorts_by_timestamp_before_pairing() {
        let markers = vec![
            MarkerEvent::new("MotionStart", 40.0).with_module("A"),
            MarkerEvent::new("TagOff", 5.0).with_module("A"),
        ];

        let modules = derive_module_latencies(&markers);
        assert_eq!(modules[0].samples, vec![35.0]);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        // End listed after start at the same instant: zero latency
        let markers = vec![
            MarkerEvent::new("TagOff", 10.0).with_module("A"),
            MarkerEvent::new("MotionStart", 10.0).with_module("A"),
        ];
        assert_eq!(derive_module_latencies(&markers)[0].samples, vec![0.0]);

        // Reversed input order: the end comes first and is an orphan
        let reversed = vec![
            MarkerEvent::new("MotionStart", 10.0).with_module("A"),
            MarkerEvent::new("TagOff", 10.0).with_module("A"),
        ];
        let outcome = derive(&reversed, &MarkerVocabulary::default());
        assert!(outcome.modules.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn drops_markers_without_usable_timestamp() {
        let markers = vec![
            MarkerEvent::new("TagOff", f64::NAN).with_module("A"),
            MarkerEvent::new("TagOff", 0.0).with_module("A"),
            MarkerEvent::new("MotionStart", f64::INFINITY).with_module("A"),
            MarkerEvent::new("MotionStart", 12.0).with_module("A"),
        ];
        assert_eq!(derive_module_latencies(&markers)[0].samples, vec![12.0]);
    }

    #[test]
    fn modules_are_listed_in_discovery_order() {
        let markers = vec![
            MarkerEvent::new("TagOff", 0.0).with_module("Zeta"),
            MarkerEvent::new("TagOff", 1.0).with_module("Alpha"),
            MarkerEvent::new("MotionStart", 5.0).with_module("Zeta"),
            MarkerEvent::new("MotionStart", 9.0).with_module("Alpha"),
            MarkerEvent::new("TagOff", 10.0).with_module("Zeta"),
            MarkerEvent::new("MotionStart", 30.0).with_module("Zeta"),
        ];

        let modules = derive_module_latencies(&markers);
        let keys: Vec<&str> = modules.iter().map(|m| m.module_under_test.as_str()).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha"]);
        assert_eq!(modules[0].samples, vec![5.0, 20.0]);
        assert_eq!(modules[0].stats.total, 2);
    }

    #[test]
    fn axis_field_and_axis_token_fallbacks() {
        let with_axis = vec![
            MarkerEvent::new("TagOff", 0.0).with_axis("Y-"),
            MarkerEvent::new("MotionStart", 30.0),
        ];
        assert_eq!(derive_module_latencies(&with_axis)[0].module_under_test, "Y-");

        let from_name = vec![
            MarkerEvent::new("TagOff z+", 0.0),
            MarkerEvent::new("MotionStart", 30.0),
        ];
        assert_eq!(derive_module_latencies(&from_name)[0].module_under_test, "Z+");
    }

    #[test]
    fn explicit_module_beats_comment() {
        let markers = vec![
            MarkerEvent::new("TagOff", 0.0)
                .with_module("Explicit")
                .with_comment("Commented"),
            MarkerEvent::new("MotionStart", 8.0),
        ];
        assert_eq!(derive_module_latencies(&markers)[0].module_under_test, "Explicit");
    }

    #[test]
    fn module_marker_without_comment_uses_name() {
        let markers = vec![
            MarkerEvent::new(" Camera path ", 0.0).with_color("yellow"),
            MarkerEvent::new("Press", 10.0),
            MarkerEvent::new("Response", 22.0),
        ];
        assert_eq!(derive_module_latencies(&markers)[0].module_under_test, "Camera path");
    }

    #[test]
    fn inverted_pairs_are_not_clamped() {
        let vocabulary = MarkerVocabulary::default();
        let state = DerivationState::default()
            .step(&MarkerEvent::new("TagOff", 80.0).with_module("A"), &vocabulary)
            .step(&MarkerEvent::new("MotionStart", 30.0).with_module("A"), &vocabulary);

        assert_eq!(state.finish().modules[0].samples, vec![-50.0]);
    }

    #[test]
    fn extracts_axis_tokens() {
        assert_eq!(extract_axis_from_text("TagOff X+"), "X+");
        assert_eq!(extract_axis_from_text("y- motion"), "Y-");
        assert_eq!(extract_axis_from_text("Z"), "Z");
        assert_eq!(extract_axis_from_text("TagOff"), UNSPECIFIED_AXIS);
    }
}
