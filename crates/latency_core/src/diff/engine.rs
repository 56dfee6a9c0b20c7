//! Session diff computation.
//!
//! Pure function - no I/O, no side effects.

use std::collections::HashSet;

use super::order::sort_keys;
use super::types::{
    index_rows, DeviceDiff, ModuleDiffRow, SessionDiffData, SessionSummary, StatDelta,
};
use crate::stats::StatsResult;

/// Compare a candidate session against a baseline.
///
/// Returns `None` if either side is absent. With `keys` the rows follow the
/// caller's order (duplicates dropped); without, they cover the union of both
/// sessions' module keys in display order (see [`compare_keys`](super::compare_keys)).
///
/// A metric delta is only computed when both sides have samples for that key
/// and both values are present.
pub fn compute_session_diff(
    baseline: Option<&SessionSummary>,
    candidate: Option<&SessionSummary>,
    keys: Option<&[String]>,
) -> Option<SessionDiffData> {
    let (baseline, candidate) = (baseline?, candidate?);

    let keys = match keys {
        Some(explicit) => dedup_in_order(explicit),
        None => {
            let mut union: Vec<String> = baseline
                .module_stats
                .keys()
                .chain(candidate.module_stats.keys())
                .cloned()
                .collect();
            sort_keys(&mut union);
            union
        }
    };

    let fps_delta = match (baseline.fps, candidate.fps) {
        (Some(b), Some(c)) => Some(c - b),
        _ => None,
    };

    let baseline_device = device_of(baseline);
    let candidate_device = device_of(candidate);
    let device_differs = baseline_device != candidate_device;
    let device_diff = device_differs.then(|| DeviceDiff {
        baseline: baseline_device.map(str::to_string),
        candidate: candidate_device.map(str::to_string),
    });

    let modules: Vec<ModuleDiffRow> = keys
        .into_iter()
        .map(|module_key| {
            let baseline_stats = baseline.module_stats.get(&module_key).copied();
            let candidate_stats = candidate.module_stats.get(&module_key).copied();
            ModuleDiffRow {
                delta: stat_delta(baseline_stats.as_ref(), candidate_stats.as_ref()),
                module_key,
                baseline_stats,
                candidate_stats,
                fps_delta,
                device_diff: device_diff.clone(),
            }
        })
        .collect();

    let module_map = index_rows(&modules);

    Some(SessionDiffData {
        baseline: baseline.clone(),
        candidate: candidate.clone(),
        modules,
        module_map,
        fps_delta,
        device_differs,
    })
}

fn dedup_in_order(keys: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.iter()
        .filter(|k| seen.insert(k.as_str()))
        .cloned()
        .collect()
}

/// Device summary with empty strings treated as absent.
fn device_of(summary: &SessionSummary) -> Option<&str> {
    summary.device_summary.as_deref().filter(|s| !s.is_empty())
}

fn stat_delta(baseline: Option<&StatsResult>, candidate: Option<&StatsResult>) -> StatDelta {
    let metric = |pick: fn(&StatsResult) -> Option<f64>| {
        let b = baseline.filter(|s| s.has_samples()).and_then(pick)?;
        let c = candidate.filter(|s| s.has_samples()).and_then(pick)?;
        Some(c - b)
    };

    StatDelta {
        min: metric(|s| s.min),
        avg: metric(|s| s.avg),
        max: metric(|s| s.max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(min: f64, avg: f64, max: f64, total: usize) -> StatsResult {
        StatsResult {
            min: Some(min),
            avg: Some(avg),
            max: Some(max),
            total,
        }
    }

    fn summary(id: &str, fps: f64, device: &str, modules: &[(&str, StatsResult)]) -> SessionSummary {
        SessionSummary {
            test_case_id: id.to_string(),
            execution_id: "run-1".to_string(),
            test_case_name: id.to_string(),
            execution_name: "run-1".to_string(),
            dataset_source: None,
            fps: Some(fps),
            device_summary: Some(device.to_string()),
            module_stats: modules
                .iter()
                .map(|(k, s)| (k.to_string(), *s))
                .collect(),
        }
    }

    #[test]
    fn returns_none_when_missing_inputs() {
        let base = summary("a", 60.0, "Rig A", &[]);
        assert!(compute_session_diff(None, None, None).is_none());
        assert!(compute_session_diff(Some(&base), None, None).is_none());
        assert!(compute_session_diff(None, Some(&base), None).is_none());
    }

    #[test]
    fn produces_rows_for_shared_modules() {
        let baseline = summary("case-1", 60.0, "Rig A", &[("foo", stats(1.0, 2.0, 3.0, 3))]);
        let candidate = summary("case-2", 62.0, "Rig B", &[("foo", stats(2.0, 3.0, 4.0, 3))]);

        let diff = compute_session_diff(Some(&baseline), Some(&candidate), None).unwrap();

        assert_eq!(diff.modules.len(), 1);
        let row = &diff.modules[0];
        assert!((row.delta.avg.unwrap() - 1.0).abs() < 1e-9);
        assert!((row.delta.min.unwrap() - 1.0).abs() < 1e-9);
        assert!((row.delta.max.unwrap() - 1.0).abs() < 1e-9);
        assert!(diff.device_differs);
        assert!((diff.fps_delta.unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(
            row.device_diff,
            Some(DeviceDiff {
                baseline: Some("Rig A".to_string()),
                candidate: Some("Rig B".to_string()),
            })
        );
        assert_eq!(diff.row("foo"), Some(row));
    }

    #[test]
    fn zero_sample_side_yields_no_delta() {
        let baseline = summary("a", 60.0, "Rig", &[("foo", stats(1.0, 2.0, 3.0, 3))]);
        let candidate = summary("b", 60.0, "Rig", &[("foo", stats(0.0, 0.0, 0.0, 0))]);

        let diff = compute_session_diff(Some(&baseline), Some(&candidate), None).unwrap();
        assert_eq!(diff.modules[0].delta, StatDelta::default());
        assert!(!diff.device_differs);
        assert_eq!(diff.modules[0].device_diff, None);
    }

    #[test]
    fn one_sided_key_has_no_delta() {
        let baseline = summary("a", 60.0, "Rig", &[("only-base", stats(1.0, 1.0, 1.0, 1))]);
        let candidate = summary("b", 60.0, "Rig", &[("only-cand", stats(1.0, 1.0, 1.0, 1))]);

        let diff = compute_session_diff(Some(&baseline), Some(&candidate), None).unwrap();
        let keys: Vec<&str> = diff.modules.iter().map(|r| r.module_key.as_str()).collect();
        assert_eq!(keys, vec!["only-base", "only-cand"]);
        assert!(diff.modules.iter().all(|r| r.delta == StatDelta::default()));
        assert!(diff.row("only-cand").unwrap().baseline_stats.is_none());
    }

    #[test]
    fn default_keys_are_sorted_union() {
        let baseline = summary("a", 60.0, "Rig", &[("b", stats(1.0, 1.0, 1.0, 1)), ("Z", stats(1.0, 1.0, 1.0, 1))]);
        let candidate = summary("b", 60.0, "Rig", &[("a", stats(1.0, 1.0, 1.0, 1)), ("b", stats(2.0, 2.0, 2.0, 1))]);

        let diff = compute_session_diff(Some(&baseline), Some(&candidate), None).unwrap();
        let keys: Vec<&str> = diff.modules.iter().map(|r| r.module_key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "Z"]);
    }

    #[test]
    fn default_keys_ignore_case() {
        let one = stats(1.0, 1.0, 1.0, 1);
        let baseline = summary("a", 60.0, "Rig", &[("output", one), ("Input", one)]);
        let candidate = summary("b", 60.0, "Rig", &[("Zeta", one), ("alpha", one)]);

        let diff = compute_session_diff(Some(&baseline), Some(&candidate), None).unwrap();
        let keys: Vec<&str> = diff.modules.iter().map(|r| r.module_key.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "Input", "output", "Zeta"]);
    }

    #[test]
    fn explicit_keys_keep_caller_order() {
        let baseline = summary("a", 60.0, "Rig", &[("x", stats(1.0, 1.0, 1.0, 1))]);
        let candidate = summary("b", 60.0, "Rig", &[("x", stats(2.0, 2.0, 2.0, 1))]);
        let keys = vec!["x".to_string(), "missing".to_string(), "x".to_string()];

        let diff = compute_session_diff(Some(&baseline), Some(&candidate), Some(&keys)).unwrap();
        let order: Vec<&str> = diff.modules.iter().map(|r| r.module_key.as_str()).collect();
        assert_eq!(order, vec!["x", "missing"]);
        assert_eq!(diff.module_map.len(), 2);
    }

    #[test]
    fn empty_explicit_keys_give_empty_diff() {
        let baseline = summary("a", 60.0, "Rig", &[("x", stats(1.0, 1.0, 1.0, 1))]);
        let diff = compute_session_diff(Some(&baseline), Some(&baseline), Some(&[])).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn missing_fps_and_empty_devices() {
        let mut baseline = summary("a", 60.0, "", &[]);
        let mut candidate = summary("b", 60.0, "", &[]);
        baseline.fps = None;
        candidate.device_summary = None;

        let diff = compute_session_diff(Some(&baseline), Some(&candidate), None).unwrap();
        assert_eq!(diff.fps_delta, None);
        assert!(!diff.device_differs);
    }

    #[test]
    fn absent_device_differs_from_present() {
        let baseline = summary("a", 60.0, "Rig", &[("x", stats(1.0, 1.0, 1.0, 1))]);
        let mut candidate = baseline.clone();
        candidate.device_summary = None;

        let diff = compute_session_diff(Some(&baseline), Some(&candidate), None).unwrap();
        assert!(diff.device_differs);
        assert_eq!(
            diff.modules[0].device_diff,
            Some(DeviceDiff {
                baseline: Some("Rig".to_string()),
                candidate: None,
            })
        );
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let baseline = summary("a", 60.0, "Rig", &[("x", stats(1.0, 1.0, 1.0, 1))]);
        let diff = compute_session_diff(Some(&baseline), Some(&baseline), None).unwrap();

        let json = serde_json::to_value(&diff).unwrap();
        assert!(json.get("moduleMap").is_some());
        assert!(json.get("deviceDiffers").is_some());
        assert_eq!(json["modules"][0]["moduleKey"], "x");
        assert_eq!(json["baseline"]["moduleStats"]["x"]["total"], 1);
    }
}
