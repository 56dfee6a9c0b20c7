//! Saved-session JSON import.
//!
//! The payload is an array of session-like objects. Each element is coerced
//! on its own: missing or malformed fields get defaults instead of failing
//! the whole import.

use serde_json::{Map, Value};

use super::error::{ImportError, ImportResult};
use super::options::ImportOptions;
use crate::latency::UNSPECIFIED_MODULE;
use crate::models::{DatasetSource, ExecutionSession, ModuleLatency};
use crate::stats::compute_stats;

/// Import saved sessions with default options.
pub fn import_sessions_json(content: &str) -> ImportResult<Vec<ExecutionSession>> {
    import_sessions_json_with(content, &ImportOptions::default())
}

/// Import saved sessions; `options` supplies the default fps and device.
///
/// Fails only if the content is not JSON or its root is not an array.
pub fn import_sessions_json_with(
    content: &str,
    options: &ImportOptions,
) -> ImportResult<Vec<ExecutionSession>> {
    let root: Value = serde_json::from_str(content)?;
    let entries = match root {
        Value::Array(entries) => entries,
        other => return Err(ImportError::invalid_root(&other)),
    };

    let sessions: Vec<ExecutionSession> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| coerce_session(index, entry, options))
        .collect();

    tracing::info!("Loaded {} sessions from saved JSON", sessions.len());
    Ok(sessions)
}

fn coerce_session(index: usize, entry: &Value, options: &ImportOptions) -> ExecutionSession {
    let empty = Map::new();
    let fields = entry.as_object().unwrap_or(&empty);

    let latencies = match fields.get("latencies") {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_latency).collect(),
        _ => Vec::new(),
    };

    let dataset_source = text(fields, "datasetSource")
        .and_then(DatasetSource::from_tag)
        .unwrap_or_default();

    let fps = fields
        .get("fps")
        .and_then(Value::as_f64)
        .filter(|fps| fps.is_finite() && *fps > 0.0)
        .unwrap_or(options.fps);

    ExecutionSession {
        test_case_id: text_or(fields, "testCaseId", || format!("json-{}", index)),
        execution_id: text_or(fields, "executionId", || format!("run-{}", index)),
        name: text_or(fields, "name", || format!("JSON Session {}", index + 1)),
        device_profile_id: text(fields, "deviceProfileId")
            .or_else(|| text(fields, "hardwareProfileId"))
            .map(str::to_string)
            .unwrap_or_else(|| options.device_profile_id.clone()),
        latencies,
        dataset_source,
        fps,
        notes: text(fields, "notes").map(str::to_string),
    }
}

/// Coerce one latency entry; non-objects are dropped.
fn coerce_latency(entry: &Value) -> Option<ModuleLatency> {
    let fields = entry.as_object()?;

    let module_under_test = text(fields, "moduleUnderTest")
        .or_else(|| text(fields, "axis"))
        .unwrap_or(UNSPECIFIED_MODULE)
        .to_string();

    let samples: Vec<f64> = match fields.get("samples") {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_f64)
            .filter(|v| v.is_finite())
            .collect(),
        _ => Vec::new(),
    };

    let warnings = match fields.get("warnings") {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    Some(ModuleLatency {
        module_under_test,
        stats: compute_stats(&samples),
        samples,
        warnings,
    })
}

/// Non-empty string field.
fn text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn text_or(fields: &Map<String, Value>, key: &str, default: impl FnOnce() -> String) -> String {
    text(fields, key).map(str::to_string).unwrap_or_else(default)
}
