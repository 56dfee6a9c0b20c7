//! Persisted application state and its schema history.
//!
//! Comparison queue (version 3):
//! - v1: bare array of execution keys
//! - v2: `{queue, mode, diffData}`
//! - v3: device naming (`deviceSummary`, `deviceDiff`, `deviceDiffers`) and
//!   module-keyed diff rows with a `moduleMap`
//!
//! Session collection (version 2):
//! - v1: `hardwareProfileId` and per-latency `axis`
//! - v2: `deviceProfileId` and `moduleUnderTest`

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

use super::backend::KeyValueStore;
use super::versioned::{MigrationChain, VersionedStorage};
use crate::config::StorageSettings;
use crate::diff::SessionDiffData;
use crate::models::{ComparisonMode, ExecutionSession, SessionCollection};

/// Schema version of the comparison queue.
pub const COMPARISON_VERSION: u32 = 3;

/// Schema version of the session collection.
pub const SESSIONS_VERSION: u32 = 2;

/// Sessions queued for comparison plus the last computed diff.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonState {
    /// Encoded execution keys.
    #[serde(default)]
    pub queue: Vec<String>,
    #[serde(default)]
    pub mode: ComparisonMode,
    /// Last computed diff. Derived data, so an unreadable value decodes as
    /// `None` instead of failing the whole state.
    #[serde(default, deserialize_with = "lenient_diff_data")]
    pub diff_data: Option<SessionDiffData>,
}

impl ComparisonState {
    /// Queue every session, in order, with no diff yet.
    pub fn seeded(sessions: &[ExecutionSession]) -> Self {
        Self {
            queue: sessions
                .iter()
                .map(|s| s.execution_key().encode())
                .filter(|k| !k.is_empty())
                .collect(),
            mode: ComparisonMode::Full,
            diff_data: None,
        }
    }
}

fn lenient_diff_data<'de, D>(deserializer: D) -> Result<Option<SessionDiffData>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(decode_diff_data))
}

/// Decode a stored diff, adapting the axis-keyed shape first.
fn decode_diff_data(value: Value) -> Option<SessionDiffData> {
    let Value::Object(diff) = value else {
        return None;
    };
    match serde_json::from_value(migrate_diff_data(diff)) {
        Ok(diff) => Some(diff),
        Err(e) => {
            tracing::warn!("Dropping unreadable comparison diff: {}", e);
            None
        }
    }
}

/// Storage for the comparison queue.
pub fn comparison_storage(
    store: Arc<dyn KeyValueStore>,
    settings: &StorageSettings,
) -> VersionedStorage<ComparisonState> {
    VersionedStorage::new(&settings.comparison_key, COMPARISON_VERSION, store)
        .with_migrations(comparison_migrations())
}

/// Storage for the session collection.
pub fn session_storage(
    store: Arc<dyn KeyValueStore>,
    settings: &StorageSettings,
) -> VersionedStorage<SessionCollection> {
    VersionedStorage::new(&settings.sessions_key, SESSIONS_VERSION, store)
        .with_migrations(session_migrations())
}

/// Migrations of the comparison queue.
pub fn comparison_migrations() -> MigrationChain {
    MigrationChain::new()
        .with_step(2, migrate_comparison_v2)
        .with_step(3, migrate_comparison_v3)
}

/// Migrations of the session collection.
pub fn session_migrations() -> MigrationChain {
    MigrationChain::new().with_step(2, migrate_sessions_v2)
}

fn migrate_comparison_v2(data: Value) -> Value {
    match data {
        Value::Array(queue) => json!({ "queue": queue, "mode": "full", "diffData": null }),
        other => other,
    }
}

fn migrate_comparison_v3(mut data: Value) -> Value {
    let Some(state) = data.as_object_mut() else {
        return data;
    };

    let diff = match state.remove("diffData") {
        Some(Value::Object(diff)) => migrate_diff_data(diff),
        _ => Value::Null,
    };
    state.insert("diffData".to_string(), diff);
    data
}

fn migrate_diff_data(mut diff: Map<String, Value>) -> Value {
    for side in ["baseline", "candidate"] {
        if let Some(Value::Object(summary)) = diff.get_mut(side) {
            rename_field(summary, "hardwareSummary", "deviceSummary");
            rename_field(summary, "axisStats", "moduleStats");
        }
    }

    let rows_value = match diff.remove("modules") {
        Some(Value::Array(rows)) => Some(rows),
        _ => match diff.remove("axes") {
            Some(Value::Array(rows)) => Some(rows),
            _ => None,
        },
    };
    let rows: Vec<Value> = rows_value
        .unwrap_or_default()
        .into_iter()
        .map(migrate_diff_row)
        .collect();

    let module_map: Map<String, Value> = rows
        .iter()
        .filter_map(|row| {
            let key = row.get("moduleKey")?.as_str()?;
            Some((key.to_string(), row.clone()))
        })
        .collect();

    rename_field(&mut diff, "hardwareDiffers", "deviceDiffers");
    if !diff.get("deviceDiffers").is_some_and(Value::is_boolean) {
        diff.insert("deviceDiffers".to_string(), Value::Bool(false));
    }

    for stale in ["axes", "axisMap", "axisAggregate"] {
        diff.remove(stale);
    }
    diff.insert("modules".to_string(), Value::Array(rows));
    diff.insert("moduleMap".to_string(), Value::Object(module_map));
    Value::Object(diff)
}

fn migrate_diff_row(mut row: Value) -> Value {
    if let Some(fields) = row.as_object_mut() {
        rename_field(fields, "axisKey", "moduleKey");
        rename_field(fields, "hardwareDiff", "deviceDiff");
        fields.entry("deviceDiff").or_insert(Value::Null);
    }
    row
}

fn migrate_sessions_v2(mut data: Value) -> Value {
    let Some(sessions) = data.as_array_mut() else {
        return data;
    };

    for session in sessions.iter_mut().filter_map(Value::as_object_mut) {
        rename_field(session, "hardwareProfileId", "deviceProfileId");
        if let Some(Value::Array(latencies)) = session.get_mut("latencies") {
            for latency in latencies.iter_mut().filter_map(Value::as_object_mut) {
                rename_field(latency, "axis", "moduleUnderTest");
            }
        }
    }
    data
}

/// Move `from` to `to` unless `to` already holds a non-null value.
fn rename_field(fields: &mut Map<String, Value>, from: &str, to: &str) {
    let Some(value) = fields.remove(from) else {
        return;
    };
    if fields.get(to).map_or(true, Value::is_null) {
        fields.insert(to.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DatasetSource, ModuleLatency};
    use crate::stats::compute_stats;
    use crate::storage::MemoryStore;

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    fn session(id: &str) -> ExecutionSession {
        ExecutionSession {
            test_case_id: id.to_string(),
            execution_id: format!("{}-run", id),
            name: format!("Session {}", id),
            device_profile_id: "rig-a".to_string(),
            latencies: vec![ModuleLatency {
                module_under_test: "Input".to_string(),
                samples: vec![30.0, 34.0],
                stats: compute_stats(&[30.0, 34.0]),
                warnings: Vec::new(),
            }],
            dataset_source: DatasetSource::ManualEntry,
            fps: 60.0,
            notes: None,
        }
    }

    #[test]
    fn bare_array_queue_migrates_to_current_shape() {
        let store = memory();
        let settings = StorageSettings::default();
        store
            .set_item(
                &settings.comparison_key,
                r#"{"version":1,"data":["case-1::run","case-2::run"]}"#,
            )
            .unwrap();

        let state = comparison_storage(store.clone(), &settings).read(ComparisonState::default());

        assert_eq!(state.queue, vec!["case-1::run", "case-2::run"]);
        assert_eq!(state.mode, ComparisonMode::Full);
        assert!(state.diff_data.is_none());

        let raw: Value =
            serde_json::from_str(&store.get_item(&settings.comparison_key).unwrap().unwrap())
                .unwrap();
        assert_eq!(raw["version"], 3);
    }

    #[test]
    fn hardware_diff_migrates_to_device_modules() {
        let legacy = json!({
            "queue": ["a::1", "b::2"],
            "mode": "simple-tags",
            "diffData": {
                "baseline": {
                    "testCaseId": "a", "executionId": "1",
                    "testCaseName": "A", "executionName": "1",
                    "fps": 60, "hardwareSummary": "Rig A",
                    "axisStats": { "X+": { "min": 1, "avg": 2, "max": 3, "total": 3 } }
                },
                "candidate": {
                    "testCaseId": "b", "executionId": "2",
                    "testCaseName": "B", "executionName": "2",
                    "fps": 60, "hardwareSummary": "Rig B",
                    "axisStats": { "X+": { "min": 2, "avg": 3, "max": 4, "total": 3 } }
                },
                "axes": [{
                    "axisKey": "X+",
                    "baselineStats": { "min": 1, "avg": 2, "max": 3, "total": 3 },
                    "candidateStats": { "min": 2, "avg": 3, "max": 4, "total": 3 },
                    "delta": { "min": 1, "avg": 1, "max": 1 },
                    "fpsDelta": 0,
                    "hardwareDiff": { "baseline": "Rig A", "candidate": "Rig B" }
                }],
                "axisMap": {},
                "axisAggregate": {},
                "fpsDelta": 0,
                "hardwareDiffers": true
            }
        });
        let store = memory();
        let settings = StorageSettings::default();
        store
            .set_item(
                &settings.comparison_key,
                &json!({ "version": 2, "data": legacy }).to_string(),
            )
            .unwrap();

        let state = comparison_storage(store, &settings).read(ComparisonState::default());

        assert_eq!(state.mode, ComparisonMode::SimpleTags);
        let diff = state.diff_data.expect("diff survives migration");
        assert!(diff.device_differs);
        assert_eq!(diff.baseline.device_summary.as_deref(), Some("Rig A"));
        assert!(diff.baseline.module_stats.contains_key("X+"));
        let row = diff.row("X+").expect("module map rebuilt");
        assert_eq!(row.delta.avg, Some(1.0));
        assert_eq!(
            row.device_diff.as_ref().and_then(|d| d.candidate.as_deref()),
            Some("Rig B")
        );
        assert_eq!(diff.modules.len(), 1);
    }

    #[test]
    fn axis_shaped_diff_at_current_version_keeps_queue() {
        let stored = json!({
            "version": 3,
            "data": {
                "queue": ["case-1::run", "case-2::run"],
                "mode": "full",
                "diffData": {
                    "baseline": {
                        "testCaseId": "case-1", "executionId": "run",
                        "hardwareSummary": "Rig A",
                        "axisStats": { "X-": { "min": 1, "avg": 2, "max": 3, "total": 3 } }
                    },
                    "candidate": {
                        "testCaseId": "case-2", "executionId": "run",
                        "hardwareSummary": "Rig B",
                        "axisStats": {}
                    },
                    "axes": [{ "axisKey": "X-", "delta": { "min": null, "avg": null, "max": null } }],
                    "axisMap": {},
                    "fpsDelta": null,
                    "hardwareDiffers": true
                }
            }
        });
        let store = memory();
        let settings = StorageSettings::default();
        store
            .set_item(&settings.comparison_key, &stored.to_string())
            .unwrap();

        let state = comparison_storage(store, &settings).read(ComparisonState::default());

        assert_eq!(state.queue, vec!["case-1::run", "case-2::run"]);
        let diff = state.diff_data.expect("axis diff adapted");
        assert!(diff.device_differs);
        assert_eq!(diff.candidate.device_summary.as_deref(), Some("Rig B"));
        assert!(diff.row("X-").is_some());
    }

    #[test]
    fn unreadable_diff_decodes_as_none() {
        let stored = json!({
            "version": 3,
            "data": {
                "queue": ["case-1::run"],
                "mode": "simple-tags",
                "diffData": { "baseline": 5, "modules": "nope" }
            }
        });
        let store = memory();
        let settings = StorageSettings::default();
        store
            .set_item(&settings.comparison_key, &stored.to_string())
            .unwrap();

        let state = comparison_storage(store, &settings).read(ComparisonState::default());

        assert_eq!(state.queue, vec!["case-1::run"]);
        assert_eq!(state.mode, ComparisonMode::SimpleTags);
        assert!(state.diff_data.is_none());
    }

    #[test]
    fn v3_migration_keeps_existing_device_fields() {
        let data = json!({
            "queue": [],
            "mode": "full",
            "diffData": {
                "baseline": { "deviceSummary": "New", "hardwareSummary": "Old" },
                "modules": [{ "moduleKey": "Input" }],
                "deviceDiffers": false,
                "hardwareDiffers": true
            }
        });

        let migrated = migrate_comparison_v3(data);
        let diff = &migrated["diffData"];
        assert_eq!(diff["baseline"]["deviceSummary"], "New");
        assert!(diff["baseline"].get("hardwareSummary").is_none());
        assert_eq!(diff["deviceDiffers"], false);
        assert_eq!(diff["moduleMap"]["Input"]["deviceDiff"], Value::Null);
    }

    #[test]
    fn v3_migration_without_diff_sets_null() {
        let migrated = migrate_comparison_v3(json!({ "queue": ["a::1"], "mode": "full" }));
        assert_eq!(migrated["diffData"], Value::Null);
        assert_eq!(migrated["queue"][0], "a::1");
    }

    #[test]
    fn legacy_sessions_migrate_field_names() {
        let legacy = json!([{
            "testCaseId": "case-1",
            "executionId": "run-1",
            "name": "Legacy",
            "hardwareProfileId": "rig-a",
            "latencies": [{
                "axis": "X+",
                "samples": [10.0, 12.0],
                "stats": { "min": 10.0, "avg": 11.0, "max": 12.0, "total": 2 }
            }],
            "datasetSource": "manual-import",
            "fps": 30
        }]);
        let store = memory();
        let settings = StorageSettings::default();
        store
            .set_item(
                &settings.sessions_key,
                &json!({ "version": 1, "data": legacy }).to_string(),
            )
            .unwrap();

        let sessions = session_storage(store, &settings).read(SessionCollection::default());

        assert_eq!(sessions.len(), 1);
        let session = &sessions.sessions()[0];
        assert_eq!(session.device_profile_id, "rig-a");
        assert_eq!(session.latencies[0].module_under_test, "X+");
        assert_eq!(session.dataset_source, DatasetSource::ManualImport);
    }

    #[test]
    fn sessions_round_trip_at_current_version() {
        let store = memory();
        let settings = StorageSettings::default();
        let storage = session_storage(store, &settings);
        let sessions = SessionCollection::new(vec![session("case-1"), session("case-2")]);

        storage.write(&sessions).unwrap();
        assert_eq!(storage.read(SessionCollection::default()), sessions);
    }

    #[test]
    fn seeded_state_queues_every_session() {
        let state = ComparisonState::seeded(&[session("case-1"), session("case-2")]);
        assert_eq!(state.queue, vec!["case-1::case-1-run", "case-2::case-2-run"]);
        assert_eq!(state.mode, ComparisonMode::Full);
    }
}
