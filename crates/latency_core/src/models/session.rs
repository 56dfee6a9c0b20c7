//! Execution sessions and their derived latencies.

use serde::{Deserialize, Serialize};

use super::enums::DatasetSource;
use crate::stats::StatsResult;

/// Separator between test case id and execution id in an encoded key.
const KEY_SEPARATOR: &str = "::";

/// Latency samples derived for one module under test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleLatency {
    /// Module (or axis) key the samples belong to.
    pub module_under_test: String,
    /// Latency samples in milliseconds, in discovery order.
    pub samples: Vec<f64>,
    /// Summary statistics over `samples`.
    pub stats: StatsResult,
    /// Warnings accumulated during the derivation pass that produced this entry.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Identity of one execution within a test case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionKey {
    pub test_case_id: String,
    pub execution_id: String,
}

impl ExecutionKey {
    pub fn new(test_case_id: impl Into<String>, execution_id: impl Into<String>) -> Self {
        Self {
            test_case_id: test_case_id.into(),
            execution_id: execution_id.into(),
        }
    }

    /// Encode as `testCase::execution`.
    pub fn encode(&self) -> String {
        encode_execution_key(&self.test_case_id, &self.execution_id)
    }
}

/// Encode an execution key as `testCase::execution`.
///
/// Returns an empty string if either part is empty.
pub fn encode_execution_key(test_case_id: &str, execution_id: &str) -> String {
    if test_case_id.is_empty() || execution_id.is_empty() {
        return String::new();
    }
    format!("{}{}{}", test_case_id, KEY_SEPARATOR, execution_id)
}

/// Decode a key produced by [`encode_execution_key`].
///
/// Returns `None` if either part is missing or empty.
pub fn decode_execution_key(value: &str) -> Option<ExecutionKey> {
    let mut parts = value.split(KEY_SEPARATOR);
    let test_case_id = parts.next().filter(|p| !p.is_empty())?;
    let execution_id = parts.next().filter(|p| !p.is_empty())?;
    Some(ExecutionKey::new(test_case_id, execution_id))
}

/// One execution's derived module latencies plus metadata.
///
/// Sessions are replaced, not edited: use [`ExecutionSession::with_latencies`]
/// to produce an updated copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSession {
    pub test_case_id: String,
    pub execution_id: String,
    /// Display name.
    pub name: String,
    /// Reference to the device/hardware profile used for the run.
    pub device_profile_id: String,
    /// Per-module latencies.
    #[serde(default)]
    pub latencies: Vec<ModuleLatency>,
    /// Provenance of the data.
    #[serde(default)]
    pub dataset_source: DatasetSource,
    /// Capture frame rate.
    pub fps: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExecutionSession {
    /// Get the execution key of this session.
    pub fn execution_key(&self) -> ExecutionKey {
        ExecutionKey::new(&self.test_case_id, &self.execution_id)
    }

    /// Return a copy of this session with its latencies replaced.
    pub fn with_latencies(&self, latencies: Vec<ModuleLatency>) -> Self {
        Self {
            latencies,
            ..self.clone()
        }
    }

    /// Find the latency entry for a module key.
    pub fn latency_for(&self, module_key: &str) -> Option<&ModuleLatency> {
        self.latencies
            .iter()
            .find(|l| l.module_under_test == module_key)
    }
}

/// Ordered collection of sessions owned by the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCollection {
    sessions: Vec<ExecutionSession>,
}

impl SessionCollection {
    pub fn new(sessions: Vec<ExecutionSession>) -> Self {
        Self { sessions }
    }

    /// Get all sessions.
    pub fn sessions(&self) -> &[ExecutionSession] {
        &self.sessions
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Whether any execution is loaded (used by diff status derivation).
    pub fn has_executions(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Append a session.
    pub fn add(&mut self, session: ExecutionSession) {
        self.sessions.push(session);
    }

    /// Replace the whole collection (e.g. after a JSON import).
    pub fn replace_all(&mut self, sessions: Vec<ExecutionSession>) {
        self.sessions = sessions;
    }

    /// Find a session by key.
    pub fn find(&self, key: &ExecutionKey) -> Option<&ExecutionSession> {
        self.sessions
            .iter()
            .find(|s| s.test_case_id == key.test_case_id && s.execution_id == key.execution_id)
    }

    /// Replace the latencies of the session with the given key.
    ///
    /// The session is swapped for an updated copy. Returns false if no
    /// session has that key.
    pub fn replace_latencies(&mut self, key: &ExecutionKey, latencies: Vec<ModuleLatency>) -> bool {
        let Some(index) = self
            .sessions
            .iter()
            .position(|s| s.test_case_id == key.test_case_id && s.execution_id == key.execution_id)
        else {
            return false;
        };

        let updated = self.sessions[index].with_latencies(latencies);
        self.sessions[index] = updated;
        true
    }

    /// Consume the collection, returning the sessions.
    pub fn into_inner(self) -> Vec<ExecutionSession> {
        self.sessions
    }
}
