//! Versioned envelopes with forward migrations.
//!
//! Every value is stored as `{"version": N, "data": ...}`. Reading an older
//! envelope runs each registered migration from `stored + 1` up to the current
//! version, persists the result, and returns it. Reading never fails: absent,
//! corrupt, undecodable or newer data resolves to the caller's fallback.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::backend::KeyValueStore;
use super::error::StorageResult;

/// A stored value tagged with its schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedEnvelope<D> {
    pub version: u32,
    #[serde(default)]
    pub data: D,
}

/// Transform from the previous version's data to this version's data.
pub type Migration = Box<dyn Fn(Value) -> Value + Send + Sync>;

/// Migrations keyed by the version they produce.
#[derive(Default)]
pub struct MigrationChain {
    steps: BTreeMap<u32, Migration>,
}

impl MigrationChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the migration producing `version`.
    pub fn with_step<F>(mut self, version: u32, migration: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.steps.insert(version, Box::new(migration));
        self
    }

    /// Versions with a registered migration, ascending.
    pub fn versions(&self) -> impl Iterator<Item = u32> + '_ {
        self.steps.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply migrations for versions `from + 1 ..= to`.
    ///
    /// Versions without a registered migration pass the data through.
    pub fn apply(&self, from: u32, to: u32, data: Value) -> Value {
        if from >= to {
            return data;
        }
        self.steps
            .range(from + 1..=to)
            .fold(data, |data, (version, migrate)| {
                tracing::debug!(version, "Applying storage migration");
                migrate(data)
            })
    }
}

impl fmt::Debug for MigrationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationChain")
            .field("versions", &self.steps.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Typed access to one versioned key of a store.
pub struct VersionedStorage<T> {
    key: String,
    version: u32,
    store: Arc<dyn KeyValueStore>,
    migrations: MigrationChain,
    _value: PhantomData<fn() -> T>,
}

impl<T> VersionedStorage<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create storage for `key` at schema `version` without migrations.
    pub fn new(key: impl Into<String>, version: u32, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            key: key.into(),
            version,
            store,
            migrations: MigrationChain::new(),
            _value: PhantomData,
        }
    }

    /// Attach the migration chain.
    pub fn with_migrations(mut self, migrations: MigrationChain) -> Self {
        self.migrations = migrations;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current schema version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Read the stored value, migrating it if needed.
    ///
    /// Returns `fallback` when nothing usable is stored.
    pub fn read(&self, fallback: T) -> T {
        let raw = match self.store.get_item(&self.key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return fallback,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read versioned storage: {}", e);
                return fallback;
            }
        };

        let envelope: VersionedEnvelope<Value> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to parse versioned storage: {}", e);
                return fallback;
            }
        };

        if envelope.version > self.version {
            tracing::warn!(
                key = %self.key,
                stored = envelope.version,
                current = self.version,
                "Stored data is newer than this build understands"
            );
            return fallback;
        }

        let needs_migration = envelope.version < self.version;
        let data = if needs_migration {
            self.migrations
                .apply(envelope.version, self.version, envelope.data)
        } else {
            envelope.data
        };

        let value: T = match serde_json::from_value(data.clone()) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %self.key, "Stored data does not match schema: {}", e);
                return fallback;
            }
        };

        if needs_migration {
            match self.write_raw(data) {
                Ok(()) => tracing::debug!(
                    key = %self.key,
                    from = envelope.version,
                    to = self.version,
                    "Persisted migrated storage"
                ),
                Err(e) => {
                    tracing::warn!(key = %self.key, "Failed to persist migrated storage: {}", e)
                }
            }
        }

        value
    }

    /// Store a value at the current version.
    pub fn write(&self, value: &T) -> StorageResult<()> {
        let envelope = VersionedEnvelope {
            version: self.version,
            data: value,
        };
        self.store
            .set_item(&self.key, &serde_json::to_string(&envelope)?)
    }

    /// Remove the stored value.
    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove_item(&self.key)
    }

    fn write_raw(&self, data: Value) -> StorageResult<()> {
        let envelope = VersionedEnvelope {
            version: self.version,
            data,
        };
        self.store
            .set_item(&self.key, &serde_json::to_string(&envelope)?)
    }
}

impl<T> fmt::Debug for VersionedStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedStorage")
            .field("key", &self.key)
            .field("version", &self.version)
            .field("migrations", &self.migrations)
            .finish()
    }
}
