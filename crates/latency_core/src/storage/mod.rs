//! Versioned persistence.
//!
//! Values are stored as JSON envelopes in a [`KeyValueStore`]. Reads migrate
//! older envelopes forward and fall back to a caller-supplied value when the
//! stored data is absent or unusable.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use latency_core::config::StorageSettings;
//! use latency_core::storage::{comparison_storage, ComparisonState, FileStore};
//!
//! let settings = StorageSettings::default();
//! let store = Arc::new(FileStore::from(&settings));
//! let queue = comparison_storage(store, &settings);
//!
//! let state = queue.read(ComparisonState::default());
//! queue.write(&state).unwrap();
//! ```

mod backend;
mod error;
mod state;
mod versioned;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use error::{StorageError, StorageResult};
pub use state::{
    comparison_migrations, comparison_storage, session_migrations, session_storage,
    ComparisonState, COMPARISON_VERSION, SESSIONS_VERSION,
};
pub use versioned::{Migration, MigrationChain, VersionedEnvelope, VersionedStorage};
