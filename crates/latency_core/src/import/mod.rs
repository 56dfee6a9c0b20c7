//! Import pipelines.
//!
//! - CSV marker export: parse, derive module latencies, build a session
//! - Saved-session JSON: coerce each array element into a session

mod csv_session;
mod error;
mod json_sessions;
mod options;

pub use csv_session::{import_csv_session, import_csv_session_at, CsvImportOutcome};
pub use error::{ImportError, ImportResult};
pub use json_sessions::{import_sessions_json, import_sessions_json_with};
pub use options::{ImportOptions, DEFAULT_DEVICE_PROFILE, DEFAULT_FPS};
