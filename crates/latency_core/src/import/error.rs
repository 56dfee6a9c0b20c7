//! Import error types.

use serde_json::Value;
use thiserror::Error;

use crate::parser::ParseIssue;

const JSON_SCHEMA_HINT: &str = "Confirm the saved session schema matches the UI export.";

/// Structural failures of a session JSON payload.
///
/// Per-record problems never fail an import; they are coerced to defaults.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unable to parse JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON session payload should be an array of executions (found {found}).")]
    InvalidRoot { found: &'static str },
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

impl ImportError {
    /// Create an invalid root error for the given top-level value.
    pub fn invalid_root(root: &Value) -> Self {
        let found = match root {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        };
        Self::InvalidRoot { found }
    }

    /// Express the failure as an import issue for display.
    pub fn to_issue(&self) -> ParseIssue {
        ParseIssue::error(self.to_string(), JSON_SCHEMA_HINT)
    }
}
