//! Validation issue types produced by imports.

use serde::{Deserialize, Serialize};

/// Severity of an import issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// The import must be rejected.
    Error,
    /// Advisory only; the import proceeds.
    Warning,
}

/// A user-facing validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ParseIssue {
    /// Create an error issue with a hint.
    pub fn error(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Error,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create a warning issue with a hint.
    pub fn warning(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Warning,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == IssueKind::Error
    }

    /// Render as `Error: message (hint)`.
    pub fn describe(&self) -> String {
        let prefix = match self.kind {
            IssueKind::Error => "Error",
            IssueKind::Warning => "Warning",
        };
        match &self.hint {
            Some(hint) => format!("{}: {} ({})", prefix, self.message, hint),
            None => format!("{}: {}", prefix, self.message),
        }
    }
}

impl std::fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}
