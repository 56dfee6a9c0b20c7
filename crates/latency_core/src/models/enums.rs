//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Where the data of a session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetSource {
    /// Timestamps typed in by hand.
    #[default]
    ManualEntry,
    /// Markers imported from an editing tool CSV export.
    ManualImport,
    /// Results produced by an automation run.
    AutomationReport,
}

impl DatasetSource {
    /// Get the display label for this source.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ManualEntry => "Manual Session",
            Self::ManualImport => "DaVinci Import",
            Self::AutomationReport => "Automation Report",
        }
    }

    /// Get the serialized tag (`manual-entry`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ManualEntry => "manual-entry",
            Self::ManualImport => "manual-import",
            Self::AutomationReport => "automation-report",
        }
    }

    /// Parse a serialized tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "manual-entry" => Some(Self::ManualEntry),
            "manual-import" => Some(Self::ManualImport),
            "automation-report" => Some(Self::AutomationReport),
            _ => None,
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// How the comparison view treats queued sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonMode {
    /// Full baseline/candidate comparison.
    #[default]
    Full,
    /// Only tag markers are shown; comparison is disabled.
    SimpleTags,
}
