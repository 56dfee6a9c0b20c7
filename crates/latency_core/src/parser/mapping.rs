//! Column mapping resolution against a header row.

use serde::{Deserialize, Serialize};

use super::types::ParseIssue;
use crate::config::ImportSettings;

const MISSING_COLUMN_HINT: &str =
    "Ensure DaVinci Resolve CSV exports include marker name, timecode, and color columns.";

/// Names of the columns holding each logical marker field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub marker: String,
    pub color: String,
    pub timecode: String,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            marker: "Marker Name".to_string(),
            color: "Color".to_string(),
            timecode: "Timecode".to_string(),
            comment: "Comment".to_string(),
            track: Some("Track".to_string()),
        }
    }
}

impl From<&ImportSettings> for ColumnMapping {
    fn from(settings: &ImportSettings) -> Self {
        let track = settings.track_column.trim();
        Self {
            marker: settings.marker_column.clone(),
            color: settings.color_column.clone(),
            timecode: settings.timecode_column.clone(),
            comment: settings.comment_column.clone(),
            track: (!track.is_empty()).then(|| track.to_string()),
        }
    }
}

/// Mapping actually used for an import plus any missing-column errors.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingResolution {
    /// Always fully populated; unmatched columns keep the preferred name.
    pub mapping: ColumnMapping,
    pub issues: Vec<ParseIssue>,
}

/// Normalize a header name for matching (trim + lowercase).
pub fn normalize_header(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Resolve the preferred mapping against the actual headers.
///
/// Matching is case-insensitive and whitespace-trimmed. A column that is not
/// found falls back to the preferred name verbatim. Missing `marker`,
/// `timecode` or `color` columns each produce an error issue.
pub fn resolve_mapping(headers: &[String], preferred: &ColumnMapping) -> MappingResolution {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let find_column = |fallback: &str| -> String {
        let wanted = normalize_header(fallback);
        normalized
            .iter()
            .position(|h| *h == wanted)
            .map(|index| headers[index].clone())
            .unwrap_or_else(|| fallback.to_string())
    };

    let mapping = ColumnMapping {
        marker: find_column(&preferred.marker),
        color: find_column(&preferred.color),
        timecode: find_column(&preferred.timecode),
        comment: find_column(&preferred.comment),
        track: preferred.track.as_deref().map(find_column),
    };

    let required = [
        ("marker", &preferred.marker, &mapping.marker),
        ("timecode", &preferred.timecode, &mapping.timecode),
        ("color", &preferred.color, &mapping.color),
    ];

    let issues = required
        .into_iter()
        .filter(|(_, _, resolved)| !normalized.contains(&normalize_header(resolved)))
        .map(|(field, preferred_name, _)| {
            let name = if preferred_name.is_empty() {
                field
            } else {
                preferred_name.as_str()
            };
            ParseIssue::error(
                format!("Expected a \"{}\" column but it was not found.", name),
                MISSING_COLUMN_HINT,
            )
        })
        .collect();

    MappingResolution { mapping, issues }
}
