//! CSV marker import.
//!
//! Turns a marker export (header row plus one marker per line) into
//! [`ParsedMarker`] records. Problems are reported as [`ParseIssue`]s rather
//! than errors: missing required columns are `error` issues (the caller must
//! reject the import), missing colors and missing expected marker names are
//! `warning` issues.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::line::parse_csv_line;
use super::mapping::{normalize_header, resolve_mapping, ColumnMapping};
use super::timecode::parse_timecode_to_ms;
use super::types::ParseIssue;
use crate::models::MarkerEvent;

/// Marker names every complete capture is expected to contain.
pub const EXPECTED_MARKERS: [&str; 4] = ["TagOff", "MotionStart", "MotionPeak", "MotionSettle"];

/// Maximum number of rows named in the missing-color warning.
const MAX_LISTED_ROWS: usize = 6;

const TROUBLESHOOTING_HINTS: [&str; 3] = [
    "If marker patterns still look off, confirm that paired marker colours match the quick reference guide.",
    "When DaVinci exports omit colours, enable the \"Export marker colours\" checkbox or include the colour column manually.",
    "If timestamps are misaligned, verify your timeline frame rate and re-export after locking the track frame rate.",
];

/// One marker row from the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMarker {
    pub marker: String,
    pub color: String,
    /// Raw timecode text.
    pub timecode: String,
    /// Parsed timecode; `None` if the text is not a valid timecode.
    pub timestamp_ms: Option<f64>,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
}

impl ParsedMarker {
    /// Convert into a marker event for latency derivation.
    ///
    /// Returns `None` if the record has no timestamp. Empty color, comment
    /// and track values are dropped; the track becomes the axis.
    pub fn to_marker_event(&self) -> Option<MarkerEvent> {
        let timestamp_ms = self.timestamp_ms?;
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        Some(MarkerEvent {
            name: self.marker.clone(),
            timestamp_ms,
            axis: self.track.as_deref().and_then(non_empty),
            color: non_empty(&self.color),
            comment: non_empty(&self.comment),
            module_under_test: None,
        })
    }
}

/// Options for a CSV import.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvParseOptions {
    /// Preferred column names.
    pub mapping: ColumnMapping,
    /// Marker name substrings expected somewhere in the export.
    pub expected_markers: Vec<String>,
}

impl Default for CsvParseOptions {
    fn default() -> Self {
        Self {
            mapping: ColumnMapping::default(),
            expected_markers: EXPECTED_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Result of a CSV import.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvParseResult {
    pub records: Vec<ParsedMarker>,
    pub mapping_used: ColumnMapping,
    pub issues: Vec<ParseIssue>,
    /// Generic guidance, present only when there are no error issues.
    pub troubleshooting: Vec<String>,
}

impl CsvParseResult {
    /// Check if any issue blocks the import.
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.is_error())
    }

    /// Marker events for all records with a parsed timestamp.
    pub fn marker_events(&self) -> Vec<MarkerEvent> {
        self.records
            .iter()
            .filter_map(ParsedMarker::to_marker_event)
            .collect()
    }
}

/// Parse CSV text using the given preferred mapping and the default
/// expected-marker list.
pub fn parse_csv(source: &str, preferred: &ColumnMapping) -> CsvParseResult {
    let options = CsvParseOptions {
        mapping: preferred.clone(),
        ..CsvParseOptions::default()
    };
    parse_csv_with(source, &options)
}

/// Parse CSV text with explicit options.
pub fn parse_csv_with(source: &str, options: &CsvParseOptions) -> CsvParseResult {
    let lines: Vec<&str> = source.lines().filter(|l| !l.trim().is_empty()).collect();

    let Some((header_line, rows)) = lines.split_first() else {
        return CsvParseResult {
            records: Vec::new(),
            mapping_used: options.mapping.clone(),
            issues: vec![ParseIssue::error(
                "No CSV content detected.",
                "Re-export the markers from DaVinci Resolve and try again.",
            )],
            troubleshooting: Vec::new(),
        };
    };

    let header = parse_csv_line(header_line);
    let resolution = resolve_mapping(&header, &options.mapping);
    let mapping = resolution.mapping;
    let mut issues = resolution.issues;

    let marker_key = normalize_header(&mapping.marker);
    let color_key = normalize_header(&mapping.color);
    let timecode_key = normalize_header(&mapping.timecode);
    let comment_key = normalize_header(&mapping.comment);
    let track_key = mapping.track.as_deref().map(normalize_header);

    let mut records = Vec::new();
    let mut missing_colors = Vec::new();

    for (offset, line) in rows.iter().enumerate() {
        let row = parse_csv_line(line);

        // Later duplicate headers win
        let mut fields: HashMap<String, &str> = HashMap::with_capacity(header.len());
        for (index, name) in header.iter().enumerate() {
            let value = row.get(index).map(String::as_str).unwrap_or("");
            fields.insert(normalize_header(name), value);
        }
        let field = |key: &str| fields.get(key).copied().unwrap_or("").to_string();

        let marker = field(&marker_key);
        let color = field(&color_key);
        let timecode = field(&timecode_key);
        let comment = field(&comment_key);
        let track = track_key
            .as_ref()
            .and_then(|key| fields.get(key).map(|v| v.to_string()));

        // Blank separator row
        if marker.is_empty() && timecode.is_empty() {
            continue;
        }

        if color.is_empty() {
            let label = if marker.is_empty() {
                // Header is row 1
                format!("row {}", offset + 2)
            } else {
                marker.clone()
            };
            missing_colors.push(label);
        }

        let timestamp_ms = parse_timecode_to_ms(&timecode);
        records.push(ParsedMarker {
            marker,
            color,
            timecode,
            timestamp_ms,
            comment,
            track,
        });
    }

    if !missing_colors.is_empty() {
        issues.push(missing_colors_warning(&missing_colors));
    }

    let missing_markers: Vec<&str> = options
        .expected_markers
        .iter()
        .map(String::as_str)
        .filter(|expected| {
            let expected = expected.to_lowercase();
            !records
                .iter()
                .any(|r| r.marker.to_lowercase().contains(&expected))
        })
        .collect();
    if !missing_markers.is_empty() {
        issues.push(ParseIssue::warning(
            "Expected marker names were not found in the CSV.",
            format!(
                "Missing: {}. Check marker naming or color coding in DaVinci.",
                missing_markers.join(", ")
            ),
        ));
    }

    let troubleshooting = if issues.iter().any(|i| i.is_error()) {
        Vec::new()
    } else {
        TROUBLESHOOTING_HINTS.iter().map(|h| h.to_string()).collect()
    };

    tracing::debug!(
        records = records.len(),
        issues = issues.len(),
        "Parsed marker CSV"
    );

    CsvParseResult {
        records,
        mapping_used: mapping,
        issues,
        troubleshooting,
    }
}

fn missing_colors_warning(rows: &[String]) -> ParseIssue {
    let listed = rows
        .iter()
        .take(MAX_LISTED_ROWS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let ellipsis = if rows.len() > MAX_LISTED_ROWS { "…" } else { "" };

    ParseIssue::warning(
        "Some markers were missing colors, which are required for pattern detection.",
        format!("Rows affected: {}{}", listed, ellipsis),
    )
}
