//! Marker ingestion from delimited text exports.
//!
//! The parsing pipeline is a set of pure functions:
//!
//! 1. **Line parsing** (`line`): split one line into fields, honoring quotes.
//! 2. **Column mapping** (`mapping`): match the header row against a
//!    preferred mapping, reporting missing required columns.
//! 3. **Timecodes** (`timecode`): `HH:MM:SS[:.FF]` to milliseconds.
//! 4. **CSV import** (`csv`): rows to [`ParsedMarker`] records with
//!    structured issues and troubleshooting hints.
//!
//! # Usage
//!
//! ```
//! use latency_core::parser::{parse_csv, ColumnMapping};
//!
//! let csv = "Marker Name,Color,Timecode,Comment\nTagOff,Red,00:00:01:00,";
//! let result = parse_csv(csv, &ColumnMapping::default());
//! assert_eq!(result.records[0].timestamp_ms, Some(1000.0));
//! ```

mod csv;
mod line;
mod mapping;
mod timecode;
mod types;

pub use csv::{
    parse_csv, parse_csv_with, CsvParseOptions, CsvParseResult, ParsedMarker, EXPECTED_MARKERS,
};
pub use line::{parse_csv_line, parse_delimited_line};
pub use mapping::{normalize_header, resolve_mapping, ColumnMapping, MappingResolution};
pub use timecode::{format_ms_to_time, parse_seconds_to_ms, parse_timecode_to_ms, TIMECODE_FPS};
pub use types::{IssueKind, ParseIssue};
