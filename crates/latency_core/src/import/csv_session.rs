//! Marker CSV to execution session.

use chrono::{DateTime, Utc};

use super::options::ImportOptions;
use crate::latency::derive;
use crate::models::{DatasetSource, ExecutionSession};
use crate::parser::{parse_csv_with, CsvParseResult};

const IMPORTED_SESSION_NAME: &str = "Imported CSV Session";
const IMPORTED_EXECUTION_ID: &str = "import";

/// Result of a CSV session import.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvImportOutcome {
    /// Parse result with issues and troubleshooting hints.
    pub parse: CsvParseResult,
    /// The new session. `None` when the parse reported an error.
    pub session: Option<ExecutionSession>,
    /// One-line description of what was imported. Empty when blocked.
    pub summary: String,
    /// Pairing warnings from latency derivation.
    pub derivation_warnings: Vec<String>,
}

impl CsvImportOutcome {
    /// Check if the import produced a session.
    pub fn is_imported(&self) -> bool {
        self.session.is_some()
    }
}

/// Import a marker CSV export as a new session.
pub fn import_csv_session(content: &str, options: &ImportOptions) -> CsvImportOutcome {
    import_csv_session_at(content, options, Utc::now())
}

/// Import a marker CSV export, stamping the session id with `now`.
pub fn import_csv_session_at(
    content: &str,
    options: &ImportOptions,
    now: DateTime<Utc>,
) -> CsvImportOutcome {
    let parse = parse_csv_with(content, &options.csv);

    if parse.has_errors() {
        tracing::info!(
            issues = parse.issues.len(),
            "CSV import blocked by parse errors"
        );
        return CsvImportOutcome {
            parse,
            session: None,
            summary: String::new(),
            derivation_warnings: Vec::new(),
        };
    }

    let outcome = derive(&parse.marker_events(), &options.vocabulary);
    let mapping = &parse.mapping_used;

    let summary = format!(
        "{} markers parsed with {}/{} columns. {} modules detected.",
        parse.records.len(),
        mapping.marker,
        mapping.timecode,
        outcome.modules.len()
    );
    tracing::info!("{}", summary);

    let session = ExecutionSession {
        test_case_id: format!("csv-{}", now.timestamp_millis()),
        execution_id: IMPORTED_EXECUTION_ID.to_string(),
        name: IMPORTED_SESSION_NAME.to_string(),
        device_profile_id: options.device_profile_id.clone(),
        latencies: outcome.modules,
        dataset_source: DatasetSource::ManualImport,
        fps: options.fps,
        notes: Some(format!("Mapped via {}/{}", mapping.marker, mapping.timecode)),
    };

    CsvImportOutcome {
        parse,
        session: Some(session),
        summary,
        derivation_warnings: outcome.warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Marker Name,Color,Timecode,Comment";

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_123).unwrap()
    }

    #[test]
    fn builds_session_from_module_markers() {
        let csv = format!(
            "{}\n\
             Metadata,Yellow,00:00:00:00,Input\n\
             TagOff,Red,00:00:00.100,\n\
             MotionStart,Blue,00:00:00.150,\n\
             Metadata,Yellow,00:00:01:00,Output\n\
             TagOff,Red,00:00:01.100,\n\
             MotionStart,Blue,00:00:01.190,",
            HEADER
        );

        let outcome = import_csv_session_at(&csv, &ImportOptions::default(), at());
        let session = outcome.session.expect("session imported");

        assert_eq!(session.test_case_id, "csv-1700000000123");
        assert_eq!(session.execution_id, "import");
        assert_eq!(session.name, "Imported CSV Session");
        assert_eq!(session.device_profile_id, "default");
        assert_eq!(session.dataset_source, DatasetSource::ManualImport);
        assert!((session.fps - 60.0).abs() < f64::EPSILON);
        assert_eq!(session.notes.as_deref(), Some("Mapped via Marker Name/Timecode"));

        assert_eq!(session.latencies.len(), 2);
        assert_eq!(session.latencies[0].module_under_test, "Input");
        assert_eq!(session.latencies[0].samples, vec![50.0]);
        assert_eq!(session.latencies[1].module_under_test, "Output");
        assert_eq!(session.latencies[1].samples, vec![90.0]);

        assert_eq!(
            outcome.summary,
            "6 markers parsed with Marker Name/Timecode columns. 2 modules detected."
        );
        assert!(outcome.derivation_warnings.is_empty());
    }

    #[test]
    fn parse_errors_block_the_session() {
        let outcome = import_csv_session_at("Name,Note\nA,B", &ImportOptions::default(), at());

        assert!(!outcome.is_imported());
        assert!(outcome.parse.has_errors());
        assert!(outcome.summary.is_empty());
    }

    #[test]
    fn warnings_do_not_block_the_session() {
        // No color column value and no expected markers: warnings only
        let csv = format!("{}\nPress,,00:00:00:00,Button\nResponse,,00:00:00:03,", HEADER);

        let outcome = import_csv_session_at(&csv, &ImportOptions::default(), at());

        assert!(!outcome.parse.issues.is_empty());
        assert!(!outcome.parse.has_errors());
        let session = outcome.session.unwrap();
        assert_eq!(session.latencies[0].module_under_test, "Button");
        assert_eq!(session.latencies[0].samples, vec![100.0]);
    }

    #[test]
    fn orphan_end_markers_are_reported() {
        let csv = format!("{}\nMotionStart,Blue,00:00:00:00,Input", HEADER);

        let outcome = import_csv_session_at(&csv, &ImportOptions::default(), at());

        assert!(outcome.is_imported());
        assert_eq!(outcome.derivation_warnings.len(), 1);
        assert!(outcome.session.unwrap().latencies.is_empty());
    }

    #[test]
    fn uses_configured_fps_and_device() {
        let options = ImportOptions {
            fps: 120.0,
            device_profile_id: "rig-b".to_string(),
            ..ImportOptions::default()
        };
        let csv = format!("{}\nTagOff,Red,00:00:00:00,A\nMotionStart,Red,00:00:00:06,", HEADER);

        let session = import_csv_session_at(&csv, &options, at()).session.unwrap();
        assert!((session.fps - 120.0).abs() < f64::EPSILON);
        assert_eq!(session.device_profile_id, "rig-b");
    }
}
