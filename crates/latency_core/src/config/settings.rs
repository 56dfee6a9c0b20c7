//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// CSV and JSON import defaults.
    #[serde(default)]
    pub import: ImportSettings,

    /// Marker vocabulary for latency derivation.
    #[serde(default)]
    pub derivation: DerivationSettings,

    /// Persistence location and keys.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Level used when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Also write a daily-rolling log file.
    #[serde(default)]
    pub log_to_file: bool,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            log_to_file: false,
            logs_folder: default_logs_folder(),
        }
    }
}

/// Import defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Preferred marker name column.
    #[serde(default = "default_marker_column")]
    pub marker_column: String,

    /// Preferred color column.
    #[serde(default = "default_color_column")]
    pub color_column: String,

    /// Preferred timecode column.
    #[serde(default = "default_timecode_column")]
    pub timecode_column: String,

    /// Preferred comment column.
    #[serde(default = "default_comment_column")]
    pub comment_column: String,

    /// Preferred track column. Empty disables track lookup.
    #[serde(default = "default_track_column")]
    pub track_column: String,

    /// Marker names the import warns about when absent.
    #[serde(default = "default_expected_markers")]
    pub expected_markers: Vec<String>,

    /// Frame rate recorded on imported sessions.
    #[serde(default = "default_fps")]
    pub default_fps: f64,

    /// Device profile id recorded on imported sessions.
    #[serde(default = "default_device_profile")]
    pub default_device_profile: String,
}

fn default_marker_column() -> String {
    "Marker Name".to_string()
}

fn default_color_column() -> String {
    "Color".to_string()
}

fn default_timecode_column() -> String {
    "Timecode".to_string()
}

fn default_comment_column() -> String {
    "Comment".to_string()
}

fn default_track_column() -> String {
    "Track".to_string()
}

fn default_expected_markers() -> Vec<String> {
    ["TagOff", "MotionStart", "MotionPeak", "MotionSettle"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn default_fps() -> f64 {
    60.0
}

fn default_device_profile() -> String {
    "default".to_string()
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            marker_column: default_marker_column(),
            color_column: default_color_column(),
            timecode_column: default_timecode_column(),
            comment_column: default_comment_column(),
            track_column: default_track_column(),
            expected_markers: default_expected_markers(),
            default_fps: default_fps(),
            default_device_profile: default_device_profile(),
        }
    }
}

/// Marker vocabulary. Matching is case-insensitive substring matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationSettings {
    /// Tokens marking a stimulus.
    #[serde(default = "default_start_markers")]
    pub start_markers: Vec<String>,

    /// Tokens marking a response.
    #[serde(default = "default_end_markers")]
    pub end_markers: Vec<String>,

    /// Color token that designates a module marker.
    #[serde(default = "default_module_color")]
    pub module_color: String,
}

fn default_start_markers() -> Vec<String> {
    vec!["tagoff".into(), "input".into(), "press".into()]
}

fn default_end_markers() -> Vec<String> {
    vec!["motionstart".into(), "output".into(), "response".into()]
}

fn default_module_color() -> String {
    "yellow".to_string()
}

impl Default for DerivationSettings {
    fn default() -> Self {
        Self {
            start_markers: default_start_markers(),
            end_markers: default_end_markers(),
            module_color: default_module_color(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Folder for the file-backed key-value store.
    #[serde(default = "default_data_folder")]
    pub data_folder: String,

    /// Key holding the session collection.
    #[serde(default = "default_sessions_key")]
    pub sessions_key: String,

    /// Key holding the comparison queue state.
    #[serde(default = "default_comparison_key")]
    pub comparison_key: String,
}

fn default_data_folder() -> String {
    ".data".to_string()
}

fn default_sessions_key() -> String {
    "latencyTesterSessions".to_string()
}

fn default_comparison_key() -> String {
    "latencyTesterComparisonQueue".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_folder: default_data_folder(),
            sessions_key: default_sessions_key(),
            comparison_key: default_comparison_key(),
        }
    }
}

/// Config sections for atomic updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Logging,
    Import,
    Derivation,
    Storage,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Logging,
        ConfigSection::Import,
        ConfigSection::Derivation,
        ConfigSection::Storage,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Logging => "logging",
            ConfigSection::Import => "import",
            ConfigSection::Derivation => "derivation",
            ConfigSection::Storage => "storage",
        }
    }

    /// Comment line written above the section.
    pub(crate) fn heading(&self) -> &'static str {
        match self {
            ConfigSection::Logging => "# Logging configuration",
            ConfigSection::Import => "# Marker CSV and session JSON import defaults",
            ConfigSection::Derivation => "# Start/end marker vocabulary for latency derivation",
            ConfigSection::Storage => "# Persisted sessions and comparison queue",
        }
    }
}
