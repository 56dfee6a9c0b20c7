//! Import options.

use crate::config::{ImportSettings, Settings};
use crate::latency::MarkerVocabulary;
use crate::parser::{ColumnMapping, CsvParseOptions};

/// Frame rate recorded when an import carries none.
pub const DEFAULT_FPS: f64 = 60.0;

/// Device profile recorded when an import carries none.
pub const DEFAULT_DEVICE_PROFILE: &str = "default";

/// Options shared by the CSV and JSON import pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    /// Column mapping and expected markers for CSV parsing.
    pub csv: CsvParseOptions,
    /// Start/end vocabulary for latency derivation.
    pub vocabulary: MarkerVocabulary,
    /// Frame rate for sessions that carry none.
    pub fps: f64,
    /// Device profile id for sessions that carry none.
    pub device_profile_id: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            csv: CsvParseOptions::default(),
            vocabulary: MarkerVocabulary::default(),
            fps: DEFAULT_FPS,
            device_profile_id: DEFAULT_DEVICE_PROFILE.to_string(),
        }
    }
}

impl From<&ImportSettings> for ImportOptions {
    fn from(settings: &ImportSettings) -> Self {
        let fps = if settings.default_fps.is_finite() && settings.default_fps > 0.0 {
            settings.default_fps
        } else {
            DEFAULT_FPS
        };
        let device = settings.default_device_profile.trim();

        Self {
            csv: CsvParseOptions::from(settings),
            vocabulary: MarkerVocabulary::default(),
            fps,
            device_profile_id: if device.is_empty() {
                DEFAULT_DEVICE_PROFILE.to_string()
            } else {
                device.to_string()
            },
        }
    }
}

impl From<&ImportSettings> for CsvParseOptions {
    fn from(settings: &ImportSettings) -> Self {
        Self {
            mapping: ColumnMapping::from(settings),
            expected_markers: settings.expected_markers.clone(),
        }
    }
}

impl ImportOptions {
    /// Build options from the full settings (import defaults plus derivation vocabulary).
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            vocabulary: MarkerVocabulary::from(&settings.derivation),
            ..Self::from(&settings.import)
        }
    }
}
