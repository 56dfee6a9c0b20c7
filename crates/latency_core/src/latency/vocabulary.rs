//! Marker name vocabulary for start/end classification.

use crate::config::DerivationSettings;

/// Role of a marker in the pairing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRole {
    /// Stimulus: arms the pending start for the current module.
    Start,
    /// Response: closes a pending start into a sample.
    End,
    /// Neither; only moves the module cursor.
    Other,
}

/// Tokens used to classify marker names and detect module markers.
///
/// All matching is case-insensitive substring matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerVocabulary {
    start_tokens: Vec<String>,
    end_tokens: Vec<String>,
    module_color: String,
}

impl Default for MarkerVocabulary {
    fn default() -> Self {
        Self::new(
            ["tagoff", "input", "press"],
            ["motionstart", "output", "response"],
            "yellow",
        )
    }
}

impl From<&DerivationSettings> for MarkerVocabulary {
    fn from(settings: &DerivationSettings) -> Self {
        Self::new(
            settings.start_markers.iter(),
            settings.end_markers.iter(),
            &settings.module_color,
        )
    }
}

impl MarkerVocabulary {
    /// Create a vocabulary. Tokens are lowercased; empty tokens are dropped.
    pub fn new<S, E>(start_tokens: S, end_tokens: E, module_color: impl AsRef<str>) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            start_tokens: normalize_tokens(start_tokens),
            end_tokens: normalize_tokens(end_tokens),
            module_color: module_color.as_ref().trim().to_lowercase(),
        }
    }

    /// Classify a marker name. Start tokens take precedence.
    pub fn classify(&self, name: &str) -> MarkerRole {
        let lower = name.to_lowercase();
        if self.start_tokens.iter().any(|t| lower.contains(t.as_str())) {
            MarkerRole::Start
        } else if self.end_tokens.iter().any(|t| lower.contains(t.as_str())) {
            MarkerRole::End
        } else {
            MarkerRole::Other
        }
    }

    /// Check if a marker color designates a module marker.
    pub fn is_module_color(&self, color: Option<&str>) -> bool {
        if self.module_color.is_empty() {
            return false;
        }
        color.is_some_and(|c| c.to_lowercase().contains(&self.module_color))
    }
}

fn normalize_tokens<I>(tokens: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
