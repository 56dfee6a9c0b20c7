//! Device/hardware profiles for traceability.

use serde::{Deserialize, Serialize};

/// A capture rig or device under test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    pub id: String,
    pub name: String,
    pub tag_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware: Option<String>,
    #[serde(default)]
    pub accessories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DeviceProfile {
    /// Return a copy with trimmed text fields and empty accessories removed.
    pub fn normalized(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.trim().to_string(),
            tag_type: self.tag_type.trim().to_string(),
            firmware: self.firmware.as_ref().map(|f| f.trim().to_string()),
            accessories: self
                .accessories
                .iter()
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect(),
            notes: self.notes.clone(),
        }
    }

    /// Short label, e.g. `Rig A (Tag V2 · FW 1.4.0)`.
    pub fn label(&self) -> String {
        match self.firmware.as_deref().filter(|f| !f.is_empty()) {
            Some(firmware) => format!("{} ({} · FW {})", self.name, self.tag_type, firmware),
            None => format!("{} ({})", self.name, self.tag_type),
        }
    }
}

/// Build a one-line traceability summary over all profiles.
pub fn build_traceability_summary(profiles: &[DeviceProfile]) -> String {
    if profiles.is_empty() {
        return "No device traceability data captured yet.".to_string();
    }

    profiles
        .iter()
        .map(|p| p.normalized().label())
        .collect::<Vec<_>>()
        .join(" • ")
}
