//! Detector configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, Phase};

/// Which generation of the classifier to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassifierMode {
    /// Own prefab first, edge delegation only as a fallback. Owned and
    /// local-connect nodes are never candidates.
    #[default]
    Refined,
    /// Edge delegation for every candidate; owner and local-connect are not
    /// filtered.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectorConfig {
    pub classifier: ClassifierMode,
    /// Also stage deletion of edges whose start or end is null.
    pub delete_edges_missing_endpoint: bool,
    /// Only run for an actual game session (not the editor or menus).
    pub require_game_mode: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            classifier: ClassifierMode::Refined,
            delete_edges_missing_endpoint: false,
            require_game_mode: true,
        }
    }
}

impl DetectorConfig {
    pub fn from_json(json: &str) -> Result<Self, DetectorError> {
        serde_json::from_str(json).map_err(|e| {
            DetectorError::new(
                Phase::Load,
                "P001",
                format!("Failed to parse detector config JSON: {}", e),
                None,
            )
        })
    }
}
