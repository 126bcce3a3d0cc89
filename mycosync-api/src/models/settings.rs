use serde::{Deserialize, Serialize};

use super::Thresholds;

/// Sparse threshold update accepted by the settings endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(flatten)]
    pub thresholds: Thresholds,
}
