//! # SecretsDistribution Status
//!
//! Informational status. The controller reads it but never writes it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretsDistributionStatus {
    /// Human-readable description of the last known state
    #[serde(default)]
    pub status_text: String,
    /// When the status was last written (RFC3339)
    #[serde(default)]
    pub last_updated: String,
}
