//! # SecretsDistribution Spec
//!
//! Main CRD specification types and default values.

use crate::constants::DEFAULT_SECRET_TYPE;
use serde::{Deserialize, Serialize};

/// SecretsDistribution Custom Resource Definition
///
/// Declares a Secret to maintain in the resource's namespace, built from
/// files mounted into the controller under its secrets root.
///
/// # Example
///
/// ```yaml
/// apiVersion: xlscsde.nhs.uk/v1
/// kind: SecretsDistribution
/// metadata:
///   name: jupyter-credentials
///   namespace: jupyterhub
/// spec:
///   name: jupyter-credentials
///   type: Opaque
///   secrets:
///     - from: jupyter/client-secret
///       to: CLIENT_SECRET
/// ```
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "SecretsDistribution",
    group = "xlscsde.nhs.uk",
    version = "v1",
    namespaced,
    status = "crate::crd::SecretsDistributionStatus",
    shortname = "sd",
    printcolumn = r#"{"name":"Secret", "type":"string", "jsonPath":".spec.name"}, {"name":"Type", "type":"string", "jsonPath":".spec.type"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SecretsDistributionSpec {
    /// Name of the target Secret
    /// Defaults to the SecretsDistribution's own name when empty
    #[serde(default)]
    pub name: String,
    /// Kubernetes Secret type
    #[serde(default = "default_secret_type", rename = "type")]
    pub secret_type: String,
    /// Ordered file-to-key mappings; later entries win on duplicate keys
    #[serde(default)]
    pub secrets: Vec<SecretMapping>,
}

/// One source file copied into one key of the target Secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SecretMapping {
    /// Path of the source file, relative to the secrets root
    #[serde(default)]
    pub from: String,
    /// Key written in the target Secret
    #[serde(default)]
    pub to: String,
}

impl Default for SecretsDistributionSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            secret_type: default_secret_type(),
            secrets: Vec::new(),
        }
    }
}

#[must_use]
pub fn default_secret_type() -> String {
    DEFAULT_SECRET_TYPE.to_string()
}
