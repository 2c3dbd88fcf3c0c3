//! # Declaration
//!
//! Typed view of one `SecretsDistribution`, decoded once per reconciliation.
//!
//! Decoding applies every default (`type = "Opaque"`, no entries, target name
//! falling back to the resource name) so later stages never look at the raw
//! payload. No validation happens here: a mapping with an empty `from` is kept
//! and fails later as a missing source file.

use crate::crd::{SecretsDistribution, SecretsDistributionSpec, SecretsDistributionStatus};
use crate::error::ReconcilerError;
use kube::ResourceExt;

/// A single source-file to target-key mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub source: String,
    pub target_key: String,
}

/// Desired state of one managed Secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Target Secret name
    pub name: String,
    /// Namespace of both the declaration and its Secret
    pub namespace: String,
    /// Kubernetes Secret type
    pub secret_type: String,
    /// Entries in declaration order
    pub entries: Vec<Entry>,
    /// Prior status, informational only
    pub status: SecretsDistributionStatus,
}

impl Declaration {
    /// Build a declaration from already-typed parts
    #[must_use]
    pub fn new(
        resource_name: &str,
        namespace: &str,
        spec: SecretsDistributionSpec,
        status: Option<SecretsDistributionStatus>,
    ) -> Self {
        let name = if spec.name.is_empty() {
            resource_name.to_string()
        } else {
            spec.name
        };

        Self {
            name,
            namespace: namespace.to_string(),
            secret_type: spec.secret_type,
            entries: spec
                .secrets
                .into_iter()
                .map(|m| Entry {
                    source: m.from,
                    target_key: m.to,
                })
                .collect(),
            status: status.unwrap_or_default(),
        }
    }

    /// Build a declaration from the custom resource delivered by the watcher
    #[must_use]
    pub fn from_resource(resource: &SecretsDistribution) -> Self {
        let resource_name = resource.name_any();
        let namespace = resource.namespace().unwrap_or_else(|| "default".to_string());
        Self::new(
            &resource_name,
            &namespace,
            resource.spec.clone(),
            resource.status.clone(),
        )
    }

    /// Decode a declaration from untyped spec and status payloads
    ///
    /// Absent payloads (or JSON `null`) decode to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcilerError::InvalidDeclaration`] if a payload is present
    /// but its shape cannot be decoded (for example `secrets` is not a list).
    pub fn from_payload(
        resource_name: &str,
        namespace: &str,
        spec: Option<&serde_json::Value>,
        status: Option<&serde_json::Value>,
    ) -> Result<Self, ReconcilerError> {
        let spec = match spec {
            Some(v) if !v.is_null() => serde_json::from_value(v.clone())?,
            _ => SecretsDistributionSpec::default(),
        };
        let status = match status {
            Some(v) if !v.is_null() => Some(serde_json::from_value(v.clone())?),
            _ => None,
        };

        Ok(Self::new(resource_name, namespace, spec, status))
    }
}
