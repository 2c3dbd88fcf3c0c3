//! # Secret Store
//!
//! Access to live Secrets, behind a trait so the reconciler can be driven
//! against the Kubernetes API or an in-memory store in tests.
//!
//! [`fetch_observed`] lists the namespace and matches names
//! case-insensitively. A direct `get` would be case-sensitive and could pick a
//! different Secret, so the list-then-filter lookup is kept.
//!
//! Names are folded with [`str::to_lowercase`] rather than full Unicode case
//! folding. The two only differ on characters such as `ß`, which Kubernetes
//! object names cannot contain.

use crate::constants::{FIELD_MANAGER, MANAGED_BY_ANNOTATION};
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, ListParams, PostParams};
use kube::Client;
use std::collections::BTreeMap;
use tracing::debug;

/// Cluster operations used by a reconciliation pass
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// List every Secret in `namespace`
    async fn list_secrets(&self, namespace: &str) -> Result<Vec<Secret>>;

    /// Create `secret` in `namespace`
    async fn create_secret(&self, namespace: &str, secret: &Secret) -> Result<Secret>;

    /// Replace the Secret `name` in `namespace` with `secret`
    async fn replace_secret(&self, name: &str, namespace: &str, secret: &Secret) -> Result<Secret>;
}

/// [`SecretStore`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl std::fmt::Debug for KubeSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSecretStore").finish_non_exhaustive()
    }
}

impl KubeSecretStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn post_params() -> PostParams {
        PostParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn list_secrets(&self, namespace: &str) -> Result<Vec<Secret>> {
        let list = self
            .api(namespace)
            .list(&ListParams::default())
            .await
            .with_context(|| format!("Failed to list secrets in namespace {namespace}"))?;
        Ok(list.items)
    }

    async fn create_secret(&self, namespace: &str, secret: &Secret) -> Result<Secret> {
        self.api(namespace)
            .create(&Self::post_params(), secret)
            .await
            .with_context(|| format!("Failed to create secret in namespace {namespace}"))
    }

    async fn replace_secret(&self, name: &str, namespace: &str, secret: &Secret) -> Result<Secret> {
        self.api(namespace)
            .replace(name, &Self::post_params(), secret)
            .await
            .with_context(|| format!("Failed to replace secret {name} in namespace {namespace}"))
    }
}

/// A live Secret as read from the cluster
#[derive(Debug, Clone)]
pub struct ObservedSecret(pub Secret);

impl ObservedSecret {
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.metadata.name.as_deref().unwrap_or_default()
    }

    /// Value of the ownership annotation, if present
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.0
            .metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(MANAGED_BY_ANNOTATION))
            .map(String::as_str)
    }

    /// Secret data re-encoded as standard base64, the form the desired side uses
    #[must_use]
    pub fn encoded_data(&self) -> BTreeMap<String, String> {
        self.0
            .data
            .iter()
            .flatten()
            .map(|(key, value)| (key.clone(), STANDARD.encode(&value.0)))
            .collect()
    }
}

/// Find the live Secret whose name matches `name`, ignoring case
///
/// Returns `Ok(None)` when nothing matches; the first match wins otherwise.
///
/// # Errors
///
/// Returns an error if listing Secrets fails.
pub async fn fetch_observed(
    store: &dyn SecretStore,
    namespace: &str,
    name: &str,
) -> Result<Option<ObservedSecret>> {
    let wanted = name.to_lowercase();
    let found = store
        .list_secrets(namespace)
        .await?
        .into_iter()
        .find(|s| {
            s.metadata
                .name
                .as_deref()
                .is_some_and(|n| n.to_lowercase() == wanted)
        })
        .map(ObservedSecret);

    match &found {
        Some(observed) => debug!("Found secret {} on {}", observed.name(), namespace),
        None => debug!("No secret named {} on {}", name, namespace),
    }

    Ok(found)
}
