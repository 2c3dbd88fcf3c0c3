//! Common test utilities
//!
//! Provides an in-memory [`SecretStore`] that records every call, plus
//! helpers for building secrets roots and live Secrets.

#![allow(dead_code, reason = "Not every test binary uses every helper")]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use secrets_distributor::config::ControllerConfig;
use secrets_distributor::constants::MANAGED_BY_ANNOTATION;
use secrets_distributor::store::SecretStore;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

pub const OWNER: &str = "test-distributor";

/// A call made against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { namespace: String },
    Create { namespace: String, name: String },
    Replace { namespace: String, name: String },
}

/// In-memory Secret store keyed by (namespace, name)
#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: Mutex<BTreeMap<(String, String), Secret>>,
    calls: Mutex<Vec<Call>>,
    fail_list: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_list() -> Self {
        Self {
            fail_list: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, secret: Secret) {
        let key = (
            secret.metadata.namespace.clone().unwrap_or_default(),
            secret.metadata.name.clone().unwrap_or_default(),
        );
        self.secrets.lock().unwrap().insert(key, secret);
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<Secret> {
        self.secrets
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::List { .. }))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn list_secrets(&self, namespace: &str) -> Result<Vec<Secret>> {
        self.record(Call::List {
            namespace: namespace.to_string(),
        });
        if self.fail_list {
            return Err(anyhow!("connection refused"));
        }
        Ok(self
            .secrets
            .lock()
            .unwrap()
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn create_secret(&self, namespace: &str, secret: &Secret) -> Result<Secret> {
        let name = secret.metadata.name.clone().unwrap_or_default();
        self.record(Call::Create {
            namespace: namespace.to_string(),
            name: name.clone(),
        });
        let key = (namespace.to_string(), name.clone());
        let mut secrets = self.secrets.lock().unwrap();
        if secrets.contains_key(&key) {
            return Err(anyhow!("secrets \"{name}\" already exists"));
        }
        secrets.insert(key, secret.clone());
        Ok(secret.clone())
    }

    async fn replace_secret(&self, name: &str, namespace: &str, secret: &Secret) -> Result<Secret> {
        self.record(Call::Replace {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        let key = (namespace.to_string(), name.to_string());
        let mut secrets = self.secrets.lock().unwrap();
        if !secrets.contains_key(&key) {
            return Err(anyhow!("secrets \"{name}\" not found"));
        }
        secrets.insert(key, secret.clone());
        Ok(secret.clone())
    }
}

/// Live Secret with raw data and an optional ownership annotation
pub fn live_secret(
    namespace: &str,
    name: &str,
    owner: Option<&str>,
    data: &[(&str, &str)],
) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            annotations: owner
                .map(|o| BTreeMap::from([(MANAGED_BY_ANNOTATION.to_string(), o.to_string())])),
            ..Default::default()
        },
        type_: Some("Opaque".to_string()),
        data: Some(
            data.iter()
                .map(|(k, v)| ((*k).to_string(), ByteString(v.as_bytes().to_vec())))
                .collect(),
        ),
        ..Default::default()
    }
}

/// Write `files` (relative path, contents) under `root`
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, contents) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, contents).unwrap();
    }
}

/// Config pointing at `root` with the test owner tag
pub fn config_for(root: &Path) -> ControllerConfig {
    ControllerConfig {
        secrets_path: root.to_path_buf(),
        managed_by: OWNER.to_string(),
        ..ControllerConfig::default()
    }
}

/// Decoded data of a stored Secret as UTF-8 strings
pub fn data_of(secret: &Secret) -> BTreeMap<String, String> {
    secret
        .data
        .iter()
        .flatten()
        .map(|(k, v)| (k.clone(), String::from_utf8(v.0.clone()).unwrap()))
        .collect()
}
