//! # Secret Materializer
//!
//! Builds the desired Secret for a [`Declaration`] from files under the
//! secrets root.
//!
//! Each entry's file is read as text and stored under its target key as
//! standard base64. Duplicate target keys keep the last entry's value. The
//! filesystem is only read.

use crate::constants::MANAGED_BY_ANNOTATION;
use crate::declaration::Declaration;
use crate::error::ReconcilerError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fully built desired Secret, ready to compare and send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedSecret {
    pub name: String,
    pub namespace: String,
    pub secret_type: String,
    /// Value written to the ownership annotation
    pub owner_tag: String,
    /// Target key to standard base64 value
    pub data: BTreeMap<String, String>,
}

impl MaterializedSecret {
    /// Convert into the Kubernetes Secret object sent to the API server
    ///
    /// # Errors
    ///
    /// Returns [`ReconcilerError::Encoding`] if a data value is not valid base64.
    pub fn to_secret(&self) -> Result<Secret, ReconcilerError> {
        let data = self
            .data
            .iter()
            .map(|(key, encoded)| -> Result<_, ReconcilerError> {
                Ok((key.clone(), ByteString(STANDARD.decode(encoded)?)))
            })
            .collect::<Result<BTreeMap<_, _>, ReconcilerError>>()?;

        Ok(Secret {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(self.namespace.clone()),
                annotations: Some(BTreeMap::from([(
                    MANAGED_BY_ANNOTATION.to_string(),
                    self.owner_tag.clone(),
                )])),
                ..Default::default()
            },
            type_: Some(self.secret_type.clone()),
            data: Some(data),
            ..Default::default()
        })
    }
}

/// Encode text as standard base64 without line wrapping
#[must_use]
pub fn encode_value(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

/// Resolve a declared source against the secrets root
///
/// The source is appended to the root even when it starts with `/`, so
/// declarations cannot point outside the mounted directory by being absolute.
#[must_use]
pub fn source_path(secrets_root: &Path, source: &str) -> PathBuf {
    secrets_root.join(source.trim_start_matches('/'))
}

/// Build the desired Secret for `declaration`
///
/// # Errors
///
/// - [`ReconcilerError::SourceNotFound`] if a source is not a regular file
///   (or a symlink to one)
/// - [`ReconcilerError::SourceUnreadable`] if a source cannot be read as text
pub fn materialize(
    declaration: &Declaration,
    secrets_root: &Path,
    owner_tag: &str,
) -> Result<MaterializedSecret, ReconcilerError> {
    let mut data = BTreeMap::new();

    for entry in &declaration.entries {
        let path = source_path(secrets_root, &entry.source);

        // metadata() follows symlinks, so a link to a regular file passes and a dangling one does not
        let is_file = std::fs::metadata(&path).is_ok_and(|m| m.is_file());
        if !is_file {
            return Err(ReconcilerError::SourceNotFound {
                path: entry.source.clone(),
            });
        }

        let contents =
            std::fs::read_to_string(&path).map_err(|source| ReconcilerError::SourceUnreadable {
                path: entry.source.clone(),
                source,
            })?;

        if data
            .insert(entry.target_key.clone(), encode_value(&contents))
            .is_some()
        {
            debug!(
                "Key '{}' declared more than once, keeping value from {}",
                entry.target_key, entry.source
            );
        }
    }

    Ok(MaterializedSecret {
        name: declaration.name.clone(),
        namespace: declaration.namespace.clone(),
        secret_type: declaration.secret_type.clone(),
        owner_tag: owner_tag.to_string(),
        data,
    })
}
