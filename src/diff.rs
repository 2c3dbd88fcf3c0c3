//! # Divergence Detection
//!
//! Decides whether the live Secret has to be created or replaced.
//!
//! Ownership is checked before any data comparison: a Secret without the
//! `managedBy` annotation, or carrying another instance's tag, fails with
//! [`ReconcilerError::OwnershipConflict`] even when its data already matches.

use crate::error::ReconcilerError;
use crate::materializer::MaterializedSecret;
use crate::store::ObservedSecret;
use std::collections::BTreeSet;
use tracing::debug;

/// Action the reconciler has to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divergence {
    NeedsCreate,
    NeedsReplace,
    NoOpNeeded,
}

/// Key-level differences between desired and observed data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyChanges {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub changed: BTreeSet<String>,
}

impl KeyChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Compare desired against observed data, both as base64 strings
#[must_use]
pub fn key_changes(desired: &MaterializedSecret, observed: &ObservedSecret) -> KeyChanges {
    let observed_data = observed.encoded_data();

    let added = desired
        .data
        .keys()
        .filter(|k| !observed_data.contains_key(*k))
        .cloned()
        .collect();
    let removed = observed_data
        .keys()
        .filter(|k| !desired.data.contains_key(*k))
        .cloned()
        .collect();
    let changed = desired
        .data
        .iter()
        .filter(|(k, v)| observed_data.get(*k).is_some_and(|o| o != *v))
        .map(|(k, _)| k.clone())
        .collect();

    KeyChanges {
        added,
        removed,
        changed,
    }
}

/// Verify the observed Secret is managed by `owner_tag`
///
/// # Errors
///
/// Returns [`ReconcilerError::OwnershipConflict`] if the annotation is missing
/// or names another instance.
pub fn check_ownership(
    desired: &MaterializedSecret,
    observed: &ObservedSecret,
) -> Result<(), ReconcilerError> {
    match observed.owner() {
        Some(owner) if owner == desired.owner_tag => Ok(()),
        other => Err(ReconcilerError::OwnershipConflict {
            name: desired.name.clone(),
            current_owner: other.unwrap_or_default().to_string(),
            expected_owner: desired.owner_tag.clone(),
        }),
    }
}

/// Decide what has to happen to bring `observed` in line with `desired`
///
/// # Errors
///
/// Returns [`ReconcilerError::OwnershipConflict`] if a Secret exists but is
/// not managed by this instance.
pub fn diff(
    desired: &MaterializedSecret,
    observed: Option<&ObservedSecret>,
) -> Result<Divergence, ReconcilerError> {
    let Some(observed) = observed else {
        return Ok(Divergence::NeedsCreate);
    };

    check_ownership(desired, observed)?;

    let changes = key_changes(desired, observed);
    if !changes.added.is_empty() {
        debug!("The following keys have been added: {:?}", changes.added);
    }
    if !changes.removed.is_empty() {
        debug!("The following keys have been removed: {:?}", changes.removed);
    }
    if !changes.changed.is_empty() {
        debug!("The following keys have changed: {:?}", changes.changed);
    }

    if changes.is_empty() {
        Ok(Divergence::NoOpNeeded)
    } else {
        Ok(Divergence::NeedsReplace)
    }
}
