//! # Reconciler
//!
//! One reconciliation pass over a single [`Declaration`].
//!
//! ## Reconciliation Flow
//!
//! 1. Materialize the desired Secret from the secrets root
//! 2. Fetch the live Secret (case-insensitive name match)
//! 3. Diff, enforcing ownership before comparing data
//! 4. Create, replace, or leave the Secret alone
//!
//! Materializing first means a missing source file aborts the pass before any
//! API call. Errors are returned unchanged; the pass is never retried here.

use crate::config::ControllerConfig;
use crate::declaration::Declaration;
use crate::diff::{diff, Divergence};
use crate::error::ReconcilerError;
use crate::materializer::materialize;
use crate::store::{fetch_observed, SecretStore};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Action taken by a successful pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Replaced,
    Unchanged,
}

impl Outcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Created => "created",
            Outcome::Replaced => "replaced",
            Outcome::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reconciler context shared by every pass
#[derive(Clone)]
pub struct Reconciler {
    config: ControllerConfig,
    store: Arc<dyn SecretStore>,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    #[must_use]
    pub fn new(config: ControllerConfig, store: Arc<dyn SecretStore>) -> Self {
        Self { config, store }
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Bring the declared Secret in line with `declaration`
    ///
    /// # Errors
    ///
    /// Propagates [`ReconcilerError`] from materializing, fetching, diffing or
    /// the mutating call. Nothing is written when an error occurs before the
    /// mutating call.
    pub async fn reconcile(&self, declaration: &Declaration) -> Result<Outcome, ReconcilerError> {
        let desired = materialize(
            declaration,
            &self.config.secrets_path,
            &self.config.managed_by,
        )?;

        let observed =
            fetch_observed(self.store.as_ref(), &declaration.namespace, &declaration.name).await?;

        match diff(&desired, observed.as_ref())? {
            Divergence::NoOpNeeded => {
                info!(
                    "Object {} on {} does not need updating",
                    declaration.name, declaration.namespace
                );
                Ok(Outcome::Unchanged)
            }
            Divergence::NeedsCreate => {
                info!("Creating object {} on {}", declaration.name, declaration.namespace);
                self.store
                    .create_secret(&declaration.namespace, &desired.to_secret()?)
                    .await?;
                Ok(Outcome::Created)
            }
            Divergence::NeedsReplace => {
                info!("Replacing object {} on {}", declaration.name, declaration.namespace);
                self.store
                    .replace_secret(
                        &declaration.name,
                        &declaration.namespace,
                        &desired.to_secret()?,
                    )
                    .await?;
                Ok(Outcome::Replaced)
            }
        }
    }
}
