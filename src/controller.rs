//! # Controller
//!
//! Watch loop glue between `kube-runtime` and the [`Reconciler`].
//!
//! Create, update and resume events all arrive as the same reconcile call:
//! the runtime re-lists on start, so existing resources are reconciled after a
//! restart. Successful passes wait for the next change; failed passes are
//! requeued by [`error_policy`].

use crate::crd::SecretsDistribution;
use crate::declaration::Declaration;
use crate::error::ReconcilerError;
use crate::metrics;
use crate::reconciler::Reconciler;
use futures::StreamExt;
use kube::{Api, Client, ResourceExt};
use kube_runtime::{controller::Action, watcher, Controller};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn, Instrument};

/// Reconcile one `SecretsDistribution` resource
///
/// # Errors
///
/// Returns the [`ReconcilerError`] of the failed pass.
pub async fn reconcile(
    resource: Arc<SecretsDistribution>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let name = resource.name_any();
    let namespace = resource.namespace().unwrap_or_else(|| "default".to_string());
    let span = tracing::info_span!(
        "reconcile",
        resource.name = %name,
        resource.namespace = %namespace
    );

    async move {
        let start = Instant::now();
        info!("{} on {} has been updated", name, namespace);
        metrics::increment_reconciliations();

        let declaration = Declaration::from_resource(&resource);
        debug!(
            "Target secret {} with {} entries (last status: '{}')",
            declaration.name,
            declaration.entries.len(),
            declaration.status.status_text
        );

        let result = ctx.reconcile(&declaration).await;
        metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());

        let outcome = result?;
        metrics::increment_secret_actions(outcome.as_str());
        debug!("Reconciliation finished: {}", outcome);

        Ok(Action::await_change())
    }
    .instrument(span)
    .await
}

/// Handle reconciliation errors
///
/// Logs the failure and requeues the resource after the configured interval.
pub fn error_policy(
    resource: Arc<SecretsDistribution>,
    error: &ReconcilerError,
    ctx: Arc<Reconciler>,
) -> Action {
    let name = resource.name_any();
    let namespace = resource.namespace().unwrap_or_else(|| "default".to_string());

    metrics::increment_reconciliation_errors(error.kind());
    match error {
        ReconcilerError::OwnershipConflict { .. } => {
            metrics::increment_ownership_conflicts();
            warn!("Refusing to overwrite secret for {} on {}: {}", name, namespace, error);
        }
        _ => error!("Reconciliation error for {} on {}: {}", name, namespace, error),
    }

    Action::requeue(ctx.config().reconciliation_error_requeue_duration())
}

/// Run the controller until a shutdown signal is received
///
/// Watches `SecretsDistribution` resources in all namespaces.
pub async fn run(client: Client, reconciler: Arc<Reconciler>) {
    let distributions: Api<SecretsDistribution> = Api::all(client);
    let watcher_config =
        watcher::Config::default().timeout(reconciler.config().watch_timeout_secs);

    info!("Starting controller watch loop...");
    Controller::new(distributions, watcher_config)
        .shutdown_on_signal()
        .run(reconcile, error_policy, reconciler)
        .for_each(|res| async move {
            match res {
                Ok((obj, _)) => debug!("Reconciled {}", obj.name),
                Err(e) => debug!("Controller event error: {}", e),
            }
        })
        .await;
    info!("Controller stopped");
}
