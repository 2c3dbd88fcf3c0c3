//! # Secrets Distributor
//!
//! A Kubernetes controller that copies files mounted under a secrets root into
//! Kubernetes Secrets declared by `SecretsDistribution` resources.
//!
//! ## Overview
//!
//! 1. **Watching declarations** - Monitors `SecretsDistribution` resources in all namespaces
//! 2. **Reading secret files** - Reads each declared file from `SECRETS_PATH`
//! 3. **Ownership safety** - Only touches Secrets annotated with this instance's `MANAGED_BY` tag
//! 4. **Minimal writes** - Creates missing Secrets and replaces diverged ones, otherwise does nothing
//!
//! ## Configuration
//!
//! See [`secrets_distributor::config::ControllerConfig`] for the environment variables.

use anyhow::{Context, Result};
use kube::Client;
use secrets_distributor::config::ControllerConfig;
use secrets_distributor::controller;
use secrets_distributor::metrics;
use secrets_distributor::reconciler::Reconciler;
use secrets_distributor::server::{start_server, ServerState};
use secrets_distributor::store::KubeSecretStore;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Configure rustls crypto provider FIRST, before any other operations
    // Required for rustls 0.23+ when no default provider is set via features
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        anyhow::bail!("Failed to install rustls crypto provider");
    }

    let config = ControllerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("secrets_distributor={}", config.log_level).into()),
        )
        .init();

    info!("Starting Secrets Distributor");
    info!(
        "Build info: datetime={}, git_hash={}",
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );
    info!(
        "Secrets path: {}, managed by: {}",
        config.secrets_path.display(),
        config.managed_by
    );

    let server_state = Arc::new(ServerState::default());

    if config.enable_metrics {
        metrics::register_metrics().context("Failed to register metrics")?;
    }

    // Start HTTP server for metrics and probes
    let server_state_clone = Arc::clone(&server_state);
    let server_port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    let store = Arc::new(KubeSecretStore::new(client.clone()));
    let reconciler = Arc::new(Reconciler::new(config, store));

    server_state.mark_ready();

    controller::run(client, reconciler).await;

    Ok(())
}
