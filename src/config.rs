//! # Controller Configuration
//!
//! Controller-level settings loaded from environment variables.
//!
//! The configuration is built once in `main` and handed to the
//! [`Reconciler`](crate::reconciler::Reconciler), so nothing downstream reads
//! the environment directly.

use crate::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_MANAGED_BY, DEFAULT_METRICS_PORT,
    DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS, DEFAULT_SECRETS_PATH, DEFAULT_WATCH_TIMEOUT_SECS,
};
use std::path::PathBuf;
use std::time::Duration;

/// Controller-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Root directory the declared source files are resolved against (`SECRETS_PATH`)
    pub secrets_path: PathBuf,
    /// Tag identifying this distributor instance (`MANAGED_BY`)
    /// Written to, and required on, every managed Secret
    pub managed_by: String,
    /// HTTP port for metrics and probes (`METRICS_PORT`)
    pub metrics_port: u16,
    /// Server-side watch timeout in seconds (`WATCH_TIMEOUT_SECS`)
    pub watch_timeout_secs: u32,
    /// How long to wait before retrying a failed reconciliation (`RECONCILIATION_ERROR_REQUEUE_SECS`)
    pub reconciliation_error_requeue_secs: u64,
    /// Log level used when `RUST_LOG` is unset (`LOG_LEVEL`)
    pub log_level: String,
    /// Serve Prometheus metrics (`ENABLE_METRICS`)
    pub enable_metrics: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            secrets_path: PathBuf::from(DEFAULT_SECRETS_PATH),
            managed_by: DEFAULT_MANAGED_BY.to_string(),
            metrics_port: DEFAULT_METRICS_PORT,
            watch_timeout_secs: DEFAULT_WATCH_TIMEOUT_SECS,
            reconciliation_error_requeue_secs: DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            enable_metrics: true,
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Unset, empty or unparsable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            secrets_path: lookup("SECRETS_PATH")
                .map_or(defaults.secrets_path, PathBuf::from),
            managed_by: lookup("MANAGED_BY").unwrap_or(defaults.managed_by),
            metrics_port: parse_or(lookup("METRICS_PORT"), defaults.metrics_port),
            watch_timeout_secs: parse_or(lookup("WATCH_TIMEOUT_SECS"), defaults.watch_timeout_secs),
            reconciliation_error_requeue_secs: parse_or(
                lookup("RECONCILIATION_ERROR_REQUEUE_SECS"),
                defaults.reconciliation_error_requeue_secs,
            ),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            enable_metrics: lookup("ENABLE_METRICS")
                .map_or(defaults.enable_metrics, |v| parse_bool(&v)),
        }
    }

    /// Get reconciliation error requeue duration
    #[must_use]
    pub fn reconciliation_error_requeue_duration(&self) -> Duration {
        Duration::from_secs(self.reconciliation_error_requeue_secs)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_bool(value: &str) -> bool {
    let v_lower = value.trim().to_lowercase();
    v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
}
