//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! These values represent reasonable defaults and can be overridden via
//! environment variables where applicable (see [`crate::config`]).

/// API group of the `SecretsDistribution` custom resource
pub const CRD_GROUP: &str = "xlscsde.nhs.uk";

/// API version of the `SecretsDistribution` custom resource
pub const CRD_VERSION: &str = "v1";

/// Annotation identifying which distributor instance manages a Secret
pub const MANAGED_BY_ANNOTATION: &str = "xlscsde.nhs.uk/managedBy";

/// Secret type used when a declaration does not set one
pub const DEFAULT_SECRET_TYPE: &str = "Opaque";

/// Default directory holding the mounted source files
pub const DEFAULT_SECRETS_PATH: &str = "/mnt/secrets";

/// Default managing-instance tag written to the ownership annotation
pub const DEFAULT_MANAGED_BY: &str = "secrets-distributor";

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default watch timeout (seconds), applied to the server-side watch request
pub const DEFAULT_WATCH_TIMEOUT_SECS: u32 = 60;

/// Default requeue interval for reconciliation errors (seconds)
pub const DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS: u64 = 60;

/// Default log level when neither `RUST_LOG` nor `LOG_LEVEL` is set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Field manager name used when talking to the API server
pub const FIELD_MANAGER: &str = "secrets-distributor";
