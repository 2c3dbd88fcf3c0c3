//! # Custom Resource Definitions
//!
//! CRD types for the Secrets Distributor.
//!
//! ## Module Structure
//!
//! - `spec.rs` - `SecretsDistribution` specification and default values
//! - `status.rs` - Informational status carried by the resource

mod spec;
mod status;

// Re-export all public types
pub use spec::{default_secret_type, SecretMapping, SecretsDistribution, SecretsDistributionSpec};
pub use status::SecretsDistributionStatus;
