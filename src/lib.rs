//! Secrets Distributor Library
//!
//! Reconciles `SecretsDistribution` resources into Kubernetes Secrets built
//! from files mounted into the controller. Secrets that carry no
//! `xlscsde.nhs.uk/managedBy` annotation, or another instance's tag, are never
//! overwritten.
//!
//! Tests are included in the module files and under `tests/`.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod declaration;
pub mod diff;
pub mod error;
pub mod materializer;
pub mod metrics;
pub mod reconciler;
pub mod server;
pub mod store;
