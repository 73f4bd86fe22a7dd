//! DNS Reconciler Core Library
//!
//! Converges a provider-hosted DNS zone on a declared desired state:
//! - Validation of the desired records
//! - Record-set grouping and diffing against the remote zone
//! - Correction planning, including conflict-clearing deletes (CNAME vs A/AAAA)
//! - Concurrent, per-key ordered execution of corrections
//!
//! Provider access goes through [`dns_reconciler_provider::ZoneProvider`]; a
//! [`ReconcileSession`] ties one provider account to one run.

pub mod error;
pub mod reconcile;
pub mod services;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{apply_corrections, ReconcileSession};
pub use validation::validate_domain;
