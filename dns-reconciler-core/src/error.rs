//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use dns_reconciler_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Malformed desired state (bad name, bad address, duplicate record, ...)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Record type the reconciler or the provider cannot manage
    #[error("Unsupported record type {record_type} at {name}")]
    UnsupportedRecordType { name: String, record_type: String },

    /// Records of one record set disagree on TTL
    #[error("Inconsistent TTL for {key}: {ttls:?}")]
    InconsistentTtl { key: String, ttls: Vec<u32> },

    /// Zone is not hosted in the account
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Planned change refers to remote state that does not exist
    #[error("Inconsistency: {0}")]
    Inconsistency(String),

    /// A correction did not finish in time
    #[error("Correction timed out after {seconds}s: {key}")]
    Timeout { key: String, seconds: u64 },

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether the error is an expected outcome (bad input, unknown zone, ...); used to pick the log level.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// Keep this in sync when adding variants.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_)
            | Self::UnsupportedRecordType { .. }
            | Self::InconsistentTtl { .. }
            | Self::DomainNotFound(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::Inconsistency(_) | Self::Timeout { .. } => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
