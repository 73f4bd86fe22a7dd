use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{ProviderMetadata, ProviderZone, RecordSet, RemoteRecordSet};

/// Raw API error as returned by a provider (internal).
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code, format differs per provider.
    pub code: Option<String>,
    /// Original error message.
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra context used while mapping an error (internal).
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Zone the request targeted, for `DomainNotFound`.
    pub domain: Option<String>,
    /// Record set name, for `InvalidParameter`.
    pub record_name: Option<String>,
}

impl ErrorContext {
    pub fn zone(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            record_name: None,
        }
    }

    pub fn record(domain: &str, record_name: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            record_name: Some(record_name.to_string()),
        }
    }
}

/// Maps raw provider API errors onto [`ProviderError`] (internal).
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier.
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type.
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: unknown error (fallback).
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// A DNS hosting service that stores zones as record sets.
///
/// Every mutation addresses a whole record set: `upsert_record_set` replaces
/// the set at the key wholesale, `delete_record_set` removes it. Implementations
/// must be idempotent: upserting identical content twice leaves the zone
/// unchanged, and deleting an absent set succeeds.
#[async_trait]
pub trait ZoneProvider: Send + Sync {
    /// Provider identifier (e.g., `"azure"`).
    fn id(&self) -> &'static str;

    /// Static metadata: supported record types, credential fields, limits.
    fn metadata(&self) -> ProviderMetadata;

    /// List every zone visible with the configured credentials.
    ///
    /// Pagination is handled internally.
    async fn list_zones(&self) -> Result<Vec<ProviderZone>>;

    /// Create a zone for `domain` and return it with its assigned name servers.
    async fn create_zone(&self, domain: &str) -> Result<ProviderZone>;

    /// List all manageable record sets of `zone` in canonical form.
    ///
    /// Record sets of types the reconciler does not model (SOA) are omitted.
    /// The apex NS set is listed as the provider reports it; callers treat it
    /// as owned by the provider and never plan changes to it.
    async fn list_record_sets(&self, zone: &str) -> Result<Vec<RemoteRecordSet>>;

    /// Create or replace the record set identified by `record_set.key`.
    async fn upsert_record_set(&self, zone: &str, record_set: &RecordSet) -> Result<()>;

    /// Delete the record set addressed by `remote_id`.
    async fn delete_record_set(&self, zone: &str, remote_id: &str) -> Result<()>;
}
