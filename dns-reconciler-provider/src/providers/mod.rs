//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "azure")]
mod azure;

#[cfg(feature = "azure")]
pub use azure::{AzureEndpoints, AzureProvider, AzureProviderBuilder};
