//! Provider factory functions and metadata.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::ZoneProvider;
use crate::types::{ProviderCredentials, ProviderMetadata};

#[cfg(feature = "azure")]
use crate::providers::AzureProvider;

/// Creates a [`ZoneProvider`] instance from the given credentials.
///
/// The concrete provider type is determined by the [`ProviderCredentials`] variant.
/// The returned provider is wrapped in `Arc<dyn ZoneProvider>` for easy sharing
/// across async tasks.
///
/// Fails with `InvalidParameter` when the provider's feature flag is disabled.
///
/// # Examples
///
/// ```rust,no_run
/// use dns_reconciler_provider::{create_provider, AzureCredentials, ProviderCredentials};
///
/// let provider = create_provider(ProviderCredentials::Azure(AzureCredentials {
///     tenant_id: "tenant".to_string(),
///     client_id: "client".to_string(),
///     client_secret: "secret".to_string(),
///     subscription_id: "subscription".to_string(),
///     resource_group: "dns-rg".to_string(),
/// }))
/// .unwrap();
/// ```
pub fn create_provider(credentials: ProviderCredentials) -> Result<Arc<dyn ZoneProvider>> {
    match credentials {
        #[cfg(feature = "azure")]
        ProviderCredentials::Azure(creds) => Ok(Arc::new(AzureProvider::new(creds)?)),
        #[allow(unreachable_patterns)]
        other => Err(crate::error::ProviderError::InvalidParameter {
            provider: other.provider_type().to_string(),
            param: "provider".to_string(),
            detail: "provider support is not compiled in".to_string(),
        }),
    }
}

/// Returns metadata for all providers enabled via feature flags.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![
        #[cfg(feature = "azure")]
        AzureProvider::provider_metadata(),
    ]
}
