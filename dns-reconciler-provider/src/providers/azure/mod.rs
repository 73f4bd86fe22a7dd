//! Azure DNS Provider

mod auth;
mod convert;
mod error;
mod http;
mod provider;
/// Azure Resource Manager request/response types.
pub(crate) mod types;

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::http_client::RetryPolicy;
use crate::providers::common::create_http_client;
use crate::types::AzureCredentials;

use auth::TokenCache;

/// Provider identifier used in errors and logs.
pub(crate) const PROVIDER_NAME: &str = "azure";
/// ARM API version of the `Microsoft.Network/dnsZones` resources.
pub(crate) const API_VERSION: &str = "2018-05-01";
/// Page size used when listing zones.
pub(crate) const ZONE_PAGE_SIZE: u32 = 100;
/// Page size used when listing record sets.
pub(crate) const RECORD_SET_PAGE_SIZE: u32 = 1000;
/// Default pause after each mutation.
pub(crate) const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(25);

/// Base URLs of the Azure cloud to talk to.
///
/// Defaults to the public cloud. Override for sovereign clouds or to point
/// the provider at a local test server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureEndpoints {
    /// Azure Resource Manager base URL, without trailing slash.
    pub resource_manager: String,
    /// Entra ID authority base URL, without trailing slash.
    pub authority: String,
    /// OAuth scope requested for management tokens.
    pub scope: String,
}

impl Default for AzureEndpoints {
    fn default() -> Self {
        Self {
            resource_manager: "https://management.azure.com".to_string(),
            authority: "https://login.microsoftonline.com".to_string(),
            scope: "https://management.azure.com/.default".to_string(),
        }
    }
}

/// Azure DNS provider implementation.
///
/// Authenticates as a service principal (OAuth2 client credentials) and
/// manages the DNS zones of one resource group.
///
/// # Construction
///
/// ```rust,no_run
/// use dns_reconciler_provider::{AzureCredentials, AzureProvider};
///
/// let provider = AzureProvider::builder(AzureCredentials {
///     tenant_id: "tenant".to_string(),
///     client_id: "client".to_string(),
///     client_secret: "secret".to_string(),
///     subscription_id: "subscription".to_string(),
///     resource_group: "dns-rg".to_string(),
/// })
/// .max_retries(3)
/// .build()
/// .unwrap();
/// ```
pub struct AzureProvider {
    pub(crate) client: Client,
    pub(crate) credentials: AzureCredentials,
    pub(crate) endpoints: AzureEndpoints,
    pub(crate) retry: RetryPolicy,
    pub(crate) settle_delay: Duration,
    pub(crate) token_cache: TokenCache,
}

/// Builder for [`AzureProvider`].
pub struct AzureProviderBuilder {
    credentials: AzureCredentials,
    endpoints: AzureEndpoints,
    max_retries: u32,
    settle_delay: Duration,
}

impl AzureProviderBuilder {
    fn new(credentials: AzureCredentials) -> Self {
        Self {
            credentials,
            endpoints: AzureEndpoints::default(),
            max_retries: RetryPolicy::default().max_retries,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Set the maximum number of automatic retries for transient errors (default: 2).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Pause after every upsert and delete (default: 25ms).
    ///
    /// Azure can take a moment before a mutation is visible to subsequent
    /// reads; `Duration::ZERO` disables the pause.
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Override the cloud endpoints.
    pub fn endpoints(mut self, endpoints: AzureEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Build the [`AzureProvider`] instance.
    pub fn build(self) -> Result<AzureProvider> {
        Ok(AzureProvider {
            client: create_http_client(PROVIDER_NAME)?,
            credentials: self.credentials,
            endpoints: self.endpoints,
            retry: RetryPolicy::new(self.max_retries),
            settle_delay: self.settle_delay,
            token_cache: TokenCache::new(),
        })
    }
}

impl AzureProvider {
    /// Creates a new Azure provider with default settings.
    pub fn new(credentials: AzureCredentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the provider configuration.
    pub fn builder(credentials: AzureCredentials) -> AzureProviderBuilder {
        AzureProviderBuilder::new(credentials)
    }

    /// ARM path of the resource group's DNS zone collection.
    pub(crate) fn zones_path(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/dnsZones",
            urlencoding::encode(&self.credentials.subscription_id),
            urlencoding::encode(&self.credentials.resource_group),
        )
    }

    /// ARM path of one zone.
    pub(crate) fn zone_path(&self, zone: &str) -> String {
        format!("{}/{}", self.zones_path(), urlencoding::encode(zone))
    }

    /// Absolute URL for an ARM path with `api-version` and extra query pairs.
    pub(crate) fn arm_url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{}?api-version={API_VERSION}",
            self.endpoints.resource_manager, path
        );
        for (key, value) in query {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }
}
