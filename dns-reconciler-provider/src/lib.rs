//! # dns-reconciler-provider
//!
//! Record-set oriented DNS provider abstraction: the canonical record model,
//! the [`ZoneProvider`] trait and an Azure DNS implementation.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | [Azure DNS](https://azure.microsoft.com/products/dns) | `azure` | OAuth2 client credentials (service principal) |
//!
//! ## Feature Flags
//!
//! ### Provider Selection
//!
//! - **`all-providers`** *(default)*: enable all providers listed above.
//! - **`azure`**: enable only the Azure DNS provider.
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls. Recommended for cross-compilation.
//!
//! ## Record model
//!
//! A zone is a collection of [`RecordSet`]s, each identified by a [`RecordKey`]
//! (fully-qualified name plus [`RecordType`]). Providers read and write whole
//! sets: [`ZoneProvider::upsert_record_set`] replaces the set at a key,
//! [`ZoneProvider::delete_record_set`] removes it by its remote id.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dns_reconciler_provider::{create_provider, AzureCredentials, ProviderCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(ProviderCredentials::Azure(AzureCredentials {
//!         tenant_id: "tenant".to_string(),
//!         client_id: "client".to_string(),
//!         client_secret: "secret".to_string(),
//!         subscription_id: "subscription".to_string(),
//!         resource_group: "dns-rg".to_string(),
//!     }))?;
//!
//!     for zone in provider.list_zones().await? {
//!         println!("{} {:?}", zone.name, zone.name_servers);
//!         for set in provider.list_record_sets(&zone.name).await? {
//!             for record in set.record_set.to_records() {
//!                 println!("  {record}");
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are automatically
//! retried with exponential backoff. See [`ProviderError`] for the full list.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::{create_provider, get_all_provider_metadata};

// Re-export the provider trait only (internal traits are not exported)
pub use traits::ZoneProvider;

// Re-export retry configuration
pub use http_client::RetryPolicy;

// Re-export types
pub use types::{
    AzureCredentials, CredentialValidationError, FieldType, ParseRecordTypeError,
    ProviderCredentialField, ProviderCredentials, ProviderFeatures, ProviderLimits,
    ProviderMetadata, ProviderType, ProviderZone, Record, RecordData, RecordKey, RecordSet,
    RecordType, RemoteRecordSet,
};

// Re-export name helpers
pub use utils::name;

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "azure")]
pub use providers::{AzureEndpoints, AzureProvider, AzureProviderBuilder};
