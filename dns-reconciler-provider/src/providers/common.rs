//! Shared helpers for provider implementations

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::types::RecordType;

// ============ HTTP Client ============

/// Default connect timeout (seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with the default connect/request timeouts.
pub fn create_http_client(provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

// ============ Record type conversion ============

/// Parse a record type mnemonic, mapping unknown types to `UnsupportedRecordType`.
pub fn parse_record_type(record_type: &str, provider: &str) -> Result<RecordType> {
    record_type
        .parse()
        .map_err(|_| ProviderError::UnsupportedRecordType {
            provider: provider.to_string(),
            record_type: record_type.to_string(),
        })
}

/// Sleep for `delay` unless it is zero.
pub async fn settle(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
