//! Generic HTTP client tools
//!
//! Reusable request execution shared by provider implementations. Each
//! provider builds its own `RequestBuilder` (auth headers, body, query) and
//! hands it over here for sending, logging, status triage and retries.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::{strip_query, truncate_for_log};

/// Upper bound for a server-provided `Retry-After` value (seconds).
const MAX_RETRY_AFTER_SECS: u64 = 30;
/// Base delay of the exponential backoff (milliseconds).
const BACKOFF_BASE_MS: u64 = 100;
/// Upper bound of the exponential backoff (milliseconds).
const BACKOFF_MAX_MS: u64 = 10_000;

/// Retry behaviour for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt (0 disables retrying).
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 2 }
    }
}

impl RetryPolicy {
    /// Policy with the given retry count.
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Delay before retry number `attempt` (0-based) after `error`.
    ///
    /// A `RateLimited` error carrying `retry_after` waits that long (capped at
    /// 30s); everything else uses exponential backoff: 100ms, 200ms, 400ms, ...
    /// capped at 10s.
    pub fn delay_for(&self, error: &ProviderError, attempt: u32) -> Duration {
        if let ProviderError::RateLimited {
            retry_after: Some(secs),
            ..
        } = error
        {
            Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS))
        } else {
            backoff_delay(attempt)
        }
    }
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Sends a request and returns `(status, body)`.
    ///
    /// Transport failures become `Timeout` or `NetworkError`; HTTP 429 becomes
    /// `RateLimited` (with `Retry-After` if present); 502/503/504 become
    /// `NetworkError`. Every other status is returned to the caller for
    /// provider-specific triage.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String), ProviderError> {
        let url_for_log = strip_query(url);
        log::debug!("[{provider_name}] {method_name} {url_for_log}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status_code}");

        // Read before the body consumes the response
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(truncate_for_log(&body)),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Server error (HTTP {status_code})");
            return Err(ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body into `T`, mapping failures to `ParseError`.
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Like [`execute_request`](Self::execute_request), retrying transient
    /// failures according to `policy`.
    ///
    /// Only [`ProviderError::is_retryable`] errors are retried. Requests whose
    /// body cannot be cloned are sent once.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url: &str,
        policy: RetryPolicy,
    ) -> Result<(u16, String), ProviderError> {
        if policy.max_retries == 0 {
            return Self::execute_request(request_builder, provider_name, method_name, url).await;
        }

        let mut last_error = None;

        for attempt in 0..=policy.max_retries {
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{provider_name}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, provider_name, method_name, url)
                    .await;
            };

            match Self::execute_request(req, provider_name, method_name, url).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < policy.max_retries && e.is_retryable() => {
                    let delay = policy.delay_for(&e, attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        provider_name,
                        attempt + 1,
                        policy.max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::NetworkError {
            provider: provider_name.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Exponential backoff: 100ms, 200ms, 400ms, 800ms, 1.6s, ... capped at 10s.
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // 2^attempt overflow guard
    let delay_ms = BACKOFF_BASE_MS.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(BACKOFF_MAX_MS))
}
