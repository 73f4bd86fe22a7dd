//! Service principal authentication (OAuth2 client credentials)

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::AzureProvider;
use super::types::{TokenErrorResponse, TokenResponse};

/// Refresh tokens this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + TimeDelta::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Bearer token cache shared by all requests of one provider instance.
pub(crate) struct TokenCache {
    inner: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }
}

impl AzureProvider {
    /// Returns a valid management access token, fetching a new one when the
    /// cached token is missing or about to expire.
    pub(crate) async fn access_token(&self) -> Result<String> {
        // Held across the fetch so concurrent callers share one token request
        let mut guard = self.token_cache.inner.lock().await;

        if let Some(token) = guard.as_ref()
            && token.is_fresh(Utc::now())
        {
            return Ok(token.access_token.clone());
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    async fn fetch_token(&self) -> Result<CachedToken> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.endpoints.authority,
            urlencoding::encode(&self.credentials.tenant_id)
        );
        let body = token_request_body(
            &self.credentials.client_id,
            &self.credentials.client_secret,
            &self.endpoints.scope,
        );

        let request = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body);

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "POST",
            &url,
            self.retry,
        )
        .await?;

        if !(200..300).contains(&status) {
            if let Ok(err) = serde_json::from_str::<TokenErrorResponse>(&response_text) {
                return Err(self.map_error(
                    RawApiError::with_code(err.error, err.error_description.unwrap_or_default()),
                    ErrorContext::default(),
                ));
            }
            return Err(self.unknown_error(RawApiError::new(format!(
                "HTTP {status}: token request failed"
            ))));
        }

        let token: TokenResponse = HttpUtils::parse_json(&response_text, self.provider_name())?;
        let expires_in = i64::try_from(token.expires_in).unwrap_or(i64::MAX / 2);
        let expires_at = Utc::now()
            .checked_add_signed(TimeDelta::seconds(expires_in.min(86_400)))
            .ok_or_else(|| ProviderError::ParseError {
                provider: self.provider_name().to_string(),
                detail: format!("invalid token lifetime: {}", token.expires_in),
            })?;

        log::debug!("[azure] Acquired management token, expires at {expires_at}");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

/// `application/x-www-form-urlencoded` body of a client-credentials request.
fn token_request_body(client_id: &str, client_secret: &str, scope: &str) -> String {
    format!(
        "grant_type=client_credentials&client_id={}&client_secret={}&scope={}",
        urlencoding::encode(client_id),
        urlencoding::encode(client_secret),
        urlencoding::encode(scope),
    )
}
