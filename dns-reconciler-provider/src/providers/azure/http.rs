//! Azure Resource Manager request helpers

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::AzureProvider;
use super::types::ArmErrorResponse;

impl AzureProvider {
    // ==================== Helpers ====================

    /// Turn a non-2xx ARM response into a mapped error.
    fn handle_response_error(
        &self,
        status: u16,
        response_text: &str,
        ctx: ErrorContext,
    ) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        if let Ok(body) = serde_json::from_str::<ArmErrorResponse>(response_text) {
            let message = body.error.message.unwrap_or_default();
            let raw = match body.error.code {
                Some(code) => RawApiError::with_code(code, message),
                None => RawApiError::new(message),
            };
            return Err(self.map_error(raw, ctx));
        }

        // Empty 401/403/404 bodies still deserve a typed error
        let code = match status {
            401 => Some("AuthenticationFailed"),
            403 => Some("AuthorizationFailed"),
            404 => Some("ResourceNotFound"),
            _ => None,
        };
        let message = format!("HTTP {status}: {}", truncate_for_log(response_text));
        match code {
            Some(code) => Err(self.map_error(RawApiError::with_code(code, message), ctx)),
            None => Err(self.unknown_error(RawApiError::new(message))),
        }
    }

    /// Attach bearer auth and a client request id.
    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(request
            .bearer_auth(token)
            .header("x-ms-client-request-id", uuid::Uuid::new_v4().to_string()))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &str,
    ) -> Result<(u16, String)> {
        let request = self.authorize(request).await?;
        HttpUtils::execute_request_with_retry(request, self.provider_name(), method, url, self.retry)
            .await
    }

    // ==================== Public API ====================

    /// GET an absolute ARM URL and decode the JSON body.
    pub(crate) async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        ctx: ErrorContext,
    ) -> Result<T> {
        let (status, response_text) = self.send(self.client.get(url), "GET", url).await?;
        self.handle_response_error(status, &response_text, ctx)?;
        HttpUtils::parse_json(&response_text, self.provider_name())
    }

    /// PUT a JSON body to an absolute ARM URL and decode the response.
    pub(crate) async fn put<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            })?;

        log::debug!("[azure] Request Body: {}", truncate_for_log(&payload));

        let request = self
            .client
            .put(url)
            .header("Content-Type", "application/json")
            .body(payload);

        let (status, response_text) = self.send(request, "PUT", url).await?;
        self.handle_response_error(status, &response_text, ctx)?;
        HttpUtils::parse_json(&response_text, self.provider_name())
    }

    /// DELETE an absolute ARM URL. A 404 counts as success.
    pub(crate) async fn delete(&self, url: &str, ctx: ErrorContext) -> Result<()> {
        let (status, response_text) = self.send(self.client.delete(url), "DELETE", url).await?;
        if status == 404 {
            log::debug!("[azure] DELETE target already absent");
            return Ok(());
        }
        self.handle_response_error(status, &response_text, ctx)
    }
}
