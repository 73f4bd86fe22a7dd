//! Azure error mapping
//!
//! Reference: <https://learn.microsoft.com/azure/azure-resource-manager/troubleshooting/common-deployment-errors>
//!
//! Two error sources are mapped here:
//!
//! - **ARM** (`management.azure.com`): `{"error": {"code": "...", "message": "..."}}`
//! - **Entra ID token endpoint**: `{"error": "invalid_client", "error_description": "AADSTS..."}`
//!
//! Unmapped codes (e.g. `PreconditionFailed`, `Conflict`) fall back to `Unknown`.

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{AzureProvider, PROVIDER_NAME};

impl ProviderErrorMapper for AzureProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // ============ Authentication ============
            Some(
                "AuthenticationFailed"
                | "InvalidAuthenticationToken"
                | "InvalidAuthenticationTokenTenant"
                | "ExpiredAuthenticationToken"
                | "SubscriptionNotFound"
                // token endpoint
                | "invalid_client"
                | "unauthorized_client"
                | "invalid_grant"
                | "invalid_request",
            ) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ Permission ============
            Some(
                "AuthorizationFailed"
                | "LinkedAuthorizationFailed"
                | "Forbidden"
                | "ScopeLocked",
            ) => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ Throttling ============
            Some("TooManyRequests" | "Throttled" | "ThrottlingException") => {
                ProviderError::RateLimited {
                    provider: self.provider_name().to_string(),
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            // ============ Quota ============
            Some("QuotaExceeded" | "ResourceQuotaExceeded" | "LimitExceeded") => {
                ProviderError::QuotaExceeded {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            // ============ Zone not found ============
            Some("ResourceNotFound" | "ParentResourceNotFound" | "ResourceGroupNotFound" | "NotFound") => {
                ProviderError::DomainNotFound {
                    provider: self.provider_name().to_string(),
                    domain: context.domain.unwrap_or_default(),
                    raw_message: Some(raw.message),
                }
            }

            // ============ Invalid parameter ============
            Some(
                "BadRequest"
                | "InvalidRequestContent"
                | "InvalidRequestFormat"
                | "InvalidParameter"
                | "InvalidResourceName",
            ) => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: context.record_name.unwrap_or_else(|| "request".to_string()),
                detail: raw.message,
            },

            Some("invalid_scope") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "scope".to_string(),
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}
