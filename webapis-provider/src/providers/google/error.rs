//! Google API error mapping
//!
//! Reference: <https://cloud.google.com/apis/design/errors>. The legacy
//! per-API `reason` values are matched first; they distinguish rate limits
//! from permission errors that share HTTP 403.

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::GoogleClient;

impl ProviderErrorMapper for GoogleClient {
    fn provider_name(&self) -> &'static str {
        "google"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        let resource = || context.resource.clone().unwrap_or_default();

        match raw.code.as_deref() {
            Some("authError" | "UNAUTHENTICATED" | "401") => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },

            Some("rateLimitExceeded" | "userRateLimitExceeded" | "RESOURCE_EXHAUSTED" | "429") => {
                ProviderError::RateLimited {
                    provider,
                    retry_after: context.retry_after,
                    raw_message: Some(raw.message),
                }
            }

            Some("quotaExceeded" | "dailyLimitExceeded") => ProviderError::QuotaExceeded {
                provider,
                raw_message: Some(raw.message),
            },

            Some("forbidden" | "insufficientPermissions" | "PERMISSION_DENIED" | "403") => {
                ProviderError::PermissionDenied {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            Some("notFound" | "NOT_FOUND" | "404") => ProviderError::ResourceNotFound {
                provider,
                resource: resource(),
                raw_message: Some(raw.message),
            },

            Some("duplicate" | "conflict" | "ALREADY_EXISTS" | "409") => {
                ProviderError::ResourceExists {
                    provider,
                    resource: resource(),
                    raw_message: Some(raw.message),
                }
            }

            Some("invalid" | "badRequest" | "invalidParameter" | "INVALID_ARGUMENT" | "400") => {
                ProviderError::InvalidParameter {
                    provider,
                    param: context.resource.unwrap_or_else(|| "request".to_string()),
                    detail: raw.message,
                }
            }

            _ => self.unknown_error(raw),
        }
    }
}
