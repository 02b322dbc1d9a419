//! Monitis error mapping
//!
//! Monitis reports failures as free text (`{"error": "..."}`), usually with
//! HTTP 200, so the message is what gets classified.

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::MonitisClient;

impl ProviderErrorMapper for MonitisClient {
    fn provider_name(&self) -> &'static str {
        "monitis"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        let message = raw.message.to_lowercase();

        if message.contains("auth") || message.contains("api key") || message.contains("apikey") {
            ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            }
        } else if message.contains("already exist") || message.contains("duplicate") {
            ProviderError::ResourceExists {
                provider,
                resource: context.resource.unwrap_or_default(),
                raw_message: Some(raw.message),
            }
        } else if message.contains("too many requests") || message.contains("rate limit") {
            ProviderError::RateLimited {
                provider,
                retry_after: context.retry_after,
                raw_message: Some(raw.message),
            }
        } else if message.contains("limit") {
            ProviderError::QuotaExceeded {
                provider,
                raw_message: Some(raw.message),
            }
        } else if message.contains("not found") || message.contains("does not exist") {
            ProviderError::ResourceNotFound {
                provider,
                resource: context.resource.unwrap_or_default(),
                raw_message: Some(raw.message),
            }
        } else {
            self.unknown_error(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MonitisClient {
        MonitisClient::builder("k", "s").build().unwrap()
    }

    #[test]
    fn classifies_by_message() {
        let c = client();
        assert!(matches!(
            c.map_error(RawApiError::new("Authentication failure"), ErrorContext::default()),
            ProviderError::InvalidCredentials { .. }
        ));
        assert!(matches!(
            c.map_error(
                RawApiError::new("Monitor with name a.com_RUM already exists"),
                ErrorContext::resource("a.com_RUM")
            ),
            ProviderError::ResourceExists { ref resource, .. } if resource == "a.com_RUM"
        ));
        assert!(matches!(
            c.map_error(RawApiError::new("Monitors limit reached"), ErrorContext::default()),
            ProviderError::QuotaExceeded { .. }
        ));
        let throttled = ErrorContext {
            retry_after: Some(5),
            ..ErrorContext::default()
        };
        assert!(matches!(
            c.map_error(RawApiError::new("Too many requests"), throttled),
            ProviderError::RateLimited { retry_after: Some(5), .. }
        ));
        assert!(matches!(
            c.map_error(RawApiError::new("Something odd"), ErrorContext::default()),
            ProviderError::Unknown { .. }
        ));
    }
}
