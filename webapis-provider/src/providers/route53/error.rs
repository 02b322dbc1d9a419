//! Route53 error mapping
//!
//! Reference: <https://docs.aws.amazon.com/Route53/latest/APIReference/CommonErrors.html>

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::Route53Client;

impl ProviderErrorMapper for Route53Client {
    fn provider_name(&self) -> &'static str {
        "route53"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        match raw.code.as_deref() {
            Some(
                "InvalidClientTokenId"
                | "SignatureDoesNotMatch"
                | "IncompleteSignature"
                | "MissingAuthenticationToken"
                | "ExpiredToken"
                | "UnrecognizedClientException",
            ) => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },

            Some("AccessDenied" | "AccessDeniedException") => ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },

            Some("NoSuchHostedZone" | "HostedZoneNotFound") => ProviderError::ResourceNotFound {
                provider,
                resource: context.resource.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            Some("Throttling" | "ThrottlingException" | "PriorRequestNotComplete") => {
                ProviderError::RateLimited {
                    provider,
                    retry_after: context.retry_after,
                    raw_message: Some(raw.message),
                }
            }

            Some("InvalidInput" | "InvalidPaginationToken" | "InvalidParameterValue") => {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Route53Client {
        Route53Client::builder("AKID", "secret").build().unwrap()
    }

    #[test]
    fn signature_errors_are_credential_errors() {
        let e = client().map_error(
            RawApiError::with_code("SignatureDoesNotMatch", "bad signature"),
            ErrorContext::default(),
        );
        assert!(matches!(e, ProviderError::InvalidCredentials { .. }));
    }

    #[test]
    fn missing_zone_carries_resource() {
        let e = client().map_error(
            RawApiError::with_code("NoSuchHostedZone", "No hosted zone found with ID: Z9"),
            ErrorContext::resource("Z9"),
        );
        assert!(matches!(
            e,
            ProviderError::ResourceNotFound { ref resource, .. } if resource == "Z9"
        ));
    }

    #[test]
    fn throttling_is_rate_limited() {
        let e = client().map_error(
            RawApiError::with_code("Throttling", "Rate exceeded"),
            ErrorContext::default(),
        );
        assert!(matches!(e, ProviderError::RateLimited { .. }));
    }

    #[test]
    fn unmapped_code_falls_back_to_unknown() {
        let e = client().map_error(
            RawApiError::with_code("ServiceUnavailable", "try later"),
            ErrorContext::default(),
        );
        assert!(matches!(
            e,
            ProviderError::Unknown { raw_code: Some(ref c), .. } if c == "ServiceUnavailable"
        ));
    }
}
