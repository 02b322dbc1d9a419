//! Client factory functions.
//!
//! Each function checks that the [`ProviderCredentials`] variant matches the
//! vendor and returns the client in an `Arc`, ready to be shared across tasks
//! and coerced to the vendor traits it implements.

use std::sync::Arc;

use crate::config::HttpConfig;
use crate::error::{ProviderError, Result};
use crate::types::{ProviderCredentials, ProviderType};

#[cfg(feature = "google")]
use crate::{config::GoogleConfig, providers::GoogleClient};
#[cfg(feature = "monitis")]
use crate::{config::MonitisConfig, providers::MonitisClient};
#[cfg(feature = "route53")]
use crate::{config::Route53Config, providers::Route53Client};

#[allow(dead_code, unreachable_patterns)]
fn wrong_credentials(expected: ProviderType, got: &ProviderCredentials) -> ProviderError {
    ProviderError::InvalidCredentials {
        provider: expected.to_string(),
        raw_message: Some(format!(
            "expected {expected} credentials, got {}",
            got.provider_type()
        )),
    }
}

/// Creates a [`Route53Client`].
///
/// ```rust,no_run
/// use webapis_provider::{create_route53_client, HttpConfig, ProviderCredentials, Route53Config};
///
/// let credentials = ProviderCredentials::route53_from_env()?;
/// let client = create_route53_client(credentials, Route53Config::default(), &HttpConfig::default())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[cfg(feature = "route53")]
pub fn create_route53_client(
    credentials: ProviderCredentials,
    config: Route53Config,
    http: &HttpConfig,
) -> Result<Arc<Route53Client>> {
    #[allow(unreachable_patterns)]
    match credentials {
        ProviderCredentials::Route53 {
            access_key_id,
            secret_access_key,
            session_token,
        } => Ok(Arc::new(
            Route53Client::builder(access_key_id, secret_access_key)
                .session_token(session_token)
                .config(config)
                .http(http.clone())
                .build()?,
        )),
        other => Err(wrong_credentials(ProviderType::Route53, &other)),
    }
}

/// Creates a [`GoogleClient`] serving Analytics, Search Console and Tag Manager.
#[cfg(feature = "google")]
pub fn create_google_client(
    credentials: ProviderCredentials,
    config: GoogleConfig,
    http: &HttpConfig,
) -> Result<Arc<GoogleClient>> {
    #[allow(unreachable_patterns)]
    match credentials {
        ProviderCredentials::Google(auth) => Ok(Arc::new(
            GoogleClient::builder(auth)
                .config(config)
                .http(http.clone())
                .build()?,
        )),
        other => Err(wrong_credentials(ProviderType::Google, &other)),
    }
}

/// Creates a [`MonitisClient`].
#[cfg(feature = "monitis")]
pub fn create_monitis_client(
    credentials: ProviderCredentials,
    config: MonitisConfig,
    http: &HttpConfig,
) -> Result<Arc<MonitisClient>> {
    #[allow(unreachable_patterns)]
    match credentials {
        ProviderCredentials::Monitis {
            api_key,
            secret_key,
            ..
        } => Ok(Arc::new(
            MonitisClient::builder(api_key, secret_key)
                .config(config)
                .http(http.clone())
                .build()?,
        )),
        other => Err(wrong_credentials(ProviderType::Monitis, &other)),
    }
}

#[cfg(all(test, feature = "all-providers"))]
mod tests {
    use super::*;

    #[test]
    fn mismatched_credentials_are_rejected() {
        let creds = ProviderCredentials::Google("t".into());
        let err = create_monitis_client(creds, MonitisConfig::default(), &HttpConfig::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ProviderError::InvalidCredentials { ref provider, .. } if provider == "monitis"
        ));
    }

    #[test]
    fn matching_credentials_build_a_client() {
        let creds = ProviderCredentials::Route53 {
            access_key_id: "AKID".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: None,
        };
        assert!(create_route53_client(creds, Route53Config::default(), &HttpConfig::default()).is_ok());
    }
}
