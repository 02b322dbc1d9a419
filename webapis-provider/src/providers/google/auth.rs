//! Bearer tokens for the Google APIs.
//!
//! Reference: <https://developers.google.com/identity/protocols/oauth2/native-app#offline>

use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::http_client::{self, Retry};
use crate::traits::ProviderErrorMapper;
use crate::types::GoogleAuth;
use crate::utils::log_sanitizer::mask_secret;

use super::GoogleClient;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl GoogleClient {
    /// The bearer token, exchanged for the refresh token on first use.
    ///
    /// Tokens live about an hour, which covers a job run.
    pub(crate) async fn bearer(&self) -> Result<&str> {
        self.token
            .get_or_try_init(|| self.fetch_token())
            .await
            .map(String::as_str)
    }

    async fn fetch_token(&self) -> Result<String> {
        let (client_id, client_secret, refresh_token, token_uri) = match &self.auth {
            GoogleAuth::AccessToken { access_token } => return Ok(access_token.clone()),
            GoogleAuth::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
                token_uri,
            } => (client_id, client_secret, refresh_token, token_uri),
        };

        log::info!("[google] Requesting an access token for client {client_id}");
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
        ];
        let request = self.client.post(token_uri).form(&form);

        let token: TokenResponse = http_client::send(
            request,
            self.provider_name(),
            token_uri,
            Retry::UpTo(self.config.max_retries),
            |response| {
                if response.is_success() {
                    return http_client::parse_json(&response.body, self.provider_name());
                }
                // `invalid_grant`: revoked or expired refresh token
                let reason = serde_json::from_str::<TokenError>(&response.body).map_or_else(
                    |_| format!("HTTP {}", response.status),
                    |e| match e.error_description {
                        Some(description) => format!("{}: {description}", e.error),
                        None => e.error,
                    },
                );
                Err(ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(format!("Token refresh refused ({reason})")),
                })
            },
        )
        .await?;

        log::debug!(
            "[google] Got access token {} (expires in {:?}s)",
            mask_secret(&token.access_token),
            token.expires_in
        );
        Ok(token.access_token)
    }
}
