//! AWS Signature Version 4, through `aws-sigv4`.

use std::time::SystemTime;

use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningSettings, sign};
use aws_sigv4::sign::v4::SigningParams;
use aws_smithy_runtime_api::client::identity::Identity;

use crate::error::{ProviderError, Result};

use super::{Route53Client, SERVICE};

/// Sorted, percent-encoded `k=v&k=v` query string.
pub(crate) fn query_string(params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (urlencoding::encode(k).into_owned(), urlencoding::encode(v).into_owned()))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

impl Route53Client {
    /// Headers to add to a bodiless request so that it carries a valid
    /// signature: `authorization`, `x-amz-date` and, with temporary
    /// credentials, `x-amz-security-token`.
    pub(crate) fn signing_headers(
        &self,
        method: &str,
        host: &str,
        path_and_query: &str,
        time: SystemTime,
    ) -> Result<Vec<(String, String)>> {
        let credentials = aws_credential_types::Credentials::new(
            &self.access_key_id,
            &self.secret_access_key,
            self.session_token.clone(),
            None,
            "webapis",
        );
        let identity: Identity = credentials.into();

        let params = SigningParams::builder()
            .identity(&identity)
            .region(&self.config.region)
            .name(SERVICE)
            .time(time)
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| signing_error(&e))?
            .into();

        let headers = [("host", host)];
        let request = SignableRequest::new(
            method,
            path_and_query,
            headers.into_iter(),
            SignableBody::Bytes(&[]),
        )
        .map_err(|e| signing_error(&e))?;

        let (instructions, signature) = sign(request, &params)
            .map_err(|e| signing_error(&e))?
            .into_parts();
        log::debug!("Signed {method} {path_and_query} ({}...)", signature.get(..8).unwrap_or_default());

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}

fn signing_error(e: &dyn std::fmt::Display) -> ProviderError {
    ProviderError::InvalidCredentials {
        provider: SERVICE.to_string(),
        raw_message: Some(format!("Cannot sign request: {e}")),
    }
}
