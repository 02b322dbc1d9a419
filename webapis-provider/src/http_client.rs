//! Sending vendor requests.
//!
//! Clients build their own `RequestBuilder` (signing, bearer tokens, query
//! strings) and hand it to [`send`] with a decoder. The decoder sees every
//! response, whatever its status, and turns it into a value or a vendor
//! error. Decoding runs inside the retry loop: a Route53 `Throttling` code in
//! an XML error body or a Monitis error in a 200 body is retried the same way
//! as a dropped connection.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// A response that made it back from the server.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// `Retry-After` in seconds, when sent as a number.
    pub retry_after: Option<u64>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// How often a call may be repeated after a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// Writes: creating a monitor or a container twice is not harmless.
    Never,
    /// Reads: up to this many extra attempts.
    UpTo(u32),
}

/// Send `request` and decode the response, retrying transient failures.
///
/// Backoff doubles from 100ms up to 10s; a server-provided `Retry-After`
/// replaces it, capped at 30s.
pub async fn send<T, D>(
    request: RequestBuilder,
    provider: &str,
    target: &str,
    retry: Retry,
    decode: D,
) -> Result<T>
where
    D: Fn(RawResponse) -> Result<T>,
{
    let budget = match retry {
        Retry::Never => 0,
        Retry::UpTo(n) => n,
    };

    let mut attempt = 0;
    while attempt < budget {
        // Streamed bodies cannot be cloned; such a request gets one attempt
        let Some(copy) = request.try_clone() else {
            break;
        };
        match exchange(copy, provider, target, &decode).await {
            Err(e) if e.is_transient() => {
                let delay = retry_delay(&e, attempt);
                attempt += 1;
                log::warn!(
                    "[{provider}] {target} failed ({e}), attempt {attempt}/{budget}, next in {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }
    exchange(request, provider, target, &decode).await
}

async fn exchange<T, D>(request: RequestBuilder, provider: &str, target: &str, decode: &D) -> Result<T>
where
    D: Fn(RawResponse) -> Result<T>,
{
    decode(transmit(request, provider, target).await?)
}

async fn transmit(request: RequestBuilder, provider: &str, target: &str) -> Result<RawResponse> {
    log::debug!("[{provider}] -> {target}");

    let response = request.send().await.map_err(|e| transport_error(provider, &e))?;
    let status = response.status().as_u16();
    let header = |name: reqwest::header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header(reqwest::header::CONTENT_TYPE);
    let retry_after = header(reqwest::header::RETRY_AFTER).and_then(|v| v.parse().ok());

    let body = response.text().await.map_err(|e| ProviderError::NetworkError {
        provider: provider.to_string(),
        detail: format!("Body of HTTP {status} cut short: {e}"),
    })?;
    log::debug!("[{provider}] <- HTTP {status}: {}", truncate_for_log(&body));

    match status {
        429 => Err(ProviderError::RateLimited {
            provider: provider.to_string(),
            retry_after,
            raw_message: Some(truncate_for_log(&body).into_owned()),
        }),
        // Gateway errors carry no vendor payload worth decoding
        502..=504 => Err(ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("HTTP {status}"),
        }),
        _ => Ok(RawResponse {
            status,
            content_type,
            retry_after,
            body,
        }),
    }
}

fn transport_error(provider: &str, e: &reqwest::Error) -> ProviderError {
    let provider = provider.to_string();
    if e.is_timeout() {
        ProviderError::Timeout {
            provider,
            detail: e.to_string(),
        }
    } else {
        ProviderError::NetworkError {
            provider,
            detail: e.to_string(),
        }
    }
}

/// Parse a JSON body into `T`.
pub fn parse_json<T: DeserializeOwned>(body: &str, provider: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        log::error!("[{provider}] Not the JSON expected ({e}): {}", truncate_for_log(body));
        ProviderError::ParseError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    })
}

fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    match error {
        ProviderError::RateLimited {
            retry_after: Some(secs),
            ..
        } => Duration::from_secs((*secs).min(30)),
        _ => Duration::from_millis(100_u64.saturating_mul(1 << attempt.min(20)).min(10_000)),
    }
}
