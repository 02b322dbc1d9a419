//! Google batch requests (`multipart/mixed`)
//!
//! Reference: <https://developers.google.com/tag-platform/tag-manager/api/v2/batch>
//!
//! Each part wraps one HTTP request; the response carries one part per
//! request, matched back by `Content-ID` (`<item-1>` → `<response-item-1>`).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::http_client::{self, Retry};
use crate::traits::{BatchExecutor, ErrorContext, ProviderErrorMapper};
use crate::types::{BatchCall, BatchCallResult, GoogleApiCall};

use super::GoogleClient;

/// One decoded response part.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResponsePart {
    /// Content-ID with the `response-` prefix and brackets removed.
    pub id: Option<String>,
    pub status: u16,
    pub body: String,
}

/// Encode calls as a `multipart/mixed` body. `paths[i]` is the request path of `calls[i]`.
pub(crate) fn encode_batch(
    boundary: &str,
    calls: &[BatchCall<GoogleApiCall>],
    paths: &[String],
) -> std::result::Result<String, serde_json::Error> {
    let mut out = String::new();
    for (call, path) in calls.iter().zip(paths) {
        out.push_str(&format!("--{boundary}\r\n"));
        out.push_str("Content-Type: application/http\r\n");
        out.push_str(&format!("Content-ID: <{}>\r\n\r\n", call.id));
        out.push_str(&format!("{} {path} HTTP/1.1\r\n", call.call.method));
        match &call.call.body {
            Some(body) => {
                let json = serde_json::to_string(body)?;
                out.push_str("Content-Type: application/json; charset=UTF-8\r\n\r\n");
                out.push_str(&json);
                out.push_str("\r\n");
            }
            None => out.push_str("\r\n"),
        }
    }
    out.push_str(&format!("--{boundary}--\r\n"));
    Ok(out)
}

/// `boundary` parameter of a `multipart/mixed` content type.
pub(crate) fn boundary_of(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.trim().split_once('=')?;
        name.eq_ignore_ascii_case("boundary")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Split `head\n\nbody` at the first blank line.
fn split_head(text: &str) -> (&str, &str) {
    text.split_once("\n\n").unwrap_or((text, ""))
}

/// Decode a `multipart/mixed` response body. Line endings may be CRLF or LF.
pub(crate) fn decode_batch(boundary: &str, body: &str) -> std::result::Result<Vec<ResponsePart>, String> {
    let normalized = body.replace("\r\n", "\n");
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();

    for raw in normalized.split(&delimiter).skip(1) {
        if raw.starts_with("--") {
            break;
        }
        let raw = raw.trim_start_matches('\n');
        let (part_headers, http_message) = split_head(raw);

        let id = part_headers.lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim().eq_ignore_ascii_case("content-id").then(|| {
                let value = value.trim().trim_start_matches('<').trim_end_matches('>');
                value.strip_prefix("response-").unwrap_or(value).to_string()
            })
        });

        let (status_and_headers, inner_body) = split_head(http_message);
        let status_line = status_and_headers.lines().next().unwrap_or_default();
        let status = status_line
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse::<u16>().ok())
            .ok_or_else(|| format!("invalid status line in batch part: {status_line:?}"))?;

        parts.push(ResponsePart {
            id,
            status,
            body: inner_body.trim().to_string(),
        });
    }

    Ok(parts)
}

impl GoogleClient {
    fn part_result(&self, part: &ResponsePart, resource: Option<&str>) -> Result<Value> {
        if (200..300).contains(&part.status) {
            if part.body.is_empty() {
                Ok(Value::Null)
            } else {
                http_client::parse_json(&part.body, self.provider_name())
            }
        } else {
            let ctx = resource.map(ErrorContext::resource).unwrap_or_default();
            Err(self.response_error(part.status, &part.body, ctx))
        }
    }
}

#[async_trait]
impl BatchExecutor for GoogleClient {
    type Call = GoogleApiCall;

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size.max(1)
    }

    async fn execute_call(&self, call: &GoogleApiCall) -> Result<Value> {
        self.send_call(call).await
    }

    async fn execute_batch(&self, calls: &[BatchCall<GoogleApiCall>]) -> Result<Vec<BatchCallResult>> {
        let Some(first) = calls.first() else {
            return Ok(Vec::new());
        };
        let api = first.call.api;
        if calls.iter().any(|c| c.call.api != api) {
            return Err(ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "calls".to_string(),
                detail: "all calls of a batch must target the same API".to_string(),
            });
        }

        let boundary = format!("batch_{}", uuid::Uuid::new_v4().simple());
        let paths: Vec<String> = calls
            .iter()
            .map(|c| self.api_path(c.call.api, &c.call.path))
            .collect();
        let body =
            encode_batch(&boundary, calls, &paths).map_err(|e| self.serialization_error(e))?;
        let url = self.batch_url(api);

        log::info!("[google] Sending batch of {} calls to {url}", calls.len());

        let request = self
            .client
            .post(&url)
            .bearer_auth(self.bearer().await?)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/mixed; boundary={boundary}"),
            )
            .body(body);

        let parts = http_client::send(request, self.provider_name(), &url, Retry::Never, |response| {
            if !response.is_success() {
                return Err(self.response_error(response.status, &response.body, ErrorContext::default()));
            }
            let boundary = response
                .content_type
                .as_deref()
                .and_then(boundary_of)
                .ok_or_else(|| self.parse_error("batch response has no multipart boundary"))?;
            decode_batch(&boundary, &response.body).map_err(|e| self.parse_error(e))
        })
        .await?;

        Ok(parts
            .iter()
            .filter_map(|part| {
                let id = part.id.clone()?;
                let resource = calls
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.call.path.as_str());
                Some(BatchCallResult {
                    result: self.part_result(part, resource),
                    id,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calls() -> Vec<BatchCall<GoogleApiCall>> {
        vec![
            BatchCall {
                id: "item-1".to_string(),
                call: GoogleApiCall::create_container("42", "a.com"),
            },
            BatchCall {
                id: "item-2".to_string(),
                call: GoogleApiCall::add_site("http://b.com/"),
            },
        ]
    }

    #[test]
    fn encodes_one_part_per_call() {
        let calls = calls();
        let paths = vec![
            "/tagmanager/v2/accounts/42/containers".to_string(),
            "/webmasters/v3/sites/http%3A%2F%2Fb.com%2F".to_string(),
        ];
        let body = encode_batch("b0", &calls, &paths).unwrap();

        assert_eq!(
            body,
            "--b0\r\n\
             Content-Type: application/http\r\n\
             Content-ID: <item-1>\r\n\r\n\
             POST /tagmanager/v2/accounts/42/containers HTTP/1.1\r\n\
             Content-Type: application/json; charset=UTF-8\r\n\r\n\
             {\"name\":\"a.com\",\"usageContext\":[\"web\"]}\r\n\
             --b0\r\n\
             Content-Type: application/http\r\n\
             Content-ID: <item-2>\r\n\r\n\
             PUT /webmasters/v3/sites/http%3A%2F%2Fb.com%2F HTTP/1.1\r\n\r\n\
             --b0--\r\n"
        );
    }

    #[test]
    fn boundary_from_content_type() {
        assert_eq!(
            boundary_of("multipart/mixed; boundary=batch_abc"),
            Some("batch_abc".to_string())
        );
        assert_eq!(
            boundary_of(r#"multipart/mixed; charset=utf-8; boundary="quoted""#),
            Some("quoted".to_string())
        );
        assert_eq!(boundary_of("application/json"), None);
    }

    #[test]
    fn decodes_mixed_outcomes() {
        let body = "--batch_xyz\r\n\
Content-Type: application/http\r\n\
Content-ID: <response-item-2>\r\n\
\r\n\
HTTP/1.1 409 Conflict\r\n\
Content-Type: application/json; charset=UTF-8\r\n\
\r\n\
{\"error\": {\"code\": 409, \"message\": \"Already exists\", \"status\": \"ALREADY_EXISTS\"}}\r\n\
--batch_xyz\r\n\
Content-Type: application/http\r\n\
Content-ID: <response-item-1>\r\n\
\r\n\
HTTP/1.1 200 OK\r\n\
Content-Type: application/json; charset=UTF-8\r\n\
\r\n\
{\"containerId\": \"7\", \"name\": \"a.com\"}\r\n\
--batch_xyz\r\n\
Content-Type: application/http\r\n\
Content-ID: <response-item-3>\r\n\
\r\n\
HTTP/1.1 204 No Content\r\n\
\r\n\
\r\n\
--batch_xyz--\r\n";

        let parts = decode_batch("batch_xyz", body).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].id.as_deref(), Some("item-2"));
        assert_eq!(parts[0].status, 409);
        assert_eq!(parts[1].id.as_deref(), Some("item-1"));
        assert_eq!(parts[1].status, 200);
        assert_eq!(parts[1].body, "{\"containerId\": \"7\", \"name\": \"a.com\"}");
        assert_eq!(parts[2].status, 204);
        assert!(parts[2].body.is_empty());

        let client = GoogleClient::builder("t").build().unwrap();
        assert!(matches!(
            client.part_result(&parts[0], Some("a.com")),
            Err(ProviderError::ResourceExists { .. })
        ));
        assert!(client.part_result(&parts[1], None).is_ok());
        assert!(matches!(client.part_result(&parts[2], None), Ok(Value::Null)));
    }

    #[test]
    fn rejects_garbled_status_line() {
        let body = "--b\r\nContent-ID: <response-x>\r\n\r\nnot-http\r\n\r\n--b--";
        assert!(decode_batch("b", body).is_err());
    }
}
