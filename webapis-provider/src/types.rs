use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderError;

// ============ Provider Types ============

/// Identifies which vendor API a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// AWS Route53 (REST-XML, `SigV4`).
    #[cfg(feature = "route53")]
    Route53,
    /// Google Analytics, Search Console and Tag Manager (JSON, OAuth bearer).
    #[cfg(feature = "google")]
    Google,
    /// Monitis custom monitor API (query string + form posts).
    #[cfg(feature = "monitis")]
    Monitis,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            #[cfg(feature = "route53")]
            Self::Route53 => "route53",
            #[cfg(feature = "google")]
            Self::Google => "google",
            #[cfg(feature = "monitis")]
            Self::Monitis => "monitis",
        };
        write!(f, "{s}")
    }
}

// ============ Credentials ============

/// Validation error for vendor credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
    },
    /// The credentials file could not be read or is not a JSON object.
    Unreadable {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Path of the credentials file.
        path: String,
        /// What went wrong.
        reason: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { provider, field } => {
                write!(f, "[{provider}] Missing required credential field: {field}")
            }
            Self::EmptyField { provider, field } => {
                write!(f, "[{provider}] Credential field must not be empty: {field}")
            }
            Self::Unreadable {
                provider,
                path,
                reason,
            } => write!(f, "[{provider}] Cannot read credentials from {path}: {reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

impl From<CredentialValidationError> for ProviderError {
    fn from(e: CredentialValidationError) -> Self {
        let provider = match &e {
            CredentialValidationError::MissingField { provider, .. }
            | CredentialValidationError::EmptyField { provider, .. }
            | CredentialValidationError::Unreadable { provider, .. } => provider.to_string(),
        };
        Self::InvalidCredentials {
            provider,
            raw_message: Some(e.to_string()),
        }
    }
}

/// Google's OAuth token endpoint.
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// How the Google client gets its bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoogleAuth {
    /// A refresh token and the OAuth client it was issued to. An access
    /// token is requested from `token_uri` before the first call.
    RefreshToken {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        token_uri: String,
    },
    /// An access token obtained elsewhere, used as is.
    AccessToken { access_token: String },
}

impl std::fmt::Debug for GoogleAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RefreshToken { client_id, token_uri, .. } => f
                .debug_struct("RefreshToken")
                .field("client_id", client_id)
                .field("token_uri", token_uri)
                .finish_non_exhaustive(),
            Self::AccessToken { .. } => f.debug_struct("AccessToken").finish_non_exhaustive(),
        }
    }
}

impl From<&str> for GoogleAuth {
    fn from(access_token: &str) -> Self {
        Self::AccessToken {
            access_token: access_token.to_string(),
        }
    }
}

impl From<String> for GoogleAuth {
    fn from(access_token: String) -> Self {
        Self::AccessToken { access_token }
    }
}

/// Type-safe credential container for all supported vendor APIs.
///
/// Credentials files are JSON objects, for example for Monitis:
///
/// ```json
/// { "api_key": "...", "secret_key": "...", "agent_key": "...", "user_key": "..." }
/// ```
///
/// Google accepts, in order of preference:
///
/// - an authorized-user file (`gcloud auth application-default login`, or
///   the token store of an earlier OAuth consent) holding `client_id`,
///   `client_secret` and `refresh_token`;
/// - a client-secrets file (`{"installed": {...}}` or `{"web": {...}}`) to
///   which a `refresh_token` was added, at the top level or inside;
/// - a bare `access_token` (or `token`).
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials", rename_all = "lowercase")]
pub enum ProviderCredentials {
    /// AWS access key pair, optionally with a session token.
    #[cfg(feature = "route53")]
    Route53 {
        /// AWS access key id.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// STS session token for temporary credentials.
        session_token: Option<String>,
    },

    /// OAuth refresh or access token.
    #[cfg(feature = "google")]
    Google(GoogleAuth),

    /// Monitis API keys, from the account's Tools > API menu.
    #[cfg(feature = "monitis")]
    Monitis {
        /// API key.
        api_key: String,
        /// Secret key, used to obtain auth tokens.
        secret_key: String,
        /// Agent key.
        agent_key: Option<String>,
        /// User key.
        user_key: Option<String>,
    },
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("provider", &self.provider_type())
            .finish_non_exhaustive()
    }
}

impl ProviderCredentials {
    /// Construct credentials from a flat key-value map, validating required fields.
    pub fn from_map(
        provider: ProviderType,
        map: &HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        match provider {
            #[cfg(feature = "route53")]
            ProviderType::Route53 => Ok(Self::Route53 {
                access_key_id: Self::get_required_field(provider, map, &["access_key_id", "aws_access_key_id"])?,
                secret_access_key: Self::get_required_field(
                    provider,
                    map,
                    &["secret_access_key", "aws_secret_access_key"],
                )?,
                session_token: Self::get_optional_field(map, &["session_token", "aws_session_token"]),
            }),
            #[cfg(feature = "google")]
            ProviderType::Google => Self::google_from_map(map).map(Self::Google),
            #[cfg(feature = "monitis")]
            ProviderType::Monitis => Ok(Self::Monitis {
                api_key: Self::get_required_field(provider, map, &["api_key"])?,
                secret_key: Self::get_required_field(provider, map, &["secret_key"])?,
                agent_key: Self::get_optional_field(map, &["agent_key"]),
                user_key: Self::get_optional_field(map, &["user_key"]),
            }),
        }
    }

    #[cfg(feature = "google")]
    fn google_from_map(map: &HashMap<String, String>) -> Result<GoogleAuth, CredentialValidationError> {
        let provider = ProviderType::Google;
        if Self::get_optional_field(map, &["refresh_token"]).is_some() {
            return Ok(GoogleAuth::RefreshToken {
                client_id: Self::get_required_field(provider, map, &["client_id"])?,
                client_secret: Self::get_required_field(provider, map, &["client_secret"])?,
                refresh_token: Self::get_required_field(provider, map, &["refresh_token"])?,
                token_uri: Self::get_optional_field(map, &["token_uri"])
                    .unwrap_or_else(|| GOOGLE_TOKEN_URI.to_string()),
            });
        }
        if map.contains_key("access_token") || map.contains_key("token") {
            return Ok(GoogleAuth::AccessToken {
                access_token: Self::get_required_field(provider, map, &["access_token", "token"])?,
            });
        }
        // Client secrets that were never authorized
        let field = if map.contains_key("client_id") {
            "refresh_token"
        } else {
            "access_token"
        };
        Err(CredentialValidationError::MissingField {
            provider,
            field: field.to_string(),
        })
    }

    /// Load credentials from a JSON file holding an object.
    ///
    /// Non-string values (numbers, booleans) are stringified. For Google, the
    /// fields of an `installed` or `web` object are read as if they were at
    /// the top level; other nested values are ignored.
    pub fn from_json_file(
        provider: ProviderType,
        path: &Path,
    ) -> Result<Self, CredentialValidationError> {
        let unreadable = |reason: String| CredentialValidationError::Unreadable {
            provider,
            path: path.display().to_string(),
            reason,
        };

        let text = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        let value: Value = serde_json::from_str(&text).map_err(|e| unreadable(e.to_string()))?;
        let Value::Object(object) = value else {
            return Err(unreadable("expected a JSON object".to_string()));
        };

        let scalar = |v: &Value| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        };

        let mut map: HashMap<String, String> = object
            .iter()
            .filter_map(|(k, v)| Some((k.clone(), scalar(v)?)))
            .collect();
        #[cfg(feature = "google")]
        if provider == ProviderType::Google {
            let client = ["installed", "web"]
                .iter()
                .find_map(|key| object.get(*key).and_then(Value::as_object));
            for (k, v) in client.into_iter().flatten() {
                if let Some(v) = scalar(v) {
                    map.entry(k.clone()).or_insert(v);
                }
            }
        }

        Self::from_map(provider, &map)
    }

    /// Read AWS credentials from the standard environment variables.
    #[cfg(feature = "route53")]
    pub fn route53_from_env() -> Result<Self, CredentialValidationError> {
        let map: HashMap<String, String> = ["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_SESSION_TOKEN"]
            .into_iter()
            .filter_map(|key| {
                std::env::var(key)
                    .ok()
                    .map(|v| (key.to_ascii_lowercase(), v))
            })
            .collect();
        Self::from_map(ProviderType::Route53, &map)
    }

    /// First non-empty value among `keys`; reports the primary key when absent.
    fn get_required_field(
        provider: ProviderType,
        map: &HashMap<String, String>,
        keys: &[&str],
    ) -> Result<String, CredentialValidationError> {
        let primary = keys.first().copied().unwrap_or_default().to_string();
        let mut seen_empty = false;
        for key in keys {
            match map.get(*key) {
                Some(v) if v.trim().is_empty() => seen_empty = true,
                Some(v) => return Ok(v.trim().to_string()),
                None => {}
            }
        }
        if seen_empty {
            Err(CredentialValidationError::EmptyField {
                provider,
                field: primary,
            })
        } else {
            Err(CredentialValidationError::MissingField {
                provider,
                field: primary,
            })
        }
    }

    fn get_optional_field(map: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| map.get(*key))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// The Google token source, for Google credentials.
    #[cfg(feature = "google")]
    pub fn google_auth(&self) -> Option<&GoogleAuth> {
        #[allow(unreachable_patterns)]
        match self {
            Self::Google(auth) => Some(auth),
            _ => None,
        }
    }

    /// Returns the [`ProviderType`] corresponding to this credential variant.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "route53")]
            Self::Route53 { .. } => ProviderType::Route53,
            #[cfg(feature = "google")]
            Self::Google(_) => ProviderType::Google,
            #[cfg(feature = "monitis")]
            Self::Monitis { .. } => ProviderType::Monitis,
        }
    }
}

// ============ Route53 Types ============

/// Where to resume a `ListResourceRecordSets` listing.
///
/// Route53 returns the name, type and set identifier of the next record; resuming
/// with the name alone would re-read records that share a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSetCursor {
    /// `NextRecordName`
    pub name: String,
    /// `NextRecordType`
    pub record_type: Option<String>,
    /// `NextRecordIdentifier`, for weighted/latency/failover sets.
    pub identifier: Option<String>,
}

// ============ Google Types ============

/// The Google APIs the jobs talk to. Each has its own batch endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoogleApi {
    /// Analytics management API.
    Analytics,
    /// Search Console (webmasters) API.
    SearchConsole,
    /// Tag Manager API.
    TagManager,
}

/// One call inside a Google batch request.
#[derive(Debug, Clone)]
pub struct GoogleApiCall {
    /// Target API; all calls of one batch must share it.
    pub api: GoogleApi,
    /// HTTP method.
    pub method: reqwest::Method,
    /// Path relative to the API root, without leading slash (e.g. `accounts/1/containers`).
    pub path: String,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl GoogleApiCall {
    /// Create a web container named after `name` under Tag Manager account `account_id`.
    pub fn create_container(account_id: &str, name: &str) -> Self {
        Self {
            api: GoogleApi::TagManager,
            method: reqwest::Method::POST,
            path: format!("accounts/{account_id}/containers"),
            body: Some(serde_json::json!({
                "name": name,
                "usageContext": ["web"],
            })),
        }
    }

    /// Add `site_url` to the authenticated user's Search Console sites.
    pub fn add_site(site_url: &str) -> Self {
        Self {
            api: GoogleApi::SearchConsole,
            method: reqwest::Method::PUT,
            path: format!("sites/{}", urlencoding::encode(site_url)),
            body: None,
        }
    }
}

// ============ Monitis Types ============

/// Parameters of one `addCompositeMonitor` call for a RUM monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMonitorRequest {
    /// Token from [`MonitisApi::get_auth_token`](crate::MonitisApi::get_auth_token).
    pub auth_token: String,
    /// Monitor name, e.g. `example.com_RUM`.
    pub name: String,
    /// Monitored resource (host and path, no scheme).
    pub url: String,
    /// JSON list of groups, e.g. `["Acme"]`.
    pub tag: String,
}

// ============ Batch Types ============

/// A vendor call tagged with a caller-chosen id, used to match responses.
#[derive(Debug, Clone)]
pub struct BatchCall<C> {
    /// Caller-chosen id, unique within the batch.
    pub id: String,
    /// The vendor call.
    pub call: C,
}

/// The outcome of one call in a batch.
#[derive(Debug, Clone)]
pub struct BatchCallResult {
    /// Id of the originating [`BatchCall`].
    pub id: String,
    /// Response body on success, mapped error otherwise.
    pub result: Result<Value, ProviderError>,
}
