use serde::{Deserialize, Serialize};

/// Error of any vendor call, mapped from HTTP status, vendor error codes or
/// transport failures.
///
/// `provider` names the client (`route53`, `google`, `monitis`). Listing
/// calls with a retry budget retry [`NetworkError`](Self::NetworkError),
/// [`Timeout`](Self::Timeout) and [`RateLimited`](Self::RateLimited) with
/// exponential backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// Connection refused, DNS failure, reset.
    NetworkError {
        provider: String,
        /// Error details.
        detail: String,
    },

    /// Rejected, expired or missing key or token.
    InvalidCredentials {
        provider: String,
        raw_message: Option<String>,
    },

    /// The resource being created already exists (site, container, monitor).
    ResourceExists {
        provider: String,
        /// Name of the conflicting resource.
        resource: String,
        raw_message: Option<String>,
    },

    /// The requested resource (zone, account, container) was not found.
    ResourceNotFound {
        provider: String,
        /// Identifier of the missing resource.
        resource: String,
        raw_message: Option<String>,
    },

    /// A request parameter was rejected.
    InvalidParameter {
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The account's quota has been exceeded. Not transient.
    QuotaExceeded {
        provider: String,
        raw_message: Option<String>,
    },

    /// The API rate limit has been exceeded (HTTP 429 or equivalent).
    RateLimited {
        provider: String,
        /// Suggested wait time in seconds, if provided by the API.
        retry_after: Option<u64>,
        raw_message: Option<String>,
    },

    /// No response within the configured request timeout.
    Timeout {
        provider: String,
        /// Error details.
        detail: String,
    },

    /// HTTP 403 or a vendor permission code.
    PermissionDenied {
        provider: String,
        raw_message: Option<String>,
    },

    /// Failed to parse the API response (JSON, XML or multipart).
    ParseError {
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// Any vendor error no other variant covers.
    Unknown {
        provider: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// Whether the error reflects an expected condition (bad input, missing resource),
    /// used to pick the log level: `warn` when `true`, `error` otherwise.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::ResourceExists { .. }
                | Self::ResourceNotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::QuotaExceeded { .. }
                | Self::PermissionDenied { .. }
        )
    }

    /// Whether repeating the same request later may succeed: transport
    /// failures and rate limiting.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.is_transport() || matches!(self, Self::RateLimited { .. })
    }

    /// Whether the failure happened below the API layer (no usable response).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::Timeout { .. })
    }
}

/// `: <message>` when the vendor gave one.
struct Detail<'a>(Option<&'a str>);

impl std::fmt::Display for Detail<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(msg) => write!(f, ": {msg}"),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => write!(f, "[{provider}] Network error: {detail}"),
            Self::InvalidCredentials { provider, raw_message } => {
                write!(f, "[{provider}] Invalid credentials{}", Detail(raw_message.as_deref()))
            }
            Self::ResourceExists { provider, resource, .. } => write!(f, "[{provider}] '{resource}' already exists"),
            Self::ResourceNotFound {
                provider,
                resource,
                raw_message,
            } => write!(f, "[{provider}] '{resource}' not found{}", Detail(raw_message.as_deref())),
            Self::InvalidParameter { provider, param, detail } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::QuotaExceeded { provider, .. } => write!(f, "[{provider}] Quota exceeded"),
            Self::RateLimited {
                provider,
                retry_after: Some(secs),
                ..
            } => write!(f, "[{provider}] Rate limited (retry after {secs}s)"),
            Self::RateLimited { provider, .. } => write!(f, "[{provider}] Rate limited"),
            Self::Timeout { provider, detail } => write!(f, "[{provider}] Request timeout: {detail}"),
            Self::PermissionDenied { provider, raw_message } => {
                write!(f, "[{provider}] Permission denied{}", Detail(raw_message.as_deref()))
            }
            Self::ParseError { provider, detail } => write!(f, "[{provider}] Unreadable response: {detail}"),
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Cannot encode request: {detail}")
            }
            Self::Unknown { provider, raw_message, .. } => write!(f, "[{provider}] {raw_message}"),
        }
    }
}

impl std::error::Error for ProviderError {}

pub type Result<T> = std::result::Result<T, ProviderError>;
