//! Unified error type definition

use thiserror::Error;

// Re-export library error types
pub use webapis_provider::{CredentialValidationError, ProviderError};

/// Core layer error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// A raw record could not be wrapped: a required key is missing or has the wrong type.
    #[error("Malformed {kind} record: {detail}")]
    MalformedRecord {
        /// What was being wrapped (e.g. `hosted zone`).
        kind: &'static str,
        /// Deserializer message.
        detail: String,
    },

    /// CSV read or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File system error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Input file content is unusable (missing columns, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Settings could not be loaded, or a client the job needs is not configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential validation errors
    #[error("{0}")]
    CredentialValidation(#[from] CredentialValidationError),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether the failure comes from user input or remote state rather than a bug
    /// or an outage. Used for log classification: `warn` when `true`, `error` otherwise.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::MalformedRecord { .. }
            | Self::InvalidInput(_)
            | Self::Config(_)
            | Self::CredentialValidation(_) => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
