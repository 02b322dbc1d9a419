//! # webapis-provider
//!
//! Typed clients for the vendor APIs the web inventory jobs talk to.
//!
//! ## Supported APIs
//!
//! | Vendor | Feature Flag | Auth Method |
//! |--------|-------------|-------------|
//! | [AWS Route53](https://aws.amazon.com/route53/) | `route53` | AWS Signature V4 |
//! | Google Analytics, Search Console, Tag Manager | `google` | OAuth refresh or bearer token |
//! | [Monitis](https://www.monitis.com/) | `monitis` | API key + auth token |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: every client above.
//! - **`native-tls`** *(default)* or **`rustls`**: TLS backend for `reqwest`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use webapis_provider::{
//!     create_google_client, GoogleConfig, HttpConfig, ProviderCredentials, TagManagerApi,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = ProviderCredentials::Google("ya29.token".into());
//!     let client = create_google_client(credentials, GoogleConfig::default(), &HttpConfig::default())?;
//!
//!     let page = client.list_accounts(None).await?;
//!     println!("{page}");
//!     Ok(())
//! }
//! ```
//!
//! Listing calls return the vendor's JSON page untouched
//! ([`serde_json::Value`]); typed views over those pages live in the
//! `webapis-core` crate.
//!
//! ## Error Handling
//!
//! Every call returns [`Result<T, ProviderError>`](ProviderError). Transient
//! failures (`NetworkError`, `Timeout`, `RateLimited`) are retried with
//! exponential backoff on read calls; writes are sent once.

mod config;
mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use config::{
    GoogleConfig, GoogleServiceConfig, HttpConfig, MonitisActions, MonitisConfig,
    MonitorDefaults, Route53Config,
};

pub use error::{ProviderError, Result};

#[cfg(feature = "google")]
pub use factory::create_google_client;
#[cfg(feature = "monitis")]
pub use factory::create_monitis_client;
#[cfg(feature = "route53")]
pub use factory::create_route53_client;

pub use traits::{AnalyticsApi, BatchExecutor, MonitisApi, Route53Api, TagManagerApi};

pub use types::{
    AddMonitorRequest, BatchCall, BatchCallResult, CredentialValidationError, GOOGLE_TOKEN_URI,
    GoogleApi, GoogleApiCall, GoogleAuth, ProviderCredentials, ProviderType, RecordSetCursor,
};

pub use utils::log_sanitizer;

#[cfg(feature = "google")]
pub use providers::{GoogleClient, GoogleClientBuilder};
#[cfg(feature = "monitis")]
pub use providers::{MonitisClient, MonitisClientBuilder};
#[cfg(feature = "route53")]
pub use providers::{Route53Client, Route53ClientBuilder};
