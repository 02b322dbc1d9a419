//! Vendor API clients

/// Shared utilities used by the clients.
pub mod common;

#[cfg(feature = "google")]
mod google;
#[cfg(feature = "monitis")]
mod monitis;
#[cfg(feature = "route53")]
mod route53;

#[cfg(feature = "google")]
pub use google::{GoogleClient, GoogleClientBuilder};
#[cfg(feature = "monitis")]
pub use monitis::{MonitisClient, MonitisClientBuilder};
#[cfg(feature = "route53")]
pub use route53::{Route53Client, Route53ClientBuilder};
