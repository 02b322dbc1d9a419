//! Shared helpers for the client integration tests.

#![allow(dead_code)]

use webapis_provider::{GoogleConfig, MonitisConfig, Route53Config};
use wiremock::MockServer;

/// Assert that an `Option` is `Some` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Assert that a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(res.is_ok(), "{}: {res:?}", format_args!($($msg)+));
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Route53 settings pointing at the mock server, without retries.
pub fn route53_config(server: &MockServer) -> Route53Config {
    Route53Config {
        endpoint: server.uri(),
        max_retries: 0,
        ..Route53Config::default()
    }
}

/// Google settings pointing at the mock server, without retries.
pub fn google_config(server: &MockServer) -> GoogleConfig {
    GoogleConfig {
        base_url: server.uri(),
        max_retries: 0,
        page_size: 2,
        ..GoogleConfig::default()
    }
}

/// Monitis settings pointing at the mock server.
pub fn monitis_config(server: &MockServer) -> MonitisConfig {
    MonitisConfig {
        api_url: format!("{}/customMonitorApi", server.uri()),
        ..MonitisConfig::default()
    }
}
