//! Client configuration.
//!
//! Every value has a default matching the public vendor endpoints, so an empty
//! JSON object (`{}`) is a valid configuration. Partial documents override only
//! the keys they name.

use serde::{Deserialize, Serialize};

// ============ HTTP ============

/// Timeouts shared by every vendor client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// TCP connect timeout, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

// ============ Route53 ============

/// AWS Route53 endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route53Config {
    /// API endpoint (global service).
    pub endpoint: String,
    /// Signing region; Route53 is signed against `us-east-1`.
    pub region: String,
    /// REST API version path segment.
    pub api_version: String,
    /// `maxitems` per listing page (Route53 caps this at 100 for zones, 300 for record sets).
    pub max_items: u32,
    /// Retries for listing calls on transient failures.
    pub max_retries: u32,
}

impl Default for Route53Config {
    fn default() -> Self {
        Self {
            endpoint: "https://route53.amazonaws.com".to_string(),
            region: "us-east-1".to_string(),
            api_version: "2013-04-01".to_string(),
            max_items: 100,
            max_retries: 3,
        }
    }
}

// ============ Google ============

/// Name, version and OAuth scopes of one Google API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleServiceConfig {
    /// Discovery name, e.g. `tagmanager`.
    pub api_name: String,
    /// API version, e.g. `v2`.
    pub api_version: String,
    /// Scopes the access token must carry.
    pub scopes: Vec<String>,
}

impl GoogleServiceConfig {
    fn new(api_name: &str, api_version: &str, scopes: &[&str]) -> Self {
        Self {
            api_name: api_name.to_string(),
            api_version: api_version.to_string(),
            scopes: scopes.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Google API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// Root of the REST and batch endpoints.
    pub base_url: String,
    /// Analytics management API.
    pub analytics: GoogleServiceConfig,
    /// Search Console API.
    pub search_console: GoogleServiceConfig,
    /// Tag Manager API.
    pub tag_manager: GoogleServiceConfig,
    /// `max-results` for Analytics account summaries.
    pub page_size: u32,
    /// Retries for listing calls on transient failures.
    pub max_retries: u32,
    /// Largest number of calls sent in one batch request.
    pub max_batch_size: usize,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com".to_string(),
            analytics: GoogleServiceConfig::new(
                "analytics",
                "v3",
                &[
                    "https://www.googleapis.com/auth/analytics.edit",
                    "https://www.googleapis.com/auth/analytics.readonly",
                ],
            ),
            search_console: GoogleServiceConfig::new(
                "webmasters",
                "v3",
                &[
                    "https://www.googleapis.com/auth/webmasters",
                    "https://www.googleapis.com/auth/webmasters.readonly",
                ],
            ),
            tag_manager: GoogleServiceConfig::new(
                "tagmanager",
                "v2",
                &[
                    "https://www.googleapis.com/auth/tagmanager.edit.containers",
                    "https://www.googleapis.com/auth/tagmanager.readonly",
                ],
            ),
            page_size: 1000,
            max_retries: 10,
            max_batch_size: 1000,
        }
    }
}

// ============ Monitis ============

/// Action names of the Monitis custom monitor API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitisActions {
    /// Creates a RUM monitor.
    pub add_rum: String,
    /// Exchanges API key and secret for a token.
    pub get_auth_token: String,
    /// Lists monitors.
    pub get_monitors: String,
}

impl Default for MonitisActions {
    fn default() -> Self {
        Self {
            add_rum: "addCompositeMonitor".to_string(),
            get_auth_token: "authToken".to_string(),
            get_monitors: "getMonitors".to_string(),
        }
    }
}

/// Defaults applied to every monitor created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorDefaults {
    /// Monitor type.
    pub monitor_type: String,
    /// Group list used when a caller gives none.
    pub default_tag: String,
    /// `name:displayName:value:dataType:isHidden` entries, `;`-separated.
    pub monitor_params: String,
    /// `name:displayName:uom:dataType` entries, `;`-separated.
    pub result_params: String,
}

impl Default for MonitorDefaults {
    fn default() -> Self {
        Self {
            monitor_type: "RUM".to_string(),
            default_tag: r#"["test"]"#.to_string(),
            monitor_params: "ignoreQueryParams:IgnoreQueryParams:true:1:false:false;\
                             aggType:AggType:median:1:false:false;"
                .to_string(),
            result_params: "position:Position:N/A:2;difference:Difference:N/A:3;".to_string(),
        }
    }
}

/// Monitis API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitisConfig {
    /// Custom monitor API endpoint.
    pub api_url: String,
    /// API version.
    pub api_version: String,
    /// How requests are validated; only `token` is supported.
    pub auth_method: String,
    /// Action names.
    pub actions: MonitisActions,
    /// Monitor defaults.
    pub monitor: MonitorDefaults,
    /// Retries for listing calls on transient failures.
    pub max_retries: u32,
}

impl Default for MonitisConfig {
    fn default() -> Self {
        Self {
            api_url: "http://dashboard.monitis.com/customMonitorApi".to_string(),
            api_version: "2".to_string(),
            auth_method: "token".to_string(),
            actions: MonitisActions::default(),
            monitor: MonitorDefaults::default(),
            max_retries: 0,
        }
    }
}
