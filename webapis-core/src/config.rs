//! Job settings.
//!
//! A settings file is a partial JSON document; every key it leaves out keeps
//! the built-in value.

use std::path::Path;

use serde::{Deserialize, Serialize};
use webapis_provider::{GoogleConfig, HttpConfig, MonitisConfig, Route53Config};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub http: HttpConfig,
    pub route53: Route53Config,
    pub google: GoogleConfig,
    pub monitis: MonitisConfig,
}

impl Settings {
    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        serde_json::from_str(text).map_err(|e| CoreError::Config(format!("invalid settings: {e}")))
    }

    /// Settings from `path`, or the built-in ones without a file.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let settings = Self::from_json_str(&text)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
