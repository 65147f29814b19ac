//! Top-level application configuration.
//!
//! Configuration is stored in `.deskwatch/config.yaml` and includes:
//! - The dashboard backend base URL
//! - Refresh cadence and search debounce interval
//! - Fetch limits for the ticket list and event feed

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DeskwatchError, Result};
use crate::types::CONFIG_DIR;

/// Environment variable overriding `base_url`.
pub const URL_ENV: &str = "DESKWATCH_URL";

/// Upper bounds enforced by the backend on `limit` parameters.
pub const MAX_TICKET_LIMIT: u32 = 500;
pub const MAX_EVENT_LIMIT: u32 = 100;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL (default: http://127.0.0.1:8000)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Periodic refresh interval in milliseconds (default: 3000)
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Maximum tickets requested per refresh round (default: 300)
    #[serde(default = "default_ticket_limit")]
    pub ticket_limit: u32,

    /// Recent events requested per refresh round (default: 25)
    #[serde(default = "default_event_limit")]
    pub event_limit: u32,

    /// Quiet interval before free-text filter input triggers a refresh (default: 260)
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_refresh_interval_ms() -> u64 {
    3000
}

fn default_ticket_limit() -> u32 {
    300
}

fn default_event_limit() -> u32 {
    25
}

fn default_search_debounce_ms() -> u64 {
    260
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_interval_ms: default_refresh_interval_ms(),
            ticket_limit: default_ticket_limit(),
            event_limit: default_event_limit(),
            search_debounce_ms: default_search_debounce_ms(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Config {
    /// Get the path to the default config file
    pub fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_DIR).join("config.yaml")
    }

    /// Load configuration from the default location, or return defaults if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when the file is absent.
    ///
    /// The `DESKWATCH_URL` environment variable takes precedence over the file's `base_url`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                DeskwatchError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read config at {}: {}", path.display(), e),
                ))
            })?;
            serde_yaml_ng::from_str::<Config>(&content)?
        } else {
            Config::default()
        };

        if let Ok(url) = env::var(URL_ENV)
            && !url.trim().is_empty()
        {
            config.base_url = url.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the values against what the backend accepts
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;

        if self.ticket_limit == 0 || self.ticket_limit > MAX_TICKET_LIMIT {
            return Err(DeskwatchError::Config(format!(
                "ticket_limit must be between 1 and {MAX_TICKET_LIMIT}, got {}",
                self.ticket_limit
            )));
        }
        if self.event_limit == 0 || self.event_limit > MAX_EVENT_LIMIT {
            return Err(DeskwatchError::Config(format!(
                "event_limit must be between 1 and {MAX_EVENT_LIMIT}, got {}",
                self.event_limit
            )));
        }
        if self.refresh_interval_ms == 0 {
            return Err(DeskwatchError::Config(
                "refresh_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout == 0 {
            return Err(DeskwatchError::Config(
                "request_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(DeskwatchError::Config(format!(
                "base_url '{}' cannot be used as a base",
                self.base_url
            )));
        }
        Ok(url)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}
