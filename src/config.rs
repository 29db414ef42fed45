// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration management.
//!
//! This module handles persistent configuration storage in TOML format.
//! Every value a user can tune lives here: provider credentials and URLs,
//! the default city and units, refresh cadence, cache lifetime, and the
//! background asset directory. The `OPENWEATHERMAP_API_KEY` environment
//! variable always takes precedence over the stored key.

use std::path::PathBuf;
use std::time::Duration;

use owm_client::{ClientConfig, Units};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "Weatherglass";

pub const WINDOW_WIDTH: f32 = 1200.0;
pub const WINDOW_HEIGHT: f32 = 800.0;
pub const WINDOW_MIN_WIDTH: f32 = 800.0;
pub const WINDOW_MIN_HEIGHT: f32 = 600.0;

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// OpenWeatherMap API key (optional, env var takes precedence)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for the weather data endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL for the geocoding search endpoint
    #[serde(default = "default_geo_url")]
    pub geo_url: String,

    /// City loaded on startup
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Measurement system: metric, imperial, or standard
    #[serde(default)]
    pub default_units: Units,

    /// Auto-refresh interval in seconds
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// How long a fetched response stays fresh, in seconds
    #[serde(default = "default_cache_duration_secs")]
    pub cache_duration_secs: u64,

    /// Whether the refresh timer re-arms after each successful fetch
    #[serde(default = "default_true")]
    pub auto_refresh: bool,

    /// Directory scanned for background images
    #[serde(default)]
    pub backgrounds_dir: Option<PathBuf>,
}

// Default value functions for serde
fn default_base_url() -> String {
    owm_client::DEFAULT_BASE_URL.to_string()
}

fn default_geo_url() -> String {
    owm_client::DEFAULT_GEO_URL.to_string()
}

fn default_city() -> String {
    "London".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    300
}

fn default_cache_duration_secs() -> u64 {
    600
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            geo_url: default_geo_url(),
            default_city: default_city(),
            default_units: Units::Metric,
            refresh_interval_secs: default_refresh_interval_secs(),
            cache_duration_secs: default_cache_duration_secs(),
            auto_refresh: true,
            backgrounds_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load("weatherglass", "config")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store("weatherglass", "config", self)
    }

    /// Get the config file path for display to user
    pub fn config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path("weatherglass", "config")
    }

    /// Resolve the API key, environment variable first.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var("OPENWEATHERMAP_API_KEY") {
            if !key.is_empty() {
                return Some(key);
            }
        }
        self.api_key.clone().filter(|k| !k.is_empty())
    }

    /// Directory scanned for background images.
    pub fn backgrounds_path(&self) -> PathBuf {
        self.backgrounds_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("assets/backgrounds"))
    }

    /// Per-user scratch space for synthesized and downloaded assets.
    pub fn scratch_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("weatherglass")
    }

    /// Static values handed to the provider client at construction.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_key: self.resolve_api_key().unwrap_or_default(),
            base_url: self.base_url.clone(),
            geo_url: self.geo_url.clone(),
            cache_ttl: Duration::from_secs(self.cache_duration_secs),
            ..ClientConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();

        assert_eq!(config.default_city, "London");
        assert_eq!(config.default_units, Units::Metric);
        assert_eq!(config.refresh_interval_secs, 300);
        assert_eq!(config.cache_duration_secs, 600);
        assert!(config.auto_refresh);
        assert!(config.base_url.starts_with("https://"));
    }

    #[test]
    fn client_config_carries_cache_duration() {
        let config = AppConfig {
            cache_duration_secs: 42,
            ..AppConfig::default()
        };

        assert_eq!(config.client_config().cache_ttl, Duration::from_secs(42));
    }

    #[test]
    fn stored_api_key_is_used_when_env_is_empty() {
        let config = AppConfig {
            api_key: Some("stored-key".to_string()),
            ..AppConfig::default()
        };

        // The test environment does not define OPENWEATHERMAP_API_KEY.
        if std::env::var("OPENWEATHERMAP_API_KEY").is_err() {
            assert_eq!(config.resolve_api_key().as_deref(), Some("stored-key"));
        }
    }

    #[test]
    fn blank_api_key_counts_as_absent() {
        let config = AppConfig {
            api_key: Some(String::new()),
            ..AppConfig::default()
        };

        if std::env::var("OPENWEATHERMAP_API_KEY").is_err() {
            assert_eq!(config.resolve_api_key(), None);
        }
    }
}
