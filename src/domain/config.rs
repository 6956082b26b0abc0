//! Application configuration.
//!
//! Loaded from `~/.chatgpt-export/config.toml` when present; every field
//! has a sensible default so the tool works with no config file at all.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default backend API base URL.
pub const DEFAULT_BASE_URL: &str = "https://chatgpt.com/backend-api";

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Conversations requested per index page (server maximum is 100).
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Politeness delay between consecutive requests, in milliseconds.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_page_size() -> usize {
    100
}

const fn default_request_delay_ms() -> u64 {
    150
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the finished archive is delivered to.
    /// Defaults to the platform download directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Path configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,

    /// Path configuration.
    #[serde(default)]
    pub paths: PathConfig,
}

impl AppConfig {
    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chatgpt-export")
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_file_path(&self) -> PathBuf {
        self.data_dir().join("config.toml")
    }

    /// Get the token file path (fallback credential source).
    #[must_use]
    pub fn token_file_path(&self) -> PathBuf {
        self.data_dir().join("token")
    }

    /// Get the temporary archive path used while an export is running.
    #[must_use]
    pub fn temp_archive_path(&self) -> PathBuf {
        self.data_dir().join("export-temp.json")
    }

    /// Get the delivery directory for finished archives.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output.dir.clone().unwrap_or_else(|| {
            dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
        })
    }

    /// Politeness delay between consecutive requests.
    #[must_use]
    pub const fn request_delay(&self) -> Duration {
        Duration::from_millis(self.api.request_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.page_size, 100);
        assert_eq!(config.api.request_delay_ms, 150);
        assert!(config.output.dir.is_none());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.page_size, 100);
        assert_eq!(config.request_delay(), Duration::from_millis(150));
    }

    #[test]
    fn test_data_dir_override() {
        let config: AppConfig = toml::from_str(
            "[paths]\ndata_dir = \"/tmp/export-data\"\n",
        )
        .unwrap();
        assert_eq!(
            config.temp_archive_path(),
            PathBuf::from("/tmp/export-data/export-temp.json")
        );
    }
}
