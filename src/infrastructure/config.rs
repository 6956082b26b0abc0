//! Configuration file loading.

use std::fs;
use std::path::Path;

use crate::domain::{AppConfig, ExportError, Result};

/// Load configuration from the default location, or defaults if absent.
///
/// # Errors
/// Returns error if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<AppConfig> {
    let config_path = AppConfig::default_data_dir().join("config.toml");

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| ExportError::storage(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| ExportError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\npage_size = 50\nrequest_delay_ms = 10\n").unwrap();

        let config = load_config_from_file(&path).unwrap();
        assert_eq!(config.api.page_size, 50);
        assert_eq!(config.api.request_delay_ms, 10);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not valid [ toml").unwrap();

        let err = load_config_from_file(&path).unwrap_err();
        assert!(matches!(err, ExportError::Config { .. }));
    }
}
