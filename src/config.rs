//! Application configuration
//!
//! Settings are read from a TOML file. Keys missing from the file fall back
//! to the defaults embedded from `config/default.toml`, so a user file only
//! needs the values it changes.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Errors that can occur while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has wrong value types
    #[error("Invalid config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
}

/// Settings for the remote show catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the TVMaze API
    pub base_url: String,
    /// Upper bound for a single request, in seconds
    pub timeout_secs: u64,
    /// Image reference used when a show has no poster
    pub placeholder_image: String,
}

/// Settings for persistent storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for stored data; the platform data directory when unset
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// An explicitly given `path` must exist. Without one, the user config
    /// file is read if present and the defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parses a configuration file, merged over the built-in defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let parse_failed = |source: toml::de::Error| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        };
        let user: toml::Table = toml::from_str(&content).map_err(parse_failed)?;

        let mut merged = default_table();
        merge_tables(&mut merged, user);
        let config: AppConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(parse_failed)?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Path to the user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "show-spotter").map(|d| d.config_dir().join("config.toml"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

fn default_table() -> toml::Table {
    toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
}

/// Overlays `overlay` onto `base`; nested tables merge key by key.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                merge_tables(base_table, overlay_table);
            }
            (Some(slot), value) => *slot = value,
            (None, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.base_url, "https://api.tvmaze.com");
        assert_eq!(config.catalog.timeout_secs, 10);
        assert_eq!(
            config.catalog.placeholder_image,
            "assets/no-img-portrait-text.webp"
        );
        assert_eq!(config.storage.data_dir, None);
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_merge_keeps_nested_defaults() {
        let mut base: toml::Table = toml::from_str("[a]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Table = toml::from_str("[a]\ny = 3\n[b]\nz = 4").unwrap();

        merge_tables(&mut base, overlay);

        assert_eq!(base["a"]["x"].as_integer(), Some(1));
        assert_eq!(base["a"]["y"].as_integer(), Some(3));
        assert_eq!(base["b"]["z"].as_integer(), Some(4));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[catalog]\ntimeout_secs = 3").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.catalog.timeout_secs, 3);
        assert_eq!(config.catalog.base_url, "https://api.tvmaze.com");
        assert_eq!(config.storage.data_dir, None);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[catalog]\ntimeout_secs = \"soon\"").unwrap();

        let result = AppConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ParseFailed { .. })));
    }
}
