//! Configuration management for Bikeshare Sync
//!
//! This module provides unified configuration management with automatic
//! first-run initialization, multi-source loading, and zero-config defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::client::ClientConfig;
use crate::constants::{config as locations, files, geo, http, listing, logging};
use crate::errors::{ConfigError, ConfigResult, Result};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Data directory layout
    pub paths: PathsConfig,
    /// Remote listing settings
    pub listing: ListingConfig,
    /// Station catalog settings
    pub catalog: CatalogConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Where tables and trip files live
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the data directory (manifest, raw/, archive/, processed/)
    pub data_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("./data"),
        }
    }
}

/// Remote listing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListingConfig {
    /// Index page listing every published archive
    pub index_url: String,
    /// Base URL archive filenames are appended to
    pub download_base_url: String,
    /// Timeout for the listing request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            index_url: listing::INDEX_URL.to_string(),
            download_base_url: listing::DOWNLOAD_BASE_URL.to_string(),
            request_timeout: http::DEFAULT_TIMEOUT,
        }
    }
}

impl ListingConfig {
    /// Convert to runtime ClientConfig
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig::with_timeout(self.request_timeout)
    }
}

/// Station catalog settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Region every kept station must fall inside
    pub target_region: String,
    /// Region layer (defaults to processed/us_states.geojson)
    pub region_boundaries: Option<PathBuf>,
    /// Neighborhood layer (defaults to processed/chicago_neighborhoods.geojson)
    pub neighborhood_boundaries: Option<PathBuf>,
    /// Property holding a region's name
    pub region_name_property: String,
    /// Property holding a neighborhood's primary name
    pub primary_neighborhood_property: String,
    /// Property holding a neighborhood's secondary name
    pub secondary_neighborhood_property: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            target_region: geo::DEFAULT_TARGET_REGION.to_string(),
            region_boundaries: None,
            neighborhood_boundaries: None,
            region_name_property: geo::REGION_NAME_PROPERTY.to_string(),
            primary_neighborhood_property: geo::PRIMARY_NEIGHBORHOOD_PROPERTY.to_string(),
            secondary_neighborhood_property: geo::SECONDARY_NEIGHBORHOOD_PROPERTY.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Region layer path, resolved against the data root when not configured
    pub fn region_boundaries_path(&self, data_root: &Path) -> PathBuf {
        self.region_boundaries.clone().unwrap_or_else(|| {
            data_root
                .join(files::PROCESSED_DIR)
                .join(geo::REGION_BOUNDARIES_FILE_NAME)
        })
    }

    /// Neighborhood layer path, resolved against the data root when not configured
    pub fn neighborhood_boundaries_path(&self, data_root: &Path) -> PathBuf {
        self.neighborhood_boundaries.clone().unwrap_or_else(|| {
            data_root
                .join(files::PROCESSED_DIR)
                .join(geo::NEIGHBORHOOD_BOUNDARIES_FILE_NAME)
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    ///
    /// CLI arguments are applied on top by the caller.
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        let config_path = match config_file_override {
            Some(ref path) => Some(path.clone()),
            None => Self::find_config_file()?,
        };

        if let Some(path) = config_path {
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                config = Self::load_from_file(&path).await?;
            } else if config_file_override.is_some() {
                return Err(ConfigError::NotFound { path }.into());
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Initialize configuration on first run
    ///
    /// Creates a default config file if none exists and notifies the user
    pub async fn initialize_first_run() -> Result<Option<PathBuf>> {
        let config_path = Self::get_default_config_path()?;

        if config_path.exists() {
            return Ok(Some(config_path));
        }

        info!("Creating default configuration file...");
        Self::write_default_config(&config_path).await?;

        println!("📁 Created default configuration file:");
        println!("   {}", config_path.display());
        println!("   You can customize settings by editing this file.");
        println!();

        Ok(Some(config_path))
    }

    /// Write the commented default configuration to `path`
    pub async fn write_default_config(path: &Path) -> ConfigResult<()> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(path, Self::generate_default_config_content())
            .await
            .map_err(io_error)
    }

    /// Check values that deserialize fine but cannot work
    pub fn validate(&self) -> ConfigResult<()> {
        if self.catalog.target_region.trim().is_empty() {
            return Err(invalid_value(
                "catalog.target_region",
                &self.catalog.target_region,
                "Target region cannot be empty",
            ));
        }

        for (field, value) in [
            ("listing.index_url", &self.listing.index_url),
            ("listing.download_base_url", &self.listing.download_base_url),
        ] {
            if let Err(e) = Url::parse(value) {
                return Err(invalid_value(field, value, &format!("Not a valid URL: {}", e)));
            }
        }

        if self.listing.request_timeout.is_zero() {
            return Err(invalid_value(
                "listing.request_timeout",
                "0s",
                "Timeout must be greater than zero",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(invalid_value(
                "logging.level",
                &self.logging.level,
                "Expected one of error, warn, info, debug, trace",
            ));
        }

        Ok(())
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> ConfigResult<Option<PathBuf>> {
        let search_paths = vec![
            PathBuf::from(locations::LOCAL_CONFIG_FILE),
            PathBuf::from("./config.toml"),
            Self::get_default_config_path()?,
        ];

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Ok(Some(path));
            }
        }

        debug!("No config file found in standard locations");
        Ok(None)
    }

    /// Get the default config file path for the current user
    fn get_default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDirectory)?;
        Ok(config_dir.join(locations::APP_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    fn generate_default_config_content() -> String {
        format!(
            r#"# Bikeshare Sync Configuration
# This file was automatically generated on first run.
# You can customize any of these settings to suit your needs.

[paths]
# Holds zipfile_metadata.csv, raw/, archive/ and processed/
data_root = "./data"

[listing]
index_url = "{}"
download_base_url = "{}"
request_timeout = "{}s"

[catalog]
# Stations outside this region are dropped
target_region = "{}"
# Boundary layers default to the processed/ directory
# region_boundaries = "/path/to/us_states.geojson"
# neighborhood_boundaries = "/path/to/chicago_neighborhoods.geojson"
region_name_property = "{}"
primary_neighborhood_property = "{}"
secondary_neighborhood_property = "{}"

[logging]
level = "{}"  # error, warn, info, debug, trace
"#,
            listing::INDEX_URL,
            listing::DOWNLOAD_BASE_URL,
            http::DEFAULT_TIMEOUT.as_secs(),
            geo::DEFAULT_TARGET_REGION,
            geo::REGION_NAME_PROPERTY,
            geo::PRIMARY_NEIGHBORHOOD_PROPERTY,
            geo::SECONDARY_NEIGHBORHOOD_PROPERTY,
            logging::DEFAULT_LOG_LEVEL,
        )
    }
}

fn invalid_value(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();

        assert_eq!(config.paths.data_root, PathBuf::from("./data"));
        assert_eq!(config.catalog.target_region, "Illinois");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_generation() {
        let content = AppConfig::generate_default_config_content();

        let parsed: AppConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, AppConfig::default());
        assert!(content.contains("# Bikeshare Sync Configuration"));
        assert!(content.contains("[catalog]"));
    }

    #[tokio::test]
    async fn test_config_loading_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_partial_config_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let test_config = r#"
[paths]
data_root = "/srv/bikeshare"

[listing]
request_timeout = "2m"

[logging]
level = "debug"
"#;
        tokio::fs::write(&config_path, test_config).await.unwrap();

        let config = AppConfig::load(Some(config_path)).await.unwrap();
        assert_eq!(config.paths.data_root, PathBuf::from("/srv/bikeshare"));
        assert_eq!(config.listing.request_timeout, Duration::from_secs(120));
        assert_eq!(config.listing.index_url, listing::INDEX_URL);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.catalog.target_region, "Illinois");
    }

    #[tokio::test]
    async fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.catalog.target_region = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let mut config = AppConfig::default();
        config.listing.index_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "chatty".to_string();
        assert!(config.validate().is_err());

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        tokio::fs::write(&config_path, "[paths\n").await.unwrap();
        assert!(matches!(
            AppConfig::load(Some(config_path)).await,
            Err(AppError::Config(ConfigError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn test_boundary_paths_default_to_processed() {
        let config = CatalogConfig::default();
        assert_eq!(
            config.region_boundaries_path(Path::new("/data")),
            PathBuf::from("/data/processed/us_states.geojson")
        );

        let config = CatalogConfig {
            neighborhood_boundaries: Some(PathBuf::from("/maps/hoods.geojson")),
            ..CatalogConfig::default()
        };
        assert_eq!(
            config.neighborhood_boundaries_path(Path::new("/data")),
            PathBuf::from("/maps/hoods.geojson")
        );
    }

    #[tokio::test]
    async fn test_write_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        AppConfig::write_default_config(&path).await.unwrap();
        let config = AppConfig::load(Some(path)).await.unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
