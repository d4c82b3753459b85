//! Configuration management for the Aniview workspace.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Catalog client settings
    pub catalog: CatalogConfig,

    /// Wishlist store settings
    pub wishlist: WishlistConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Catalog client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Upstream API base URL
    pub base_url: String,

    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,

    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,

    /// Retry settings
    pub retry: RetryConfig,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests issued per window
    pub max_requests: u32,

    /// Window length in milliseconds
    pub window_ms: u64,
}

/// Retry configuration for throttled requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retries after a throttled request
    pub max_retries: u32,

    /// Base delay in milliseconds (doubled on each retry)
    pub base_delay_ms: u64,
}

/// Wishlist store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistConfig {
    /// Wishlist file path (relative to data directory or absolute)
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
            catalog: CatalogConfig {
                base_url: "https://api.jikan.moe/v4".to_string(),
                timeout_seconds: 30,
                rate_limit: RateLimitConfig {
                    max_requests: 3,
                    window_ms: 1000,
                },
                retry: RetryConfig {
                    max_retries: 3,
                    base_delay_ms: 1000,
                },
            },
            wishlist: WishlistConfig {
                path: "wishlist.json".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load configuration from a TOML file or create default if not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::from_file(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Self::default()
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the absolute path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        let log_path = Path::new(&self.logging.log_dir);
        if log_path.is_absolute() {
            log_path.to_path_buf()
        } else {
            self.data_dir().join(log_path)
        }
    }

    /// Get the absolute path for the wishlist file
    pub fn wishlist_path(&self) -> PathBuf {
        let wishlist_path = Path::new(&self.wishlist.path);
        if wishlist_path.is_absolute() {
            wishlist_path.to_path_buf()
        } else {
            self.data_dir().join(wishlist_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.root_dir, "data");
        assert_eq!(config.catalog.base_url, "https://api.jikan.moe/v4");
        assert_eq!(config.catalog.rate_limit.max_requests, 3);
        assert_eq!(config.catalog.rate_limit.window_ms, 1000);
        assert_eq!(config.catalog.retry.max_retries, 3);
        assert_eq!(config.wishlist.path, "wishlist.json");
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let original_config = Config::default();
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.data.root_dir, original_config.data.root_dir);
        assert_eq!(
            loaded_config.catalog.base_url,
            original_config.catalog.base_url
        );
        assert_eq!(
            loaded_config.catalog.retry.base_delay_ms,
            original_config.catalog.retry.base_delay_ms
        );

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        // Should return default config without error
        assert_eq!(config.data.root_dir, "data");
    }

    #[test]
    fn test_path_resolution() {
        let config = Config::default();

        let log_dir = config.log_dir();
        assert!(log_dir.ends_with("data/logs"));

        let wishlist_path = config.wishlist_path();
        assert!(wishlist_path.ends_with("data/wishlist.json"));
    }

    #[test]
    fn test_absolute_wishlist_path() {
        let mut config = Config::default();
        config.wishlist.path = "/var/lib/aniview/wishlist.json".to_string();
        assert_eq!(
            config.wishlist_path(),
            PathBuf::from("/var/lib/aniview/wishlist.json")
        );
    }
}
