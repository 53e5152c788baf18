//! Configuration management for estate-access.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::DEFAULT_NAMESPACE;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "estate-access";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "estate.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "ESTATE_ACCESS_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ESTATE_ACCESS_`)
/// 2. TOML config file at `~/.config/estate-access/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Simulated network configuration for the record access layer.
    pub api: ApiConfig,
    /// Mock administrator account.
    pub auth: AuthConfig,
    /// Resident list defaults.
    pub residents: ResidentsConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/estate-access/estate.db`
    pub database_path: Option<PathBuf>,
    /// Prefix applied to every stored key.
    pub namespace: String,
}

/// Latency simulated by the record access layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Delay before a bulk read completes, in milliseconds.
    pub fetch_delay_ms: u64,
    /// Delay before a create, update, or delete completes, in milliseconds.
    pub mutate_delay_ms: u64,
}

/// The single mock administrator account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Login identifier.
    pub admin_email: String,
    /// Display name of the authenticated user.
    pub admin_name: String,
    /// BLAKE3 hex digest of the password.
    pub password_hash: String,
}

/// Resident list configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidentsConfig {
    /// Rows per page in the resident list.
    pub items_per_page: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: 300,
            mutate_delay_ms: 400,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@estate.com".to_string(),
            admin_name: "Admin User".to_string(),
            password_hash: crate::auth::hash_password("password123"),
        }
    }
}

impl Default for ResidentsConfig {
    fn default() -> Self {
        Self { items_per_page: 5 }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.residents.items_per_page == 0 {
            return Err(Error::config_validation(
                "items_per_page must be greater than 0",
            ));
        }

        if self.storage.namespace.is_empty() {
            return Err(Error::config_validation("namespace must not be empty"));
        }

        if self.storage.namespace.contains(':') {
            return Err(Error::config_validation(format!(
                "namespace must not contain ':' (got '{}')",
                self.storage.namespace
            )));
        }

        let hash = &self.auth.password_hash;
        if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::config_validation(
                "password_hash must be a 64-character BLAKE3 hex digest",
            ));
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the bulk read latency as a Duration.
    #[must_use]
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.api.fetch_delay_ms)
    }

    /// Get the mutation latency as a Duration.
    #[must_use]
    pub fn mutate_delay(&self) -> Duration {
        Duration::from_millis(self.api.mutate_delay_ms)
    }
}
