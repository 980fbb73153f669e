//! Application settings loading from config.toml and the environment.
//!
//! Settings are layered the same way everywhere: config.toml supplies
//! defaults, `DATABASE_URL` in the environment overrides the stored URL,
//! and anything absent falls back to built-in defaults so the engine can
//! boot with no config file at all.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/frontdesk.sqlite";

/// Extended deadline for the multi-write check-in transaction, in seconds.
const DEFAULT_CHECK_IN_TIMEOUT_SECS: u64 = 15;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Deadline for the check-in transaction, which performs multiple
    /// dependent writes (guest upserts, occupancy, links, payment, room)
    #[serde(default = "default_check_in_timeout_secs")]
    pub check_in_timeout_secs: u64,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

const fn default_check_in_timeout_secs() -> u64 {
    DEFAULT_CHECK_IN_TIMEOUT_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            check_in_timeout_secs: default_check_in_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// The database URL after applying the `DATABASE_URL` environment override.
    #[must_use]
    pub fn effective_database_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.database_url.clone())
    }
}

/// Loads application configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file exists but cannot be read, or if the TOML
/// syntax is invalid. A missing file yields the built-in defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from the default location (./config.toml).
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_config() -> Result<AppConfig> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            database_url = "sqlite://hotel.sqlite"
            check_in_timeout_secs = 30
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database_url, "sqlite://hotel.sqlite");
        assert_eq!(config.check_in_timeout_secs, 30);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.check_in_timeout_secs, DEFAULT_CHECK_IN_TIMEOUT_SECS);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config("does/not/exist.toml").unwrap();
        assert_eq!(config.check_in_timeout_secs, DEFAULT_CHECK_IN_TIMEOUT_SECS);
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let dir = std::env::temp_dir().join("frontdesk-settings-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "database_url = [not valid").unwrap();

        let result = load_config(&path);
        assert!(matches!(
            result.unwrap_err(),
            crate::errors::Error::Config { message: _ }
        ));
    }
}
