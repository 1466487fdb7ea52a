//! Configuration management for the auth client.

use crate::{ConfigError, ConfigResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default identity-chooser origin (can be overridden at compile time via
/// the MENTORA_IDENTITY_ORIGIN env var).
pub const DEFAULT_IDENTITY_ORIGIN: &str = match option_env!("MENTORA_IDENTITY_ORIGIN") {
    Some(origin) => origin,
    None => "https://id.mentora.app",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Origin serving the federated identity chooser surfaces.
    #[serde(default = "default_identity_origin")]
    pub identity_origin: String,
}

fn default_identity_origin() -> String {
    DEFAULT_IDENTITY_ORIGIN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            identity_origin: DEFAULT_IDENTITY_ORIGIN.to_string(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from a file, falling back to defaults.
    /// Note: identity_origin is compile-time only and will always use the
    /// built-in default, regardless of what's in the config file.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        // Force compile-time values (never from config file)
        config.identity_origin = DEFAULT_IDENTITY_ORIGIN.to_string();

        // Environment variables can only override log_level
        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> ConfigResult<()> {
        paths.ensure_dirs()?;
        let config_path = paths.config_file();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("MENTORA_LOG_LEVEL") {
            self.log_level = log_level;
        }
    }

    /// Get the identity-chooser origin as a parsed URL.
    pub fn identity_origin(&self) -> ConfigResult<Url> {
        Url::parse(&self.identity_origin).map_err(ConfigError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.identity_origin, DEFAULT_IDENTITY_ORIGIN);
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        let config_json = r#"{
            "log_level": "debug"
        }"#;

        std::fs::write(&config_path, config_json).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.identity_origin, DEFAULT_IDENTITY_ORIGIN);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        // Note: identity_origin is compile-time only and will be forced
        // to the default on load
        let mut config = Config::default();
        config.log_level = "trace".to_string();

        config.save(&paths).unwrap();

        let loaded = Config::load(&paths).unwrap();
        assert_eq!(loaded.log_level, "trace");
        assert_eq!(loaded.identity_origin, DEFAULT_IDENTITY_ORIGIN);
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.identity_origin, DEFAULT_IDENTITY_ORIGIN);
    }

    #[test]
    fn test_config_identity_origin_parse() {
        let config = Config::default();
        let url = config.identity_origin().unwrap();
        assert_eq!(url.scheme(), "https");
        assert!(url.host_str().unwrap().contains("mentora.app"));
    }

    #[test]
    fn test_config_invalid_origin() {
        let mut config = Config::default();
        config.identity_origin = "not a valid url".to_string();

        let result = config.identity_origin();
        assert!(result.is_err());
    }

    #[test]
    fn test_default_constants() {
        assert!(!DEFAULT_LOG_LEVEL.is_empty());
        assert!(!DEFAULT_IDENTITY_ORIGIN.is_empty());
        assert!(DEFAULT_IDENTITY_ORIGIN.starts_with("https://"));
    }
}
