//! Configuration management
//!
//! TOML-backed settings for the portal crates: backend endpoint, credential
//! storage location, portal defaults, and logging.

use crate::error::{ErrorContext, KwoonError, KwoonResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for a portal deployment
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KwoonConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub portal: PortalConfig,
    pub logging: LoggingConfig,
}

/// Settings for the association backend API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing path
    pub base_url: String,
    /// Request timeout in seconds; bounds every credential exchange
    pub timeout_seconds: u64,
    /// User agent string sent with every request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: 30,
            user_agent: "kwoon/0.1".to_string(),
        }
    }
}

/// Where persisted state lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the credential slot
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kwoon");

        Self { data_dir }
    }
}

/// Portal-level defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// School assumed when a restored credential carries no school context
    pub default_school_id: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            default_school_id: "1".to_string(),
        }
    }
}

impl KwoonConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> KwoonResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KwoonError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: KwoonConfig = toml::from_str(&content).map_err(|e| KwoonError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> KwoonResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| KwoonError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| KwoonError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> KwoonResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(KwoonError::Config {
                message: "API base_url must not be empty".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set api.base_url to the backend address"),
            });
        }

        if self.api.timeout_seconds == 0 {
            return Err(KwoonError::Config {
                message: "API timeout_seconds must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set api.timeout_seconds to a positive value"),
            });
        }

        if self.portal.default_school_id.trim().is_empty() {
            return Err(KwoonError::Config {
                message: "Portal default_school_id must not be empty".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set portal.default_school_id to a school from the directory"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = KwoonConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.portal.default_school_id, "1");
    }

    #[test]
    fn config_round_trips_through_toml_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("kwoon.toml");

        let mut config = KwoonConfig::default();
        config.api.base_url = "https://portal.example.org".to_string();
        config.portal.default_school_id = "7".to_string();
        config.save_to_file(&path).expect("save config");

        let loaded = KwoonConfig::from_file(&path).expect("load config");
        assert_eq!(loaded.api.base_url, "https://portal.example.org");
        assert_eq!(loaded.api.timeout_seconds, 30);
        assert_eq!(loaded.portal.default_school_id, "7");
    }

    #[test]
    fn partial_config_files_fall_back_to_defaults() {
        let config: KwoonConfig =
            toml::from_str("[api]\nbase_url = \"http://backend:9000\"\n").expect("parse");
        assert_eq!(config.api.base_url, "http://backend:9000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.portal.default_school_id, "1");
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = KwoonConfig::default();
        config.api.timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(KwoonError::Config { .. })));

        let mut config = KwoonConfig::default();
        config.portal.default_school_id = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
