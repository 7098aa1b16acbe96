//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FIGMA_MCP_*)
//! 2. TOML config file (if FIGMA_MCP_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::store::StoreKind;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FIGMA_MCP_*)
/// 2. TOML config file (if FIGMA_MCP_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Figma personal access token.
    ///
    /// Set via FIGMA_MCP_FIGMA_TOKEN environment variable.
    /// Required only when a tool actually hits the Figma API.
    #[serde(default)]
    pub figma_token: Option<String>,

    /// Which storage backend to use: "sqlite" or "file".
    ///
    /// Set via FIGMA_MCP_BACKEND environment variable.
    #[serde(default = "default_backend")]
    pub backend: StoreKind,

    /// Path to the SQLite cache database (sqlite backend).
    ///
    /// Set via FIGMA_MCP_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Directory for cache record files (file backend).
    ///
    /// Set via FIGMA_MCP_DATA_DIR environment variable.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base URL of the Figma REST API.
    ///
    /// Set via FIGMA_MCP_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via FIGMA_MCP_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via FIGMA_MCP_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_backend() -> StoreKind {
    StoreKind::Sqlite
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./figma-cache.sqlite")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./figma-cache-data")
}

fn default_api_base_url() -> String {
    "https://api.figma.com/v1".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    "mcp-figma/0.1".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            figma_token: None,
            backend: default_backend(),
            db_path: default_db_path(),
            data_dir: default_data_dir(),
            api_base_url: default_api_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FIGMA_MCP_`
    /// 2. TOML file from `FIGMA_MCP_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FIGMA_MCP_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FIGMA_MCP_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the Figma token is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the token is not set.
    pub fn require_figma_token(&self) -> Result<&str, ConfigError> {
        self.figma_token.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "figma_token".into(),
            hint: "Set FIGMA_MCP_FIGMA_TOKEN environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.backend, StoreKind::Sqlite);
        assert_eq!(config.db_path, PathBuf::from("./figma-cache.sqlite"));
        assert_eq!(config.data_dir, PathBuf::from("./figma-cache-data"));
        assert_eq!(config.api_base_url, "https://api.figma.com/v1");
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.user_agent, "mcp-figma/0.1");
        assert!(config.figma_token.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
    }

    #[test]
    fn test_require_figma_token_missing() {
        let config = AppConfig::default();
        let result = config.require_figma_token();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_figma_token_present() {
        let config = AppConfig { figma_token: Some("figd_test".into()), ..Default::default() };
        let result = config.require_figma_token();
        assert_eq!(result.unwrap(), "figd_test");
    }
}
