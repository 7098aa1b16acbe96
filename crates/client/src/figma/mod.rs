//! Figma REST API client.
//!
//! ### Specification
//!
//! - **Endpoints**: `GET /files/{key}` and `GET /files/{key}/nodes`
//! - **Authentication**: `X-Figma-Token` header.
//! - **No retries**: the cache layer treats every failure as fatal to the
//!   current request, so the client reports errors as-is.
//! - Responses stay untyped JSON; the simplification layer inspects field
//!   presence rather than a fixed schema.

pub mod error;

pub use error::FigmaError;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use figcache_core::{DocumentFetcher, Error};

/// Default base URL for the Figma REST API.
const DEFAULT_BASE_URL: &str = "https://api.figma.com/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "mcp-figma/0.1";

/// Figma API client configuration.
#[derive(Debug, Clone)]
pub struct FigmaConfig {
    /// Personal access token sent as X-Figma-Token.
    pub token: String,
    /// Base URL (default: https://api.figma.com/v1).
    pub base_url: String,
    /// Request timeout (default: 30s).
    pub timeout: Duration,
    /// User-agent string (default: mcp-figma/0.x).
    pub user_agent: String,
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FigmaConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads FIGMA_ACCESS_TOKEN from environment. Returns error if not set.
    pub fn from_env() -> Result<Self, FigmaError> {
        let token = std::env::var("FIGMA_ACCESS_TOKEN").map_err(|_| FigmaError::MissingToken)?;

        Ok(Self { token, ..Default::default() })
    }
}

/// Figma REST API client.
#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: reqwest::Client,
    config: FigmaConfig,
}

impl FigmaClient {
    /// Create a new Figma client with the given configuration.
    pub fn new(config: FigmaConfig) -> Result<Self, FigmaError> {
        if config.token.is_empty() {
            return Err(FigmaError::MissingToken);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| FigmaError::Network(std::sync::Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Create a new Figma client from environment variables.
    pub fn from_env() -> Result<Self, FigmaError> {
        Self::new(FigmaConfig::from_env()?)
    }

    /// Fetch a whole file: `GET /files/{key}`.
    pub async fn get_file(&self, file_key: &str, depth: Option<u32>) -> Result<Value, FigmaError> {
        let url = format!("{}/files/{}", self.config.base_url, file_key);
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(depth) = depth {
            query.push(("depth", depth.to_string()));
        }
        self.request(&url, &query).await
    }

    /// Fetch specific node subtrees: `GET /files/{key}/nodes?ids=...`.
    ///
    /// `node_ids` is a comma-separated list, e.g. `"1:2,3:4"`.
    pub async fn get_file_nodes(&self, file_key: &str, node_ids: &str, depth: Option<u32>) -> Result<Value, FigmaError> {
        if node_ids.is_empty() {
            return Err(FigmaError::InvalidRequest("node ids cannot be empty".into()));
        }

        let url = format!("{}/files/{}/nodes", self.config.base_url, file_key);
        let mut query: Vec<(&str, String)> = vec![("ids", node_ids.to_string())];
        if let Some(depth) = depth {
            query.push(("depth", depth.to_string()));
        }
        self.request(&url, &query).await
    }

    async fn request(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FigmaError> {
        tracing::debug!(url, "requesting Figma API");

        let response = self
            .http
            .get(url)
            .header("X-Figma-Token", &self.config.token)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(url, status = status.as_u16(), "Figma API response");

        if status == 401 || status == 403 {
            return Err(FigmaError::AuthError);
        }

        if status == 404 {
            return Err(FigmaError::NotFound(url.to_string()));
        }

        if status == 429 {
            return Err(FigmaError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(FigmaError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FigmaError::Parse(e.to_string()))
    }
}

#[async_trait]
impl DocumentFetcher for FigmaClient {
    async fn fetch(&self, file_key: &str, node_id: Option<&str>, depth: Option<u32>) -> Result<Value, Error> {
        let result = match node_id {
            Some(ids) => self.get_file_nodes(file_key, ids, depth).await,
            None => self.get_file(file_key, depth).await,
        };
        result.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new_missing_token() {
        let config = FigmaConfig::default();
        let result = FigmaClient::new(config);
        assert!(matches!(result, Err(FigmaError::MissingToken)));
    }

    #[test]
    fn test_config_from_env_missing_token() {
        let original = std::env::var("FIGMA_ACCESS_TOKEN").ok();
        unsafe {
            std::env::remove_var("FIGMA_ACCESS_TOKEN");
        }

        let result = FigmaConfig::from_env();
        assert!(matches!(result, Err(FigmaError::MissingToken)));

        if let Some(token) = original {
            unsafe {
                std::env::set_var("FIGMA_ACCESS_TOKEN", token);
            }
        }
    }

    #[tokio::test]
    async fn test_get_file_nodes_empty_ids() {
        let client = FigmaClient::new(FigmaConfig { token: "figd_test".into(), ..Default::default() }).unwrap();
        let result = client.get_file_nodes("abc123", "", None).await;
        assert!(matches!(result, Err(FigmaError::InvalidRequest(_))));
    }
}
