//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use figcache_client::{FigmaClient, FigmaConfig};
use figcache_core::{AppConfig, CacheStore, Error};

use crate::tools::cache::{
    CacheDeleteParams, CacheGetParams, CacheListParams, CacheSyncParams, delete_impl, get_impl, list_impl, sync_impl,
};
use crate::tools::get_document::{GetFigmaDataParams, get_document_impl};

/// The main MCP server handler for mcp-figma.
#[derive(Clone)]
pub struct FigmaCacheServer {
    config: AppConfig,
    store: Arc<dyn CacheStore>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl FigmaCacheServer {
    /// Create a new server handler.
    pub fn new(config: AppConfig, store: Arc<dyn CacheStore>) -> Self {
        Self { config, store, tool_router: Self::tool_router() }
    }

    /// Build a Figma API client from the loaded configuration.
    ///
    /// The token is validated lazily so the server can start (and serve
    /// cache-only tools) without one.
    fn figma_client(&self) -> Result<FigmaClient, McpError> {
        let token = self
            .config
            .require_figma_token()
            .map_err(|e| Error::InvalidInput(e.to_string()))?;

        FigmaClient::new(FigmaConfig {
            token: token.to_string(),
            base_url: self.config.api_base_url.clone(),
            timeout: self.config.timeout(),
            user_agent: self.config.user_agent.clone(),
        })
        .map_err(|e| Error::from(e).into())
    }

    /// Get comprehensive Figma file data, served from the local cache when possible.
    #[tool(description = "Get Figma file data including layout, content, visuals, and component information. \
                          Served from the local cache; set force_refresh to re-fetch from the Figma API.")]
    async fn get_figma_data(&self, params: Parameters<GetFigmaDataParams>) -> Result<CallToolResult, McpError> {
        let client = self.figma_client()?;
        get_document_impl(self.store.as_ref(), &client, params.0).await
    }

    /// List cached entries.
    #[tool(description = "List cached Figma documents (metadata only, newest update first).")]
    async fn cache_list(&self, params: Parameters<CacheListParams>) -> Result<CallToolResult, McpError> {
        list_impl(self.store.as_ref(), params.0).await
    }

    /// Read one cached entry in full.
    #[tool(description = "Read a cached Figma document by file key and optional node id, payload included.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(self.store.as_ref(), params.0).await
    }

    /// Delete one cached entry.
    #[tool(description = "Delete a cached Figma document by file key and optional node id.")]
    async fn cache_delete(&self, params: Parameters<CacheDeleteParams>) -> Result<CallToolResult, McpError> {
        delete_impl(self.store.as_ref(), params.0).await
    }

    /// Re-fetch one cached entry from the Figma API.
    #[tool(description = "Force-refresh an existing cache entry from the Figma API, reusing its stored depth.")]
    async fn cache_sync(&self, params: Parameters<CacheSyncParams>) -> Result<CallToolResult, McpError> {
        let client = self.figma_client()?;
        sync_impl(self.store.as_ref(), &client, params.0).await
    }
}

impl ServerHandler for FigmaCacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-figma".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
