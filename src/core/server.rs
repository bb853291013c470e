//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating every capability request to the [`Dispatcher`].
//!
//! Adding a tool or resource never requires touching this file: register it
//! in `build_tool_registry()` or `build_resource_registry()` instead.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::dispatch::Dispatcher;
use super::error::Result;
use super::registry::CapabilityRegistry;
use crate::domains::resources::ResourceError;

/// The main MCP server handler.
///
/// Cloning is cheap; clones share the configuration and the registry.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Request router over the immutable capability registry.
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a new MCP server, building the capability registry from `config`.
    pub fn new(config: Config) -> Result<Self> {
        let registry = CapabilityRegistry::from_config(&config)?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a server around a prepared registry.
    pub fn with_registry(config: Config, registry: CapabilityRegistry) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(Arc::new(registry)),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The dispatch engine shared by every transport.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

/// Encode a resource failure as a JSON-RPC error.
pub fn resource_error_to_mcp(err: &ResourceError) -> McpError {
    let data = Some(serde_json::json!({ "isError": true, "kind": err.kind() }));
    match err {
        ResourceError::NotFound(_) => McpError::resource_not_found(err.to_string(), data),
        _ => McpError::internal_error(err.to_string(), data),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "A small MCP server with arithmetic, greeting, weather and file analysis tools, \
                 plus server info and greeting resources."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.dispatcher.list_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        Ok(self
            .dispatcher
            .invoke_tool(&request.name, request.arguments)
            .await)
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        Ok(ListResourcesResult {
            resources: self.dispatcher.list_resources(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        Ok(ListResourceTemplatesResult {
            resource_templates: self.dispatcher.list_resource_templates(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.dispatcher
            .invoke_resource(&request.uri)
            .await
            .map_err(|e| resource_error_to_mcp(&e))
    }
}
