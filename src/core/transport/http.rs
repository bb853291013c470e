//! HTTP transport implementation.
//!
//! JSON-RPC over POST, answered statelessly: every request gets exactly one
//! JSON-RPC response produced by the same dispatcher the STDIO transport uses.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rmcp::ServerHandler;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use super::{TransportConfig, TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::server::resource_error_to_mcp;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    fn simple_error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self::error(
            id,
            JsonRpcError {
                code,
                message: message.into(),
                data: None,
            },
        )
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::simple_error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::simple_error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::simple_error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::simple_error(id, -32603, msg)
    }

    /// Serialize `result` into a success response.
    fn from_serializable<T: Serialize>(id: Option<Value>, result: T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self::success(id, value),
            Err(e) => Self::internal_error(id, format!("Failed to encode result: {}", e)),
        }
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    server: McpServer,
    rpc_path: String,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Create from TransportConfig (extracts HTTP config).
    pub fn from_transport_config(config: &TransportConfig) -> Option<Self> {
        match config {
            TransportConfig::Http(http_config) => Some(Self::new(http_config.clone())),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the router serving the JSON-RPC endpoint.
    pub fn router(&self, server: McpServer) -> Router {
        let state = AppState {
            server,
            rpc_path: self.config.rpc_path.clone(),
        };

        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "rpc": state.rpc_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0"
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    match process_request(&state.server, request).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Process a JSON-RPC message. Notifications yield no response.
pub async fn process_request(server: &McpServer, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::invalid_request(request.id));
    }

    let id = request.id;
    let params = request.params;
    let dispatcher = server.dispatcher();

    let response = match request.method.as_str() {
        "initialize" => {
            info!("Processing initialize request");
            JsonRpcResponse::from_serializable(id, server.get_info())
        }

        "ping" => JsonRpcResponse::success(id, serde_json::json!({})),

        "tools/list" => JsonRpcResponse::from_serializable(
            id,
            serde_json::json!({ "tools": dispatcher.list_tools() }),
        ),

        "tools/call" => {
            let Some(name) = params.as_ref().and_then(|p| p.get("name")).and_then(Value::as_str)
            else {
                return Some(JsonRpcResponse::invalid_params(id, "Missing tool name"));
            };
            let arguments = match params.as_ref().and_then(|p| p.get("arguments")) {
                None | Some(Value::Null) => None,
                Some(Value::Object(map)) => Some(map.clone()),
                Some(_) => {
                    return Some(JsonRpcResponse::invalid_params(
                        id,
                        "Tool arguments must be an object",
                    ));
                }
            };
            let result = dispatcher.invoke_tool(name, arguments).await;
            JsonRpcResponse::from_serializable(id, result)
        }

        "resources/list" => JsonRpcResponse::from_serializable(
            id,
            serde_json::json!({ "resources": dispatcher.list_resources() }),
        ),

        "resources/templates/list" => JsonRpcResponse::from_serializable(
            id,
            serde_json::json!({ "resourceTemplates": dispatcher.list_resource_templates() }),
        ),

        "resources/read" => {
            let Some(uri) = params.as_ref().and_then(|p| p.get("uri")).and_then(Value::as_str)
            else {
                return Some(JsonRpcResponse::invalid_params(id, "Missing resource URI"));
            };
            match dispatcher.invoke_resource(uri).await {
                Ok(result) => JsonRpcResponse::from_serializable(id, result),
                Err(e) => {
                    let error = resource_error_to_mcp(&e);
                    JsonRpcResponse::error(
                        id,
                        JsonRpcError {
                            code: error.code.0,
                            message: error.message.to_string(),
                            data: error.data,
                        },
                    )
                }
            }
        }

        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", method);
            return None;
        }

        method => {
            warn!("Unknown method: {}", method);
            JsonRpcResponse::method_not_found(id)
        }
    };

    Some(response)
}
