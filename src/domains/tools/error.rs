//! Tool-specific error types.

use thiserror::Error;

use super::contract::ValidationReport;

/// Errors that can occur during tool registration and invocation.
///
/// None of these escape the dispatch engine: each is turned into a
/// `CallToolResult` with `isError: true`.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    Duplicate(String),

    /// The arguments did not satisfy the tool's input contract.
    #[error("Invalid arguments for tool '{tool}': {report}")]
    InvalidArguments {
        tool: String,
        report: ValidationReport,
    },

    /// The input stream or file could not be opened.
    #[error("Input unavailable: {path}: {source}")]
    InputUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An external service call failed (network, status or decoding).
    #[error("Remote service error: {0}")]
    RemoteService(String),

    /// The tool execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(tool: impl Into<String>, report: ValidationReport) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            report,
        }
    }

    /// Create a new "input unavailable" error.
    pub fn input_unavailable(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::InputUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a new "remote service" error.
    pub fn remote_service(msg: impl Into<String>) -> Self {
        Self::RemoteService(msg.into())
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Stable label for logs and structured error data.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "unknown_tool",
            Self::Duplicate(_) => "duplicate_capability",
            Self::InvalidArguments { .. } => "validation",
            Self::InputUnavailable { .. } => "input_unavailable",
            Self::RemoteService(_) => "remote_service",
            Self::ExecutionFailed(_) => "handler_execution",
        }
    }
}
