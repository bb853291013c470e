//! Resource-specific error types.

use thiserror::Error;

/// Errors that can occur during resource registration and reads.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No literal URI or template matches the requested URI.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A resource with the same URI or template is already registered.
    #[error("Resource already registered: {0}")]
    Duplicate(String),

    /// The URI template could not be parsed.
    #[error("Invalid URI template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// The resource handler failed.
    #[error("Failed to read resource: {0}")]
    ExecutionFailed(String),
}

impl ResourceError {
    /// Create a new "not found" error.
    pub fn not_found(uri: impl Into<String>) -> Self {
        Self::NotFound(uri.into())
    }

    /// Create a new "invalid template" error.
    pub fn invalid_template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Stable label for logs and structured error data.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "unknown_resource",
            Self::Duplicate(_) => "duplicate_capability",
            Self::InvalidTemplate { .. } => "invalid_template",
            Self::ExecutionFailed(_) => "handler_execution",
        }
    }
}
