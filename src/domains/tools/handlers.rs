//! Tool handler traits.
//!
//! Tools are written against the typed [`ToolDefinition`] trait. The registry
//! stores them behind the object-safe [`ToolHandler`] trait so that every
//! entry can be invoked with a raw, already validated argument record.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::contract::InputContract;
use super::error::ToolError;

/// Successful output of a tool.
///
/// Converting into a [`CallToolResult`] always yields `isError: false`;
/// failures travel as [`ToolError`] instead.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Content blocks returned to the caller.
    pub content: Vec<Content>,

    /// Optional machine-readable form of the same result.
    pub structured: Option<Value>,
}

impl ToolOutput {
    /// Output made of a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text.into())],
            structured: None,
        }
    }

    /// Attach structured content.
    pub fn with_structured(mut self, structured: Value) -> Self {
        self.structured = Some(structured);
        self
    }
}

impl From<ToolOutput> for CallToolResult {
    fn from(output: ToolOutput) -> Self {
        CallToolResult {
            content: output.content,
            structured_content: output.structured,
            is_error: Some(false),
            meta: None,
        }
    }
}

/// A typed tool implementation.
///
/// `Params` is decoded from the argument record only after the record has
/// passed validation against [`ToolDefinition::contract`].
#[async_trait]
pub trait ToolDefinition: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Typed, validated input.
    type Params: DeserializeOwned + Send + 'static;

    /// The declared input contract.
    fn contract() -> InputContract;

    /// JSON Schema of the structured output, if the tool produces one.
    fn output_schema() -> Option<Arc<JsonObject>> {
        None
    }

    /// Execute the tool logic.
    async fn execute(&self, params: Self::Params) -> Result<ToolOutput, ToolError>;
}

/// Object-safe handler stored in the registry.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Run the handler with a validated argument record.
    async fn call(&self, arguments: JsonObject) -> Result<ToolOutput, ToolError>;
}

/// Adapts a [`ToolDefinition`] to the [`ToolHandler`] interface.
pub(crate) struct TypedHandler<T>(pub(crate) T);

#[async_trait]
impl<T: ToolDefinition> ToolHandler for TypedHandler<T> {
    async fn call(&self, arguments: JsonObject) -> Result<ToolOutput, ToolError> {
        let params: T::Params =
            serde_json::from_value(Value::Object(arguments)).map_err(|e| {
                ToolError::execution_failed(format!(
                    "Failed to decode arguments for '{}': {}",
                    T::NAME,
                    e
                ))
            })?;
        self.0.execute(params).await
    }
}
