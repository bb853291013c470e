//! Tool Registry - central registration and lookup for all tools.
//!
//! This module provides:
//! - The registry of tool entries, keyed by name
//! - `build_tool_registry()`, the fixed startup catalogue
//! - Tool metadata for listing
//!
//! The registry is filled once at startup and only read afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use tracing::info;

use super::contract::InputContract;
use super::definitions::{
    AddTool, DebugExampleTool, GreetTool, MultiplyTool, ProcessLargeFileTool, WeatherService,
    WeatherTool,
};
use super::error::ToolError;
use super::handlers::{ToolDefinition, ToolHandler, ToolOutput, TypedHandler};

// ============================================================================
// Tool Entry
// ============================================================================

/// A registered tool: name, contract and the handler that owns its logic.
pub struct ToolEntry {
    name: String,
    description: String,
    contract: InputContract,
    output_schema: Option<Arc<JsonObject>>,
    handler: Box<dyn ToolHandler>,
}

impl ToolEntry {
    /// Build an entry from its raw parts.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        contract: InputContract,
        handler: Box<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            contract,
            output_schema: None,
            handler,
        }
    }

    /// Build an entry from a typed tool definition.
    pub fn from_definition<T: ToolDefinition>(tool: T) -> Self {
        Self {
            name: T::NAME.to_string(),
            description: T::DESCRIPTION.to_string(),
            contract: T::contract(),
            output_schema: T::output_schema(),
            handler: Box::new(TypedHandler(tool)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn contract(&self) -> &InputContract {
        &self.contract
    }

    /// Run the handler. Arguments must already satisfy the contract.
    pub async fn call(&self, arguments: JsonObject) -> Result<ToolOutput, ToolError> {
        self.handler.call(arguments).await
    }

    /// Create a Tool model for this entry (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: self.contract.to_json_schema(),
            annotations: None,
            output_schema: self.output_schema.clone(),
            icons: None,
            meta: None,
            title: None,
        }
    }
}

impl std::fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolEntry")
            .field("name", &self.name)
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// Tools are kept in registration order; names are unique.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed tool definition.
    pub fn register<T: ToolDefinition>(&mut self, tool: T) -> Result<(), ToolError> {
        self.register_entry(ToolEntry::from_definition(tool))
    }

    /// Register a prepared entry.
    ///
    /// Fails with [`ToolError::Duplicate`] if the name is already taken.
    pub fn register_entry(&mut self, entry: ToolEntry) -> Result<(), ToolError> {
        if self.index.contains_key(entry.name()) {
            return Err(ToolError::Duplicate(entry.name().to_string()));
        }

        info!("Registering tool: {}", entry.name());
        self.index.insert(entry.name().to_string(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Result<&ToolEntry, ToolError> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| ToolError::not_found(name))
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.entries.iter().map(ToolEntry::name).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn tools(&self) -> Vec<Tool> {
        self.entries.iter().map(ToolEntry::to_tool).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the registry holding the server's fixed tool catalogue.
pub fn build_tool_registry(weather: Arc<dyn WeatherService>) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register(AddTool)?;
    registry.register(MultiplyTool)?;
    registry.register(GreetTool)?;
    registry.register(WeatherTool::new(weather))?;
    registry.register(DebugExampleTool)?;
    registry.register(ProcessLargeFileTool)?;
    Ok(registry)
}
