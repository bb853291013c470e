//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are named operations with a typed input contract that MCP clients
//! invoke with an argument record.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `contract.rs` - Input contracts and argument validation
//! - `handlers.rs` - Typed and type-erased handler traits
//! - `registry.rs` - Tool registry and the startup catalogue
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Implement `ToolDefinition` (name, contract, params, `execute()`)
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `build_tool_registry()`

pub mod contract;
pub mod definitions;
mod error;
mod handlers;
mod registry;

pub use contract::{FieldKind, FieldSpec, FieldViolation, InputContract, ValidationReport};
pub use error::ToolError;
pub use handlers::{ToolDefinition, ToolHandler, ToolOutput};
pub use registry::{ToolEntry, ToolRegistry, build_tool_registry};
