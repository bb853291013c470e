//! MCP Server Library
//!
//! A small Model Context Protocol (MCP) server exposing schema-validated tools
//! and URI-addressed resources over STDIO (or HTTP with the `http` feature).
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the capability registry, the
//!   dispatch engine, the MCP server handler and transports
//! - **domains**: the capabilities themselves
//!   - **tools**: `add`, `multiply`, `greetmsg`, `get-weather`,
//!     `debug-example`, `process-large-file`
//!   - **resources**: `info://server` and `greeting://{name}`
//!
//! # Example
//!
//! ```rust,no_run
//! use first_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
