//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, the capability registry and dispatch
//! engine, the MCP server handler, and the transport layer.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod server;
pub mod transport;

pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use registry::CapabilityRegistry;
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
