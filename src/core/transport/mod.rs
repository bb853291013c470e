//! Transport layer for the MCP server.
//!
//! - **STDIO**: newline-delimited JSON-RPC on stdin/stdout (default) - feature: `stdio`
//! - **HTTP**: JSON-RPC over POST requests - feature: `http`
//!
//! Both transports hand every request to the same dispatcher. Diagnostics
//! always go to stderr so they never mix with protocol traffic.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
