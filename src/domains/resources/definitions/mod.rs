//! Resource definitions module.
//!
//! Each resource is defined in its own file with:
//! - URI (literal or template) and metadata
//! - Content provider
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `build_resource_registry()`

use async_trait::async_trait;
use rmcp::model::ResourceContents;

use super::error::ResourceError;
use super::template::Bindings;

pub mod greeting;
pub mod server_info;

pub use greeting::GreetingResource;
pub use server_info::ServerInfoResource;

/// Trait for resource definitions.
///
/// Each resource must implement this trait to provide its metadata and content.
#[async_trait]
pub trait ResourceDefinition: Send + Sync + 'static {
    /// The URI of the resource, or a URI template such as `scheme://{name}`.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;

    /// Read the resource. `bindings` holds the template placeholders.
    async fn read(
        &self,
        uri: &str,
        bindings: &Bindings,
    ) -> Result<Vec<ResourceContents>, ResourceError>;
}
