//! Resources domain module.
//!
//! Resources are read-only documents addressed by URI. A resource is either
//! bound to a literal URI or to a URI template whose placeholders are filled
//! in by the requested URI.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions (one file per resource)
//! - `template.rs` - URI template parsing and matching
//! - `handlers.rs` - Object-safe reader trait
//! - `registry.rs` - Central registration and URI resolution
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/` (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `build_resource_registry()`

pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod template;

pub use definitions::ResourceDefinition;
pub use error::ResourceError;
pub use handlers::{ResourceHandler, text_contents};
pub use registry::{
    ResolvedResource, ResourceAddress, ResourceEntry, ResourceRegistry, build_resource_registry,
};
pub use template::{Bindings, UriTemplate};
