//! Resource handler trait.
//!
//! The registry stores resources behind [`ResourceHandler`], which receives
//! the full requested URI together with the placeholder bindings extracted by
//! template matching (empty for literal resources).

use async_trait::async_trait;
use rmcp::model::ResourceContents;

use super::definitions::ResourceDefinition;
use super::error::ResourceError;
use super::template::Bindings;

/// Object-safe resource reader stored in the registry.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Produce the contents for `uri`.
    async fn read(
        &self,
        uri: &str,
        bindings: &Bindings,
    ) -> Result<Vec<ResourceContents>, ResourceError>;
}

#[async_trait]
impl<T: ResourceDefinition> ResourceHandler for T {
    async fn read(
        &self,
        uri: &str,
        bindings: &Bindings,
    ) -> Result<Vec<ResourceContents>, ResourceError> {
        ResourceDefinition::read(self, uri, bindings).await
    }
}

/// Build a text content item carrying the requested URI.
pub fn text_contents(
    uri: &str,
    mime_type: &str,
    text: impl Into<String>,
) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(mime_type.to_string()),
        text: text.into(),
        meta: None,
    }
}
