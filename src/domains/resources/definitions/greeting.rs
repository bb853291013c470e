//! Personalised greeting resource (templated).

use async_trait::async_trait;
use rmcp::model::ResourceContents;

use super::ResourceDefinition;
use crate::domains::resources::error::ResourceError;
use crate::domains::resources::handlers::text_contents;
use crate::domains::resources::template::Bindings;

/// Greeting addressed by `greeting://{name}`.
pub struct GreetingResource;

#[async_trait]
impl ResourceDefinition for GreetingResource {
    const URI: &'static str = "greeting://{name}";
    const NAME: &'static str = "greeting";
    const DESCRIPTION: &'static str = "A personalised welcome message for the given name";
    const MIME_TYPE: &'static str = "text/plain";

    async fn read(
        &self,
        uri: &str,
        bindings: &Bindings,
    ) -> Result<Vec<ResourceContents>, ResourceError> {
        let name = bindings
            .get("name")
            .ok_or_else(|| ResourceError::execution_failed("missing 'name' in greeting URI"))?;

        Ok(vec![text_contents(
            uri,
            Self::MIME_TYPE,
            format!("Hello, {}! Welcome to the MCP server.", name),
        )])
    }
}
