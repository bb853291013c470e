//! Server info resource definition.

use async_trait::async_trait;
use rmcp::model::ResourceContents;

use super::ResourceDefinition;
use crate::domains::resources::error::ResourceError;
use crate::domains::resources::handlers::text_contents;
use crate::domains::resources::template::Bindings;

/// Server information resource (static text built at startup).
pub struct ServerInfoResource {
    text: String,
}

impl ServerInfoResource {
    /// Describe the server and the tools it offers.
    pub fn new(name: &str, version: &str, tools: &[&str]) -> Self {
        Self {
            text: format!(
                "This is {}, my first MCP server!\nVersion: {}\nTools: {}",
                name,
                version,
                tools.join(", ")
            ),
        }
    }
}

#[async_trait]
impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "info://server";
    const NAME: &'static str = "server-info";
    const DESCRIPTION: &'static str = "Information about this MCP server";
    const MIME_TYPE: &'static str = "text/plain";

    async fn read(
        &self,
        uri: &str,
        _bindings: &Bindings,
    ) -> Result<Vec<ResourceContents>, ResourceError> {
        Ok(vec![text_contents(uri, Self::MIME_TYPE, self.text.clone())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_info_read() {
        let resource = ServerInfoResource::new("my-first-server", "1.0.0", &["add", "multiply"]);
        let contents = ResourceDefinition::read(&resource, "info://server", &Bindings::new())
            .await
            .unwrap();

        match &contents[0] {
            ResourceContents::TextResourceContents { uri, text, .. } => {
                assert_eq!(uri, "info://server");
                assert!(text.contains("my-first-server"));
                assert!(text.contains("Version: 1.0.0"));
                assert!(text.contains("Tools: add, multiply"));
            }
            _ => panic!("Expected text contents"),
        }
    }
}
