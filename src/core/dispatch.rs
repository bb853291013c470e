//! Dispatch engine.
//!
//! Resolves incoming tool calls and resource reads against the
//! [`CapabilityRegistry`], validates arguments, runs the handler and turns
//! every outcome into a response envelope. Handler failures (including
//! panics) stop here and never reach the transport loop.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::{
    CallToolResult, Content, JsonObject, ReadResourceResult, Resource, ResourceTemplate, Tool,
};
use tracing::{debug, instrument, warn};

use super::registry::CapabilityRegistry;
use crate::domains::resources::ResourceError;
use crate::domains::tools::{ToolError, ToolOutput};

/// Routes requests to registered capabilities.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<CapabilityRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Tool metadata in registration order.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.tools().tools()
    }

    /// Literal resources in registration order.
    pub fn list_resources(&self) -> Vec<Resource> {
        self.registry.resources().resources()
    }

    /// Resource templates in registration order.
    pub fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.registry.resources().resource_templates()
    }

    /// Invoke a tool and wrap the outcome.
    ///
    /// Always yields a result: failures come back with `isError: true` and
    /// one text block describing the problem.
    #[instrument(skip(self, arguments))]
    pub async fn invoke_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        match self.run_tool(name, arguments.unwrap_or_default()).await {
            Ok(output) => {
                debug!("Tool '{}' succeeded", name);
                output.into()
            }
            Err(err) => {
                warn!(kind = err.kind(), "Tool '{}' failed: {}", name, err);
                CallToolResult::error(vec![Content::text(err.to_string())])
            }
        }
    }

    async fn run_tool(&self, name: &str, arguments: JsonObject) -> Result<ToolOutput, ToolError> {
        let entry = self.registry.tools().resolve(name)?;

        entry
            .contract()
            .validate(&arguments)
            .map_err(|report| ToolError::invalid_arguments(name, report))?;

        AssertUnwindSafe(entry.call(arguments))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(ToolError::execution_failed(format!(
                    "tool '{}' panicked: {}",
                    name,
                    panic_message(panic.as_ref())
                )))
            })
    }

    /// Read a resource by URI.
    ///
    /// Literal URIs win over templates; among templates the first registered
    /// match is used.
    #[instrument(skip(self))]
    pub async fn invoke_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let result = self.read_resource(uri).await;
        if let Err(err) = &result {
            warn!(kind = err.kind(), "Resource '{}' failed: {}", uri, err);
        }
        result
    }

    async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let resolved = self.registry.resources().resolve(uri)?;
        debug!(
            "Resolved '{}' to resource '{}'",
            uri,
            resolved.entry.name()
        );

        let contents = AssertUnwindSafe(resolved.entry.read(uri, &resolved.bindings))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(ResourceError::execution_failed(format!(
                    "resource '{}' panicked: {}",
                    uri,
                    panic_message(panic.as_ref())
                )))
            })?;

        Ok(ReadResourceResult { contents })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rmcp::model::{RawContent, ResourceContents};
    use serde_json::json;

    use crate::core::config::Config;
    use crate::domains::resources::{Bindings, ResourceDefinition, ResourceRegistry, text_contents};
    use crate::domains::tools::definitions::weather::{Coordinates, CurrentWeather};
    use crate::domains::tools::definitions::{AddTool, WeatherService};
    use crate::domains::tools::{InputContract, ToolEntry, ToolHandler, ToolRegistry};

    struct OfflineWeather;

    #[async_trait]
    impl WeatherService for OfflineWeather {
        async fn geocode(&self, _place: &str) -> Result<Option<Coordinates>, ToolError> {
            Err(ToolError::remote_service("network unreachable"))
        }

        async fn current_weather(&self, _at: Coordinates) -> Result<CurrentWeather, ToolError> {
            Err(ToolError::remote_service("network unreachable"))
        }
    }

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl ToolHandler for Counting {
        async fn call(&self, _arguments: JsonObject) -> Result<ToolOutput, ToolError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(ToolOutput::text("called"))
        }
    }

    struct Panicking;

    #[async_trait]
    impl ToolHandler for Panicking {
        async fn call(&self, _arguments: JsonObject) -> Result<ToolOutput, ToolError> {
            panic!("boom");
        }
    }

    struct PanickingResource;

    #[async_trait]
    impl ResourceDefinition for PanickingResource {
        const URI: &'static str = "broken://{id}";
        const NAME: &'static str = "broken";
        const DESCRIPTION: &'static str = "always panics";
        const MIME_TYPE: &'static str = "text/plain";

        async fn read(
            &self,
            _uri: &str,
            _bindings: &Bindings,
        ) -> Result<Vec<ResourceContents>, ResourceError> {
            panic!("resource exploded");
        }
    }

    struct Admin;

    #[async_trait]
    impl ResourceDefinition for Admin {
        const URI: &'static str = "greeting://admin";
        const NAME: &'static str = "admin";
        const DESCRIPTION: &'static str = "literal greeting";
        const MIME_TYPE: &'static str = "text/plain";

        async fn read(
            &self,
            uri: &str,
            _bindings: &Bindings,
        ) -> Result<Vec<ResourceContents>, ResourceError> {
            Ok(vec![text_contents(uri, Self::MIME_TYPE, "admin console")])
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut config = Config::default();
        config.server.name = "test-server".to_string();
        let registry = CapabilityRegistry::with_weather(&config, Arc::new(OfflineWeather)).unwrap();
        Dispatcher::new(Arc::new(registry))
    }

    fn args(value: serde_json::Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    fn text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(t) => &t.text,
            _ => panic!("Expected text content"),
        }
    }

    fn resource_text(result: &ReadResourceResult) -> &str {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text,
            _ => panic!("Expected text contents"),
        }
    }

    #[tokio::test]
    async fn test_add_success() {
        let result = dispatcher()
            .invoke_tool("add", args(json!({"a": 2, "b": 3})))
            .await;
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text(&result), "2 + 3 = 5");
    }

    #[tokio::test]
    async fn test_pure_tools_are_idempotent() {
        let dispatcher = dispatcher();
        for (name, arguments) in [
            ("add", json!({"a": 1.5, "b": -4})),
            ("multiply", json!({"x": 6, "y": 7})),
            ("greetmsg", json!({"x": "Ada"})),
        ] {
            let first = dispatcher.invoke_tool(name, args(arguments.clone())).await;
            let second = dispatcher.invoke_tool(name, args(arguments)).await;
            assert_eq!(first.is_error, Some(false));
            assert_eq!(text(&first), text(&second), "{name}");
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_envelope() {
        let result = dispatcher()
            .invoke_tool("subtract", args(json!({"a": 1, "b": 2})))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("subtract"));
    }

    #[tokio::test]
    async fn test_validation_failure_names_fields() {
        let result = dispatcher()
            .invoke_tool("add", args(json!({"a": "two"})))
            .await;
        assert_eq!(result.is_error, Some(true));
        let message = text(&result);
        assert!(message.contains("'a' expected number, received string"));
        assert!(message.contains("'b' is required"));
    }

    #[tokio::test]
    async fn test_missing_arguments_treated_as_empty_record() {
        let result = dispatcher().invoke_tool("greetmsg", None).await;
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("'x' is required"));
    }

    #[tokio::test]
    async fn test_handler_not_invoked_on_validation_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut tools = ToolRegistry::new();
        tools
            .register_entry(ToolEntry::new(
                "count",
                "counts invocations",
                InputContract::new().number("n", "any number"),
                Box::new(Counting(calls.clone())),
            ))
            .unwrap();
        let dispatcher = Dispatcher::new(Arc::new(CapabilityRegistry::new(
            tools,
            ResourceRegistry::new(),
        )));

        let result = dispatcher
            .invoke_tool("count", args(json!({"n": "seven"})))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let result = dispatcher.invoke_tool("count", args(json!({"n": 7}))).await;
        assert_eq!(result.is_error, Some(false));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_handler_is_contained() {
        let mut tools = ToolRegistry::new();
        tools
            .register_entry(ToolEntry::new(
                "explode",
                "always panics",
                InputContract::new(),
                Box::new(Panicking),
            ))
            .unwrap();
        tools.register(AddTool).unwrap();
        let dispatcher = Dispatcher::new(Arc::new(CapabilityRegistry::new(
            tools,
            ResourceRegistry::new(),
        )));

        let result = dispatcher.invoke_tool("explode", None).await;
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("boom"));

        let result = dispatcher
            .invoke_tool("add", args(json!({"a": 1, "b": 1})))
            .await;
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_remote_failure_is_error_envelope() {
        let result = dispatcher()
            .invoke_tool("get-weather", args(json!({"city": "Paris"})))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("network unreachable"));
    }

    #[tokio::test]
    async fn test_missing_file_is_error_envelope() {
        let result = dispatcher()
            .invoke_tool(
                "process-large-file",
                args(json!({"filePath": "/definitely/not/here.txt"})),
            )
            .await;
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("/definitely/not/here.txt"));
    }

    #[tokio::test]
    async fn test_read_literal_resource() {
        let result = dispatcher().invoke_resource("info://server").await.unwrap();
        let body = resource_text(&result);
        assert!(body.contains("test-server"));
        assert!(body.contains("process-large-file"));
    }

    #[tokio::test]
    async fn test_read_templated_resource() {
        let result = dispatcher()
            .invoke_resource("greeting://Grace Hopper")
            .await
            .unwrap();
        assert_eq!(
            resource_text(&result),
            "Hello, Grace Hopper! Welcome to the MCP server."
        );
        match &result.contents[0] {
            ResourceContents::TextResourceContents { uri, .. } => {
                assert_eq!(uri, "greeting://Grace Hopper")
            }
            _ => panic!("Expected text contents"),
        }
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let err = dispatcher()
            .invoke_resource("nothing://here")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unknown_resource");
    }

    #[tokio::test]
    async fn test_literal_resource_beats_template() {
        let mut resources = ResourceRegistry::new();
        resources
            .register(crate::domains::resources::definitions::GreetingResource)
            .unwrap();
        resources.register(Admin).unwrap();
        let dispatcher = Dispatcher::new(Arc::new(CapabilityRegistry::new(
            ToolRegistry::new(),
            resources,
        )));

        let result = dispatcher.invoke_resource("greeting://admin").await.unwrap();
        assert_eq!(resource_text(&result), "admin console");

        let result = dispatcher.invoke_resource("greeting://guest").await.unwrap();
        assert_eq!(
            resource_text(&result),
            "Hello, guest! Welcome to the MCP server."
        );
    }

    #[tokio::test]
    async fn test_panicking_resource_is_contained() {
        let mut resources = ResourceRegistry::new();
        resources.register(PanickingResource).unwrap();
        let dispatcher = Dispatcher::new(Arc::new(CapabilityRegistry::new(
            ToolRegistry::new(),
            resources,
        )));

        let err = dispatcher.invoke_resource("broken://1").await.unwrap_err();
        assert_eq!(err.kind(), "handler_execution");
        assert!(err.to_string().contains("resource exploded"));
    }

    #[test]
    fn test_listings_follow_registration_order() {
        let dispatcher = dispatcher();
        let names: Vec<_> = dispatcher
            .list_tools()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names[0], "add");
        assert_eq!(names[5], "process-large-file");
        assert_eq!(dispatcher.list_resources()[0].uri, "info://server");
        assert_eq!(
            dispatcher.list_resource_templates()[0].uri_template,
            "greeting://{name}"
        );
    }
}
