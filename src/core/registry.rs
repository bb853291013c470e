//! Capability registry: the tool and resource namespaces built at startup.

use std::sync::Arc;

use tracing::info;

use super::config::Config;
use super::error::Result;
use crate::domains::resources::{ResourceRegistry, build_resource_registry};
use crate::domains::tools::definitions::{OpenMeteoClient, WeatherService};
use crate::domains::tools::{ToolRegistry, build_tool_registry};

/// All capabilities offered by the server.
///
/// Built once during startup and shared read-only afterwards.
#[derive(Debug)]
pub struct CapabilityRegistry {
    tools: ToolRegistry,
    resources: ResourceRegistry,
}

impl CapabilityRegistry {
    /// Assemble a registry from prepared namespaces.
    pub fn new(tools: ToolRegistry, resources: ResourceRegistry) -> Self {
        Self { tools, resources }
    }

    /// Build the server's fixed catalogue from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let weather: Arc<dyn WeatherService> = Arc::new(OpenMeteoClient::new(&config.weather)?);
        Self::with_weather(config, weather)
    }

    /// Build the catalogue with a caller-supplied weather backend.
    pub fn with_weather(config: &Config, weather: Arc<dyn WeatherService>) -> Result<Self> {
        let tools = build_tool_registry(weather)?;
        let resources = build_resource_registry(
            &config.server.name,
            &config.server.version,
            &tools.tool_names(),
        )?;

        info!(
            "Registered {} tools and {} resources",
            tools.len(),
            resources.len()
        );

        Ok(Self::new(tools, resources))
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }
}
