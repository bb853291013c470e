//! Resource Registry - central registration and URI resolution.
//!
//! Resources are addressed either by a literal URI (`info://server`) or by a
//! URI template (`greeting://{name}`). Resolution tries literal URIs first and
//! then templates in registration order, so the first registered template that
//! matches wins.

use std::collections::HashMap;

use rmcp::model::{
    AnnotateAble, RawResource, RawResourceTemplate, Resource, ResourceContents, ResourceTemplate,
};
use tracing::info;

use super::definitions::{GreetingResource, ResourceDefinition, ServerInfoResource};
use super::error::ResourceError;
use super::handlers::ResourceHandler;
use super::template::{Bindings, UriTemplate};

// ============================================================================
// Resource Entry
// ============================================================================

/// How a resource is addressed.
#[derive(Debug, Clone)]
pub enum ResourceAddress {
    Literal(String),
    Template(UriTemplate),
}

impl ResourceAddress {
    /// Parse a URI or URI template.
    pub fn parse(raw: &str) -> Result<Self, ResourceError> {
        if UriTemplate::is_template(raw) {
            Ok(Self::Template(UriTemplate::parse(raw)?))
        } else {
            Ok(Self::Literal(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(uri) => uri,
            Self::Template(template) => template.as_str(),
        }
    }
}

/// A registered resource: address, metadata and reader.
pub struct ResourceEntry {
    address: ResourceAddress,
    name: String,
    description: String,
    mime_type: String,
    handler: Box<dyn ResourceHandler>,
}

impl ResourceEntry {
    /// Build an entry from a resource definition.
    pub fn from_definition<R: ResourceDefinition>(resource: R) -> Result<Self, ResourceError> {
        Ok(Self {
            address: ResourceAddress::parse(R::URI)?,
            name: R::NAME.to_string(),
            description: R::DESCRIPTION.to_string(),
            mime_type: R::MIME_TYPE.to_string(),
            handler: Box::new(resource),
        })
    }

    pub fn address(&self) -> &ResourceAddress {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the resource for a concrete URI.
    pub async fn read(
        &self,
        uri: &str,
        bindings: &Bindings,
    ) -> Result<Vec<ResourceContents>, ResourceError> {
        self.handler.read(uri, bindings).await
    }

    fn to_resource(&self) -> Resource {
        let mut raw = RawResource::new(self.address.as_str(), self.name.clone());
        raw.description = Some(self.description.clone());
        raw.mime_type = Some(self.mime_type.clone());
        raw.no_annotation()
    }

    fn to_template(&self) -> ResourceTemplate {
        RawResourceTemplate {
            uri_template: self.address.as_str().to_string(),
            name: self.name.clone(),
            title: None,
            description: Some(self.description.clone()),
            mime_type: Some(self.mime_type.clone()),
        }
        .no_annotation()
    }
}

impl std::fmt::Debug for ResourceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceEntry")
            .field("address", &self.address)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A resolved read target.
#[derive(Debug)]
pub struct ResolvedResource<'a> {
    pub entry: &'a ResourceEntry,
    pub bindings: Bindings,
}

// ============================================================================
// Resource Registry
// ============================================================================

/// Resource registry - literal resources and templates, in registration order.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    literals: Vec<ResourceEntry>,
    index: HashMap<String, usize>,
    templates: Vec<ResourceEntry>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource definition.
    pub fn register<R: ResourceDefinition>(&mut self, resource: R) -> Result<(), ResourceError> {
        self.register_entry(ResourceEntry::from_definition(resource)?)
    }

    /// Register a prepared entry.
    ///
    /// Fails with [`ResourceError::Duplicate`] if the same URI or template
    /// string is already registered.
    pub fn register_entry(&mut self, entry: ResourceEntry) -> Result<(), ResourceError> {
        let key = entry.address.as_str().to_string();
        match entry.address {
            ResourceAddress::Literal(_) => {
                if self.index.contains_key(&key) {
                    return Err(ResourceError::Duplicate(key));
                }
                info!("Registering resource: {}", key);
                self.index.insert(key, self.literals.len());
                self.literals.push(entry);
            }
            ResourceAddress::Template(_) => {
                if self.templates.iter().any(|t| t.address.as_str() == key) {
                    return Err(ResourceError::Duplicate(key));
                }
                info!("Registering resource template: {}", key);
                self.templates.push(entry);
            }
        }
        Ok(())
    }

    /// Find the entry serving `uri`.
    pub fn resolve(&self, uri: &str) -> Result<ResolvedResource<'_>, ResourceError> {
        if let Some(&i) = self.index.get(uri) {
            return Ok(ResolvedResource {
                entry: &self.literals[i],
                bindings: Bindings::new(),
            });
        }

        self.templates
            .iter()
            .find_map(|entry| match &entry.address {
                ResourceAddress::Template(template) => template
                    .matches(uri)
                    .map(|bindings| ResolvedResource { entry, bindings }),
                ResourceAddress::Literal(_) => None,
            })
            .ok_or_else(|| ResourceError::not_found(uri))
    }

    /// Literal resources as listing metadata.
    pub fn resources(&self) -> Vec<Resource> {
        self.literals.iter().map(ResourceEntry::to_resource).collect()
    }

    /// Resource templates as listing metadata.
    pub fn resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates.iter().map(ResourceEntry::to_template).collect()
    }

    pub fn len(&self) -> usize {
        self.literals.len() + self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the registry holding the server's resources.
pub fn build_resource_registry(
    server_name: &str,
    version: &str,
    tool_names: &[&str],
) -> Result<ResourceRegistry, ResourceError> {
    let mut registry = ResourceRegistry::new();
    registry.register(ServerInfoResource::new(server_name, version, tool_names))?;
    registry.register(GreetingResource)?;
    Ok(registry)
}
