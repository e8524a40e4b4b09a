//! Data models for infrastructure schemas.
//!
//! An [`InfrastructureSchema`] is produced once per generation request by the
//! upstream AI layer, handed to this core as parsed JSON, and treated as
//! immutable from then on. Resource and property maps are ordered so that
//! every consumer iterates them in a stable order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};

/// Deployment environments a project can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "staging" => Some(Environment::Staging),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Environment::Development,
            Environment::Staging,
            Environment::Production,
        ]
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kinds of infrastructure resources a schema can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Database,
    Compute,
    Cache,
    Storage,
    Network,
    Queue,
    Monitoring,
    Cdn,
    LoadBalancer,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Database => "database",
            ResourceType::Compute => "compute",
            ResourceType::Cache => "cache",
            ResourceType::Storage => "storage",
            ResourceType::Network => "network",
            ResourceType::Queue => "queue",
            ResourceType::Monitoring => "monitoring",
            ResourceType::Cdn => "cdn",
            ResourceType::LoadBalancer => "loadbalancer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "database" => Some(ResourceType::Database),
            "compute" => Some(ResourceType::Compute),
            "cache" => Some(ResourceType::Cache),
            "storage" => Some(ResourceType::Storage),
            "network" => Some(ResourceType::Network),
            "queue" => Some(ResourceType::Queue),
            "monitoring" => Some(ResourceType::Monitoring),
            "cdn" => Some(ResourceType::Cdn),
            "loadbalancer" => Some(ResourceType::LoadBalancer),
            _ => None,
        }
    }

    /// Parse a type name, failing on anything outside the closed set.
    pub fn parse(s: &str) -> SchemaResult<Self> {
        Self::from_str(s).ok_or_else(|| SchemaError::UnknownResourceType(s.to_string()))
    }

    pub fn all() -> Vec<Self> {
        vec![
            ResourceType::Database,
            ResourceType::Compute,
            ResourceType::Cache,
            ResourceType::Storage,
            ResourceType::Network,
            ResourceType::Queue,
            ResourceType::Monitoring,
            ResourceType::Cdn,
            ResourceType::LoadBalancer,
        ]
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported cloud providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
    Multi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
            Provider::Multi => "multi",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "aws" => Some(Provider::Aws),
            "azure" => Some(Provider::Azure),
            "gcp" => Some(Provider::Gcp),
            "multi" => Some(Provider::Multi),
            _ => None,
        }
    }

    /// Parse a provider name, failing on anything outside the closed set.
    pub fn parse(s: &str) -> SchemaResult<Self> {
        Self::from_str(s).ok_or_else(|| SchemaError::UnknownProvider(s.to_string()))
    }

    pub fn all() -> Vec<Self> {
        vec![Provider::Aws, Provider::Azure, Provider::Gcp, Provider::Multi]
    }

    /// Get the Terraform provider name. Multi-cloud schemas pin aws.
    pub fn terraform_provider(&self) -> &'static str {
        match self {
            Provider::Aws | Provider::Multi => "aws",
            Provider::Azure => "azurerm",
            Provider::Gcp => "google",
        }
    }

    /// Get default region for the provider.
    pub fn default_region(&self) -> &'static str {
        match self {
            Provider::Aws | Provider::Multi => "us-east-1",
            Provider::Azure => "eastus",
            Provider::Gcp => "us-central1",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Project-level metadata for a schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    /// Project name. Must be kebab-case (`^[a-z][a-z0-9-]*$`).
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl ProjectMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            environment: None,
            tags: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Advisory metadata the AI layer may attach to a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
}

/// One infrastructure resource in a schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub provider: Provider,
    /// Open key/value bag. Type-specific views with defaults live in
    /// [`crate::properties`].
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    /// Free-text provenance from the AI layer. Never affects behavior.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResourceMetadata>,
}

impl ResourceDefinition {
    pub fn new(resource_type: ResourceType, provider: Provider) -> Self {
        Self {
            resource_type,
            provider,
            properties: BTreeMap::new(),
            reasoning: None,
            depends_on: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.depends_on.push(name.into());
        self
    }
}

/// Root schema: a project plus its named resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureSchema {
    pub project: ProjectMetadata,
    pub resources: BTreeMap<String, ResourceDefinition>,
    /// Advisory only. Never consumed by rendering logic.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl InfrastructureSchema {
    pub fn new(project: ProjectMetadata) -> Self {
        Self {
            project,
            resources: BTreeMap::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn with_resource(mut self, name: impl Into<String>, resource: ResourceDefinition) -> Self {
        self.resources.insert(name.into(), resource);
        self
    }

    /// Parse a schema from already-decoded JSON.
    pub fn from_value(value: Value) -> SchemaResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse a schema from JSON text.
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The environment to generate for, defaulting to development.
    pub fn environment(&self) -> Environment {
        self.project.environment.unwrap_or_default()
    }
}

/// Validation outcome with details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_roundtrip() {
        for rt in ResourceType::all() {
            assert_eq!(ResourceType::from_str(rt.as_str()), Some(rt));
        }
        assert_eq!(ResourceType::from_str("loadbalancer"), Some(ResourceType::LoadBalancer));
        assert_eq!(ResourceType::from_str("mainframe"), None);
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert!(matches!(
            ResourceType::parse("mainframe"),
            Err(SchemaError::UnknownResourceType(_))
        ));
        assert!(matches!(
            Provider::parse("ibm"),
            Err(SchemaError::UnknownProvider(_))
        ));
        assert_eq!(Provider::parse("gcp").unwrap(), Provider::Gcp);
    }

    #[test]
    fn test_provider_defaults() {
        assert_eq!(Provider::Aws.default_region(), "us-east-1");
        assert_eq!(Provider::Azure.terraform_provider(), "azurerm");
        assert_eq!(Provider::Multi.terraform_provider(), "aws");
    }

    #[test]
    fn test_schema_from_json_camel_case() {
        let schema = InfrastructureSchema::from_json(
            r#"{
                "project": {"name": "acme-api", "description": "demo"},
                "resources": {
                    "db": {"type": "database", "provider": "aws", "properties": {"storage": 20}},
                    "api": {"type": "compute", "provider": "aws", "dependsOn": ["db"]}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(schema.project.name, "acme-api");
        assert_eq!(schema.resources.len(), 2);
        assert_eq!(schema.resources["api"].depends_on, vec!["db"]);
        assert_eq!(schema.resources["db"].resource_type, ResourceType::Database);
    }

    #[test]
    fn test_validation_result_merge() {
        let mut result = ValidationResult::new();
        result.add_warning("minor");
        assert!(result.valid);

        let mut other = ValidationResult::new();
        other.add_error("fatal");
        result.merge(other);

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.warnings.len(), 1);
    }
}
