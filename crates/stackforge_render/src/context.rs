//! Render options and the per-call context shared by all targets.

use std::collections::{BTreeMap, HashMap};

use stackforge_schema::{
    naming, CacheProperties, ComputeProperties, DatabaseProperties, DependencyGraph, Environment,
    InfrastructureSchema, LoadBalancerProperties, NetworkProperties, Provider, QueueProperties,
    ResourceDefinition, ResourceType, StorageProperties,
};

use crate::error::RenderResult;
use crate::files::RenderTarget;

/// Options controlling a single render call.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub target: RenderTarget,
    /// Overrides the schema's own environment when set.
    pub environment: Option<Environment>,
    pub include_comments: bool,
    pub include_monitoring: bool,
}

impl RenderOptions {
    pub fn new(target: RenderTarget) -> Self {
        Self {
            target,
            environment: None,
            include_comments: true,
            include_monitoring: false,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_comments(mut self, include_comments: bool) -> Self {
        self.include_comments = include_comments;
        self
    }

    pub fn with_monitoring(mut self, include_monitoring: bool) -> Self {
        self.include_monitoring = include_monitoring;
        self
    }
}

/// Everything a target module needs to emit files: the validated schema,
/// the deterministic resource ordering, merged tags, and variable-map
/// construction. Templates stay declarative; all derivation happens here.
pub struct RenderContext<'a> {
    pub schema: &'a InfrastructureSchema,
    pub options: &'a RenderOptions,
    graph: DependencyGraph,
    ordering: Vec<String>,
    environment: Environment,
    provider: Provider,
    tags: BTreeMap<String, String>,
}

impl<'a> RenderContext<'a> {
    /// Build a context for a validated schema. Fails only if a residual
    /// dependency cycle survived validation.
    pub fn new(schema: &'a InfrastructureSchema, options: &'a RenderOptions) -> RenderResult<Self> {
        let graph = DependencyGraph::from_schema(schema);
        let ordering = graph.topological_order()?;
        let environment = options.environment.unwrap_or_else(|| schema.environment());
        let provider = dominant_provider(schema);

        let mut tags = schema.project.tags.clone();
        tags.insert("Project".to_string(), schema.project.name.clone());
        tags.insert("Environment".to_string(), environment.as_str().to_string());
        tags.insert("ManagedBy".to_string(), "stackforge".to_string());

        Ok(Self {
            schema,
            options,
            graph,
            ordering,
            environment,
            provider,
            tags,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.schema.project.name
    }

    pub fn project_snake(&self) -> String {
        naming::snake_case(&self.schema.project.name)
    }

    pub fn project_pascal(&self) -> String {
        naming::pascal_case(&self.schema.project.name)
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Provider most resources declare; drives provider pins and regions.
    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn region(&self) -> &'static str {
        self.provider.default_region()
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Resources in topological order (dependencies first).
    pub fn ordered_resources(&self) -> impl Iterator<Item = (&String, &ResourceDefinition)> {
        self.ordering
            .iter()
            .filter_map(|name| self.schema.resources.get_key_value(name))
    }

    /// Resources of one type, in topological order.
    pub fn resources_of_type(
        &self,
        resource_type: ResourceType,
    ) -> Vec<(&String, &ResourceDefinition)> {
        self.ordered_resources()
            .filter(|(_, r)| r.resource_type == resource_type)
            .collect()
    }

    /// Project-level variables shared by scaffold templates.
    pub fn base_variables(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("project_name".to_string(), self.project_name().to_string());
        vars.insert("project_name_snake".to_string(), self.project_snake());
        vars.insert("project_name_pascal".to_string(), self.project_pascal());
        vars.insert(
            "project_description".to_string(),
            self.schema.project.description.clone(),
        );
        vars.insert(
            "environment".to_string(),
            self.environment.as_str().to_string(),
        );
        vars.insert("region".to_string(), self.region().to_string());
        vars
    }

    /// Variables for one resource: naming variants plus typed property
    /// values with defaults applied. Values are plain strings so templates
    /// stay free of business logic.
    pub fn resource_variables(
        &self,
        name: &str,
        resource: &ResourceDefinition,
    ) -> HashMap<String, String> {
        let mut vars = self.base_variables();
        vars.insert("resource_name".to_string(), naming::kebab_case(name));
        vars.insert("resource_name_snake".to_string(), naming::snake_case(name));
        vars.insert("resource_name_pascal".to_string(), naming::pascal_case(name));
        vars.insert(
            "resource_name_screaming".to_string(),
            naming::screaming_snake_case(name),
        );
        vars.insert(
            "resource_type".to_string(),
            resource.resource_type.as_str().to_string(),
        );

        match resource.resource_type {
            ResourceType::Database => {
                let props = DatabaseProperties::from_properties(&resource.properties);
                vars.insert("engine".to_string(), props.engine.clone());
                vars.insert("instance_tier".to_string(), props.instance_tier());
                vars.insert(
                    "allocated_storage".to_string(),
                    format_number(props.allocated_storage_gb),
                );
                vars.insert("multi_az".to_string(), props.multi_az.to_string());
            }
            ResourceType::Compute => {
                let props = ComputeProperties::from_properties(&resource.properties);
                vars.insert("instance_type".to_string(), props.instance_type.clone());
                vars.insert("instance_count".to_string(), props.count.to_string());
            }
            ResourceType::Cache => {
                let props = CacheProperties::from_properties(&resource.properties);
                vars.insert("engine".to_string(), props.engine.clone());
                vars.insert("node_type".to_string(), props.node_type.clone());
                vars.insert("num_nodes".to_string(), props.num_nodes.to_string());
            }
            ResourceType::Storage => {
                let props = StorageProperties::from_properties(&resource.properties);
                vars.insert("size_gb".to_string(), format_number(props.size_gb));
                vars.insert("versioning".to_string(), props.versioning.to_string());
            }
            ResourceType::Network => {
                let props = NetworkProperties::from_properties(&resource.properties);
                vars.insert("cidr_block".to_string(), props.cidr_block.clone());
            }
            ResourceType::Queue => {
                let props = QueueProperties::from_properties(&resource.properties);
                vars.insert("fifo".to_string(), props.fifo.to_string());
                // FIFO queue names must carry the .fifo suffix.
                vars.insert(
                    "fifo_suffix".to_string(),
                    if props.fifo { ".fifo" } else { "" }.to_string(),
                );
                vars.insert(
                    "visibility_timeout".to_string(),
                    props.visibility_timeout_secs.to_string(),
                );
            }
            ResourceType::LoadBalancer => {
                let props = LoadBalancerProperties::from_properties(&resource.properties);
                vars.insert("lb_type".to_string(), props.lb_type.clone());
                vars.insert("lb_internal".to_string(), props.internal.to_string());
            }
            ResourceType::Monitoring | ResourceType::Cdn => {}
        }

        vars
    }
}

/// The provider declared by the most resources; ties resolve in the fixed
/// aws, azure, gcp, multi order so the choice is stable across runs.
fn dominant_provider(schema: &InfrastructureSchema) -> Provider {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for resource in schema.resources.values() {
        *counts.entry(resource.provider.as_str()).or_default() += 1;
    }

    // max_by_key keeps the last maximum, so reverse to prefer earlier order.
    Provider::all()
        .into_iter()
        .rev()
        .max_by_key(|p| counts.get(p.as_str()).copied().unwrap_or(0))
        .unwrap_or(Provider::Aws)
}

/// Render a float without a trailing `.0` when it is integral.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackforge_schema::ProjectMetadata;

    fn schema() -> InfrastructureSchema {
        InfrastructureSchema::new(
            ProjectMetadata::new("acme-api").with_environment(Environment::Staging),
        )
        .with_resource(
            "db",
            ResourceDefinition::new(ResourceType::Database, Provider::Aws)
                .with_property("storage", 100),
        )
        .with_resource(
            "api",
            ResourceDefinition::new(ResourceType::Compute, Provider::Aws).with_dependency("db"),
        )
    }

    #[test]
    fn test_context_ordering_and_tags() {
        let schema = schema();
        let options = RenderOptions::new(RenderTarget::Terraform);
        let ctx = RenderContext::new(&schema, &options).unwrap();

        let names: Vec<&String> = ctx.ordered_resources().map(|(n, _)| n).collect();
        assert_eq!(names, ["db", "api"]);
        assert_eq!(ctx.tags()["Project"], "acme-api");
        assert_eq!(ctx.tags()["Environment"], "staging");
        assert_eq!(ctx.region(), "us-east-1");
    }

    #[test]
    fn test_environment_override() {
        let schema = schema();
        let options =
            RenderOptions::new(RenderTarget::Terraform).with_environment(Environment::Production);
        let ctx = RenderContext::new(&schema, &options).unwrap();
        assert_eq!(ctx.environment(), Environment::Production);
    }

    #[test]
    fn test_resource_variables_for_database() {
        let schema = schema();
        let options = RenderOptions::new(RenderTarget::Terraform);
        let ctx = RenderContext::new(&schema, &options).unwrap();
        let db = &schema.resources["db"];

        let vars = ctx.resource_variables("db", db);
        assert_eq!(vars["engine"], "postgres");
        assert_eq!(vars["instance_tier"], "t3.micro");
        assert_eq!(vars["allocated_storage"], "100");
        assert_eq!(vars["resource_name_screaming"], "DB");
    }

    #[test]
    fn test_dominant_provider_tie_break() {
        let schema = InfrastructureSchema::new(ProjectMetadata::new("tie"))
            .with_resource(
                "a",
                ResourceDefinition::new(ResourceType::Compute, Provider::Gcp),
            )
            .with_resource(
                "b",
                ResourceDefinition::new(ResourceType::Compute, Provider::Aws),
            );
        assert_eq!(dominant_provider(&schema), Provider::Aws);
    }
}
