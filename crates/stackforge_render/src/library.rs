//! Embedded template library.

use std::collections::HashMap;

use stackforge_schema::ResourceType;

use crate::files::RenderTarget;
use crate::targets;

/// Per-`(target, resource type)` template bodies. Pairings without an entry
/// are skipped at render time with a warning.
pub struct TemplateLibrary {
    templates: HashMap<(RenderTarget, ResourceType), &'static str>,
}

impl TemplateLibrary {
    /// Register every embedded template.
    pub fn build() -> Self {
        let mut templates: HashMap<(RenderTarget, ResourceType), &'static str> = HashMap::new();

        templates.insert(
            (RenderTarget::Terraform, ResourceType::Database),
            targets::terraform::DATABASE_TF,
        );
        templates.insert(
            (RenderTarget::Terraform, ResourceType::Compute),
            targets::terraform::COMPUTE_TF,
        );
        templates.insert(
            (RenderTarget::Terraform, ResourceType::Cache),
            targets::terraform::CACHE_TF,
        );
        templates.insert(
            (RenderTarget::Terraform, ResourceType::Storage),
            targets::terraform::STORAGE_TF,
        );
        templates.insert(
            (RenderTarget::Terraform, ResourceType::Network),
            targets::terraform::NETWORK_TF,
        );
        templates.insert(
            (RenderTarget::Terraform, ResourceType::Queue),
            targets::terraform::QUEUE_TF,
        );
        templates.insert(
            (RenderTarget::Terraform, ResourceType::LoadBalancer),
            targets::terraform::LOADBALANCER_TF,
        );

        templates.insert(
            (RenderTarget::DockerCompose, ResourceType::Database),
            targets::compose::DATABASE_COMPOSE,
        );
        templates.insert(
            (RenderTarget::DockerCompose, ResourceType::Compute),
            targets::compose::COMPUTE_COMPOSE,
        );
        templates.insert(
            (RenderTarget::DockerCompose, ResourceType::Cache),
            targets::compose::CACHE_COMPOSE,
        );
        templates.insert(
            (RenderTarget::DockerCompose, ResourceType::Queue),
            targets::compose::QUEUE_COMPOSE,
        );
        templates.insert(
            (RenderTarget::DockerCompose, ResourceType::Storage),
            targets::compose::STORAGE_COMPOSE,
        );

        templates.insert(
            (RenderTarget::Kubernetes, ResourceType::Compute),
            targets::kubernetes::COMPUTE_DEPLOYMENT,
        );
        templates.insert(
            (RenderTarget::Helm, ResourceType::Compute),
            targets::helm::DEPLOYMENT_CHART,
        );

        Self { templates }
    }

    /// Look up the template for a pairing, if one exists.
    pub fn get(&self, target: RenderTarget, resource_type: ResourceType) -> Option<&'static str> {
        self.templates.get(&(target, resource_type)).copied()
    }

    /// Whether a pairing has a template.
    pub fn supports(&self, target: RenderTarget, resource_type: ResourceType) -> bool {
        self.templates.contains_key(&(target, resource_type))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
