//! The multi-target renderer.

use std::sync::OnceLock;

use tracing::{debug, info};

use stackforge_schema::{InfrastructureSchema, SchemaValidator};

use crate::context::{RenderContext, RenderOptions};
use crate::engine::TemplateEngine;
use crate::error::{RenderError, RenderResult};
use crate::files::{RenderOutput, RenderTarget};
use crate::library::TemplateLibrary;
use crate::targets;

/// Renders a validated schema into a target-specific file set.
///
/// Each renderer owns its compiled machinery and a lazily built template
/// library (loaded at most once, guarded for concurrent first calls).
/// Instances share nothing, so multiple renderers can run concurrently, and
/// a warm instance is safe to share read-only across threads.
pub struct TemplateRenderer {
    validator: SchemaValidator,
    engine: TemplateEngine,
    library: OnceLock<TemplateLibrary>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new renderer. Templates load on first use.
    pub fn new() -> Self {
        Self {
            validator: SchemaValidator::new(),
            engine: TemplateEngine::new(),
            library: OnceLock::new(),
        }
    }

    fn library(&self) -> &TemplateLibrary {
        self.library.get_or_init(|| {
            debug!("Building template library");
            TemplateLibrary::build()
        })
    }

    /// Render a schema for one target.
    ///
    /// Validation is a hard gate: an invalid schema yields
    /// [`RenderError::InvalidSchema`] and nothing is rendered. Validation
    /// warnings are carried into the output alongside per-resource skip
    /// warnings. Given identical inputs, the output is byte-identical
    /// across calls: same paths, same content, same order.
    pub fn render(
        &self,
        schema: &InfrastructureSchema,
        options: &RenderOptions,
    ) -> RenderResult<RenderOutput> {
        let validation = self.validator.validate(schema);
        if !validation.valid {
            return Err(RenderError::InvalidSchema(validation.errors.join("; ")));
        }

        let ctx = RenderContext::new(schema, options)?;
        let library = self.library();

        let (files, render_warnings) = match options.target {
            RenderTarget::Terraform => targets::terraform::render(&ctx, &self.engine, library),
            RenderTarget::DockerCompose => targets::compose::render(&ctx, &self.engine, library),
            RenderTarget::AwsCdk => targets::cdk::render(&ctx, &self.engine, library)?,
            RenderTarget::Kubernetes => targets::kubernetes::render(&ctx, &self.engine, library),
            RenderTarget::Helm => targets::helm::render(&ctx, &self.engine, library)?,
        };

        let mut warnings = validation.warnings;
        warnings.extend(render_warnings);

        info!(
            target = %options.target,
            files = files.len(),
            warnings = warnings.len(),
            "Rendered schema '{}'",
            schema.project.name
        );

        Ok(RenderOutput { files, warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackforge_schema::{
        ProjectMetadata, Provider, ResourceDefinition, ResourceType,
    };

    fn acme() -> InfrastructureSchema {
        InfrastructureSchema::new(ProjectMetadata::new("acme-api"))
            .with_resource(
                "db",
                ResourceDefinition::new(ResourceType::Database, Provider::Aws),
            )
            .with_resource(
                "api",
                ResourceDefinition::new(ResourceType::Compute, Provider::Aws)
                    .with_dependency("db"),
            )
    }

    #[test]
    fn test_invalid_schema_is_hard_gate() {
        let schema = InfrastructureSchema::new(ProjectMetadata::new("Bad Name"));
        let renderer = TemplateRenderer::new();
        let err = renderer
            .render(&schema, &RenderOptions::new(RenderTarget::Terraform))
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidSchema(_)));
    }

    #[test]
    fn test_every_target_renders_acme() {
        let schema = acme();
        let renderer = TemplateRenderer::new();
        for target in RenderTarget::all() {
            let output = renderer
                .render(&schema, &RenderOptions::new(target))
                .unwrap();
            assert!(!output.files.is_empty(), "no files for {target}");
        }
    }

    #[test]
    fn test_validation_warnings_surface_in_output() {
        let schema = InfrastructureSchema::new(ProjectMetadata::new("acme-api")).with_resource(
            "api",
            ResourceDefinition::new(ResourceType::Compute, Provider::Aws)
                .with_dependency("ghost"),
        );

        let renderer = TemplateRenderer::new();
        let output = renderer
            .render(&schema, &RenderOptions::new(RenderTarget::Terraform))
            .unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("ghost")));
    }
}
