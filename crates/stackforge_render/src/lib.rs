//! # stackforge_render
//!
//! Multi-target IaC template rendering for stackforge.
//!
//! A validated [`InfrastructureSchema`](stackforge_schema::InfrastructureSchema)
//! is rendered into a set of [`GeneratedFile`]s for one of five targets:
//! Terraform, Docker Compose, AWS CDK, Kubernetes or Helm. Rendering is
//! deterministic: identical inputs produce byte-identical output in
//! identical order.
//!
//! # Architecture
//!
//! - **Renderer**: validation gate, target dispatch, deterministic assembly
//! - **Engine**: `{{variable}}` substitution over embedded template bodies
//! - **Library**: `(target, resource type)` template registry, lazily built
//! - **Targets**: per-ecosystem emission of resource and scaffold files
//! - **Validator**: post-render diagnostics (empty files, leftover
//!   placeholders)
//! - **Writer**: materializes a file set under a root directory
//!
//! # Example
//!
//! ```rust,no_run
//! use stackforge_render::{RenderOptions, RenderTarget, RenderValidator, TemplateRenderer};
//! use stackforge_schema::InfrastructureSchema;
//!
//! let schema = InfrastructureSchema::from_json(r#"{
//!     "project": {"name": "acme-api"},
//!     "resources": {
//!         "db": {"type": "database", "provider": "aws"}
//!     }
//! }"#).unwrap();
//!
//! let renderer = TemplateRenderer::new();
//! let output = renderer
//!     .render(&schema, &RenderOptions::new(RenderTarget::Terraform))
//!     .unwrap();
//!
//! let report = RenderValidator::new().validate(&output.files);
//! assert!(report.valid);
//! ```

pub mod context;
pub mod error;
pub mod files;
pub mod renderer;
pub mod validator;
pub mod writer;

// Template machinery stays internal: consumers see generated files and
// reports, never template objects.
mod engine;
mod library;
mod targets;

pub use context::RenderOptions;
pub use error::{RenderError, RenderResult};
pub use files::{
    FileSource, FileValidation, GeneratedFile, RenderOutput, RenderTarget, ValidationReport,
};
pub use renderer::TemplateRenderer;
pub use validator::RenderValidator;
pub use writer::FileWriter;
