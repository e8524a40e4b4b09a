//! # stackforge_schema
//!
//! Infrastructure schema model, validation and dependency analysis for
//! stackforge.
//!
//! The upstream AI layer proposes infrastructure as a JSON document; this
//! crate parses it into a typed [`InfrastructureSchema`], validates it
//! (structure, dependency cycles, dangling references, naming conventions)
//! and derives the deterministic resource ordering the renderers consume.
//!
//! # Architecture
//!
//! - **Models**: typed schema with closed `type`/`provider` enumerations
//! - **Properties**: typed, defaulted views over each resource's open bag
//! - **Validator**: two-pass validation, errors and warnings kept apart
//! - **Graph**: topological ordering with lexical tie-break
//! - **Naming**: idempotent case transforms shared by every renderer
//!
//! # Example
//!
//! ```rust
//! use stackforge_schema::{DependencyGraph, InfrastructureSchema, SchemaValidator};
//!
//! let schema = InfrastructureSchema::from_json(r#"{
//!     "project": {"name": "acme-api", "description": "demo"},
//!     "resources": {
//!         "db": {"type": "database", "provider": "aws", "properties": {"storage": 20}},
//!         "api": {"type": "compute", "provider": "aws", "dependsOn": ["db"]}
//!     }
//! }"#).unwrap();
//!
//! let result = SchemaValidator::new().validate(&schema);
//! assert!(result.valid);
//!
//! let order = DependencyGraph::from_schema(&schema).topological_order().unwrap();
//! assert_eq!(order, vec!["db", "api"]);
//! ```

pub mod error;
pub mod graph;
pub mod models;
pub mod naming;
pub mod properties;
pub mod validator;

pub use error::{SchemaError, SchemaResult};
pub use graph::DependencyGraph;
pub use models::{
    Environment, InfrastructureSchema, ProjectMetadata, Provider, ResourceDefinition,
    ResourceMetadata, ResourceType, ValidationResult,
};
pub use properties::{
    CacheProperties, ComputeKind, ComputeProperties, DatabaseProperties, LoadBalancerProperties,
    NetworkProperties, QueueProperties, StorageProperties,
};
pub use validator::SchemaValidator;
