//! Dependency graph analysis.
//!
//! Builds a directed graph from `dependsOn` edges and produces the
//! deterministic topological ordering renderers assemble output in. The
//! graph only ever sees edges whose target exists; dangling references and
//! cycle diagnosis are the validator's concern. The analyzer runs after
//! validation has certified acyclicity, so a residual cycle here is
//! propagated as a plain error rather than re-diagnosed.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{SchemaError, SchemaResult};
use crate::models::InfrastructureSchema;

/// Directed dependency graph over resource names.
#[derive(Debug)]
pub struct DependencyGraph {
    /// node -> resources it depends on (edges restricted to existing nodes).
    dependencies: BTreeMap<String, Vec<String>>,
    /// node -> resources that depend on it.
    dependents: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build the graph from a schema, dropping edges to missing resources.
    pub fn from_schema(schema: &InfrastructureSchema) -> Self {
        let mut dependencies: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut dependents: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for name in schema.resources.keys() {
            dependencies.insert(name.clone(), Vec::new());
            dependents.insert(name.clone(), Vec::new());
        }

        for (name, resource) in &schema.resources {
            for dep in &resource.depends_on {
                if !schema.resources.contains_key(dep) {
                    continue;
                }
                if let Some(deps) = dependencies.get_mut(name) {
                    deps.push(dep.clone());
                }
                if let Some(deps) = dependents.get_mut(dep) {
                    deps.push(name.clone());
                }
            }
        }

        Self {
            dependencies,
            dependents,
        }
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Resources `name` depends on. Empty for unknown names.
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.dependencies.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resources that depend on `name`. Empty for unknown names.
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.dependents.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Deterministic topological ordering: every resource appears after all
    /// of its dependencies, and resources whose dependencies are all
    /// resolved are emitted in ascending lexical order.
    pub fn topological_order(&self) -> SchemaResult<Vec<String>> {
        let mut remaining: BTreeMap<&str, usize> = self
            .dependencies
            .iter()
            .map(|(name, deps)| (name.as_str(), deps.len()))
            .collect();

        let mut ready: BTreeSet<&str> = remaining
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(name, _)| *name)
            .collect();

        let mut order = Vec::with_capacity(remaining.len());

        while let Some(name) = ready.iter().next().copied() {
            ready.remove(name);
            order.push(name.to_string());

            for dependent in self.dependents_of(name) {
                if let Some(count) = remaining.get_mut(dependent.as_str()) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() < self.dependencies.len() {
            let stuck: Vec<&str> = self
                .dependencies
                .keys()
                .map(String::as_str)
                .filter(|name| !order.iter().any(|o| o == name))
                .collect();
            return Err(SchemaError::CyclicDependency(stuck.join(", ")));
        }

        Ok(order)
    }
}
