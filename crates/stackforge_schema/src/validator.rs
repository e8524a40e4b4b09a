//! Schema validation.
//!
//! Validation is the sole gate between untrusted AI output and the rest of
//! the pipeline. It runs in two passes: a structural pass over the project
//! metadata and resource map, then (only when the structure is sound) a
//! cross-resource pass covering dependency cycles, dangling references and
//! naming conventions. Cycles are hard errors; everything else in the cross
//! pass is a warning.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{SchemaError, SchemaResult};
use crate::models::{InfrastructureSchema, ValidationResult};

/// Resource names that collide with tooling keywords.
const RESERVED_NAMES: &[&str] = &["default", "aws", "azure", "gcp", "terraform", "pulumi"];

/// Maximum resource name length accepted without a warning.
const MAX_NAME_LENGTH: usize = 64;

/// Validator for infrastructure schemas.
pub struct SchemaValidator {
    name_pattern: Regex,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaValidator {
    /// Create a new schema validator.
    pub fn new() -> Self {
        Self {
            name_pattern: Regex::new(r"^[a-z][a-z0-9-]*$").unwrap(),
        }
    }

    /// Validate a schema. Returns `valid=false` with at least one error, or
    /// `valid=true` with zero or more warnings.
    pub fn validate(&self, schema: &InfrastructureSchema) -> ValidationResult {
        let mut result = self.validate_structure(schema);
        if !result.valid {
            debug!("Structural validation failed; skipping cross-validation");
            return result;
        }

        result.merge(self.validate_cross(schema));
        result
    }

    /// Validate as a hard gate: any error becomes [`SchemaError::Invalid`].
    pub fn ensure_valid(&self, schema: &InfrastructureSchema) -> SchemaResult<()> {
        let result = self.validate(schema);
        if result.valid {
            Ok(())
        } else {
            Err(SchemaError::Invalid(result.errors.join("; ")))
        }
    }

    /// Structural pass: project metadata shape and resource map contents.
    fn validate_structure(&self, schema: &InfrastructureSchema) -> ValidationResult {
        let mut result = ValidationResult::new();

        if schema.project.name.is_empty() {
            result.add_error("Project name cannot be empty");
        } else if !self.name_pattern.is_match(&schema.project.name) {
            result.add_error(format!(
                "Project name '{}' must be kebab-case (lowercase letters, digits and dashes, starting with a letter)",
                schema.project.name
            ));
        }

        if schema.resources.is_empty() {
            result.add_error("Schema must define at least one resource");
        }

        result
    }

    /// Cross-resource pass: cycles (errors), dangling references and naming
    /// conventions (warnings).
    fn validate_cross(&self, schema: &InfrastructureSchema) -> ValidationResult {
        let mut result = ValidationResult::new();

        for cycle in detect_cycles(schema) {
            warn!(cycle = %cycle, "Dependency cycle detected");
            result.add_error(format!("Cyclic dependency detected: {}", cycle));
        }

        for (name, resource) in &schema.resources {
            for dep in &resource.depends_on {
                if !schema.resources.contains_key(dep) {
                    result.add_warning(format!(
                        "Resource '{}' depends on '{}', which is not defined in this schema",
                        name, dep
                    ));
                }
            }

            if name.contains('_') && name.contains('-') {
                result.add_warning(format!(
                    "Resource name '{}' mixes underscores and dashes",
                    name
                ));
            }

            if RESERVED_NAMES.contains(&name.as_str()) {
                result.add_warning(format!("Resource name '{}' is a reserved word", name));
            }

            if name.len() > MAX_NAME_LENGTH {
                result.add_warning(format!(
                    "Resource name '{}' exceeds {} characters",
                    name, MAX_NAME_LENGTH
                ));
            }
        }

        result
    }
}

/// Find dependency cycles via depth-first traversal with a recursion stack.
/// Each cycle is reported once, as the full path (`a -> b -> a`). Edges to
/// resources that do not exist are ignored here; they surface as dangling
/// reference warnings instead.
fn detect_cycles(schema: &InfrastructureSchema) -> Vec<String> {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        InStack,
        Done,
    }

    fn visit(
        schema: &InfrastructureSchema,
        name: &str,
        states: &mut HashMap<String, State>,
        stack: &mut Vec<String>,
        cycles: &mut Vec<String>,
        seen_cycles: &mut BTreeSet<Vec<String>>,
    ) {
        states.insert(name.to_string(), State::InStack);
        stack.push(name.to_string());

        if let Some(resource) = schema.resources.get(name) {
            for dep in &resource.depends_on {
                if !schema.resources.contains_key(dep) {
                    continue;
                }
                match states.get(dep) {
                    Some(State::InStack) => {
                        let start = stack.iter().position(|n| n == dep).unwrap_or(0);
                        let mut path: Vec<String> = stack[start..].to_vec();
                        path.push(dep.clone());

                        // Canonical membership set so rotations of the same
                        // cycle are reported once.
                        let mut members = path.clone();
                        members.sort();
                        members.dedup();
                        if seen_cycles.insert(members) {
                            cycles.push(path.join(" -> "));
                        }
                    }
                    Some(State::Done) => {}
                    None => visit(schema, dep, states, stack, cycles, seen_cycles),
                }
            }
        }

        stack.pop();
        states.insert(name.to_string(), State::Done);
    }

    let mut states = HashMap::new();
    let mut cycles = Vec::new();
    let mut seen_cycles = BTreeSet::new();

    for name in schema.resources.keys() {
        if !states.contains_key(name) {
            let mut stack = Vec::new();
            visit(schema, name, &mut states, &mut stack, &mut cycles, &mut seen_cycles);
        }
    }

    cycles
}
