//! Integration tests for the schema crate.

use anyhow::Result;

use stackforge_schema::{
    DependencyGraph, InfrastructureSchema, Provider, ResourceType, SchemaValidator,
};

fn acme_schema() -> Result<InfrastructureSchema> {
    Ok(InfrastructureSchema::from_json(
        r#"{
            "project": {"name": "acme-api", "description": "Demo API"},
            "resources": {
                "db": {
                    "type": "database",
                    "provider": "aws",
                    "properties": {"instanceClass": "t3", "instanceSize": "micro", "storage": 20}
                },
                "api": {
                    "type": "compute",
                    "provider": "aws",
                    "properties": {"instanceType": "t3.micro"},
                    "dependsOn": ["db"]
                }
            }
        }"#,
    )?)
}

#[test]
fn test_acme_schema_validates_clean() -> Result<()> {
    let schema = acme_schema()?;
    let result = SchemaValidator::new().validate(&schema);

    assert!(result.valid);
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
    Ok(())
}

#[test]
fn test_acme_schema_ordering() -> Result<()> {
    let schema = acme_schema()?;
    let order = DependencyGraph::from_schema(&schema).topological_order()?;

    assert_eq!(order, vec!["db", "api"]);
    Ok(())
}

#[test]
fn test_parse_preserves_metadata() -> Result<()> {
    let schema = InfrastructureSchema::from_json(
        r#"{
            "project": {"name": "tagged-app", "environment": "production", "tags": {"team": "core"}},
            "resources": {
                "fn": {
                    "type": "compute",
                    "provider": "gcp",
                    "properties": {"computeType": "serverless"},
                    "reasoning": "event-driven workload",
                    "metadata": {"estimatedCost": "$4/month", "complexity": "low"}
                }
            },
            "recommendations": ["add monitoring"]
        }"#,
    )?;

    assert_eq!(schema.project.tags["team"], "core");
    assert_eq!(schema.environment().as_str(), "production");
    let func = &schema.resources["fn"];
    assert_eq!(func.provider, Provider::Gcp);
    assert_eq!(func.resource_type, ResourceType::Compute);
    assert_eq!(func.reasoning.as_deref(), Some("event-driven workload"));
    assert_eq!(schema.recommendations, vec!["add monitoring"]);
    Ok(())
}

#[test]
fn test_cyclic_schema_rejected_with_both_names() -> Result<()> {
    let schema = InfrastructureSchema::from_json(
        r#"{
            "project": {"name": "loopy"},
            "resources": {
                "a": {"type": "compute", "provider": "aws", "dependsOn": ["b"]},
                "b": {"type": "compute", "provider": "aws", "dependsOn": ["a"]}
            }
        }"#,
    )?;

    let result = SchemaValidator::new().validate(&schema);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains('a'));
    assert!(result.errors[0].contains('b'));
    Ok(())
}

#[test]
fn test_unknown_enum_values_fail_parse() {
    let err = InfrastructureSchema::from_json(
        r#"{
            "project": {"name": "bad-types"},
            "resources": {
                "x": {"type": "mainframe", "provider": "aws"}
            }
        }"#,
    );
    assert!(err.is_err());

    let err = InfrastructureSchema::from_json(
        r#"{
            "project": {"name": "bad-provider"},
            "resources": {
                "x": {"type": "compute", "provider": "ibm"}
            }
        }"#,
    );
    assert!(err.is_err());
}

#[test]
fn test_large_acyclic_graph_orders_deterministically() -> Result<()> {
    let mut json = String::from(r#"{"project": {"name": "wide-app"}, "resources": {"#);
    for i in 0..50 {
        if i > 0 {
            json.push(',');
        }
        if i < 10 {
            json.push_str(&format!(
                r#""leaf-{i:02}": {{"type": "storage", "provider": "aws"}}"#
            ));
        } else {
            json.push_str(&format!(
                r#""node-{i:02}": {{"type": "compute", "provider": "aws", "dependsOn": ["leaf-{:02}"]}}"#,
                i % 10
            ));
        }
    }
    json.push_str("}}");

    let schema = InfrastructureSchema::from_json(&json)?;
    let result = SchemaValidator::new().validate(&schema);
    assert!(result.valid, "errors: {:?}", result.errors);

    let graph = DependencyGraph::from_schema(&schema);
    let first = graph.topological_order()?;
    let second = graph.topological_order()?;
    assert_eq!(first, second);

    let position = |name: &str| first.iter().position(|n| n == name).unwrap();
    assert!(position("leaf-03") < position("node-13"));
    Ok(())
}
