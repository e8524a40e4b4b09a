//! Integration tests for cost estimation.

use anyhow::Result;

use stackforge_cost::{compare_costs, CostCalculator, HOURS_PER_MONTH};
use stackforge_schema::{InfrastructureSchema, Provider, ResourceType, SchemaValidator};

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
fn test_acme_scenario_costs() -> Result<()> {
    let schema = acme_schema()?;
    assert!(SchemaValidator::new().validate(&schema).valid);

    let calculator = CostCalculator::new();
    let estimate = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");

    assert_eq!(estimate.breakdown.len(), 2);

    let db = estimate
        .breakdown
        .iter()
        .find(|b| b.resource_type == ResourceType::Database)
        .unwrap();
    let api = estimate
        .breakdown
        .iter()
        .find(|b| b.resource_type == ResourceType::Compute)
        .unwrap();

    assert_eq!(db.resource_name, "db");
    assert_eq!(api.resource_name, "api");
    assert_eq!(api.service, "Amazon EC2");

    let expected = ((db.monthly_cost + api.monthly_cost) * 100.0).round() / 100.0;
    assert!((estimate.monthly - expected).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_estimate_is_stable_across_calls() -> Result<()> {
    let schema = acme_schema()?;
    let calculator = CostCalculator::new();

    let first = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");
    let second = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");

    assert_eq!(first.monthly, second.monthly);
    assert_eq!(first.yearly, second.yearly);
    assert_eq!(first.breakdown.len(), second.breakdown.len());
    for (a, b) in first.breakdown.iter().zip(second.breakdown.iter()) {
        assert_eq!(a.resource_name, b.resource_name);
        assert_eq!(a.hourly_cost, b.hourly_cost);
        assert_eq!(a.monthly_cost, b.monthly_cost);
        assert_eq!(a.yearly_cost, b.yearly_cost);
    }
    Ok(())
}

#[test]
fn test_hourly_monthly_yearly_relationships() -> Result<()> {
    let schema = acme_schema()?;
    let calculator = CostCalculator::new();
    let estimate = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");

    for item in &estimate.breakdown {
        let expected_monthly = (item.hourly_cost * HOURS_PER_MONTH * 100.0).round() / 100.0;
        assert!((item.monthly_cost - expected_monthly).abs() < 0.02, "{}", item.resource_name);
        let expected_yearly = (item.monthly_cost * 12.0 * 100.0).round() / 100.0;
        assert!((item.yearly_cost - expected_yearly).abs() < 1e-9);
    }
    Ok(())
}

#[test]
fn test_downsizing_reports_savings() -> Result<()> {
    let calculator = CostCalculator::new();

    let large = InfrastructureSchema::from_json(
        r#"{
            "project": {"name": "sized-app"},
            "resources": {
                "api": {
                    "type": "compute",
                    "provider": "aws",
                    "properties": {"instanceType": "m5.xlarge", "count": 4}
                }
            }
        }"#,
    )?;
    let small = InfrastructureSchema::from_json(
        r#"{
            "project": {"name": "sized-app"},
            "resources": {
                "api": {
                    "type": "compute",
                    "provider": "aws",
                    "properties": {"instanceType": "t3.small", "count": 2}
                }
            }
        }"#,
    )?;

    let before = calculator.calculate_from_schema(&large, Provider::Aws, "us-east-1");
    let after = calculator.calculate_from_schema(&small, Provider::Aws, "us-east-1");

    let comparison = compare_costs(&before, &after);
    assert!(comparison.savings > 0.0);
    assert!(
        (comparison.savings - ((before.monthly - after.monthly) * 100.0).round() / 100.0).abs()
            < 1e-9
    );
    assert!(comparison.recommendation.contains("saves"));
    Ok(())
}

#[test]
fn test_unknown_instance_class_never_fails() -> Result<()> {
    let schema = InfrastructureSchema::from_json(
        r#"{
            "project": {"name": "odd-sizes"},
            "resources": {
                "db": {
                    "type": "database",
                    "provider": "aws",
                    "properties": {"instanceClass": "z9", "instanceSize": "colossal", "storage": 10}
                }
            }
        }"#,
    )?;

    let calculator = CostCalculator::new();
    let estimate = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");
    assert_eq!(estimate.breakdown.len(), 1);
    assert!(estimate.breakdown[0].monthly_cost > 0.0);
    Ok(())
}
