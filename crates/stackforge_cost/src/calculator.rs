//! Deterministic cost calculation.
//!
//! Resources dispatch on type to one of three cost models (database,
//! compute, storage); other types have no model yet and are skipped. Given
//! the same schema and pricing tables, repeated calls produce the same
//! figures; only the `last_updated` stamp differs.

use chrono::Utc;
use tracing::debug;

use stackforge_schema::{
    ComputeKind, ComputeProperties, DatabaseProperties, InfrastructureSchema, Provider,
    ResourceDefinition, ResourceType, StorageProperties,
};

use crate::models::{CostBreakdown, CostComparison, CostDetails, CostEstimate, Currency};
use crate::pricing::{BuiltinPricing, PricingProvider};

/// Billing hours per month, the industry convention.
pub const HOURS_PER_MONTH: f64 = 730.0;

const MONTHS_PER_YEAR: f64 = 12.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Schema-level cost calculator over an injected pricing source.
pub struct CostCalculator {
    pricing: Box<dyn PricingProvider>,
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl CostCalculator {
    /// Create a calculator backed by the built-in pricing tables.
    pub fn new() -> Self {
        Self {
            pricing: Box::new(BuiltinPricing),
        }
    }

    /// Create a calculator with a custom pricing source.
    pub fn with_pricing(pricing: Box<dyn PricingProvider>) -> Self {
        Self { pricing }
    }

    /// Estimate monthly and yearly cost for every priceable resource.
    ///
    /// `provider` and `region` label the estimate and stand in for any
    /// resource declaring `multi`; resources otherwise price against their
    /// own provider.
    pub fn calculate_from_schema(
        &self,
        schema: &InfrastructureSchema,
        provider: Provider,
        region: &str,
    ) -> CostEstimate {
        let mut breakdown = Vec::new();

        for (name, resource) in &schema.resources {
            let effective = if resource.provider == Provider::Multi {
                provider
            } else {
                resource.provider
            };

            let entry = match resource.resource_type {
                ResourceType::Database => Some(self.database_cost(name, resource, effective)),
                ResourceType::Compute => Some(self.compute_cost(name, resource, effective)),
                ResourceType::Storage => Some(self.storage_cost(name, resource, effective)),
                other => {
                    debug!(resource = %name, resource_type = %other, "No cost model; skipping");
                    None
                }
            };
            breakdown.extend(entry);
        }

        let monthly = round2(breakdown.iter().map(|b| b.monthly_cost).sum());

        CostEstimate {
            provider,
            region: region.to_string(),
            currency: Currency::Usd,
            monthly,
            yearly: round2(monthly * MONTHS_PER_YEAR),
            breakdown,
            last_updated: Utc::now(),
        }
    }

    /// Instance rate plus storage amortized over the month.
    fn database_cost(
        &self,
        name: &str,
        resource: &ResourceDefinition,
        provider: Provider,
    ) -> CostBreakdown {
        let props = DatabaseProperties::from_properties(&resource.properties);
        let tier = props.instance_tier();
        let instance_hourly = self.pricing.database_instance_hourly(provider, &tier);
        let storage_rate = self.pricing.database_storage_gb_month(provider);

        let hourly = round4(
            instance_hourly + (storage_rate * props.allocated_storage_gb) / HOURS_PER_MONTH,
        );
        let monthly = round2(hourly * HOURS_PER_MONTH);

        CostBreakdown {
            resource_name: name.to_string(),
            resource_type: ResourceType::Database,
            service: self.pricing.service_name(provider, ResourceType::Database),
            hourly_cost: hourly,
            monthly_cost: monthly,
            yearly_cost: round2(monthly * MONTHS_PER_YEAR),
            details: CostDetails {
                quantity: props.allocated_storage_gb,
                unit: "GB-month".to_string(),
                price_per_unit: storage_rate,
            },
        }
    }

    /// Branches on the declared compute sub-type.
    fn compute_cost(
        &self,
        name: &str,
        resource: &ResourceDefinition,
        provider: Provider,
    ) -> CostBreakdown {
        let props = ComputeProperties::from_properties(&resource.properties);

        let (hourly, details) = match props.kind {
            ComputeKind::Instance => {
                let unit_price = self
                    .pricing
                    .compute_instance_hourly(provider, &props.instance_type);
                (
                    round4(unit_price * props.count as f64),
                    CostDetails {
                        quantity: props.count as f64,
                        unit: "instances".to_string(),
                        price_per_unit: unit_price,
                    },
                )
            }
            ComputeKind::Serverless => {
                let rates = self.pricing.serverless_rates(provider);
                let request_cost =
                    (props.estimated_requests / 1_000_000.0) * rates.per_million_requests;
                let gb_seconds = props.estimated_requests
                    * (props.avg_duration_ms / 1000.0)
                    * (props.memory_mb / 1024.0);
                let monthly = request_cost + gb_seconds * rates.per_gb_second;
                (
                    round4(monthly / HOURS_PER_MONTH),
                    CostDetails {
                        quantity: props.estimated_requests,
                        unit: "requests".to_string(),
                        price_per_unit: rates.per_million_requests / 1_000_000.0,
                    },
                )
            }
            ComputeKind::Container => {
                let rates = self.pricing.container_rates(provider);
                let per_task =
                    props.cpu * rates.per_vcpu_hour + props.memory_gb * rates.per_gb_hour;
                (
                    round4(per_task * props.count as f64),
                    CostDetails {
                        quantity: props.count as f64,
                        unit: "tasks".to_string(),
                        price_per_unit: round4(per_task),
                    },
                )
            }
        };

        let monthly = round2(hourly * HOURS_PER_MONTH);

        CostBreakdown {
            resource_name: name.to_string(),
            resource_type: ResourceType::Compute,
            service: self.pricing.compute_service_name(provider, props.kind),
            hourly_cost: hourly,
            monthly_cost: monthly,
            yearly_cost: round2(monthly * MONTHS_PER_YEAR),
            details,
        }
    }

    /// Flat size-based rate, amortized to an hourly figure.
    fn storage_cost(
        &self,
        name: &str,
        resource: &ResourceDefinition,
        provider: Provider,
    ) -> CostBreakdown {
        let props = StorageProperties::from_properties(&resource.properties);
        let rate = self.pricing.storage_gb_month(provider);

        let monthly = round2(props.size_gb * rate);
        let hourly = round4(monthly / HOURS_PER_MONTH);

        CostBreakdown {
            resource_name: name.to_string(),
            resource_type: ResourceType::Storage,
            service: self.pricing.service_name(provider, ResourceType::Storage),
            hourly_cost: hourly,
            monthly_cost: monthly,
            yearly_cost: round2(monthly * MONTHS_PER_YEAR),
            details: CostDetails {
                quantity: props.size_gb,
                unit: "GB-month".to_string(),
                price_per_unit: rate,
            },
        }
    }
}

/// Compare two estimates. The recommendation's direction is driven solely
/// by the sign of the savings.
pub fn compare_costs(before: &CostEstimate, after: &CostEstimate) -> CostComparison {
    let savings = round2(before.monthly - after.monthly);
    let savings_percentage = if before.monthly > 0.0 {
        round2(savings / before.monthly * 100.0)
    } else {
        0.0
    };

    let recommendation = if savings > 0.0 {
        format!(
            "Adopting the new configuration saves ${:.2}/month ({:.1}%)",
            savings, savings_percentage
        )
    } else if savings < 0.0 {
        format!(
            "The new configuration costs ${:.2}/month more; review before adopting",
            -savings
        )
    } else {
        "Both configurations cost the same per month".to_string()
    };

    CostComparison {
        savings,
        savings_percentage,
        recommendation,
    }
}

/// Advisory review hints. Never feeds back into the figures.
pub fn generate_optimizations(estimate: &CostEstimate) -> Vec<String> {
    let mut suggestions = Vec::new();

    for item in &estimate.breakdown {
        match item.resource_type {
            ResourceType::Database if item.monthly_cost > 100.0 => {
                suggestions.push(format!(
                    "Review the instance size of database '{}' (${:.2}/month)",
                    item.resource_name, item.monthly_cost
                ));
            }
            ResourceType::Compute if item.monthly_cost > 200.0 => {
                suggestions.push(format!(
                    "Consider reserved capacity for compute '{}' (${:.2}/month)",
                    item.resource_name, item.monthly_cost
                ));
            }
            ResourceType::Storage if item.monthly_cost > 50.0 => {
                suggestions.push(format!(
                    "Consider lifecycle policies for storage '{}' (${:.2}/month)",
                    item.resource_name, item.monthly_cost
                ));
            }
            _ => {}
        }
    }

    if estimate.monthly > 500.0 {
        suggestions.push(format!(
            "Total estimate is ${:.2}/month; a savings plan or committed-use discount may apply",
            estimate.monthly
        ));
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::MockPricingProvider;
    use stackforge_schema::ProjectMetadata;

    fn schema_with(name: &str, resource: ResourceDefinition) -> InfrastructureSchema {
        InfrastructureSchema::new(ProjectMetadata::new("cost-app")).with_resource(name, resource)
    }

    fn database(storage: f64) -> ResourceDefinition {
        ResourceDefinition::new(ResourceType::Database, Provider::Aws)
            .with_property("allocatedStorage", storage)
    }

    #[test]
    fn test_database_formula() {
        let calculator = CostCalculator::new();
        let schema = schema_with("db", database(20.0));
        let estimate = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");

        assert_eq!(estimate.breakdown.len(), 1);
        let db = &estimate.breakdown[0];
        // 0.017 + 0.115 * 20 / 730 = 0.0202 (4 dp)
        assert!((db.hourly_cost - 0.0202).abs() < 1e-9);
        assert!((db.monthly_cost - round2(db.hourly_cost * HOURS_PER_MONTH)).abs() < 1e-9);
        assert_eq!(db.service, "Amazon RDS");
    }

    #[test]
    fn test_storage_monotonicity() {
        let calculator = CostCalculator::new();
        let mut previous = 0.0;
        for storage in [10.0, 20.0, 50.0, 100.0, 500.0, 1000.0] {
            let schema = schema_with("db", database(storage));
            let estimate = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");
            let monthly = estimate.breakdown[0].monthly_cost;
            assert!(
                monthly >= previous,
                "monthly decreased at storage={storage}: {monthly} < {previous}"
            );
            previous = monthly;
        }
    }

    #[test]
    fn test_aggregation_identity() {
        let calculator = CostCalculator::new();
        let schema = InfrastructureSchema::new(ProjectMetadata::new("cost-app"))
            .with_resource("db", database(100.0))
            .with_resource(
                "api",
                ResourceDefinition::new(ResourceType::Compute, Provider::Aws)
                    .with_property("instanceType", "m5.large")
                    .with_property("count", 2),
            )
            .with_resource(
                "assets",
                ResourceDefinition::new(ResourceType::Storage, Provider::Aws)
                    .with_property("sizeGb", 500),
            );

        let estimate = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");
        assert_eq!(estimate.breakdown.len(), 3);

        let sum: f64 = estimate.breakdown.iter().map(|b| b.monthly_cost).sum();
        assert!((estimate.monthly - round2(sum)).abs() < 1e-9);
        assert!((estimate.yearly - round2(estimate.monthly * 12.0)).abs() < 1e-9);
    }

    #[test]
    fn test_unpriced_types_skipped_silently() {
        let calculator = CostCalculator::new();
        let schema = InfrastructureSchema::new(ProjectMetadata::new("cost-app"))
            .with_resource(
                "cache",
                ResourceDefinition::new(ResourceType::Cache, Provider::Aws),
            )
            .with_resource(
                "vpc",
                ResourceDefinition::new(ResourceType::Network, Provider::Aws),
            );

        let estimate = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");
        assert!(estimate.breakdown.is_empty());
        assert_eq!(estimate.monthly, 0.0);
    }

    #[test]
    fn test_serverless_and_container_branches() {
        let calculator = CostCalculator::new();
        let schema = InfrastructureSchema::new(ProjectMetadata::new("cost-app"))
            .with_resource(
                "fn",
                ResourceDefinition::new(ResourceType::Compute, Provider::Aws)
                    .with_property("computeType", "serverless")
                    .with_property("estimatedRequests", 10_000_000)
                    .with_property("avgDurationMs", 200)
                    .with_property("memoryMb", 512),
            )
            .with_resource(
                "workers",
                ResourceDefinition::new(ResourceType::Compute, Provider::Aws)
                    .with_property("computeType", "container")
                    .with_property("cpu", 0.5)
                    .with_property("memoryGb", 1)
                    .with_property("count", 4),
            );

        let estimate = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");
        let services: Vec<&str> = estimate.breakdown.iter().map(|b| b.service.as_str()).collect();
        assert!(services.contains(&"AWS Lambda"));
        assert!(services.contains(&"AWS Fargate"));
        for item in &estimate.breakdown {
            assert!(item.monthly_cost > 0.0);
        }
    }

    #[test]
    fn test_multi_resource_uses_call_provider() {
        let calculator = CostCalculator::new();
        let schema = schema_with(
            "db",
            ResourceDefinition::new(ResourceType::Database, Provider::Multi),
        );

        let estimate = calculator.calculate_from_schema(&schema, Provider::Gcp, "us-central1");
        assert_eq!(estimate.breakdown[0].service, "Cloud SQL");
    }

    #[test]
    fn test_compare_costs_sign_property() {
        let calculator = CostCalculator::new();
        let before = calculator.calculate_from_schema(
            &schema_with("db", database(1000.0)),
            Provider::Aws,
            "us-east-1",
        );
        let after = calculator.calculate_from_schema(
            &schema_with("db", database(100.0)),
            Provider::Aws,
            "us-east-1",
        );

        let comparison = compare_costs(&before, &after);
        assert!(after.monthly < before.monthly);
        assert!(comparison.savings > 0.0);
        assert!(comparison.savings_percentage > 0.0);
        assert!(comparison.recommendation.contains("saves"));

        let reverse = compare_costs(&after, &before);
        assert!(reverse.savings < 0.0);
        assert!(reverse.recommendation.contains("more"));
    }

    #[test]
    fn test_compare_zero_baseline() {
        let calculator = CostCalculator::new();
        let empty = calculator.calculate_from_schema(
            &schema_with(
                "vpc",
                ResourceDefinition::new(ResourceType::Network, Provider::Aws),
            ),
            Provider::Aws,
            "us-east-1",
        );

        let comparison = compare_costs(&empty, &empty);
        assert_eq!(comparison.savings, 0.0);
        assert_eq!(comparison.savings_percentage, 0.0);
    }

    #[test]
    fn test_optimizations_are_advisory() {
        let calculator = CostCalculator::new();
        let schema = schema_with("db", database(5000.0));
        let estimate = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");

        let suggestions = generate_optimizations(&estimate);
        assert!(suggestions.iter().any(|s| s.contains("db")));

        // Advisory only: the estimate is unchanged by generating them.
        let again = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");
        assert_eq!(estimate.monthly, again.monthly);
    }

    #[test]
    fn test_injected_pricing_is_used() {
        let mut mock = MockPricingProvider::new();
        mock.expect_database_instance_hourly().return_const(1.0);
        mock.expect_database_storage_gb_month().return_const(0.0);
        mock.expect_service_name()
            .return_const("Mock RDS".to_string());

        let calculator = CostCalculator::with_pricing(Box::new(mock));
        let estimate = calculator.calculate_from_schema(
            &schema_with("db", database(0.0)),
            Provider::Aws,
            "us-east-1",
        );

        let db = &estimate.breakdown[0];
        assert_eq!(db.service, "Mock RDS");
        assert_eq!(db.hourly_cost, 1.0);
        assert_eq!(db.monthly_cost, 730.0);
    }
}
