//! Pricing tables behind an injectable provider interface.
//!
//! Prices are hard-coded approximations with no freshness tracking. Keeping
//! them behind [`PricingProvider`] lets callers swap in live or negotiated
//! rates without touching the calculation logic.

use stackforge_schema::{ComputeKind, Provider, ResourceType};

/// Serverless pricing bundle.
#[derive(Debug, Clone, Copy)]
pub struct ServerlessRates {
    pub per_million_requests: f64,
    pub per_gb_second: f64,
}

/// Container-task pricing bundle.
#[derive(Debug, Clone, Copy)]
pub struct ContainerRates {
    pub per_vcpu_hour: f64,
    pub per_gb_hour: f64,
}

/// Source of unit prices for the cost calculator.
///
/// Lookups by instance class must never fail: unknown classes fall back to
/// the smallest tier in the table.
#[cfg_attr(test, mockall::automock)]
pub trait PricingProvider: Send + Sync {
    fn database_instance_hourly(&self, provider: Provider, instance_tier: &str) -> f64;
    fn database_storage_gb_month(&self, provider: Provider) -> f64;
    fn compute_instance_hourly(&self, provider: Provider, instance_type: &str) -> f64;
    fn serverless_rates(&self, provider: Provider) -> ServerlessRates;
    fn container_rates(&self, provider: Provider) -> ContainerRates;
    fn storage_gb_month(&self, provider: Provider) -> f64;
    fn service_name(&self, provider: Provider, resource_type: ResourceType) -> String;
    fn compute_service_name(&self, provider: Provider, kind: ComputeKind) -> String;
}

/// Built-in approximations, expressed as aws list prices with a flat
/// per-provider factor. `multi` resolves to aws.
pub struct BuiltinPricing;

/// Smallest tier first; the first row doubles as the unknown-class fallback.
const DATABASE_INSTANCE_HOURLY: &[(&str, f64)] = &[
    ("t3.micro", 0.017),
    ("t3.small", 0.034),
    ("t3.medium", 0.068),
    ("t3.large", 0.136),
    ("m5.large", 0.171),
    ("m5.xlarge", 0.342),
    ("r6g.large", 0.24),
    ("r6g.xlarge", 0.48),
];

const COMPUTE_INSTANCE_HOURLY: &[(&str, f64)] = &[
    ("t3.micro", 0.0104),
    ("t3.small", 0.0208),
    ("t3.medium", 0.0416),
    ("t3.large", 0.0832),
    ("m5.large", 0.096),
    ("m5.xlarge", 0.192),
    ("c5.large", 0.085),
    ("c5.xlarge", 0.17),
];

fn lookup_with_fallback(table: &[(&str, f64)], key: &str) -> f64 {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, price)| *price)
        .unwrap_or(table[0].1)
}

fn provider_factor(provider: Provider) -> f64 {
    match provider {
        Provider::Aws | Provider::Multi => 1.0,
        Provider::Azure => 1.08,
        Provider::Gcp => 0.95,
    }
}

impl PricingProvider for BuiltinPricing {
    fn database_instance_hourly(&self, provider: Provider, instance_tier: &str) -> f64 {
        lookup_with_fallback(DATABASE_INSTANCE_HOURLY, instance_tier) * provider_factor(provider)
    }

    fn database_storage_gb_month(&self, provider: Provider) -> f64 {
        0.115 * provider_factor(provider)
    }

    fn compute_instance_hourly(&self, provider: Provider, instance_type: &str) -> f64 {
        lookup_with_fallback(COMPUTE_INSTANCE_HOURLY, instance_type) * provider_factor(provider)
    }

    fn serverless_rates(&self, provider: Provider) -> ServerlessRates {
        let factor = provider_factor(provider);
        ServerlessRates {
            per_million_requests: 0.20 * factor,
            per_gb_second: 0.0000166667 * factor,
        }
    }

    fn container_rates(&self, provider: Provider) -> ContainerRates {
        let factor = provider_factor(provider);
        ContainerRates {
            per_vcpu_hour: 0.04048 * factor,
            per_gb_hour: 0.004445 * factor,
        }
    }

    fn storage_gb_month(&self, provider: Provider) -> f64 {
        match provider {
            Provider::Aws | Provider::Multi => 0.023,
            Provider::Azure => 0.0184,
            Provider::Gcp => 0.020,
        }
    }

    fn service_name(&self, provider: Provider, resource_type: ResourceType) -> String {
        let name = match (provider, resource_type) {
            (Provider::Azure, ResourceType::Database) => "Azure Database",
            (Provider::Azure, ResourceType::Storage) => "Azure Blob Storage",
            (Provider::Gcp, ResourceType::Database) => "Cloud SQL",
            (Provider::Gcp, ResourceType::Storage) => "Cloud Storage",
            (_, ResourceType::Database) => "Amazon RDS",
            (_, ResourceType::Storage) => "Amazon S3",
            (_, other) => return other.as_str().to_string(),
        };
        name.to_string()
    }

    fn compute_service_name(&self, provider: Provider, kind: ComputeKind) -> String {
        let name = match (provider, kind) {
            (Provider::Azure, ComputeKind::Instance) => "Azure Virtual Machines",
            (Provider::Azure, ComputeKind::Serverless) => "Azure Functions",
            (Provider::Azure, ComputeKind::Container) => "Azure Container Instances",
            (Provider::Gcp, ComputeKind::Instance) => "Compute Engine",
            (Provider::Gcp, ComputeKind::Serverless) => "Cloud Functions",
            (Provider::Gcp, ComputeKind::Container) => "Cloud Run",
            (_, ComputeKind::Instance) => "Amazon EC2",
            (_, ComputeKind::Serverless) => "AWS Lambda",
            (_, ComputeKind::Container) => "AWS Fargate",
        };
        name.to_string()
    }
}
