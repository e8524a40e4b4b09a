//! Cost estimation data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stackforge_schema::{Provider, ResourceType};

/// Supported currencies for cost display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Usd => write!(f, "$"),
        }
    }
}

/// Quantity and unit price behind a breakdown line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostDetails {
    pub quantity: f64,
    pub unit: String,
    pub price_per_unit: f64,
}

/// Cost figures for one resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub resource_name: String,
    pub resource_type: ResourceType,
    /// Provider-specific product name, e.g. "Amazon RDS".
    pub service: String,
    pub hourly_cost: f64,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    pub details: CostDetails,
}

/// Aggregate estimate for a whole schema.
///
/// `last_updated` is metadata only; the figures are a pure function of the
/// schema and the pricing tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub provider: Provider,
    pub region: String,
    pub currency: Currency,
    pub monthly: f64,
    pub yearly: f64,
    pub breakdown: Vec<CostBreakdown>,
    pub last_updated: DateTime<Utc>,
}

impl CostEstimate {
    /// Format the monthly total for display.
    pub fn format_monthly(&self) -> String {
        format!("{}{:.2}/mo", self.currency, self.monthly)
    }
}

/// Outcome of comparing two estimates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostComparison {
    /// Positive when the second estimate is cheaper.
    pub savings: f64,
    pub savings_percentage: f64,
    pub recommendation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Usd.to_string(), "$");
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let breakdown = CostBreakdown {
            resource_name: "db".to_string(),
            resource_type: ResourceType::Database,
            service: "Amazon RDS".to_string(),
            hourly_cost: 0.0173,
            monthly_cost: 12.63,
            yearly_cost: 151.56,
            details: CostDetails {
                quantity: 20.0,
                unit: "GB-month".to_string(),
                price_per_unit: 0.115,
            },
        };

        let json = serde_json::to_string(&breakdown).unwrap();
        assert!(json.contains("\"resourceName\""));
        assert!(json.contains("\"hourlyCost\""));
        assert!(json.contains("\"pricePerUnit\""));
    }
}
