//! # stackforge_cost
//!
//! Deterministic infrastructure cost estimation for stackforge.
//!
//! The calculator walks a validated schema and prices database, compute and
//! storage resources against an injectable pricing source; other resource
//! types have no cost model yet and are skipped. Figures are a pure
//! function of the schema and the tables: repeated calls agree to the cent.
//!
//! # Example
//!
//! ```rust,no_run
//! use stackforge_cost::{compare_costs, CostCalculator};
//! use stackforge_schema::{InfrastructureSchema, Provider};
//!
//! let schema = InfrastructureSchema::from_json(r#"{
//!     "project": {"name": "acme-api"},
//!     "resources": {
//!         "db": {"type": "database", "provider": "aws", "properties": {"storage": 20}}
//!     }
//! }"#).unwrap();
//!
//! let calculator = CostCalculator::new();
//! let estimate = calculator.calculate_from_schema(&schema, Provider::Aws, "us-east-1");
//! println!("{}", estimate.format_monthly());
//! ```

pub mod calculator;
pub mod models;
pub mod pricing;

pub use calculator::{compare_costs, generate_optimizations, CostCalculator, HOURS_PER_MONTH};
pub use models::{CostBreakdown, CostComparison, CostDetails, CostEstimate, Currency};
pub use pricing::{BuiltinPricing, ContainerRates, PricingProvider, ServerlessRates};
