//! Core business logic: holdings, metrics and analysis

pub mod config;
pub mod error;
pub mod holding;
pub mod insight;
pub mod log;
pub mod metrics;
pub mod price;

// Re-export main types for cleaner imports
pub use error::ValidationError;
pub use holding::{Holding, HoldingDraft, HoldingId};
pub use insight::{InsightConfig, InsightGenerator, InsightReport};
pub use metrics::{
    AggregateMetrics, HoldingMetrics, PortfolioValuation, compute_aggregate_metrics,
    compute_holding_metrics, value_portfolio,
};
pub use price::{PriceProvider, PriceQuote, StaticPriceProvider, refresh_prices};
