//! Provides the derived performance figures for holdings and portfolios.
//!
//! Nothing here is stored: every value is recomputed from the holdings passed
//! in, so a changed market price is reflected on the next read.
use crate::core::holding::Holding;
use tracing::debug;

/// Derived values for a single holding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldingMetrics {
    pub market_value: f64,
    pub gain_loss: f64,
    pub gain_loss_percent: f64,
}

/// Portfolio-wide totals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregateMetrics {
    pub total_value: f64,
    pub total_gain_loss: f64,
    pub total_gain_loss_percent: f64,
}

impl AggregateMetrics {
    /// Total amount paid for the shares currently held.
    pub fn cost_basis(&self) -> f64 {
        self.total_value - self.total_gain_loss
    }
}

/// A holding paired with its metrics and its share of the portfolio.
#[derive(Debug, Clone)]
pub struct HoldingValuation {
    pub holding: Holding,
    pub metrics: HoldingMetrics,
    /// Percentage of total market value; `None` when the portfolio is worth nothing.
    pub weight: Option<f64>,
}

/// Everything a summary view needs, computed from one snapshot.
#[derive(Debug, Clone)]
pub struct PortfolioValuation {
    pub holdings: Vec<HoldingValuation>,
    pub totals: AggregateMetrics,
}

pub fn compute_holding_metrics(holding: &Holding) -> HoldingMetrics {
    let price_change = holding.current_price() - holding.purchase_price();
    HoldingMetrics {
        market_value: holding.shares() * holding.current_price(),
        gain_loss: holding.shares() * price_change,
        gain_loss_percent: price_change / holding.purchase_price() * 100.0,
    }
}

/// Sums the per-holding metrics into portfolio totals.
///
/// The percentage divides by `total_value - total_gain_loss` rather than an
/// independently summed purchase cost. An empty portfolio yields all zeros.
pub fn compute_aggregate_metrics(holdings: &[Holding]) -> AggregateMetrics {
    let (total_value, total_gain_loss) = holdings
        .iter()
        .map(compute_holding_metrics)
        .fold((0.0, 0.0), |(value, gain), m| {
            (value + m.market_value, gain + m.gain_loss)
        });

    let cost_basis = total_value - total_gain_loss;
    let total_gain_loss_percent = if cost_basis == 0.0 {
        0.0
    } else {
        total_gain_loss / cost_basis * 100.0
    };

    debug!(
        holdings = holdings.len(),
        total_value, total_gain_loss, total_gain_loss_percent, "Computed aggregate metrics"
    );

    AggregateMetrics {
        total_value,
        total_gain_loss,
        total_gain_loss_percent,
    }
}

pub fn value_portfolio(holdings: &[Holding]) -> PortfolioValuation {
    let totals = compute_aggregate_metrics(holdings);
    let holdings = holdings
        .iter()
        .map(|holding| {
            let metrics = compute_holding_metrics(holding);
            let weight = (totals.total_value > 0.0)
                .then(|| metrics.market_value / totals.total_value * 100.0);
            HoldingValuation {
                holding: holding.clone(),
                metrics,
                weight,
            }
        })
        .collect();

    PortfolioValuation { holdings, totals }
}
