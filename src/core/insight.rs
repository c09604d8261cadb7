//! Rule-based portfolio analysis.
//!
//! The report is a fixed template filled in from the aggregate metrics and two
//! threshold classifications. `generate_insight` adds a fixed delay to stand in
//! for the latency of a remote analysis service.
use crate::core::holding::Holding;
use crate::core::metrics::{AggregateMetrics, compute_aggregate_metrics};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Simulated analysis latency in milliseconds.
    pub delay_ms: u64,
    /// Gain percentage above which performance counts as strong.
    pub profit_threshold: f64,
    /// Gain percentage below which the portfolio is underperforming.
    pub loss_threshold: f64,
    /// Number of holdings at which diversification counts as good.
    pub diversification_target: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        InsightConfig {
            delay_ms: 1500,
            profit_threshold: 5.0,
            loss_threshold: -5.0,
            diversification_target: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Strong,
    Underperforming,
    Stable,
}

impl Performance {
    pub fn advice(&self) -> &'static str {
        match self {
            Performance::Strong => "Strong performance, consider taking profits.",
            Performance::Underperforming => "Underperforming, consider rebalancing.",
            Performance::Stable => "Stable, continue monitoring.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diversification {
    Good,
    Limited,
}

impl Diversification {
    pub fn advice(&self) -> &'static str {
        match self {
            Diversification::Good => "Diversification looks good.",
            Diversification::Limited => {
                "Diversification looks limited, consider adding more positions."
            }
        }
    }
}

/// The outcome of one analysis, rendered to text through `Display`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightReport {
    pub metrics: AggregateMetrics,
    pub holding_count: usize,
    pub performance: Performance,
    pub diversification: Diversification,
}

impl Display for InsightReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Portfolio Analysis: Your portfolio is currently worth ${} with a total gain/loss of {} ({}%). {} {}",
            format_amount(self.metrics.total_value),
            format_signed_amount(self.metrics.total_gain_loss),
            format_signed_percent(self.metrics.total_gain_loss_percent),
            self.performance.advice(),
            self.diversification.advice(),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct InsightGenerator {
    config: InsightConfig,
}

impl InsightGenerator {
    pub fn new(config: InsightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Classifies the holdings without any delay.
    pub fn analyze(&self, holdings: &[Holding]) -> InsightReport {
        let metrics = compute_aggregate_metrics(holdings);
        let percent = metrics.total_gain_loss_percent;

        let performance = if percent > self.config.profit_threshold {
            Performance::Strong
        } else if percent < self.config.loss_threshold {
            Performance::Underperforming
        } else {
            Performance::Stable
        };

        let diversification = if holdings.len() >= self.config.diversification_target {
            Diversification::Good
        } else {
            Diversification::Limited
        };

        debug!(
            ?performance,
            ?diversification,
            holdings = holdings.len(),
            "Classified portfolio"
        );

        InsightReport {
            metrics,
            holding_count: holdings.len(),
            performance,
            diversification,
        }
    }

    /// Produces the analysis text for `holdings` after the configured delay.
    ///
    /// The report is computed before this returns, so the future does not
    /// borrow `holdings` and later changes to the source collection are not
    /// reflected in the result.
    pub fn generate_insight(&self, holdings: &[Holding]) -> BoxFuture<'static, String> {
        let report = self.analyze(holdings);
        let delay = Duration::from_millis(self.config.delay_ms);
        async move {
            tokio::time::sleep(delay).await;
            report.to_string()
        }
        .boxed()
    }
}

/// Formats a non-negative amount with thousands separators and two decimals.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{grouped}.{fraction}")
}

/// True when `value` shows as zero or more at two decimal places.
fn rounds_non_negative(value: f64) -> bool {
    (value * 100.0).round() >= 0.0
}

/// `+$1,234.50` for gains (including zero), `-$31.25` for losses.
pub fn format_signed_amount(value: f64) -> String {
    if rounds_non_negative(value) {
        format!("+${}", format_amount(value))
    } else {
        format!("-${}", format_amount(value))
    }
}

pub fn format_signed_percent(value: f64) -> String {
    if rounds_non_negative(value) {
        format!("+{:.2}", value.abs())
    } else {
        format!("-{:.2}", value.abs())
    }
}
