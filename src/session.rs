//! Call-site state for a front end: the store, the last insight and whether an
//! analysis is currently running.

use crate::core::holding::{Holding, HoldingDraft, HoldingId};
use crate::core::insight::InsightGenerator;
use crate::core::ValidationError;
use crate::core::metrics::{
    AggregateMetrics, PortfolioValuation, compute_aggregate_metrics, value_portfolio,
};
use crate::store::PortfolioStore;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Ticket value meaning no request is outstanding.
const IDLE: u64 = 0;

/// An analysis that has been started and must be awaited.
///
/// Once awaited to completion, the session stays busy until the response is
/// passed to `complete_insight`. Dropping the request before that point, or
/// dropping an unfinished `resolve` future, releases the session instead.
#[must_use = "dropping the request abandons the analysis"]
pub struct InsightRequest {
    ticket: u64,
    pending: BoxFuture<'static, String>,
    in_flight: Arc<AtomicU64>,
    resolved: bool,
}

impl InsightRequest {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub async fn resolve(mut self) -> InsightResponse {
        let text = (&mut self.pending).await;
        self.resolved = true;
        InsightResponse {
            ticket: self.ticket,
            text,
        }
    }
}

impl Drop for InsightRequest {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        let released = self
            .in_flight
            .compare_exchange(self.ticket, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if released {
            debug!(ticket = self.ticket, "Insight request abandoned");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightResponse {
    pub ticket: u64,
    pub text: String,
}

#[derive(Default)]
pub struct PortfolioSession {
    store: PortfolioStore,
    generator: InsightGenerator,
    latest_insight: Option<String>,
    in_flight: Arc<AtomicU64>,
    issued: u64,
}

impl PortfolioSession {
    pub fn new(store: PortfolioStore, generator: InsightGenerator) -> Self {
        Self {
            store,
            generator,
            latest_insight: None,
            in_flight: Arc::new(AtomicU64::new(IDLE)),
            issued: 0,
        }
    }

    pub fn store(&self) -> &PortfolioStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PortfolioStore {
        &mut self.store
    }

    pub fn add_holding(&mut self, draft: &HoldingDraft) -> Result<HoldingId, ValidationError> {
        self.store.add_holding(draft)
    }

    pub fn remove_holding(&mut self, id: HoldingId) -> Option<Holding> {
        self.store.remove_holding(id)
    }

    pub fn holdings(&self) -> Vec<Holding> {
        self.store.list_holdings()
    }

    pub fn metrics(&self) -> AggregateMetrics {
        compute_aggregate_metrics(self.store.holdings())
    }

    pub fn valuation(&self) -> PortfolioValuation {
        value_portfolio(self.store.holdings())
    }

    /// True while a request is outstanding; a front end should disable the
    /// analyze control.
    pub fn is_analyzing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) != IDLE
    }

    /// Whether `request_insight` would start a new analysis.
    pub fn can_request_insight(&self) -> bool {
        !self.is_analyzing() && !self.store.is_empty()
    }

    pub fn latest_insight(&self) -> Option<&str> {
        self.latest_insight.as_deref()
    }

    /// Starts an analysis of the current holdings.
    ///
    /// Returns `None` if one is already running or there is nothing to
    /// analyze. The snapshot is taken here; the store stays mutable while the
    /// request is pending.
    pub fn request_insight(&mut self) -> Option<InsightRequest> {
        if !self.can_request_insight() {
            debug!(
                analyzing = self.is_analyzing(),
                holdings = self.store.len(),
                "Insight request refused"
            );
            return None;
        }

        self.issued += 1;
        let ticket = self.issued;
        self.in_flight.store(ticket, Ordering::Release);
        debug!(ticket, "Insight requested");

        Some(InsightRequest {
            ticket,
            pending: self.generator.generate_insight(self.store.holdings()),
            in_flight: Arc::clone(&self.in_flight),
            resolved: false,
        })
    }

    /// Records the result of the outstanding request.
    ///
    /// Responses for any other ticket are dropped and `false` is returned.
    pub fn complete_insight(&mut self, response: InsightResponse) -> bool {
        let matched = self
            .in_flight
            .compare_exchange(response.ticket, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if !matched {
            debug!(ticket = response.ticket, "Ignoring stale insight");
            return false;
        }
        self.latest_insight = Some(response.text);
        debug!(ticket = response.ticket, "Insight completed");
        true
    }
}
