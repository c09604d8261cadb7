//! Price feed abstractions and the refresh step that applies quotes to a store.

use crate::store::PortfolioStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub symbol: String,
    pub price: f64,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote>;
}

/// Serves prices from a fixed in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceProvider {
    prices: HashMap<String, f64>,
}

impl StaticPriceProvider {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.set_price(symbol, price);
        self
    }

    pub fn set_price(&mut self, symbol: &str, price: f64) {
        self.prices.insert(symbol.to_uppercase(), price);
    }
}

#[async_trait]
impl PriceProvider for StaticPriceProvider {
    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote> {
        let key = symbol.to_uppercase();
        let price = self
            .prices
            .get(&key)
            .copied()
            .ok_or_else(|| anyhow!("No price available for {}", key))?;
        Ok(PriceQuote { symbol: key, price })
    }
}

/// Outcome of a price refresh.
#[derive(Debug, Default)]
pub struct PriceRefresh {
    /// Number of holdings whose price was updated.
    pub updated: usize,
    /// Symbols that could not be priced, with the reason.
    pub failures: Vec<(String, String)>,
}

/// Fetches a quote for every distinct symbol in `store` and applies it.
///
/// Quotes are fetched concurrently and the store is only modified once every
/// fetch has finished. A failed or invalid quote leaves that symbol's holdings
/// at their previous price.
pub async fn refresh_prices(
    store: &mut PortfolioStore,
    provider: &(dyn PriceProvider + Send + Sync),
) -> PriceRefresh {
    let symbols = store.symbols();
    debug!("Refreshing prices for {} symbols", symbols.len());

    let price_futures = symbols.iter().map(|symbol| async move {
        let res = provider.fetch_price(symbol).await;
        (symbol.clone(), res)
    });
    let price_results: Vec<(String, Result<PriceQuote>)> = join_all(price_futures).await;

    let mut refresh = PriceRefresh::default();
    for (symbol, result) in price_results {
        let quote = match result {
            Ok(quote) => quote,
            Err(e) => {
                debug!("Price fetch error for {}: {}", symbol, e);
                refresh.failures.push((symbol, e.to_string()));
                continue;
            }
        };

        let ids: Vec<_> = store
            .holdings()
            .iter()
            .filter(|h| h.symbol() == symbol)
            .map(|h| h.id())
            .collect();
        for id in ids {
            match store.set_current_price(id, quote.price) {
                Ok(true) => refresh.updated += 1,
                Ok(false) => {}
                Err(e) => {
                    debug!("Rejected quote for {}: {}", symbol, e);
                    refresh.failures.push((symbol.clone(), e.to_string()));
                    break;
                }
            }
        }
    }

    refresh
}
