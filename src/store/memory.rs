use crate::core::error::ValidationError;
use crate::core::holding::{Holding, HoldingDraft, HoldingId, ensure_positive};
use tracing::debug;

/// In-memory, insertion-ordered collection of holdings.
///
/// The store is the only place holdings are created, so every holding it
/// hands out satisfies the positivity invariants.
#[derive(Debug, Default, Clone)]
pub struct PortfolioStore {
    holdings: Vec<Holding>,
}

impl PortfolioStore {
    pub fn new() -> Self {
        Self {
            holdings: Vec::new(),
        }
    }

    /// Validates `draft` and appends a new holding to the end of the portfolio.
    ///
    /// On error nothing is changed. Duplicate symbols are kept as separate lots.
    pub fn add_holding(&mut self, draft: &HoldingDraft) -> Result<HoldingId, ValidationError> {
        let holding = draft
            .validate()
            .inspect_err(|e| debug!("Rejected holding draft: {e}"))?
            .into_holding();
        let id = holding.id();
        debug!(%id, symbol = holding.symbol(), "Added holding");
        self.holdings.push(holding);
        Ok(id)
    }

    /// Removes the holding with `id`. Unknown ids are ignored.
    pub fn remove_holding(&mut self, id: HoldingId) -> Option<Holding> {
        let index = self.holdings.iter().position(|h| h.id() == id)?;
        let removed = self.holdings.remove(index);
        debug!(%id, symbol = removed.symbol(), "Removed holding");
        Some(removed)
    }

    /// Owned snapshot of the holdings in insertion order.
    pub fn list_holdings(&self) -> Vec<Holding> {
        self.holdings.clone()
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn get(&self, id: HoldingId) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.id() == id)
    }

    /// Updates the market price of one holding, as a price feed would.
    ///
    /// Returns `Ok(false)` when no holding has `id`.
    pub fn set_current_price(
        &mut self,
        id: HoldingId,
        price: f64,
    ) -> Result<bool, ValidationError> {
        let price = ensure_positive("current_price", price)?;
        match self.holdings.iter_mut().find(|h| h.id() == id) {
            Some(holding) => {
                holding.set_current_price(price)?;
                debug!(%id, price, "Updated current price");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Distinct symbols in first-seen order.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = Vec::new();
        for holding in &self.holdings {
            if !symbols.iter().any(|s| s == holding.symbol()) {
                symbols.push(holding.symbol().to_string());
            }
        }
        symbols
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn draft(symbol: &str, shares: &str, price: &str) -> HoldingDraft {
        HoldingDraft::new(symbol, format!("{symbol} Corp."), shares, price)
    }

    #[test]
    fn test_add_holding_appends_with_unique_id() {
        let mut store = PortfolioStore::new();
        let first = store.add_holding(&draft("aapl", "50", "150")).unwrap();
        let second = store.add_holding(&draft("msft", "40", "380")).unwrap();

        let holdings = store.list_holdings();
        assert_eq!(holdings.len(), 2);
        assert_ne!(first, second);
        assert_eq!(holdings[0].id(), first);
        assert_eq!(holdings[0].symbol(), "AAPL");
        assert_eq!(holdings[1].symbol(), "MSFT");
        assert_eq!(holdings[1].current_price(), holdings[1].purchase_price());
    }

    #[test]
    fn test_every_added_id_is_fresh() {
        let mut store = PortfolioStore::new();
        let mut seen = HashSet::new();
        for i in 1..=20 {
            let id = store.add_holding(&draft("VTI", &i.to_string(), "200")).unwrap();
            assert!(seen.insert(id), "duplicate id {id}");
        }
        assert_eq!(store.len(), 20);
    }

    #[test]
    fn test_duplicate_symbols_are_separate_lots() {
        let mut store = PortfolioStore::new();
        store.add_holding(&draft("AAPL", "10", "150")).unwrap();
        store.add_holding(&draft("aapl", "5", "170")).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.symbols(), vec!["AAPL".to_string()]);
    }

    #[test]
    fn test_invalid_draft_leaves_store_unchanged() {
        let mut store = PortfolioStore::new();
        store.add_holding(&draft("AAPL", "10", "150")).unwrap();
        let before = store.list_holdings();

        let zero_shares = store.add_holding(&draft("MSFT", "0", "380"));
        assert!(matches!(
            zero_shares,
            Err(ValidationError::NotPositive { field: "shares", .. })
        ));

        let bad_price = store.add_holding(&draft("MSFT", "10", "abc"));
        assert!(matches!(
            bad_price,
            Err(ValidationError::NotANumber {
                field: "purchase_price",
                ..
            })
        ));

        assert_eq!(store.list_holdings(), before);
    }

    #[test]
    fn test_remove_holding_is_idempotent() {
        let mut store = PortfolioStore::new();
        let keep = store.add_holding(&draft("AAPL", "10", "150")).unwrap();
        let drop = store.add_holding(&draft("MSFT", "10", "380")).unwrap();

        assert!(store.remove_holding(drop).is_some());
        let once = store.list_holdings();
        assert!(store.remove_holding(drop).is_none());
        assert_eq!(store.list_holdings(), once);
        assert_eq!(once.len(), 1);
        assert_eq!(once[0].id(), keep);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = PortfolioStore::new();
        store.add_holding(&draft("AAPL", "10", "150")).unwrap();

        let mut snapshot = store.list_holdings();
        snapshot.clear();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_current_price() {
        let mut store = PortfolioStore::new();
        let id = store.add_holding(&draft("AAPL", "50", "150")).unwrap();

        assert_eq!(store.set_current_price(id, 175.5), Ok(true));
        assert_eq!(store.get(id).unwrap().current_price(), 175.5);
        assert_eq!(store.get(id).unwrap().purchase_price(), 150.0);

        assert!(store.set_current_price(id, -1.0).is_err());
        assert_eq!(store.get(id).unwrap().current_price(), 175.5);

        store.remove_holding(id);
        assert_eq!(store.set_current_price(id, 180.0), Ok(false));
    }

    #[test]
    fn test_overflowing_values_leave_store_unchanged() {
        let mut store = PortfolioStore::new();
        let id = store.add_holding(&draft("AAPL", "50", "150")).unwrap();
        let before = store.list_holdings();

        let huge = store.add_holding(&draft("BIG", "1e300", "1e300"));
        assert!(matches!(huge, Err(ValidationError::OutOfRange { .. })));

        let spike = store.set_current_price(id, f64::MAX);
        assert!(matches!(
            spike,
            Err(ValidationError::OutOfRange {
                field: "current_price",
                ..
            })
        ));

        assert_eq!(store.list_holdings(), before);
    }

    proptest! {
        #[test]
        fn prop_valid_draft_is_appended_with_fresh_id(
            existing in 0usize..5,
            symbol in "[A-Za-z]{1,5}",
            name in "[A-Za-z][A-Za-z ]{0,10}",
            shares in 0.001f64..1e6,
            price in 0.01f64..1e5,
        ) {
            let mut store = PortfolioStore::new();
            for i in 0..existing {
                store.add_holding(&draft("VTI", &(i + 1).to_string(), "200")).unwrap();
            }
            let before: HashSet<HoldingId> = store.holdings().iter().map(|h| h.id()).collect();

            let added = HoldingDraft::new(
                symbol.clone(),
                name.clone(),
                shares.to_string(),
                price.to_string(),
            );
            let id = store.add_holding(&added).unwrap();

            let holdings = store.list_holdings();
            prop_assert_eq!(holdings.len(), existing + 1);
            prop_assert!(!before.contains(&id));

            let last = holdings.last().unwrap();
            prop_assert_eq!(last.id(), id);
            prop_assert_eq!(last.symbol(), symbol.to_uppercase());
            prop_assert_eq!(last.name(), name.trim());
            prop_assert_eq!(last.shares(), shares);
            prop_assert_eq!(last.purchase_price(), price);
            prop_assert_eq!(last.current_price(), last.purchase_price());
        }
    }
}
