//! Holding types and draft validation.

use crate::core::error::ValidationError;
use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Upper bound on the cost or market value of a single holding.
pub const MAX_POSITION_VALUE: f64 = 1e15;

/// Opaque identifier of a holding. Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HoldingId(u64);

impl HoldingId {
    pub(crate) fn next() -> Self {
        HoldingId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for HoldingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raw, unvalidated input for a new holding, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoldingDraft {
    pub symbol: String,
    pub name: String,
    pub shares: String,
    pub purchase_price: String,
}

impl HoldingDraft {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        shares: impl Into<String>,
        purchase_price: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            shares: shares.into(),
            purchase_price: purchase_price.into(),
        }
    }

    /// Checks every field and returns the parsed values without assigning an id.
    pub(crate) fn validate(&self) -> Result<ValidDraft, ValidationError> {
        let symbol = required("symbol", &self.symbol)?;
        let name = required("name", &self.name)?;
        let shares = positive_number("shares", &self.shares)?;
        let purchase_price = positive_number("purchase_price", &self.purchase_price)?;
        ensure_in_range("purchase_price", shares, purchase_price, purchase_price)?;

        Ok(ValidDraft {
            symbol: symbol.to_uppercase(),
            name: name.to_string(),
            shares,
            purchase_price,
        })
    }
}

pub(crate) struct ValidDraft {
    symbol: String,
    name: String,
    shares: f64,
    purchase_price: f64,
}

impl ValidDraft {
    pub(crate) fn into_holding(self) -> Holding {
        Holding {
            id: HoldingId::next(),
            symbol: self.symbol,
            name: self.name,
            shares: self.shares,
            purchase_price: self.purchase_price,
            current_price: self.purchase_price,
            added_at: Utc::now(),
        }
    }
}

/// A single tracked equity position.
///
/// Fields are private so that the positivity invariants hold for every
/// holding that exists; the only way to make one is through the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    id: HoldingId,
    symbol: String,
    name: String,
    shares: f64,
    purchase_price: f64,
    current_price: f64,
    added_at: DateTime<Utc>,
}

impl Holding {
    pub fn id(&self) -> HoldingId {
        self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shares(&self) -> f64 {
        self.shares
    }

    /// Per-share cost basis, fixed at creation.
    pub fn purchase_price(&self) -> f64 {
        self.purchase_price
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub(crate) fn set_current_price(&mut self, price: f64) -> Result<(), ValidationError> {
        let price = ensure_positive("current_price", price)?;
        ensure_in_range("current_price", self.shares, self.purchase_price, price)?;
        self.current_price = price;
        Ok(())
    }
}

fn required<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(trimmed)
}

fn positive_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = required(field, raw)?;
    let value: f64 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
        field,
        value: trimmed.to_string(),
    })?;
    ensure_positive(field, value)
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NotPositive { field, value })
    }
}

/// Rejects positions whose cost, market value or gain percentage would not
/// be a finite, bounded number.
pub(crate) fn ensure_in_range(
    field: &'static str,
    shares: f64,
    purchase_price: f64,
    current_price: f64,
) -> Result<(), ValidationError> {
    let cost = shares * purchase_price;
    let value = shares * current_price;
    let percent = (current_price - purchase_price) / purchase_price * 100.0;
    if cost <= MAX_POSITION_VALUE && value <= MAX_POSITION_VALUE && percent.is_finite() {
        Ok(())
    } else {
        let value = if field == "current_price" {
            current_price
        } else {
            purchase_price
        };
        Err(ValidationError::OutOfRange { field, value })
    }
}

/// Builds a holding with an explicit market price, for tests elsewhere in the crate.
#[cfg(test)]
pub(crate) fn test_holding(
    symbol: &str,
    shares: f64,
    purchase_price: f64,
    current_price: f64,
) -> Holding {
    let draft = HoldingDraft::new(
        symbol,
        symbol,
        shares.to_string(),
        purchase_price.to_string(),
    );
    let mut holding = draft.validate().expect("valid test holding").into_holding();
    holding
        .set_current_price(current_price)
        .expect("valid test price");
    holding
}
