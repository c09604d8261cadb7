pub mod cli;
pub mod core;
pub mod session;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::insight::InsightGenerator;
use crate::session::PortfolioSession;
use crate::store::PortfolioStore;
use anyhow::{Context, Result};
use tracing::{debug, info};

pub enum AppCommand {
    Summary,
    Analyze,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Portfolio tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let mut session = build_session(&config)?;

    match command {
        AppCommand::Summary => cli::summary::run(&session),
        AppCommand::Analyze => cli::analyze::run(&mut session).await,
    }
}

/// Builds a session holding the config's seed holdings, in order.
pub fn build_session(config: &AppConfig) -> Result<PortfolioSession> {
    let mut store = PortfolioStore::new();
    for seed in &config.holdings {
        let id = store
            .add_holding(&seed.to_draft())
            .with_context(|| format!("Invalid holding {} in config", seed.symbol))?;
        if let Some(price) = seed.current_price {
            store
                .set_current_price(id, price)
                .with_context(|| format!("Invalid current price for {}", seed.symbol))?;
        }
    }
    debug!("Seeded {} holdings", store.len());

    Ok(PortfolioSession::new(
        store,
        InsightGenerator::new(config.insight.clone()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SeedHolding;

    fn seed(
        symbol: &str,
        shares: f64,
        purchase_price: f64,
        current_price: Option<f64>,
    ) -> SeedHolding {
        SeedHolding {
            symbol: symbol.to_string(),
            name: format!("{symbol} Inc."),
            shares,
            purchase_price,
            current_price,
        }
    }

    #[test]
    fn test_build_session_seeds_in_order() {
        let config = AppConfig {
            holdings: vec![
                seed("aapl", 50.0, 150.0, Some(175.5)),
                seed("GOOGL", 25.0, 140.0, None),
            ],
            ..AppConfig::default()
        };

        let session = build_session(&config).unwrap();
        let holdings = session.holdings();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].symbol(), "AAPL");
        assert_eq!(holdings[0].current_price(), 175.5);
        assert_eq!(holdings[1].current_price(), 140.0);
    }

    #[test]
    fn test_build_session_rejects_invalid_seed() {
        let config = AppConfig {
            holdings: vec![seed("AAPL", 0.0, 150.0, None)],
            ..AppConfig::default()
        };

        let err = build_session(&config).err().expect("zero shares is invalid");
        assert!(err.to_string().contains("Invalid holding AAPL"));
    }

    #[test]
    fn test_build_session_rejects_invalid_current_price() {
        let config = AppConfig {
            holdings: vec![seed("AAPL", 1.0, 150.0, Some(-2.0))],
            ..AppConfig::default()
        };

        assert!(build_session(&config).is_err());
    }
}
