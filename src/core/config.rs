use crate::core::holding::HoldingDraft;
use crate::core::insight::InsightConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// A lot to seed the portfolio with at startup.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SeedHolding {
    pub symbol: String,
    pub name: String,
    pub shares: f64,
    pub purchase_price: f64,
    /// Last known market price; defaults to the purchase price.
    pub current_price: Option<f64>,
}

impl SeedHolding {
    pub fn to_draft(&self) -> HoldingDraft {
        HoldingDraft::new(
            &self.symbol,
            &self.name,
            self.shares.to_string(),
            self.purchase_price.to_string(),
        )
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub holdings: Vec<SeedHolding>,
    #[serde(default)]
    pub insight: InsightConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "folio", "folio")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
holdings:
  - symbol: "AAPL"
    name: "Apple Inc."
    shares: 50
    purchase_price: 150
    current_price: 175.50
  - symbol: "googl"
    name: "Alphabet Inc."
    shares: 25.5
    purchase_price: 140
insight:
  delay_ms: 250
  profit_threshold: 10.0
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.holdings.len(), 2);
        assert_eq!(config.holdings[0].symbol, "AAPL");
        assert_eq!(config.holdings[0].shares, 50.0);
        assert_eq!(config.holdings[0].current_price, Some(175.5));
        assert_eq!(config.holdings[1].shares, 25.5);
        assert!(config.holdings[1].current_price.is_none());

        assert_eq!(config.insight.delay_ms, 250);
        assert_eq!(config.insight.profit_threshold, 10.0);
        // Unset fields keep their defaults
        assert_eq!(config.insight.loss_threshold, -5.0);
        assert_eq!(config.insight.diversification_target, 5);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.holdings.is_empty());
        assert_eq!(config.insight, InsightConfig::default());
    }

    #[test]
    fn test_seed_holding_to_draft() {
        let seed = SeedHolding {
            symbol: "msft".to_string(),
            name: "Microsoft Corp.".to_string(),
            shares: 40.0,
            purchase_price: 380.25,
            current_price: None,
        };
        let draft = seed.to_draft();
        assert_eq!(draft.shares, "40");
        assert_eq!(draft.purchase_price, "380.25");
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/definitely/not/here/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
