//! Configuration for settlement

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settlement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Trip ledger configuration
    pub ledger: trip_ledger::Config,

    /// Netting configuration
    pub netting: NettingConfig,

    /// Settlement tracker configuration
    pub tracker: TrackerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "trip-settlement".to_string(),
            ledger: trip_ledger::Config::default(),
            netting: NettingConfig::default(),
            tracker: TrackerConfig::default(),
        }
    }
}

/// Netting tolerances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NettingConfig {
    /// Balances within this distance of zero are settled
    pub balance_epsilon: Decimal,

    /// Custom-split remainders at or below this are ignored
    pub remainder_epsilon: Decimal,
}

impl Default for NettingConfig {
    fn default() -> Self {
        Self {
            balance_epsilon: Decimal::new(1, 4),   // 0.0001
            remainder_epsilon: Decimal::new(1, 3), // 0.001
        }
    }
}

/// Settlement tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Storage key of the cleared-debt list
    pub storage_key: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_key: "tp_cleared_debts".to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    ///
    /// Ledger settings come from `trip_ledger::Config::from_env`;
    /// `SETTLEMENT_DATA_DIR` overrides the ledger data directory.
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config {
            ledger: trip_ledger::Config::from_env()?,
            ..Config::default()
        };

        if let Ok(dir) = std::env::var("SETTLEMENT_DATA_DIR") {
            config.ledger.data_dir = PathBuf::from(dir);
        }

        if let Ok(key) = std::env::var("SETTLEMENT_CLEARED_KEY") {
            config.tracker.storage_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.netting.balance_epsilon < Decimal::ZERO
            || self.netting.remainder_epsilon < Decimal::ZERO
        {
            return Err(crate::Error::Config(
                "Netting tolerances must not be negative".to_string(),
            ));
        }
        if self.ledger.change_channel_capacity == 0 {
            return Err(crate::Error::Config(
                "ledger.change_channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.tracker.storage_key.trim().is_empty() {
            return Err(crate::Error::Config(
                "Tracker storage key is empty".to_string(),
            ));
        }
        Ok(())
    }
}
