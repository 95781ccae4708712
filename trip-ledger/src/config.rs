//! Configuration for the trip ledger

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for the JSON file store
    pub data_dir: PathBuf,

    /// Capacity of the change-notification channel
    pub change_channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/trips"),
            change_channel_capacity: 64,
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
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(dir) = std::env::var("TRIP_LEDGER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(capacity) = std::env::var("TRIP_LEDGER_CHANNEL_CAPACITY") {
            config.change_channel_capacity = capacity.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid TRIP_LEDGER_CHANNEL_CAPACITY: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::Result<()> {
        // broadcast::channel panics on zero capacity
        if self.change_channel_capacity == 0 {
            return Err(crate::Error::Config(
                "change_channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from("./data/trips"));
        assert_eq!(config.change_channel_capacity, 64);
    }

    #[test]
    fn test_from_file_rejects_zero_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        std::fs::write(&path, "change_channel_capacity = 0\n").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("TRIP_LEDGER_DATA_DIR", "/srv/ledger");
        std::env::set_var("TRIP_LEDGER_CHANNEL_CAPACITY", "16");
        let config = Config::from_env();

        std::env::set_var("TRIP_LEDGER_CHANNEL_CAPACITY", "many");
        let invalid = Config::from_env();

        std::env::remove_var("TRIP_LEDGER_DATA_DIR");
        std::env::remove_var("TRIP_LEDGER_CHANNEL_CAPACITY");

        let config = config.unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/ledger"));
        assert_eq!(config.change_channel_capacity, 16);
        assert!(matches!(invalid, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        std::fs::write(&path, "data_dir = \"/tmp/trips\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/trips"));
        assert_eq!(config.change_channel_capacity, 64);
    }
}
