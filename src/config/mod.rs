use crate::data::AssetRegistry;
use anyhow::{Context, Result};
use config::{Config as ConfigLoader, File};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Symbol -> history file. The closed set of supported assets; adding one
    /// means adding an entry here, not writing code.
    pub assets: BTreeMap<String, PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        let symbols = [
            "avax", "bnb", "btc", "doge", "eth", "shib", "sol", "trx", "usdt",
        ];
        Self {
            assets: symbols
                .iter()
                .map(|s| ((*s).to_string(), PathBuf::from(format!("json_data/{s}.json"))))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let settings = ConfigLoader::builder()
            .add_source(File::from(config_path.clone()).required(false))
            .add_source(config::Environment::with_prefix("COINDASH").separator("_"))
            .build()
            .context("Failed to build configuration")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    fn config_path() -> PathBuf {
        // Try local config first, then default
        let local_config = PathBuf::from("config/default.toml");
        if local_config.exists() {
            return local_config;
        }

        // Fallback to executable directory
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let exe_config = exe_dir.join("config/default.toml");
                if exe_config.exists() {
                    return exe_config;
                }
            }
        }

        local_config
    }

    /// The explicit symbol -> file mapping handed to the loader.
    pub fn registry(&self) -> AssetRegistry {
        self.data
            .assets
            .iter()
            .map(|(symbol, path)| (symbol.clone(), path.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_covers_the_supported_assets() {
        let config = Config::default();
        let registry = config.registry();
        assert_eq!(registry.len(), 9);
        assert!(registry.path_for("btc").is_some());
        assert!(registry.path_for("ada").is_none());
    }
}
