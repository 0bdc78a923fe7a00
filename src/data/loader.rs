//! Loads per-asset price history from the configured record sets.

use crate::data::{AssetRegistry, PricePoint};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum HistoryError {
    /// The symbol has no entry in the asset registry.
    #[error("no history source configured for asset '{0}'")]
    UnknownAsset(String),
    /// The backing file is missing or unreadable.
    #[error("history for '{symbol}' unavailable at {path}: {source}")]
    SourceUnavailable {
        symbol: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A record is missing `time` or holds a value that fails to parse.
    #[error("malformed record in history for '{symbol}': {source}")]
    MalformedRecord {
        symbol: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct HistoryLoader {
    registry: AssetRegistry,
}

impl HistoryLoader {
    pub fn new(registry: AssetRegistry) -> Self {
        Self { registry }
    }

    /// Read the full record set for `symbol` and return it newest first.
    ///
    /// A single malformed record fails the whole load; there is no
    /// skip-and-continue.
    pub fn load(&self, symbol: &str) -> Result<Vec<PricePoint>, HistoryError> {
        let path = self
            .registry
            .path_for(symbol)
            .ok_or_else(|| HistoryError::UnknownAsset(symbol.to_string()))?;

        let raw = fs::read_to_string(path).map_err(|source| HistoryError::SourceUnavailable {
            symbol: symbol.to_string(),
            path: path.to_path_buf(),
            source,
        })?;

        let mut points: Vec<PricePoint> =
            serde_json::from_str(&raw).map_err(|source| HistoryError::MalformedRecord {
                symbol: symbol.to_string(),
                source,
            })?;

        // Newest first. Stable, so records sharing a timestamp keep file order.
        points.sort_by(|a, b| b.time.cmp(&a.time));

        debug!("loaded {} records for {}", points.len(), symbol);
        Ok(points)
    }
}
