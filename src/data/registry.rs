use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Explicit mapping from asset symbol to the file holding its history.
///
/// Built from configuration and passed into the loader, so tests can point a
/// temporary registry at fixture data.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    entries: BTreeMap<String, PathBuf>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.insert(symbol.into(), path.into());
    }

    pub fn path_for(&self, symbol: &str) -> Option<&Path> {
        self.entries.get(symbol).map(PathBuf::as_path)
    }

    /// Supported symbols in stable (alphabetical) order.
    pub fn symbols(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, PathBuf)> for AssetRegistry {
    fn from_iter<T: IntoIterator<Item = (String, PathBuf)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
