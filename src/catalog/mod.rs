//! Read-only model and hardware catalogs
//!
//! Catalogs are plain keyed records handed to the estimators by the caller.
//! Nothing in the crate keeps a global registry; the built-in tables in
//! [`crate::model::presets`] and [`crate::hardware::profiles`] are ordinary
//! catalog values.

pub mod search;

use crate::hardware::HardwareSpec;
use crate::model::ModelConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

pub use search::{search_models, ModelSearchHit, DEFAULT_SEARCH_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Model,
    Hardware,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Model => write!(f, "model"),
            CatalogKind::Hardware => write!(f, "hardware"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("unknown {kind} '{key}' ({available} entries in catalog)")]
    UnknownKey {
        kind: CatalogKind,
        key: String,
        available: usize,
    },

    #[error("failed to parse {kind} catalog: {source}")]
    Parse {
        kind: CatalogKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {kind} catalog {}: {source}", .path.display())]
    Io {
        kind: CatalogKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A record type that can live in a catalog
pub trait CatalogRecord: Clone + DeserializeOwned {
    const KIND: CatalogKind;
}

impl CatalogRecord for ModelConfig {
    const KIND: CatalogKind = CatalogKind::Model;
}

impl CatalogRecord for HardwareSpec {
    const KIND: CatalogKind = CatalogKind::Hardware;
}

/// Keyed catalog with a deterministic (sorted) iteration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: CatalogRecord> Catalog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, record: T) -> Self {
        self.entries.insert(key.into(), record);
        self
    }

    /// Parse a JSON object mapping keys to records
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let entries = serde_json::from_str(json).map_err(|source| CatalogError::Parse {
            kind: T::KIND,
            source,
        })?;
        Ok(Self { entries })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            kind: T::KIND,
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Look up a record. A missing key is reported, never zero-filled.
    pub fn get(&self, key: &str) -> Result<&T, CatalogError> {
        self.entries.get(key).ok_or_else(|| {
            let kind = T::KIND;
            warn!(%kind, key, "key not found in catalog");
            CatalogError::UnknownKey {
                kind,
                key: key.to_string(),
                available: self.entries.len(),
            }
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: CatalogRecord, K: Into<String>> FromIterator<(K, T)> for Catalog<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_is_reported() {
        let catalog: Catalog<ModelConfig> =
            Catalog::new().with_entry("tiny", ModelConfig::default());
        let err = catalog.get("missing").unwrap_err();
        match err {
            CatalogError::UnknownKey { kind, key, available } => {
                assert_eq!(kind, CatalogKind::Model);
                assert_eq!(key, "missing");
                assert_eq!(available, 1);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_found_minimal_record_is_distinct_from_missing() {
        let catalog: Catalog<HardwareSpec> =
            Catalog::new().with_entry("bare", HardwareSpec::default());
        assert!(catalog.get("bare").is_ok());
        assert!(catalog.get("other").is_err());
    }

    #[test]
    fn test_from_json_str() {
        let catalog = Catalog::<HardwareSpec>::from_json_str(
            r#"{"b-card": {"compute": 50, "memory": 16}, "a-card": {"bandwidth": 300}}"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["a-card", "b-card"]);
        assert_eq!(catalog.get("b-card").unwrap().memory(), 16.0);
    }

    #[test]
    fn test_from_json_str_rejects_non_object() {
        let err = Catalog::<ModelConfig>::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { kind: CatalogKind::Model, .. }));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = Catalog::<ModelConfig>::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("failed to read model catalog"));
    }
}
