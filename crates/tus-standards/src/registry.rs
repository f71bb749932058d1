#![deny(unsafe_code)]

//! Named code maps available to enrichment plans.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use tus_model::CodeMap;

use crate::codes::builtin_code_maps;
use crate::error::{Result, StandardsError};

/// Override entry for one code map, as read from JSON.
///
/// Unlike [`CodeMap`], an absent `null_fallback` leaves the existing map's
/// fallback in place.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeMapOverride {
    pub name: String,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
    #[serde(default)]
    pub null_fallback: Option<String>,
}

/// Lookup of code maps by name.
///
/// Starts from the built-in codebook tables; overrides loaded from JSON
/// extend existing maps entry by entry or add new ones.
#[derive(Debug, Clone, Default)]
pub struct CodeMapRegistry {
    maps: BTreeMap<String, CodeMap>,
}

impl CodeMapRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding every built-in code map.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for map in builtin_code_maps() {
            registry.insert(map);
        }
        registry
    }

    /// Insert a map, replacing any map of the same name.
    pub fn insert(&mut self, map: CodeMap) {
        self.maps.insert(map.name.clone(), map);
    }

    /// Merge an override over the map of the same name, or add it as a
    /// new map.
    pub fn merge(&mut self, update: CodeMapOverride) {
        let map = self
            .maps
            .entry(update.name.clone())
            .or_insert_with(|| CodeMap::new(update.name.clone()));
        for (code, label) in update.entries {
            map.insert(&code, label);
        }
        if let Some(fallback) = update.null_fallback {
            map.null_fallback = fallback;
        }
    }

    pub fn get(&self, name: &str) -> Option<&CodeMap> {
        self.maps.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Merge overrides from a JSON file holding an array of code maps:
    ///
    /// ```json
    /// [{"name": "gender", "entries": {"3": "third gender"}, "null_fallback": "not stated"}]
    /// ```
    pub fn load_overrides(&mut self, path: &Path) -> Result<usize> {
        let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
        let updates: Vec<CodeMapOverride> =
            serde_json::from_slice(&bytes).map_err(|e| StandardsError::json(path, e))?;
        let count = updates.len();
        for update in updates {
            debug!(
                code_map = %update.name,
                entries = update.entries.len(),
                "merging code map override"
            );
            self.merge(update);
        }
        Ok(count)
    }
}
