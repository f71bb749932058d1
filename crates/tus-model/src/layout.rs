//! Survey round layout: everything that differs between survey rounds,
//! expressed as data rather than branches.
//!
//! A layout names the design key, the alias groups reconciling header drift
//! between files, how each module's file parts are subset and enriched, the
//! geographic lookup columns, and the final analytic column names and order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::enums::ModuleKind;
use crate::error::{ModelError, Result};

/// Canonical column name plus the alternate spellings seen in extracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasGroup {
    pub canonical: String,
    pub alternates: Vec<String>,
}

/// Structural subsetting of a file's leading administrative columns.
///
/// Of the first `head_len` columns only the one at `keep_index` survives;
/// every column from `head_len` onward is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadSubset {
    pub head_len: usize,
    pub keep_index: usize,
}

impl HeadSubset {
    /// Column positions kept for a table of the given width.
    pub fn kept_indices(&self, width: usize) -> Vec<usize> {
        let mut kept = Vec::with_capacity(width.saturating_sub(self.head_len) + 1);
        if self.keep_index < width.min(self.head_len) {
            kept.push(self.keep_index);
        }
        kept.extend(self.head_len..width);
        kept
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

/// One `(column, code map)` pair of an enrichment plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentStep {
    pub column: String,
    pub code_map: String,
}

impl EnrichmentStep {
    pub fn new(column: impl Into<String>, code_map: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            code_map: code_map.into(),
        }
    }
}

/// Where the state part of the geographic key comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "column", rename_all = "snake_case")]
pub enum StateSource {
    /// A column holding the state code directly.
    Column(String),
    /// An NSS region column; the state code is its leading digits
    /// (first two of a three-character region, first one of two).
    NssRegion(String),
}

impl StateSource {
    pub fn column(&self) -> &str {
        match self {
            StateSource::Column(name) | StateSource::NssRegion(name) => name,
        }
    }
}

/// Columns feeding the composite district lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoColumns {
    #[serde(default)]
    pub sub_region: Option<String>,
    pub district: String,
    pub state: StateSource,
    /// When set, the resolved state name is written to this column.
    #[serde(default)]
    pub state_name_column: Option<String>,
    #[serde(default = "default_true")]
    pub strip_leading_zeros: bool,
}

fn default_true() -> bool {
    true
}

/// Per-module processing rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLayout {
    pub kind: ModuleKind,
    /// Lower-case file base names (part suffix removed) holding this module.
    #[serde(default)]
    pub file_stems: Vec<String>,
    #[serde(default)]
    pub subset: Option<HeadSubset>,
    /// Columns carried forward after concatenation; empty keeps all.
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub map_geography: bool,
    #[serde(default)]
    pub enrichment: Vec<EnrichmentStep>,
}

impl ModuleLayout {
    pub fn new(kind: ModuleKind) -> Self {
        Self {
            kind,
            file_stems: Vec::new(),
            subset: None,
            columns: Vec::new(),
            map_geography: false,
            enrichment: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyLayout {
    pub name: String,
    /// Ordered design key; concatenation order is part of the key.
    pub design_key: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<AliasGroup>,
    #[serde(default = "default_household_id")]
    pub household_id_column: String,
    #[serde(default = "default_person_id")]
    pub person_id_column: String,
    pub person_seq_column: String,
    pub modules: Vec<ModuleLayout>,
    #[serde(default)]
    pub geography: Option<GeoColumns>,
    #[serde(default)]
    pub renames: Vec<ColumnRename>,
    #[serde(default)]
    pub drop_columns: Vec<String>,
    #[serde(default)]
    pub column_order: Vec<String>,
}

fn default_household_id() -> String {
    "household_id".to_string()
}

fn default_person_id() -> String {
    "person_id".to_string()
}

impl SurveyLayout {
    /// Check structural consistency of a layout loaded from configuration.
    pub fn validate(&self) -> Result<()> {
        if self.design_key.is_empty() {
            return Err(self.invalid("design key is empty"));
        }
        if self.person_seq_column.trim().is_empty() {
            return Err(self.invalid("person sequence column is empty"));
        }
        if self.household_id_column == self.person_id_column {
            return Err(self.invalid("household and person id columns must differ"));
        }
        let mut seen = BTreeSet::new();
        for module in &self.modules {
            if !seen.insert(module.kind) {
                return Err(ModelError::DuplicateModule {
                    layout: self.name.clone(),
                    module: module.kind.to_string(),
                });
            }
            if let Some(subset) = module.subset
                && subset.keep_index >= subset.head_len
            {
                return Err(self.invalid(format!(
                    "{} subset keeps column {} outside a head of {}",
                    module.kind, subset.keep_index, subset.head_len
                )));
            }
            if module.map_geography && self.geography.is_none() {
                return Err(self.invalid(format!(
                    "{} maps geography but no geographic columns are configured",
                    module.kind
                )));
            }
        }
        Ok(())
    }

    fn invalid(&self, message: impl Into<String>) -> ModelError {
        ModelError::InvalidLayout {
            layout: self.name.clone(),
            message: message.into(),
        }
    }

    pub fn module(&self, kind: ModuleKind) -> Option<&ModuleLayout> {
        self.modules.iter().find(|module| module.kind == kind)
    }

    /// Module holding files with the given base name (case-insensitive).
    pub fn module_for_stem(&self, stem: &str) -> Option<ModuleKind> {
        self.modules
            .iter()
            .find(|module| {
                module
                    .file_stems
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(stem))
            })
            .map(|module| module.kind)
    }
}
