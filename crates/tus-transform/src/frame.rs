//! Module frame types for survey table representation.
//!
//! A [`ModuleFrame`] wraps a Polars DataFrame with the survey module it
//! belongs to and the file parts that contributed rows to it.

use polars::prelude::DataFrame;
use tus_model::ModuleKind;

/// One file part of a module as handed to the pipeline.
#[derive(Debug, Clone)]
pub struct SourcePart {
    /// Display name of the part, typically the file name.
    pub name: String,
    pub data: DataFrame,
}

impl SourcePart {
    pub fn new(name: impl Into<String>, data: DataFrame) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// All file parts of one module.
#[derive(Debug, Clone)]
pub struct ModuleInput {
    pub kind: ModuleKind,
    pub parts: Vec<SourcePart>,
}

impl ModuleInput {
    pub fn new(kind: ModuleKind, parts: Vec<SourcePart>) -> Self {
        Self { kind, parts }
    }
}

/// Provenance of a module frame.
#[derive(Debug, Clone, Default)]
pub struct ModuleFrameMeta {
    /// Parts whose rows are in the frame.
    pub source_parts: Vec<String>,
    /// Parts left out because they lacked a key or could not be concatenated.
    pub dropped_parts: Vec<String>,
}

/// A survey module table with metadata.
#[derive(Debug, Clone)]
pub struct ModuleFrame {
    pub kind: ModuleKind,
    pub data: DataFrame,
    pub meta: ModuleFrameMeta,
}

impl ModuleFrame {
    pub fn new(kind: ModuleKind, data: DataFrame) -> Self {
        Self {
            kind,
            data,
            meta: ModuleFrameMeta::default(),
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: ModuleFrameMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Returns the number of records in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    pub fn source_parts(&self) -> &[String] {
        &self.meta.source_parts
    }

    pub fn dropped_parts(&self) -> &[String] {
        &self.meta.dropped_parts
    }
}
