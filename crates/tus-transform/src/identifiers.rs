//! Synthesized household and person identifiers.
//!
//! Survey extracts carry no single identifier column. A household is
//! addressed by its design key (sector, state, district, sample unit and so
//! on); a person by the household plus a serial number. Both ids are
//! string concatenations of canonical codes so every module that renders
//! the same key produces the same value.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame, PolarsResult};
use tus_common::column_codes;

use crate::data_utils::string_column;

/// Which design key columns went into a household id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyCoverage {
    pub used: Vec<String>,
    pub missing: Vec<String>,
}

impl KeyCoverage {
    /// True when the id was built from fewer columns than requested.
    pub fn is_degraded(&self) -> bool {
        !self.missing.is_empty()
    }

    /// True when no key column was available and no id was written.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Append `output_column` holding the concatenated design key.
///
/// Columns are rendered through the canonical code form, nulls as the empty
/// string, and joined in the order given. Columns absent from `df` are
/// skipped and listed in the returned coverage. When none are present the
/// table is returned unchanged.
pub fn compute_household_id(
    df: &DataFrame,
    design_key: &[String],
    output_column: &str,
) -> PolarsResult<(DataFrame, KeyCoverage)> {
    let mut coverage = KeyCoverage::default();
    let mut parts: Vec<Vec<Option<String>>> = Vec::with_capacity(design_key.len());
    for name in design_key {
        match df.column(name) {
            Ok(column) => {
                parts.push(column_codes(column));
                coverage.used.push(name.clone());
            }
            Err(_) => coverage.missing.push(name.clone()),
        }
    }
    if coverage.is_empty() {
        return Ok((df.clone(), coverage));
    }

    let ids = (0..df.height()).map(|row| {
        let mut id = String::new();
        for part in &parts {
            if let Some(code) = &part[row] {
                id.push_str(code);
            }
        }
        Some(id)
    });
    let mut out = df.clone();
    out.with_column(string_column(output_column, df.height(), ids))?;
    Ok((out, coverage))
}

/// Prefix the person sequence with the household id.
///
/// The sequence column is dropped and `output_column` becomes the first
/// column. Returns `None` when either input column is missing.
pub fn compute_person_id(
    df: &DataFrame,
    household_column: &str,
    person_seq_column: &str,
    output_column: &str,
) -> PolarsResult<Option<DataFrame>> {
    let (Ok(household), Ok(seq)) = (df.column(household_column), df.column(person_seq_column))
    else {
        return Ok(None);
    };
    let households = column_codes(household);
    let seqs = column_codes(seq);
    let ids = households.iter().zip(&seqs).map(|(hh, seq)| {
        let mut id = hh.clone().unwrap_or_default();
        if let Some(seq) = seq {
            id.push_str(seq);
        }
        Some(id)
    });
    let person_id = string_column(output_column, df.height(), ids);

    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    columns.push(person_id);
    columns.extend(
        df.get_columns()
            .iter()
            .filter(|column| {
                let name = column.name().as_str();
                name != person_seq_column && name != output_column
            })
            .cloned(),
    );
    DataFrame::new(columns).map(Some)
}

/// Ids occurring more than once, in sorted order.
///
/// Nulls are not ids and are ignored.
pub fn find_duplicate_ids(df: &DataFrame, column: &str) -> Vec<String> {
    let Ok(ids) = df.column(column) else {
        return Vec::new();
    };
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for id in column_codes(ids).into_iter().flatten() {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect()
}
