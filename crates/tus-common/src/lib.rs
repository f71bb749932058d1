//! Shared utilities for the time-use survey workspace.
//!
//! This crate holds the single canonical rendering of survey codes used by
//! both key construction and code-map lookups, plus small Polars helpers.

pub mod polars;

pub use polars::{
    canonical_code, canonical_code_str, column_codes, format_numeric, strip_leading_zeros,
};
