//! Final column ordering.

use polars::prelude::{DataFrame, PolarsResult};

use crate::data_utils::column_names;

/// Desired names that exist, in desired order, then every other name in its
/// existing order.
pub fn projection_order(names: &[String], desired: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(names.len());
    for name in desired {
        if names.contains(name) && !ordered.contains(name) {
            ordered.push(name.clone());
        }
    }
    for name in names {
        if !ordered.contains(name) {
            ordered.push(name.clone());
        }
    }
    ordered
}

/// Reorder columns per [`projection_order`]. No column is dropped.
pub fn project_columns(df: &DataFrame, desired: &[String]) -> PolarsResult<DataFrame> {
    let order = projection_order(&column_names(df), desired);
    df.select(order)
}
