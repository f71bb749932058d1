//! DataFrame helpers shared by the pipeline stages.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, StringChunkedBuilder};
use tus_common::column_codes;

/// Whether `df` has a column called `name`.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Owned column names in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Build a string column from optional values.
pub fn string_column<I, S>(name: &str, len: usize, values: I) -> Column
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let mut builder = StringChunkedBuilder::new(name.into(), len);
    for value in values {
        match value {
            Some(value) => builder.append_value(value.as_ref()),
            None => builder.append_null(),
        }
    }
    builder.finish().into_column()
}

/// Render a column as strings using the canonical code form.
///
/// String columns are returned unchanged; every other type goes through
/// [`tus_common::canonical_code`], so `7.0` becomes `"7"` rather than
/// `"7.0"`.
pub fn stringify_column(column: &Column) -> Column {
    if column.dtype() == &DataType::String {
        return column.clone();
    }
    let codes = column_codes(column);
    string_column(column.name().as_str(), codes.len(), codes)
}
