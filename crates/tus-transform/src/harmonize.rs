//! Combining tables: row-wise concatenation of module parts and left joins
//! across modules.

use polars::prelude::{
    Column, DataFrame, DataType, IntoLazy, JoinArgs, JoinType, PolarsResult,
    SortMultipleOptions, col,
};
use tracing::debug;
use tus_model::{Diagnostic, DiagnosticKind, Diagnostics, Stage};

use crate::data_utils::{column_names, has_column, stringify_column};

const LEFT_ROW: &str = "__left_row";
const RIGHT_ROW: &str = "__right_row";

/// Concatenated parts of one module.
#[derive(Debug, Clone)]
pub struct ConcatOutcome {
    pub data: DataFrame,
    /// Parts whose rows are in `data`, in input order.
    pub included: Vec<String>,
    /// Parts that could not be concatenated even after harmonization.
    pub dropped: Vec<String>,
}

/// Stack module parts row-wise.
///
/// Parts are appended in order. A part whose schema differs from the rows
/// accumulated so far is harmonized with them and retried once; if that
/// still fails the part is dropped and the accumulated rows are kept.
/// Returns `None` for an empty input.
pub fn concat_parts(
    parts: Vec<(String, DataFrame)>,
    diagnostics: &mut Diagnostics,
) -> Option<ConcatOutcome> {
    let mut parts = parts.into_iter();
    let (first_name, mut data) = parts.next()?;
    let mut included = vec![first_name];
    let mut dropped = Vec::new();

    for (name, part) in parts {
        if let Ok(stacked) = data.vstack(&part) {
            data = stacked;
            included.push(name);
            continue;
        }
        let retried = harmonize_schemas(&data, &part)
            .and_then(|(left, right)| left.vstack(&right).map(|stacked| (stacked, left.width())));
        match retried {
            Ok((stacked, width)) => {
                diagnostics.push(Diagnostic::new(
                    Stage::Concat,
                    DiagnosticKind::SchemaDrift,
                    format!("{name}: schema harmonized to {width} columns before concatenation"),
                ));
                data = stacked;
                included.push(name);
            }
            Err(error) => {
                diagnostics.push(Diagnostic::new(
                    Stage::Concat,
                    DiagnosticKind::PartDropped,
                    format!("{name}: concatenation failed after harmonization: {error}"),
                ));
                dropped.push(name);
            }
        }
    }

    Some(ConcatOutcome {
        data,
        included,
        dropped,
    })
}

/// Bring two tables to a common schema.
///
/// The result has the union of columns: `left`'s order first, then the
/// columns only `right` has. A column missing on one side is added as
/// nulls of the other side's type; a column whose types differ is cast to
/// string on both sides.
pub fn harmonize_schemas(
    left: &DataFrame,
    right: &DataFrame,
) -> PolarsResult<(DataFrame, DataFrame)> {
    let mut names = column_names(left);
    names.extend(
        column_names(right)
            .into_iter()
            .filter(|name| !has_column(left, name)),
    );

    let mut left_columns = Vec::with_capacity(names.len());
    let mut right_columns = Vec::with_capacity(names.len());
    for name in &names {
        match (left.column(name).ok(), right.column(name).ok()) {
            (Some(l), Some(r)) if l.dtype() == r.dtype() => {
                left_columns.push(l.clone());
                right_columns.push(r.clone());
            }
            (Some(l), Some(r)) => {
                left_columns.push(stringify_column(l));
                right_columns.push(stringify_column(r));
            }
            (Some(l), None) => {
                left_columns.push(l.clone());
                right_columns.push(null_column(name, right.height(), l.dtype()));
            }
            (None, Some(r)) => {
                left_columns.push(null_column(name, left.height(), r.dtype()));
                right_columns.push(r.clone());
            }
            (None, None) => {}
        }
    }
    Ok((DataFrame::new(left_columns)?, DataFrame::new(right_columns)?))
}

fn null_column(name: &str, len: usize, dtype: &DataType) -> Column {
    let dtype = match dtype {
        DataType::Null => DataType::String,
        other => other.clone(),
    };
    Column::full_null(name.into(), len, &dtype)
}

/// Left join `right` onto `left` on `key`.
///
/// Every `left` row is kept in its original order; matched `right` rows
/// follow in their original order, so a one-to-many match fans out in
/// place. Key columns are compared as strings. Non-key columns present on
/// both sides come back from `right` with a `_right` suffix.
///
/// When either side lacks `key`, or the join itself fails, the failure is
/// recorded and `left` is returned unchanged.
pub fn left_join(
    left: &DataFrame,
    right: &DataFrame,
    key: &str,
    diagnostics: &mut Diagnostics,
) -> DataFrame {
    let (Ok(left_key), Ok(right_key)) = (left.column(key), right.column(key)) else {
        diagnostics.push(Diagnostic::new(
            Stage::Join,
            DiagnosticKind::ModuleExcluded,
            format!("join on '{key}' skipped: key column missing"),
        ));
        return left.clone();
    };

    let collisions: Vec<String> = column_names(right)
        .into_iter()
        .filter(|name| name != key && has_column(left, name))
        .collect();
    if !collisions.is_empty() {
        diagnostics.push(Diagnostic::new(
            Stage::Join,
            DiagnosticKind::ColumnCollision,
            format!(
                "join on '{key}' suffixed {} column(s): {}",
                collisions.len(),
                collisions.join(", ")
            ),
        ));
    }

    let left_key = stringify_column(left_key);
    let right_key = stringify_column(right_key);
    match join_ordered(left, right, left_key, right_key, key) {
        Ok(joined) => {
            debug!(
                key,
                left_rows = left.height(),
                joined_rows = joined.height(),
                "left join complete"
            );
            joined
        }
        Err(error) => {
            diagnostics.push(Diagnostic::new(
                Stage::Join,
                DiagnosticKind::ModuleExcluded,
                format!("join on '{key}' failed: {error}"),
            ));
            left.clone()
        }
    }
}

fn join_ordered(
    left: &DataFrame,
    right: &DataFrame,
    left_key: Column,
    right_key: Column,
    key: &str,
) -> PolarsResult<DataFrame> {
    let mut left = left.clone();
    left.with_column(left_key)?;
    let mut right = right.clone();
    right.with_column(right_key)?;

    let left = left.with_row_index(LEFT_ROW.into(), None)?;
    let right = right.with_row_index(RIGHT_ROW.into(), None)?;

    let joined = left
        .lazy()
        .join(
            right.lazy(),
            [col(key)],
            [col(key)],
            JoinArgs::new(JoinType::Left),
        )
        .sort(
            [LEFT_ROW, RIGHT_ROW],
            SortMultipleOptions::default()
                .with_maintain_order(true)
                .with_nulls_last(true),
        )
        .collect()?;
    Ok(joined.drop_many([LEFT_ROW, RIGHT_ROW]))
}
