//! Schema normalization: structural subsetting, alias resolution, column
//! selection and analytic renames.

use polars::prelude::{DataFrame, PlSmallStr, PolarsResult};
use tracing::debug;
use tus_model::{
    AliasGroup, ColumnRename, Diagnostic, DiagnosticKind, Diagnostics, HeadSubset, Stage,
    SurveyLayout,
};

use crate::data_utils::has_column;

/// Keep one column of the administrative head and everything after it.
pub fn apply_subset(df: &DataFrame, rule: &HeadSubset) -> PolarsResult<DataFrame> {
    let names = df.get_column_names();
    let kept: Vec<PlSmallStr> = rule
        .kept_indices(names.len())
        .into_iter()
        .map(|idx| names[idx].clone())
        .collect();
    df.select(kept)
}

/// Rename alternate spellings to their canonical name.
///
/// An alternate is renamed only while the canonical name is absent; when
/// both exist the canonical column wins and the alternate stays as-is.
/// Returns the `(alternate, canonical)` pairs that were renamed.
pub fn resolve_aliases(
    df: &mut DataFrame,
    aliases: &[AliasGroup],
) -> PolarsResult<Vec<(String, String)>> {
    let mut renamed = Vec::new();
    for group in aliases {
        for alternate in &group.alternates {
            if has_column(df, &group.canonical) {
                break;
            }
            if has_column(df, alternate) {
                df.rename(alternate, group.canonical.as_str().into())?;
                renamed.push((alternate.clone(), group.canonical.clone()));
            }
        }
    }
    Ok(renamed)
}

/// Prepare one raw file part: subset, then resolve aliases.
///
/// Returns `None` (and records `ModuleExcluded`) when the part exposes
/// none of the design key columns, since it cannot be linked.
pub fn normalize_part(
    df: &DataFrame,
    part_name: &str,
    subset: Option<&HeadSubset>,
    layout: &SurveyLayout,
    diagnostics: &mut Diagnostics,
) -> Option<DataFrame> {
    let mut df = match subset {
        Some(rule) => match apply_subset(df, rule) {
            Ok(df) => df,
            Err(error) => {
                diagnostics.push(Diagnostic::new(
                    Stage::Normalize,
                    DiagnosticKind::ModuleExcluded,
                    format!("{part_name}: column subsetting failed: {error}"),
                ));
                return None;
            }
        },
        None => df.clone(),
    };

    match resolve_aliases(&mut df, &layout.aliases) {
        Ok(renamed) => {
            for (alternate, canonical) in renamed {
                debug!(part = part_name, %alternate, %canonical, "resolved column alias");
            }
        }
        Err(error) => {
            diagnostics.push(Diagnostic::new(
                Stage::Normalize,
                DiagnosticKind::ModuleExcluded,
                format!("{part_name}: alias resolution failed: {error}"),
            ));
            return None;
        }
    }

    if !layout.design_key.iter().any(|key| has_column(&df, key)) {
        diagnostics.push(Diagnostic::new(
            Stage::Normalize,
            DiagnosticKind::ModuleExcluded,
            format!("{part_name}: none of the design key columns are present"),
        ));
        return None;
    }
    Some(df)
}

/// Keep the wanted columns that exist, in wanted order.
///
/// An empty list keeps every column. Absent names are returned so the
/// caller can report them.
pub fn select_available(
    df: &DataFrame,
    wanted: &[String],
) -> PolarsResult<(DataFrame, Vec<String>)> {
    if wanted.is_empty() {
        return Ok((df.clone(), Vec::new()));
    }
    let (present, missing): (Vec<&String>, Vec<&String>) =
        wanted.iter().partition(|name| has_column(df, name));
    let selected = df.select(present.into_iter().map(String::as_str))?;
    Ok((selected, missing.into_iter().cloned().collect()))
}

/// Apply analytic renames for the columns that are present.
///
/// A rename whose target already exists is skipped and recorded.
pub fn rename_columns(
    df: &mut DataFrame,
    renames: &[ColumnRename],
    diagnostics: &mut Diagnostics,
) -> PolarsResult<usize> {
    let mut applied = 0;
    for rename in renames {
        if rename.from == rename.to || !has_column(df, &rename.from) {
            continue;
        }
        if has_column(df, &rename.to) {
            diagnostics.push(
                Diagnostic::new(
                    Stage::Projection,
                    DiagnosticKind::ColumnCollision,
                    format!(
                        "rename of '{}' skipped: '{}' already exists",
                        rename.from, rename.to
                    ),
                )
                .with_column(rename.from.clone()),
            );
            continue;
        }
        df.rename(&rename.from, rename.to.as_str().into())?;
        applied += 1;
    }
    Ok(applied)
}

/// Drop the named columns; names that are absent are ignored.
pub fn drop_columns(df: &DataFrame, names: &[String]) -> DataFrame {
    df.drop_many(names.iter().map(String::as_str))
}
